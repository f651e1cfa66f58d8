//! Plugin options.
//!
//! [`PluginOptions`] is the partial shape callers hand to the plugin (every
//! field optional). [`Options`] is the validated, defaulted form that the rest
//! of the build session reads from.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default source suffix for style files.
pub const DEFAULT_WXSS_SRC_SUFFIX: &str = "wxss";

/// Style extension the framework loads at runtime.
pub const NATIVE_STYLE_EXTENSION: &str = "wxss";

pub const MARKUP_EXTENSION: &str = "wxml";

pub const DESCRIPTOR_EXTENSION: &str = "json";

/// Extension of the framework's inline view-script modules.
pub const WXS_EXTENSION: &str = "wxs";

/// Options as supplied by the caller, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginOptions {
    /// Suffix used for style files in the source tree (default `wxss`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wxss_src_suffix: Option<String>,

    /// Whether logic files are written in TypeScript (default `false`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_use_ts: Option<bool>,

    /// Destination root for compiled output. Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl PluginOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wxss_src_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.wxss_src_suffix = Some(suffix.into());
        self
    }

    pub fn with_ts(mut self, is_use_ts: bool) -> Self {
        self.is_use_ts = Some(is_use_ts);
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }
}

/// Validated options for one build session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    wxss_src_suffix: String,
    is_use_ts: bool,
    output_dir: PathBuf,
}

impl Options {
    /// Apply defaults and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingOutputDir`] when `outputDir` is absent or
    /// empty, and [`ConfigError::InvalidValue`] for an empty style suffix.
    pub fn from_partial(partial: PluginOptions) -> Result<Self> {
        let output_dir = partial
            .output_dir
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or(ConfigError::MissingOutputDir)?;

        let suffix = partial
            .wxss_src_suffix
            .unwrap_or_else(|| DEFAULT_WXSS_SRC_SUFFIX.to_string());
        let suffix = suffix.trim().trim_start_matches('.').to_string();
        if suffix.is_empty() {
            return Err(ConfigError::invalid(
                "wxssSrcSuffix",
                "use a file extension such as \"wxss\", \"scss\" or \"less\"",
            ));
        }

        Ok(Self {
            wxss_src_suffix: suffix,
            is_use_ts: partial.is_use_ts.unwrap_or(false),
            output_dir,
        })
    }

    pub fn style_src_extension(&self) -> &str {
        &self.wxss_src_suffix
    }

    pub fn is_use_ts(&self) -> bool {
        self.is_use_ts
    }

    /// Extension expected for logic files.
    pub fn script_extension(&self) -> &'static str {
        if self.is_use_ts { "ts" } else { "js" }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl TryFrom<PluginOptions> for Options {
    type Error = ConfigError;

    fn try_from(partial: PluginOptions) -> Result<Self> {
        Self::from_partial(partial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied() {
        let options = Options::from_partial(PluginOptions::new().with_output_dir("dist")).unwrap();
        assert_eq!(options.style_src_extension(), "wxss");
        assert!(!options.is_use_ts());
        assert_eq!(options.script_extension(), "js");
        assert_eq!(options.output_dir(), Path::new("dist"));
    }

    #[test]
    fn missing_output_dir_fails() {
        let err = Options::from_partial(PluginOptions::new().with_ts(true)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingOutputDir));
        assert_eq!(err.to_string(), "options outputDir not set");
    }

    #[test]
    fn empty_output_dir_fails() {
        let err = Options::from_partial(PluginOptions::new().with_output_dir("")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingOutputDir));
    }

    #[test]
    fn suffix_leading_dot_stripped() {
        let options = Options::from_partial(
            PluginOptions::new()
                .with_output_dir("dist")
                .with_wxss_src_suffix(".scss"),
        )
        .unwrap();
        assert_eq!(options.style_src_extension(), "scss");
    }

    #[test]
    fn empty_suffix_rejected() {
        let err = Options::from_partial(
            PluginOptions::new()
                .with_output_dir("dist")
                .with_wxss_src_suffix("."),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn ts_switches_script_extension() {
        let options =
            Options::from_partial(PluginOptions::new().with_output_dir("dist").with_ts(true))
                .unwrap();
        assert_eq!(options.script_extension(), "ts");
    }
}
