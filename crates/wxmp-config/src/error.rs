//! Error types for option validation and config loading.

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("options outputDir not set")]
    #[diagnostic(
        code(wxmp::config::missing_output_dir),
        help("pass `outputDir` in the plugin options or set WXMP_OUTPUT_DIR")
    )]
    MissingOutputDir,

    #[error("invalid config value for '{field}'{}", hint.as_ref().map(|h| format!(": {h}")).unwrap_or_default())]
    #[diagnostic(
        code(wxmp::config::invalid_value),
        help("fix `{field}` in the config file or its WXMP_ environment variable")
    )]
    InvalidValue { field: String, hint: Option<String> },

    #[error("config not found")]
    #[diagnostic(
        code(wxmp::config::not_found),
        help("add wxmp.toml, wxmp.config.json or a `wxmp` field in package.json")
    )]
    NotFound,

    #[error("I/O error: {0}")]
    #[diagnostic(code(wxmp::config::io))]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            hint: Some(hint.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_follows_the_variant() {
        let missing = ConfigError::MissingOutputDir;
        assert!(missing.help().unwrap().to_string().contains("outputDir"));

        let invalid = ConfigError::invalid("wxssSrcSuffix", "use a file extension");
        assert_eq!(invalid.code().unwrap().to_string(), "wxmp::config::invalid_value");
        let help = invalid.help().unwrap().to_string();
        assert!(help.contains("wxssSrcSuffix"));
        assert!(!help.contains("outputDir"));

        assert!(!ConfigError::NotFound.help().unwrap().to_string().contains("outputDir"));
    }
}
