//! Errors surfaced to the invoking build.
//!
//! Every variant is fatal. A configuration that is wrong in any of these ways
//! is reported before the host bundler starts compiling.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;
use wxmp_config::ConfigError;
use wxmp_graph::{AliasError, GraphError};

pub type Result<T> = std::result::Result<T, PluginError>;

/// Failure reported by the host bundler's configuration query.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("host returned malformed configuration: {0}")]
    Malformed(String),

    #[error("host configuration query failed: {0}")]
    Query(String),
}

#[derive(Debug, Error, Diagnostic)]
pub enum PluginError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(
        code(wxmp::graph),
        help("check the import path and the bundler's resolve.alias settings")
    )]
    Graph(#[from] GraphError),

    #[error("entries '{}' and '{}' both map to logical name '{name}'", first.display(), second.display())]
    #[diagnostic(
        code(wxmp::naming_collision),
        help("rename one of the components; names are compared case-insensitively")
    )]
    NamingCollision {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("entry '{}' is outside the source root '{}'", path.display(), src_dir.display())]
    #[diagnostic(
        code(wxmp::outside_source_root),
        help("move the component under the source root or add an alias that points into it")
    )]
    OutsideSourceRoot { path: PathBuf, src_dir: PathBuf },

    #[error(transparent)]
    #[diagnostic(code(wxmp::host_query))]
    HostQuery(#[from] HostError),
}

impl From<AliasError> for PluginError {
    fn from(err: AliasError) -> Self {
        PluginError::HostQuery(HostError::Malformed(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_output_dir_keeps_message() {
        let err = PluginError::from(ConfigError::MissingOutputDir);
        assert_eq!(err.to_string(), "options outputDir not set");
        assert_eq!(err.code().unwrap().to_string(), "wxmp::config::missing_output_dir");
    }

    #[test]
    fn config_help_matches_the_config_error() {
        let err = PluginError::from(ConfigError::InvalidValue {
            field: "wxssSrcSuffix".into(),
            hint: None,
        });
        assert_eq!(err.code().unwrap().to_string(), "wxmp::config::invalid_value");
        let help = err.help().unwrap().to_string();
        assert!(help.contains("wxssSrcSuffix"));
        assert!(!help.contains("outputDir"));
    }

    #[test]
    fn alias_errors_are_host_errors() {
        let err = PluginError::from(AliasError::PathLikeSymbol {
            symbol: "./x".into(),
        });
        assert!(matches!(err, PluginError::HostQuery(HostError::Malformed(_))));
    }
}
