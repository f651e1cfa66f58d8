//! File-based config discovery.
//!
//! Finds a wxmp configuration file in conventional locations and layers it
//! with `WXMP_`-prefixed environment variables. Library users who already have
//! options in hand should build [`PluginOptions`] directly instead.

#![allow(clippy::disallowed_methods)]

use std::fs;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Toml},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::options::{Options, PluginOptions};
use crate::settings::GlobalSettings;

pub const TOML_CONFIG_FILE: &str = "wxmp.toml";
pub const JSON_CONFIG_FILE: &str = "wxmp.config.json";
/// Field of `package.json` that may hold the configuration.
pub const PACKAGE_JSON_FIELD: &str = "wxmp";
pub const ENV_PREFIX: &str = "WXMP_";

/// Everything a config file can carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WxmpConfig {
    #[serde(flatten)]
    pub options: PluginOptions,

    #[serde(default)]
    pub settings: GlobalSettings,
}

impl WxmpConfig {
    /// Validate the plugin options carried by this config.
    pub fn options(&self) -> Result<Options> {
        Options::from_partial(self.options.clone())
    }
}

/// Where a configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Toml(PathBuf),
    Json(PathBuf),
    PackageJson(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Toml(path) | ConfigSource::Json(path) | ConfigSource::PackageJson(path) => {
                path
            }
        }
    }
}

/// # Example
///
/// ```no_run
/// use wxmp_config::ConfigDiscovery;
///
/// let config = ConfigDiscovery::new(".").load().unwrap();
/// let options = config.options().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory.
    ///
    /// Searches in this order:
    /// 1. `wxmp.toml`
    /// 2. `wxmp.config.json`
    /// 3. `package.json` with a non-null `wxmp` field
    pub fn find(&self) -> Option<ConfigSource> {
        let toml_path = self.root.join(TOML_CONFIG_FILE);
        if toml_path.is_file() {
            return Some(ConfigSource::Toml(toml_path));
        }

        let json_path = self.root.join(JSON_CONFIG_FILE);
        if json_path.is_file() {
            return Some(ConfigSource::Json(json_path));
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.is_file() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed.get(PACKAGE_JSON_FIELD).is_some_and(|v| !v.is_null()) {
                        return Some(ConfigSource::PackageJson(pkg_path));
                    }
                }
            }
        }

        None
    }

    /// Load the discovered file layered with environment overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<WxmpConfig> {
        let source = self.find().ok_or(ConfigError::NotFound)?;
        self.load_from(&source)
    }

    /// Load a specific source layered with environment overrides.
    pub fn load_from(&self, source: &ConfigSource) -> Result<WxmpConfig> {
        tracing::debug!(path = %source.path().display(), "loading wxmp config");

        let figment = match source {
            ConfigSource::Toml(path) => Figment::from(Toml::file(path)),
            ConfigSource::Json(path) => Figment::from(Json::file(path)),
            ConfigSource::PackageJson(path) => {
                Figment::from(Json::file(path)).focus(PACKAGE_JSON_FIELD)
            }
        };

        extract(figment.merge(env()))
    }

    /// Load from environment variables only.
    pub fn load_env(&self) -> Result<WxmpConfig> {
        extract(Figment::from(env()))
    }
}

/// `WXMP_OUTPUT_DIR` becomes `outputDir`, `WXMP_SETTINGS__LOG_LEVEL` becomes
/// `settings.logLevel`.
fn env() -> Env {
    Env::prefixed(ENV_PREFIX)
        .lowercase(false)
        .map(|key| env_key(key.as_str()).into())
}

fn env_key(var: &str) -> String {
    var.split("__")
        .map(camel_case)
        .collect::<Vec<_>>()
        .join(".")
}

fn camel_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for (i, word) in segment.split('_').filter(|w| !w.is_empty()).enumerate() {
        let word = word.to_ascii_lowercase();
        if i == 0 {
            out.push_str(&word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

fn extract(figment: Figment) -> Result<WxmpConfig> {
    figment.extract().map_err(|e| ConfigError::InvalidValue {
        field: "configuration".to_string(),
        hint: Some(e.to_string()),
    })
}

/// Discover and load config from the current directory.
pub fn discover() -> Result<WxmpConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}
