use std::path::{Path, PathBuf};

/// Process-wide state the plugin depends on.
///
/// Only the plugin directory is needed: it holds the bootstrap source the
/// runtime chunk is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginEnvironment {
    plugin_dir: PathBuf,
}

impl PluginEnvironment {
    pub fn new(plugin_dir: impl Into<PathBuf>) -> Self {
        Self {
            plugin_dir: plugin_dir.into(),
        }
    }

    /// The `runtime/` directory shipped inside this crate.
    pub fn bundled() -> Self {
        Self::new(concat!(env!("CARGO_MANIFEST_DIR"), "/runtime"))
    }

    pub fn plugin_dir(&self) -> &Path {
        &self.plugin_dir
    }
}

impl Default for PluginEnvironment {
    fn default() -> Self {
        Self::bundled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_dir_ships_runtime_source() {
        let env = PluginEnvironment::bundled();
        assert!(env.plugin_dir().join("runtime.js").is_file());
    }
}
