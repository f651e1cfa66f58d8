//! Shared runtime chunk wiring.
//!
//! Every entry requires one bootstrap module instead of carrying its own copy.
//! The chunk is emitted once at the output root and each entry gets the
//! relative require path from its own output directory to it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the shared chunk, also its file stem in source and output.
pub const RUNTIME_CHUNK_NAME: &str = "runtime";

const RUNTIME_FILE: &str = "runtime.js";

/// Runtime-chunk directive handed to the host bundler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeChunk {
    pub name: String,
    /// Bootstrap source shipped with the plugin.
    pub source: PathBuf,
    pub output: PathBuf,
    /// Entry name → require path of the chunk from that entry's output file.
    pub requires: BTreeMap<String, String>,
}

impl RuntimeChunk {
    pub fn require_path(&self, entry: &str) -> Option<&str> {
        self.requires.get(entry).map(String::as_str)
    }

    pub fn covers<'a>(&self, entries: impl IntoIterator<Item = &'a str>) -> bool {
        entries.into_iter().all(|entry| self.requires.contains_key(entry))
    }
}

/// Build the directive for `entry_names`.
///
/// Pure: the same names always produce an equal chunk, so a host that stores
/// the latest directive ends up in the same state however often it is applied.
pub fn configure_runtime_chunk<'a>(
    entry_names: impl IntoIterator<Item = &'a str>,
    output_dir: &Path,
    plugin_dir: &Path,
) -> RuntimeChunk {
    let requires = entry_names
        .into_iter()
        .map(|name| (name.to_string(), require_path(name)))
        .collect();

    RuntimeChunk {
        name: RUNTIME_CHUNK_NAME.to_string(),
        source: plugin_dir.join(RUNTIME_FILE),
        output: output_dir.join(RUNTIME_FILE),
        requires,
    }
}

fn require_path(entry: &str) -> String {
    let depth = entry.matches('/').count();
    if depth == 0 {
        return format!("./{RUNTIME_CHUNK_NAME}");
    }
    format!("{}{RUNTIME_CHUNK_NAME}", "../".repeat(depth))
}
