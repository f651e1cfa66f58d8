//! Filesystem runtime abstraction.
//!
//! Every read the analyzer performs goes through the [`Runtime`] trait so the
//! same graph logic runs against the real filesystem ([`NativeRuntime`]) or an
//! in-memory tree ([`MemoryRuntime`]). The trait is read-only: compiled output
//! is written by the host bundler, never by this crate.

mod memory;
mod native;

pub use memory::MemoryRuntime;
pub use native::NativeRuntime;

use std::path::{Path, PathBuf};

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during runtime operations
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Runtime error: {0}")]
    Other(String),
}

/// File metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    pub size: u64,
    pub is_dir: bool,
    pub is_file: bool,
}

/// Platform runtime trait.
pub trait Runtime: Send + Sync + std::fmt::Debug {
    /// Read a file from the filesystem
    fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>>;

    fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata>;

    fn exists(&self, path: &Path) -> bool;

    /// List the entry names of a directory
    fn read_dir(&self, path: &Path) -> RuntimeResult<Vec<String>>;

    fn get_cwd(&self) -> RuntimeResult<PathBuf>;

    fn is_file(&self, path: &Path) -> bool {
        self.metadata(path).map(|m| m.is_file).unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.metadata(path).map(|m| m.is_dir).unwrap_or(false)
    }

    /// Read a file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> RuntimeResult<String> {
        let bytes = self.read_file(path)?;
        String::from_utf8(bytes).map_err(|e| RuntimeError::Other(format!("Invalid UTF-8: {e}")))
    }
}
