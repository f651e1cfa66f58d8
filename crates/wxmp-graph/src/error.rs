//! Errors raised while analyzing files and building the graph.

use std::path::PathBuf;

use thiserror::Error;

use crate::runtime::RuntimeError;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("unresolved import '{specifier}' in {}", from.display())]
    UnresolvedImport { from: PathBuf, specifier: String },

    #[error("{} is outside the source root {}", path.display(), src_dir.display())]
    OutsideSourceRoot { path: PathBuf, src_dir: PathBuf },

    #[error("invalid descriptor {}: {reason}", path.display())]
    InvalidDescriptor { path: PathBuf, reason: String },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    #[error("dependency graph exceeded {max} files (reached {count})")]
    TooManyFiles { count: usize, max: usize },

    #[error("no root files found under {}", .0.display())]
    NoRoots(PathBuf),
}

impl GraphError {
    pub(crate) fn unresolved(from: impl Into<PathBuf>, specifier: impl Into<String>) -> Self {
        Self::UnresolvedImport {
            from: from.into(),
            specifier: specifier.into(),
        }
    }
}
