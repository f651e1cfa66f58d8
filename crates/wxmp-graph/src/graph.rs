//! Dependency graph construction.
//!
//! The builder runs an explicit worklist rather than recursing: each path is
//! claimed in the visited set when it is popped, so a file is analyzed at most
//! once and cyclic references (a component using a component that imports the
//! first one's style) terminate without special casing.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::alias::AliasTable;
use crate::analyzer::{FileAnalyzer, FileInfo};
use crate::error::{GraphError, Result};

/// Default maximum number of files in one graph.
pub const DEFAULT_MAX_FILES: usize = 100_000;

/// A file to start traversal from, with the import path recorded for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootFile {
    pub path: PathBuf,
    pub import_path: String,
}

impl RootFile {
    pub fn new(path: impl Into<PathBuf>, import_path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            import_path: import_path.into(),
        }
    }

    /// A root whose import path is its source-root-absolute form (`/app.js`).
    pub fn under(src_dir: &Path, path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        let import_path = match path.strip_prefix(src_dir) {
            Ok(rel) => format!("/{}", rel.to_string_lossy().replace('\\', "/")),
            Err(_) => path.to_string_lossy().into_owned(),
        };
        Self { path, import_path }
    }
}

/// Every file reachable from the roots, keyed by absolute path.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    files: FxHashMap<PathBuf, FileInfo>,
}

impl DependencyGraph {
    pub fn get(&self, path: &Path) -> Option<&FileInfo> {
        self.files.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iteration order is unspecified; use [`DependencyGraph::sorted_paths`] for stable output.
    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &FileInfo)> {
        self.files.iter()
    }

    pub fn sorted_paths(&self) -> Vec<&PathBuf> {
        let mut paths: Vec<&PathBuf> = self.files.keys().collect();
        paths.sort();
        paths
    }

    /// `(file, dependency)` pairs whose dependency is not a key. Empty for a built graph.
    pub fn dangling(&self) -> Vec<(&Path, &Path)> {
        let mut dangling = Vec::new();
        for (path, info) in &self.files {
            for dep in &info.dependencies {
                if !self.files.contains_key(dep) {
                    dangling.push((path.as_path(), dep.as_path()));
                }
            }
        }
        dangling
    }
}

impl FromIterator<FileInfo> for DependencyGraph {
    fn from_iter<I: IntoIterator<Item = FileInfo>>(iter: I) -> Self {
        Self {
            files: iter
                .into_iter()
                .map(|info| (info.absolute_path.clone(), info))
                .collect(),
        }
    }
}

/// Worklist-driven graph builder.
pub struct GraphBuilder<A> {
    analyzer: A,
    max_files: usize,
}

impl<A: FileAnalyzer> GraphBuilder<A> {
    pub fn new(analyzer: A) -> Self {
        Self {
            analyzer,
            max_files: DEFAULT_MAX_FILES,
        }
    }

    pub fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// Analyze every file reachable from `roots`.
    ///
    /// # Errors
    ///
    /// Any analyzer error aborts the build. No partial graph is returned.
    pub fn build(
        &self,
        roots: impl IntoIterator<Item = RootFile>,
        aliases: &AliasTable,
    ) -> Result<DependencyGraph> {
        let mut files: FxHashMap<PathBuf, FileInfo> = FxHashMap::default();
        let mut visited: FxHashSet<PathBuf> = FxHashSet::default();
        let mut queue: VecDeque<(PathBuf, String)> = roots
            .into_iter()
            .map(|root| (root.path.clean(), root.import_path))
            .collect();

        while let Some((path, import_path)) = queue.pop_front() {
            if !visited.insert(path.clone()) {
                continue;
            }

            if visited.len() > self.max_files {
                return Err(GraphError::TooManyFiles {
                    count: visited.len(),
                    max: self.max_files,
                });
            }

            let info = self.analyzer.analyze(&path, &import_path, aliases)?;

            for reference in &info.references {
                for target in &reference.targets {
                    if !visited.contains(target) {
                        queue.push_back((target.clone(), reference.specifier.clone()));
                    }
                }
            }
            // Dependencies not backed by a reference (custom analyzers) still get visited.
            for dep in &info.dependencies {
                if !visited.contains(dep) {
                    queue.push_back((dep.clone(), dep.to_string_lossy().into_owned()));
                }
            }

            files.insert(path, info);
        }

        tracing::info!(files = files.len(), "dependency graph built");
        Ok(DependencyGraph { files })
    }
}
