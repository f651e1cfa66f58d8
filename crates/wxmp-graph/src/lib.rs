//! Alias-aware dependency graph for mini-program component trees.
//!
//! A mini-program component is a set of sibling files sharing one base name:
//! markup (`.wxml`), style (`.wxss` or a configured source suffix), logic
//! (`.js`/`.ts`) and a JSON descriptor. This crate discovers which files a
//! tree needs, starting from its roots and following markup references, style
//! imports, component declarations and script imports until the set is closed.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use wxmp_graph::{
//!     AliasEntry, AliasTable, Extensions, GraphBuilder, NativeRuntime, SourceAnalyzer,
//!     discover_roots,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let src = Path::new("/project/src");
//! let aliases = AliasTable::new([AliasEntry::new("@", "/project/src")])?;
//! let extensions = Extensions::new("scss", true);
//! let runtime = Arc::new(NativeRuntime);
//!
//! let roots = discover_roots(src, runtime.as_ref(), &extensions)?;
//! let analyzer = SourceAnalyzer::new(runtime, src, extensions);
//! let graph = GraphBuilder::new(analyzer).build(roots, &aliases)?;
//! println!("{} files", graph.len());
//! # Ok(())
//! # }
//! ```

pub mod alias;
pub mod analyzer;
pub mod discover;
pub mod error;
pub mod graph;
pub mod kind;
pub mod runtime;

pub use alias::{AliasEntry, AliasError, AliasTable, Resolution, resolve};
pub use analyzer::{FileAnalyzer, FileInfo, Reference, SourceAnalyzer};
pub use discover::discover_roots;
pub use error::{GraphError, Result};
pub use graph::{DEFAULT_MAX_FILES, DependencyGraph, GraphBuilder, RootFile};
pub use kind::{Extensions, FileKind};
pub use runtime::{MemoryRuntime, NativeRuntime, Runtime, RuntimeError};
