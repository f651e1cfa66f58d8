//! Entry and output maps derived from a closed dependency graph.
//!
//! A logic file becomes an entry when its component descriptor (`<base>.json`)
//! is also in the graph. Its logical name is the path relative to the source
//! root with the extension dropped, so `src/pages/home/index.ts` is
//! `pages/home/index` and lands at `<output>/pages/home/index`.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use rustc_hash::FxHashMap;
use wxmp_graph::kind::{strip_extension, with_extension};
use wxmp_graph::{DependencyGraph, Extensions, FileKind};

use crate::error::{PluginError, Result};

/// Logical component name → entry source file.
pub type EntryMap = BTreeMap<String, PathBuf>;

/// Logical component name → output path, without extension.
pub type OutputMap = BTreeMap<String, PathBuf>;

/// Non-script source file → output path with the framework's native extension.
pub type AssetMap = BTreeMap<PathBuf, PathBuf>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedEntries {
    pub entries: EntryMap,
    pub outputs: OutputMap,
    pub assets: AssetMap,
}

impl DerivedEntries {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compute entries, outputs and copied assets for every component in `graph`.
///
/// # Errors
///
/// - [`PluginError::NamingCollision`] when two entries share a logical name,
///   compared case-insensitively.
/// - [`PluginError::OutsideSourceRoot`] when any graph file, plain modules
///   included, does not live under `src_dir`.
pub fn derive_entries(
    graph: &DependencyGraph,
    src_dir: &Path,
    output_dir: &Path,
    extensions: &Extensions,
) -> Result<DerivedEntries> {
    let mut derived = DerivedEntries::default();
    // lowercase name → first entry that claimed it
    let mut claimed: FxHashMap<String, &Path> = FxHashMap::default();

    for path in graph.sorted_paths() {
        let rel = relative_to(path, src_dir)?;
        let Some(kind) = extensions.classify(path) else {
            continue;
        };

        if kind == FileKind::Script {
            let descriptor =
                with_extension(&strip_extension(path), wxmp_config::DESCRIPTOR_EXTENSION);
            if !graph.contains(&descriptor) {
                // plain module, bundled into whichever entry imports it
                continue;
            }

            let name = logical_name(rel);
            if let Some(first) = claimed.insert(name.to_lowercase(), path) {
                return Err(PluginError::NamingCollision {
                    name,
                    first: first.to_path_buf(),
                    second: path.clone(),
                });
            }

            derived.outputs.insert(name.clone(), output_dir.join(&name));
            derived.entries.insert(name, path.clone());
            continue;
        }

        let rel = strip_extension(rel);
        let output = with_extension(&output_dir.join(rel), kind.output_extension());
        derived.assets.insert(path.clone(), output);
    }

    tracing::info!(
        entries = derived.entries.len(),
        assets = derived.assets.len(),
        "derived bundler entries"
    );
    Ok(derived)
}

/// `/`-separated relative path with the extension removed.
pub fn logical_name(rel: &Path) -> String {
    strip_extension(rel)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn relative_to<'a>(path: &'a Path, src_dir: &Path) -> Result<&'a Path> {
    path.strip_prefix(src_dir)
        .map_err(|_| PluginError::OutsideSourceRoot {
            path: path.to_path_buf(),
            src_dir: src_dir.to_path_buf(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wxmp_graph::FileInfo;

    fn file(path: &str) -> FileInfo {
        FileInfo {
            absolute_path: PathBuf::from(path),
            dependencies: Vec::new(),
            import_path: path.to_string(),
            references: Vec::new(),
        }
    }

    fn graph(paths: &[&str]) -> DependencyGraph {
        paths.iter().map(|p| file(p)).collect()
    }

    fn derive(graph: &DependencyGraph) -> Result<DerivedEntries> {
        derive_entries(
            graph,
            Path::new("/src"),
            Path::new("/dist"),
            &Extensions::new("scss", false),
        )
    }

    #[test]
    fn components_become_entries_with_parallel_outputs() {
        let graph = graph(&[
            "/src/app.js",
            "/src/app.json",
            "/src/app.scss",
            "/src/pages/home/index.js",
            "/src/pages/home/index.json",
            "/src/pages/home/index.wxml",
            "/src/utils/format.js",
        ]);
        let derived = derive(&graph).unwrap();

        assert_eq!(derived.names().collect::<Vec<_>>(), vec!["app", "pages/home/index"]);
        assert_eq!(derived.entries["pages/home/index"], PathBuf::from("/src/pages/home/index.js"));
        assert_eq!(derived.outputs["pages/home/index"], PathBuf::from("/dist/pages/home/index"));
        assert!(derived.entries.keys().eq(derived.outputs.keys()));
    }

    #[test]
    fn assets_use_native_extensions() {
        let graph = graph(&[
            "/src/app.js",
            "/src/app.json",
            "/src/app.scss",
            "/src/utils/fmt.wxs",
        ]);
        let derived = derive(&graph).unwrap();

        assert_eq!(derived.assets[Path::new("/src/app.scss")], PathBuf::from("/dist/app.wxss"));
        assert_eq!(derived.assets[Path::new("/src/app.json")], PathBuf::from("/dist/app.json"));
        assert_eq!(derived.assets[Path::new("/src/utils/fmt.wxs")], PathBuf::from("/dist/utils/fmt.wxs"));
        assert!(!derived.assets.contains_key(Path::new("/src/app.js")));
    }

    #[test]
    fn case_insensitive_collision() {
        let graph = graph(&[
            "/src/pages/Home/index.js",
            "/src/pages/Home/index.json",
            "/src/pages/home/index.js",
            "/src/pages/home/index.json",
        ]);
        let err = derive(&graph).unwrap_err();

        match err {
            PluginError::NamingCollision { name, first, second } => {
                assert_eq!(name, "pages/home/index");
                assert_eq!(first, PathBuf::from("/src/pages/Home/index.js"));
                assert_eq!(second, PathBuf::from("/src/pages/home/index.js"));
            }
            other => panic!("expected NamingCollision, got {other:?}"),
        }
    }

    #[test]
    fn entry_outside_source_root() {
        let graph = graph(&["/shared/card.js", "/shared/card.json"]);
        assert!(matches!(
            derive(&graph).unwrap_err(),
            PluginError::OutsideSourceRoot { .. }
        ));
    }

    #[test]
    fn plain_module_outside_source_root() {
        let graph = graph(&["/src/app.js", "/src/app.json", "/vendor/polyfill.js"]);
        match derive(&graph).unwrap_err() {
            PluginError::OutsideSourceRoot { path, src_dir } => {
                assert_eq!(path, PathBuf::from("/vendor/polyfill.js"));
                assert_eq!(src_dir, PathBuf::from("/src"));
            }
            other => panic!("expected OutsideSourceRoot, got {other:?}"),
        }
    }

    #[test]
    fn logical_name_normalizes_separators() {
        assert_eq!(logical_name(Path::new("pages/home/index.ts")), "pages/home/index");
        assert_eq!(logical_name(Path::new("./app.js")), "app");
        assert_eq!(logical_name(Path::new("components/button.v2.js")), "components/button.v2");
    }
}
