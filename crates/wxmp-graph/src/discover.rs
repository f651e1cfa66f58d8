//! Root file discovery.
//!
//! An application tree is rooted at `app.json`: the `app` component's siblings
//! seed the graph and the app descriptor pulls in every page. A tree without
//! an app descriptor (a component library) is seeded with every component,
//! i.e. every descriptor that sits next to a logic file.

use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::analyzer::NPM_COMPONENT_DIR;
use crate::error::{GraphError, Result};
use crate::graph::RootFile;
use crate::kind::{Extensions, strip_extension, with_extension};
use crate::runtime::Runtime;

pub const APP_BASE: &str = "app";

const SKIPPED_DIRS: &[&str] = &["node_modules", NPM_COMPONENT_DIR];

pub fn discover_roots(
    src_dir: &Path,
    runtime: &dyn Runtime,
    extensions: &Extensions,
) -> Result<Vec<RootFile>> {
    let src_dir = src_dir.clean();
    let app_base = src_dir.join(APP_BASE);

    if runtime.is_file(&with_extension(&app_base, wxmp_config::DESCRIPTOR_EXTENSION)) {
        let roots: Vec<RootFile> = extensions
            .component_files(&app_base, runtime)
            .into_iter()
            .map(|path| RootFile::under(&src_dir, path))
            .collect();
        tracing::debug!(roots = roots.len(), "seeding graph from app descriptor");
        return Ok(roots);
    }

    let mut bases = Vec::new();
    collect_component_bases(&src_dir, runtime, extensions, &mut bases)?;

    let roots: Vec<RootFile> = bases
        .iter()
        .flat_map(|base| extensions.component_files(base, runtime))
        .map(|path| RootFile::under(&src_dir, path))
        .collect();

    if roots.is_empty() {
        return Err(GraphError::NoRoots(src_dir));
    }

    tracing::debug!(components = bases.len(), "seeding graph from component tree");
    Ok(roots)
}

fn collect_component_bases(
    dir: &Path,
    runtime: &dyn Runtime,
    extensions: &Extensions,
    bases: &mut Vec<PathBuf>,
) -> Result<()> {
    let names = runtime.read_dir(dir).map_err(|source| GraphError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    for name in names {
        let path = dir.join(&name);

        if runtime.is_dir(&path) {
            if name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_str()) {
                continue;
            }
            collect_component_bases(&path, runtime, extensions, bases)?;
            continue;
        }

        let is_descriptor = path
            .extension()
            .is_some_and(|ext| ext == wxmp_config::DESCRIPTOR_EXTENSION);
        if !is_descriptor {
            continue;
        }

        let base = strip_extension(&path);
        let has_logic = extensions
            .script_candidates()
            .iter()
            .filter(|ext| **ext != wxmp_config::DESCRIPTOR_EXTENSION)
            .any(|ext| runtime.is_file(&with_extension(&base, ext)));
        if has_logic {
            bases.push(base);
        }
    }

    Ok(())
}
