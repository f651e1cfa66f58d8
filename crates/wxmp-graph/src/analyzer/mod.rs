//! Per-file dependency analysis.
//!
//! [`SourceAnalyzer`] looks at one file, picks the extractor for its
//! [`FileKind`], and resolves every reference it finds to files that exist:
//!
//! ```text
//! specifier → alias::resolve → join / root-absolute → probe runtime → targets
//! ```
//!
//! Extension-less component references expand to the component's existing
//! sibling files (markup, style, logic, descriptor). A `.json` file is parsed
//! as a descriptor only when it belongs to a component; data files imported
//! from scripts are leaves.

pub mod descriptor;
pub mod markup;
pub mod script;
pub mod style;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use path_clean::PathClean;
use rustc_hash::FxHashSet;

use crate::alias::{AliasTable, Resolution, resolve};
use crate::discover::APP_BASE;
use crate::error::{GraphError, Result};
use crate::kind::{Extensions, FileKind, strip_extension, with_extension};
use crate::runtime::Runtime;

use descriptor::Descriptor;
use markup::MarkupTag;

/// Directory the framework's npm build installs component packages into.
pub const NPM_COMPONENT_DIR: &str = "miniprogram_npm";

/// One literal reference found in a file and the files it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub specifier: String,
    pub targets: Vec<PathBuf>,
}

/// One analyzed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub absolute_path: PathBuf,
    /// Every file this one depends on. Deduplicated, never contains `absolute_path`.
    pub dependencies: Vec<PathBuf>,
    /// The import string first used to reach this file.
    pub import_path: String,
    pub references: Vec<Reference>,
}

impl FileInfo {
    pub fn kind(&self, extensions: &Extensions) -> Option<FileKind> {
        extensions.classify(&self.absolute_path)
    }
}

/// Determines the dependencies of one file.
pub trait FileAnalyzer {
    fn analyze(&self, path: &Path, import_path: &str, aliases: &AliasTable) -> Result<FileInfo>;
}

/// Default analyzer for mini-program source trees.
#[derive(Debug, Clone)]
pub struct SourceAnalyzer {
    runtime: Arc<dyn Runtime>,
    src_dir: PathBuf,
    extensions: Extensions,
}

impl SourceAnalyzer {
    pub fn new(
        runtime: Arc<dyn Runtime>,
        src_dir: impl Into<PathBuf>,
        extensions: Extensions,
    ) -> Self {
        Self {
            runtime,
            src_dir: src_dir.into().clean(),
            extensions,
        }
    }

    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn runtime(&self) -> &dyn Runtime {
        self.runtime.as_ref()
    }

    fn read(&self, path: &Path) -> Result<String> {
        self.runtime
            .read_to_string(path)
            .map_err(|source| GraphError::Read {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Candidate path for a specifier, before probing. `None` for bare specifiers.
    fn locate(&self, from: &Path, specifier: &str, aliases: &AliasTable) -> Option<PathBuf> {
        match resolve(specifier, aliases) {
            Resolution::Aliased(path) => Some(path),
            Resolution::Relative(rel) => {
                let dir = from.parent().unwrap_or(&self.src_dir);
                Some(dir.join(rel).clean())
            }
            Resolution::Absolute(path) => Some(self.root_absolute(&path)),
            Resolution::Bare(_) => None,
        }
    }

    /// `/components/x` means `<src>/components/x` unless it already is under the source root.
    fn root_absolute(&self, path: &Path) -> PathBuf {
        if path.starts_with(&self.src_dir) {
            return path.clean();
        }
        let rest = path.strip_prefix("/").unwrap_or(path);
        self.src_dir.join(rest).clean()
    }

    fn component(&self, from: &Path, specifier: &str, aliases: &AliasTable) -> Result<Vec<PathBuf>> {
        let base = match self.locate(from, specifier, aliases) {
            Some(base) => base,
            None => self.src_dir.join(NPM_COMPONENT_DIR).join(specifier).clean(),
        };

        let files = self.extensions.component_files(&base, self.runtime.as_ref());
        if files.is_empty() {
            return Err(GraphError::unresolved(from, specifier));
        }
        Ok(files)
    }

    /// A single file, with `default_ext` appended when the literal path is missing.
    fn file(
        &self,
        from: &Path,
        specifier: &str,
        default_ext: &str,
        aliases: &AliasTable,
    ) -> Result<PathBuf> {
        let candidate = self
            .locate(from, specifier, aliases)
            .ok_or_else(|| GraphError::unresolved(from, specifier))?;

        if self.runtime.is_file(&candidate) {
            return Ok(candidate);
        }

        let with_ext = with_extension(&candidate, default_ext);
        if self.runtime.is_file(&with_ext) {
            return Ok(with_ext);
        }

        Err(GraphError::unresolved(from, specifier))
    }

    /// A script module with extension and `index` fallbacks. `Ok(None)` for externals.
    fn module(&self, from: &Path, specifier: &str, aliases: &AliasTable) -> Result<Option<PathBuf>> {
        let Some(candidate) = self.locate(from, specifier, aliases) else {
            return Ok(None);
        };

        if self.runtime.is_file(&candidate) {
            return Ok(Some(candidate));
        }

        for ext in self.extensions.script_candidates() {
            let with_ext = with_extension(&candidate, ext);
            if self.runtime.is_file(&with_ext) {
                return Ok(Some(with_ext));
            }
        }

        if self.runtime.is_dir(&candidate) {
            for ext in self.extensions.script_candidates() {
                let index = candidate.join(format!("index.{ext}"));
                if self.runtime.is_file(&index) {
                    return Ok(Some(index));
                }
            }
        }

        Err(GraphError::unresolved(from, specifier))
    }

    fn analyze_markup(
        &self,
        path: &Path,
        source: &str,
        aliases: &AliasTable,
        out: &mut Collector,
    ) -> Result<()> {
        for (tag, src) in markup::extract_references(source) {
            let targets = match tag {
                MarkupTag::Wxs => {
                    vec![self.file(path, &src, FileKind::Wxs.output_extension(), aliases)?]
                }
                MarkupTag::Import | MarkupTag::Include => {
                    if Path::new(&src).extension().is_some() {
                        vec![self.file(path, &src, wxmp_config::MARKUP_EXTENSION, aliases)?]
                    } else {
                        self.component(path, &src, aliases)?
                    }
                }
            };
            out.push(src, targets);
        }

        let descriptor_path =
            with_extension(&strip_extension(path), wxmp_config::DESCRIPTOR_EXTENSION);
        if self.runtime.is_file(&descriptor_path) {
            let descriptor = self.parse_descriptor(&descriptor_path)?;
            let name = descriptor_path
                .file_name()
                .map(|n| format!("./{}", n.to_string_lossy()))
                .unwrap_or_default();
            out.push(name, vec![descriptor_path.clone()]);

            for spec in descriptor.component_specifiers() {
                let targets = self.component(&descriptor_path, spec, aliases)?;
                out.push(spec.to_string(), targets);
            }
        }

        Ok(())
    }

    fn analyze_style(
        &self,
        path: &Path,
        source: &str,
        aliases: &AliasTable,
        out: &mut Collector,
    ) -> Result<()> {
        for spec in style::extract_imports(source) {
            let target = self.file(path, &spec, self.extensions.style(), aliases)?;
            out.push(spec, vec![target]);
        }
        Ok(())
    }

    fn analyze_script(
        &self,
        path: &Path,
        source: &str,
        aliases: &AliasTable,
        out: &mut Collector,
    ) -> Result<()> {
        for spec in script::extract_imports(source) {
            match self.module(path, &spec, aliases)? {
                Some(target) => out.push(spec, vec![target]),
                None => tracing::trace!(specifier = %spec, "external import left to the bundler"),
            }
        }
        Ok(())
    }

    fn analyze_wxs(
        &self,
        path: &Path,
        source: &str,
        aliases: &AliasTable,
        out: &mut Collector,
    ) -> Result<()> {
        for spec in script::extract_requires(source) {
            let target = self.file(path, &spec, FileKind::Wxs.output_extension(), aliases)?;
            out.push(spec, vec![target]);
        }
        Ok(())
    }

    fn analyze_descriptor(
        &self,
        path: &Path,
        source: &str,
        aliases: &AliasTable,
        out: &mut Collector,
    ) -> Result<()> {
        let descriptor = Descriptor::parse(source).map_err(|e| GraphError::InvalidDescriptor {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let dir = path.parent().unwrap_or(&self.src_dir);
        for page in descriptor.page_bases() {
            let base = dir.join(&page).clean();
            let files = self.extensions.component_files(&base, self.runtime.as_ref());
            if files.is_empty() {
                return Err(GraphError::unresolved(path, page));
            }
            out.push(page, files);
        }

        for (name, spec) in &descriptor.using_components {
            if spec.starts_with(descriptor::PLUGIN_SCHEME) {
                tracing::debug!(component = %name, specifier = %spec, "skipping plugin component");
                continue;
            }
            let targets = self.component(path, spec, aliases)?;
            out.push(spec.clone(), targets);
        }

        Ok(())
    }

    /// `app.json` at the source root, or a `.json` beside a component's markup or logic file.
    fn is_component_descriptor(&self, path: &Path) -> bool {
        let base = strip_extension(path);
        if base == self.src_dir.join(APP_BASE) {
            return true;
        }
        [wxmp_config::MARKUP_EXTENSION, self.extensions.script(), "js"]
            .into_iter()
            .any(|ext| self.runtime.is_file(&with_extension(&base, ext)))
    }

    fn parse_descriptor(&self, path: &Path) -> Result<Descriptor> {
        let source = self.read(path)?;
        Descriptor::parse(&source).map_err(|e| GraphError::InvalidDescriptor {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl FileAnalyzer for SourceAnalyzer {
    fn analyze(&self, path: &Path, import_path: &str, aliases: &AliasTable) -> Result<FileInfo> {
        let path = path.clean();
        if !path.starts_with(&self.src_dir) {
            return Err(GraphError::OutsideSourceRoot {
                path,
                src_dir: self.src_dir.clone(),
            });
        }
        if !self.runtime.is_file(&path) {
            return Err(GraphError::MissingFile(path));
        }

        let mut out = Collector::new(&path);

        match self.extensions.classify(&path) {
            Some(FileKind::Descriptor) if !self.is_component_descriptor(&path) => {
                tracing::trace!(path = %path.display(), "json data module");
            }
            Some(kind) => {
                let source = self.read(&path)?;
                match kind {
                    FileKind::Markup => self.analyze_markup(&path, &source, aliases, &mut out)?,
                    FileKind::Style => self.analyze_style(&path, &source, aliases, &mut out)?,
                    FileKind::Script => self.analyze_script(&path, &source, aliases, &mut out)?,
                    FileKind::Wxs => self.analyze_wxs(&path, &source, aliases, &mut out)?,
                    FileKind::Descriptor => {
                        self.analyze_descriptor(&path, &source, aliases, &mut out)?
                    }
                }
            }
            None => {}
        }

        tracing::debug!(
            path = %path.display(),
            dependencies = out.dependencies.len(),
            "analyzed file"
        );

        Ok(out.finish(import_path))
    }
}

/// Accumulates references for one file, keeping dependencies unique and loop-free.
struct Collector {
    path: PathBuf,
    dependencies: Vec<PathBuf>,
    seen: FxHashSet<PathBuf>,
    references: Vec<Reference>,
}

impl Collector {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            dependencies: Vec::new(),
            seen: FxHashSet::default(),
            references: Vec::new(),
        }
    }

    fn push(&mut self, specifier: String, targets: Vec<PathBuf>) {
        let targets: Vec<PathBuf> = targets.into_iter().filter(|t| *t != self.path).collect();
        for target in &targets {
            if self.seen.insert(target.clone()) {
                self.dependencies.push(target.clone());
            }
        }
        if !targets.is_empty() {
            self.references.push(Reference { specifier, targets });
        }
    }

    fn finish(self, import_path: &str) -> FileInfo {
        FileInfo {
            absolute_path: self.path,
            dependencies: self.dependencies,
            import_path: import_path.to_string(),
            references: self.references,
        }
    }
}
