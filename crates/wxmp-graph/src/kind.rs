//! File kinds of a mini-program component and the extensions that map to them.

use std::path::{Path, PathBuf};

use wxmp_config::{
    DESCRIPTOR_EXTENSION, MARKUP_EXTENSION, NATIVE_STYLE_EXTENSION, Options, WXS_EXTENSION,
};

use crate::runtime::Runtime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileKind {
    Markup,
    Style,
    Script,
    Descriptor,
    Wxs,
}

impl FileKind {
    /// Extension the framework expects for this kind in compiled output.
    pub fn output_extension(self) -> &'static str {
        match self {
            FileKind::Markup => MARKUP_EXTENSION,
            FileKind::Style => NATIVE_STYLE_EXTENSION,
            FileKind::Script => "js",
            FileKind::Descriptor => DESCRIPTOR_EXTENSION,
            FileKind::Wxs => WXS_EXTENSION,
        }
    }
}

/// Source-side extensions for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extensions {
    style: String,
    script: &'static str,
}

impl Extensions {
    pub fn new(style: impl Into<String>, is_use_ts: bool) -> Self {
        Self {
            style: style.into(),
            script: if is_use_ts { "ts" } else { "js" },
        }
    }

    pub fn from_options(options: &Options) -> Self {
        Self::new(options.style_src_extension(), options.is_use_ts())
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn script(&self) -> &'static str {
        self.script
    }

    /// Extensions tried, in order, for an extension-less script import.
    pub fn script_candidates(&self) -> &'static [&'static str] {
        if self.script == "ts" {
            &["ts", "js", "json"]
        } else {
            &["js", "json"]
        }
    }

    /// Classify a path by its extension.
    pub fn classify(&self, path: &Path) -> Option<FileKind> {
        let ext = path.extension()?.to_str()?;

        if ext == self.style || ext == NATIVE_STYLE_EXTENSION {
            return Some(FileKind::Style);
        }

        match ext {
            MARKUP_EXTENSION => Some(FileKind::Markup),
            DESCRIPTOR_EXTENSION => Some(FileKind::Descriptor),
            WXS_EXTENSION => Some(FileKind::Wxs),
            "js" => Some(FileKind::Script),
            "ts" if self.script == "ts" => Some(FileKind::Script),
            _ => None,
        }
    }

    /// Existing sibling files of a component base path (`pages/home/index`).
    ///
    /// Returned in markup, style, script, descriptor order.
    pub fn component_files(&self, base: &Path, runtime: &dyn Runtime) -> Vec<PathBuf> {
        let mut candidates = vec![
            with_extension(base, MARKUP_EXTENSION),
            with_extension(base, &self.style),
            with_extension(base, self.script),
            with_extension(base, DESCRIPTOR_EXTENSION),
        ];
        if self.script == "ts" {
            candidates.insert(3, with_extension(base, "js"));
        }

        candidates
            .into_iter()
            .filter(|candidate| runtime.is_file(candidate))
            .collect()
    }
}

/// Append an extension without touching dots already in the file name.
///
/// `Path::with_extension` would turn `button.v2` into `button.wxml`.
pub fn with_extension(base: &Path, ext: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// The path with its extension removed.
pub fn strip_extension(path: &Path) -> PathBuf {
    match path.extension() {
        Some(_) => path.with_extension(""),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MemoryRuntime;

    #[test]
    fn classify_respects_style_suffix_and_ts() {
        let ext = Extensions::new("scss", true);
        assert_eq!(ext.classify(Path::new("a/index.scss")), Some(FileKind::Style));
        assert_eq!(ext.classify(Path::new("a/index.wxss")), Some(FileKind::Style));
        assert_eq!(ext.classify(Path::new("a/index.ts")), Some(FileKind::Script));
        assert_eq!(ext.classify(Path::new("a/index.js")), Some(FileKind::Script));
        assert_eq!(ext.classify(Path::new("a/index.png")), None);

        let js_only = Extensions::new("wxss", false);
        assert_eq!(js_only.classify(Path::new("a/index.ts")), None);
    }

    #[test]
    fn output_extensions_are_native() {
        assert_eq!(FileKind::Style.output_extension(), "wxss");
        assert_eq!(FileKind::Script.output_extension(), "js");
    }

    #[test]
    fn component_files_only_lists_existing_siblings() {
        let runtime = MemoryRuntime::new("/")
            .with_file("/src/c/button.wxml", "")
            .with_file("/src/c/button.less", "")
            .with_file("/src/c/button.js", "")
            .with_file("/src/c/button.json", "{}");
        let ext = Extensions::new("less", false);

        let files = ext.component_files(Path::new("/src/c/button"), &runtime);
        assert_eq!(
            files,
            vec![
                PathBuf::from("/src/c/button.wxml"),
                PathBuf::from("/src/c/button.less"),
                PathBuf::from("/src/c/button.js"),
                PathBuf::from("/src/c/button.json"),
            ]
        );
    }

    #[test]
    fn with_extension_keeps_inner_dots() {
        assert_eq!(
            with_extension(Path::new("/src/button.v2"), "wxml"),
            PathBuf::from("/src/button.v2.wxml")
        );
    }
}
