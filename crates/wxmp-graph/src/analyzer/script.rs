//! Static import extraction for logic and wxs files.
//!
//! This is a lexical scan, not a parse. It recognizes `import … from '…'`,
//! side-effect `import '…'`, `export … from '…'` and `require('…')`.
//! Block comments and whole-line `//` comments are removed first.

use std::sync::LazyLock;

use regex::Regex;

static BLOCK_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"));

static LINE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*//.*$").expect("valid regex"));

static IMPORT_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)(?:^|[;\s])(?:import|export)\s+(?:[\w*${}\s,]+?\s+from\s*)?["']([^"'\n]+)["']"#)
        .expect("valid regex")
});

static REQUIRE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\brequire\s*\(\s*["']([^"'\n]+)["']\s*\)"#).expect("valid regex")
});

fn strip_comments(source: &str) -> String {
    let without_blocks = BLOCK_COMMENT.replace_all(source, "");
    LINE_COMMENT.replace_all(&without_blocks, "").into_owned()
}

/// Every statically declared module specifier, in source order, deduplicated.
pub fn extract_imports(source: &str) -> Vec<String> {
    let source = strip_comments(source);

    let mut found: Vec<(usize, String)> = IMPORT_EXPORT
        .captures_iter(&source)
        .chain(REQUIRE.captures_iter(&source))
        .filter_map(|caps| {
            let m = caps.get(1)?;
            Some((m.start(), m.as_str().trim().to_string()))
        })
        .collect();
    found.sort_by_key(|(offset, _)| *offset);

    let mut specifiers: Vec<String> = Vec::with_capacity(found.len());
    for (_, spec) in found {
        if !spec.is_empty() && !specifiers.contains(&spec) {
            specifiers.push(spec);
        }
    }
    specifiers
}

/// Only `require('…')` calls, which is all a wxs module may use.
pub fn extract_requires(source: &str) -> Vec<String> {
    let source = strip_comments(source);
    REQUIRE
        .captures_iter(&source)
        .map(|caps| caps[1].trim().to_string())
        .filter(|spec| !spec.is_empty())
        .collect()
}
