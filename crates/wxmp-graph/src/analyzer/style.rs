//! `@import` extraction for style files.

use std::sync::LazyLock;

use regex::Regex;

static BLOCK_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"));

static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@import\s+(?:url\(\s*)?["']([^"']+)["']"#).expect("valid regex")
});

/// Local style imports, in source order. Remote URLs are skipped.
pub fn extract_imports(source: &str) -> Vec<String> {
    let source = BLOCK_COMMENT.replace_all(source, "");

    IMPORT
        .captures_iter(&source)
        .map(|caps| caps[1].trim().to_string())
        .filter(|spec| !spec.is_empty() && !is_remote(spec))
        .collect()
}

fn is_remote(spec: &str) -> bool {
    spec.starts_with("http://") || spec.starts_with("https://") || spec.starts_with("//")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_quoted_and_url_imports() {
        let source = r#"
@import "../../styles/theme.scss";
@import url('./mixins');
/* @import "./disabled.scss"; */
@import "https://fonts.example.com/a.css";
.page { color: red; }
"#;
        assert_eq!(
            extract_imports(source),
            vec!["../../styles/theme.scss".to_string(), "./mixins".to_string()]
        );
    }
}
