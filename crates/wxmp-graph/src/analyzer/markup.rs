//! Reference extraction for markup files.

use std::sync::LazyLock;

use regex::Regex;

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

static SRC_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(import|include|wxs)\b[^>]*?\bsrc\s*=\s*["']([^"']+)["']"#).expect("valid regex")
});

/// Which tag carried a markup reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupTag {
    Import,
    Include,
    Wxs,
}

/// `src` attributes of `<import>`, `<include>` and `<wxs>` tags.
///
/// Commented-out tags and data-bound (`{{ }}`) sources are skipped.
pub fn extract_references(source: &str) -> Vec<(MarkupTag, String)> {
    let source = COMMENT.replace_all(source, "");

    SRC_TAG
        .captures_iter(&source)
        .filter_map(|caps| {
            let tag = match &caps[1] {
                "import" => MarkupTag::Import,
                "include" => MarkupTag::Include,
                _ => MarkupTag::Wxs,
            };
            let src = caps[2].trim();
            (!src.is_empty() && !src.contains("{{")).then(|| (tag, src.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_import_include_and_wxs() {
        let source = r#"
<import src="../../templates/card.wxml" />
<include src='/common/header'/>
<wxs module="fmt" src="./fmt.wxs"></wxs>
<image src="/images/logo.png" />
<view>{{title}}</view>
"#;
        assert_eq!(
            extract_references(source),
            vec![
                (MarkupTag::Import, "../../templates/card.wxml".to_string()),
                (MarkupTag::Include, "/common/header".to_string()),
                (MarkupTag::Wxs, "./fmt.wxs".to_string()),
            ]
        );
    }

    #[test]
    fn skips_comments_and_bindings() {
        let source = r#"
<!-- <import src="./old.wxml" /> -->
<include src="{{dynamicPath}}" />
"#;
        assert!(extract_references(source).is_empty());
    }
}
