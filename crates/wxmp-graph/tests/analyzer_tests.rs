//! File analyzer behavior over in-memory trees.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use wxmp_graph::{
    AliasEntry, AliasTable, Extensions, FileAnalyzer, GraphError, MemoryRuntime, SourceAnalyzer,
};

fn analyzer(runtime: MemoryRuntime, extensions: Extensions) -> SourceAnalyzer {
    SourceAnalyzer::new(Arc::new(runtime), "/src", extensions)
}

fn src_alias() -> AliasTable {
    AliasTable::new([AliasEntry::new("@/", "/src/")]).unwrap()
}

fn paths(items: &[&str]) -> Vec<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

#[test]
fn markup_alias_import_expands_component_siblings() {
    let runtime = MemoryRuntime::new("/")
        .with_file("/src/pages/home/index.wxml", r#"<import src="@/components/button" />"#)
        .with_file("/src/components/button.wxml", "<template name=\"button\"/>")
        .with_file("/src/components/button.wxss", ".btn {}")
        .with_file("/src/components/button.js", "Component({})")
        .with_file("/src/components/button.json", "{\"component\": true}");

    let info = analyzer(runtime, Extensions::new("wxss", false))
        .analyze(Path::new("/src/pages/home/index.wxml"), "/pages/home/index.wxml", &src_alias())
        .unwrap();

    assert_eq!(
        info.dependencies,
        paths(&[
            "/src/components/button.wxml",
            "/src/components/button.wxss",
            "/src/components/button.js",
            "/src/components/button.json",
        ])
    );
    assert_eq!(info.references[0].specifier, "@/components/button");
    assert_eq!(info.import_path, "/pages/home/index.wxml");
}

#[test]
fn markup_includes_sibling_descriptor_components() {
    let runtime = MemoryRuntime::new("/")
        .with_file("/src/pages/home/index.wxml", "<nav-bar/>")
        .with_file(
            "/src/pages/home/index.json",
            r#"{ "usingComponents": { "nav-bar": "/components/nav-bar/index", "map": "plugin://maps/map" } }"#,
        )
        .with_file("/src/components/nav-bar/index.wxml", "<view/>")
        .with_file("/src/components/nav-bar/index.js", "Component({})");

    let info = analyzer(runtime, Extensions::new("wxss", false))
        .analyze(Path::new("/src/pages/home/index.wxml"), "/pages/home/index.wxml", &src_alias())
        .unwrap();

    assert_eq!(
        info.dependencies,
        paths(&[
            "/src/pages/home/index.json",
            "/src/components/nav-bar/index.wxml",
            "/src/components/nav-bar/index.js",
        ])
    );
}

#[test]
fn markup_template_and_wxs_references() {
    let runtime = MemoryRuntime::new("/")
        .with_file(
            "/src/pages/list/list.wxml",
            r#"<import src="../../templates/item.wxml"/><wxs src="./fmt" module="fmt"/>"#,
        )
        .with_file("/src/templates/item.wxml", "<template name=\"item\"/>")
        .with_file("/src/pages/list/fmt.wxs", "module.exports = {}");

    let info = analyzer(runtime, Extensions::new("wxss", false))
        .analyze(Path::new("/src/pages/list/list.wxml"), "/pages/list/list.wxml", &AliasTable::empty())
        .unwrap();

    assert_eq!(
        info.dependencies,
        paths(&["/src/templates/item.wxml", "/src/pages/list/fmt.wxs"])
    );
}

#[test]
fn style_imports_use_source_suffix() {
    let runtime = MemoryRuntime::new("/")
        .with_file("/src/pages/home/index.scss", "@import '../../styles/theme';\n.page {}")
        .with_file("/src/styles/theme.scss", "$primary: red;");

    let info = analyzer(runtime, Extensions::new("scss", false))
        .analyze(Path::new("/src/pages/home/index.scss"), "/pages/home/index.scss", &AliasTable::empty())
        .unwrap();

    assert_eq!(info.dependencies, paths(&["/src/styles/theme.scss"]));
}

#[test]
fn script_imports_probe_extensions_and_skip_externals() {
    let runtime = MemoryRuntime::new("/")
        .with_file(
            "/src/pages/home/index.ts",
            r#"
import dayjs from 'dayjs'
import { request } from '@/api'
import { format } from '../../utils/format'
const store = require('../../store/index.js')
"#,
        )
        .with_file("/src/api/index.ts", "export const request = () => {}")
        .with_file("/src/utils/format.js", "module.exports = {}")
        .with_file("/src/store/index.js", "module.exports = {}");

    let info = analyzer(runtime, Extensions::new("wxss", true))
        .analyze(Path::new("/src/pages/home/index.ts"), "/pages/home/index.ts", &src_alias())
        .unwrap();

    assert_eq!(
        info.dependencies,
        paths(&["/src/api/index.ts", "/src/utils/format.js", "/src/store/index.js"])
    );
    assert!(info.references.iter().all(|r| r.specifier != "dayjs"));
}

#[test]
fn broken_reference_names_file_and_specifier() {
    let runtime = MemoryRuntime::new("/")
        .with_file("/src/pages/home/index.js", "import x from './missing'");

    let err = analyzer(runtime, Extensions::new("wxss", false))
        .analyze(Path::new("/src/pages/home/index.js"), "/pages/home/index.js", &AliasTable::empty())
        .unwrap_err();

    match err {
        GraphError::UnresolvedImport { from, specifier } => {
            assert_eq!(from, PathBuf::from("/src/pages/home/index.js"));
            assert_eq!(specifier, "./missing");
        }
        other => panic!("expected UnresolvedImport, got {other:?}"),
    }
}

#[test]
fn bare_style_import_is_unresolved() {
    let runtime = MemoryRuntime::new("/")
        .with_file("/src/app.wxss", "@import 'common.wxss';")
        .with_file("/src/common.wxss", "");

    let err = analyzer(runtime, Extensions::new("wxss", false))
        .analyze(Path::new("/src/app.wxss"), "/app.wxss", &AliasTable::empty())
        .unwrap_err();
    assert!(matches!(err, GraphError::UnresolvedImport { specifier, .. } if specifier == "common.wxss"));
}

#[test]
fn missing_file_is_fatal() {
    let runtime = MemoryRuntime::new("/");
    let err = analyzer(runtime, Extensions::new("wxss", false))
        .analyze(Path::new("/src/nope.wxml"), "/nope.wxml", &AliasTable::empty())
        .unwrap_err();
    assert!(matches!(err, GraphError::MissingFile(_)));
}

#[test]
fn invalid_descriptor_is_reported() {
    let runtime = MemoryRuntime::new("/").with_file("/src/app.json", "{ \"pages\": ");
    let err = analyzer(runtime, Extensions::new("wxss", false))
        .analyze(Path::new("/src/app.json"), "/app.json", &AliasTable::empty())
        .unwrap_err();
    assert!(matches!(err, GraphError::InvalidDescriptor { .. }));
}

#[test]
fn npm_components_resolve_from_miniprogram_npm() {
    let runtime = MemoryRuntime::new("/")
        .with_file(
            "/src/pages/home/index.json",
            r#"{ "usingComponents": { "van-button": "@vant/weapp/button/index" } }"#,
        )
        .with_file("/src/miniprogram_npm/@vant/weapp/button/index.js", "")
        .with_file("/src/miniprogram_npm/@vant/weapp/button/index.json", "{}");

    let info = analyzer(runtime, Extensions::new("wxss", false))
        .analyze(Path::new("/src/pages/home/index.json"), "/pages/home/index.json", &AliasTable::empty())
        .unwrap();

    assert_eq!(
        info.dependencies,
        paths(&[
            "/src/miniprogram_npm/@vant/weapp/button/index.js",
            "/src/miniprogram_npm/@vant/weapp/button/index.json",
        ])
    );
}

#[test]
fn dependencies_never_include_self() {
    let runtime = MemoryRuntime::new("/")
        .with_file("/src/c/card.wxml", r#"<import src="./card" />"#)
        .with_file("/src/c/card.js", "");

    let info = analyzer(runtime, Extensions::new("wxss", false))
        .analyze(Path::new("/src/c/card.wxml"), "/c/card.wxml", &AliasTable::empty())
        .unwrap();

    assert_eq!(info.dependencies, paths(&["/src/c/card.js"]));
}

#[test]
fn json_data_import_is_a_leaf() {
    let runtime = MemoryRuntime::new("/")
        .with_file("/src/pages/a/index.js", "import list from './data.json'\nPage({ list })")
        .with_file("/src/pages/a/data.json", "[1, 2, 3]");
    let analyzer = analyzer(runtime, Extensions::new("wxss", false));

    let page = analyzer
        .analyze(Path::new("/src/pages/a/index.js"), "/pages/a/index.js", &AliasTable::empty())
        .unwrap();
    assert_eq!(page.dependencies, paths(&["/src/pages/a/data.json"]));

    let data = analyzer
        .analyze(Path::new("/src/pages/a/data.json"), "./data.json", &AliasTable::empty())
        .unwrap();
    assert!(data.dependencies.is_empty());
}

#[test]
fn component_descriptor_with_markup_sibling_is_still_parsed() {
    let runtime = MemoryRuntime::new("/")
        .with_file("/src/components/list/list.wxml", "<view/>")
        .with_file("/src/components/list/list.json", "[1, 2, 3]");
    let err = analyzer(runtime, Extensions::new("wxss", false))
        .analyze(
            Path::new("/src/components/list/list.json"),
            "./list.json",
            &AliasTable::empty(),
        )
        .unwrap_err();
    assert!(matches!(err, GraphError::InvalidDescriptor { .. }));
}

#[test]
fn alias_outside_source_root_is_fatal() {
    let runtime = MemoryRuntime::new("/")
        .with_file("/src/app.js", "import '~shared/track'")
        .with_file("/shared/track.js", "");
    let aliases = AliasTable::new([AliasEntry::new("~shared", "/shared")]).unwrap();
    let analyzer = analyzer(runtime, Extensions::new("wxss", false));

    let app = analyzer
        .analyze(Path::new("/src/app.js"), "/app.js", &aliases)
        .unwrap();
    assert_eq!(app.dependencies, paths(&["/shared/track.js"]));

    let err = analyzer
        .analyze(Path::new("/shared/track.js"), "~shared/track", &aliases)
        .unwrap_err();
    match err {
        GraphError::OutsideSourceRoot { path, src_dir } => {
            assert_eq!(path, PathBuf::from("/shared/track.js"));
            assert_eq!(src_dir, PathBuf::from("/src"));
        }
        other => panic!("expected OutsideSourceRoot, got {other:?}"),
    }
}
