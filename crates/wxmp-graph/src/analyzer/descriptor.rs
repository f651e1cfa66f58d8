//! JSON descriptor parsing.
//!
//! Component descriptors declare `usingComponents`. The app descriptor also
//! lists `pages` and `subpackages`, whose entries are component bases
//! relative to the descriptor's directory.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Prefix of components provided by a framework plugin rather than the source tree.
pub const PLUGIN_SCHEME: &str = "plugin://";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    #[serde(default)]
    pub using_components: BTreeMap<String, String>,

    #[serde(default)]
    pub pages: Vec<String>,

    #[serde(default, alias = "subPackages")]
    pub subpackages: Vec<SubPackage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubPackage {
    pub root: String,

    #[serde(default)]
    pub pages: Vec<String>,
}

impl Descriptor {
    pub fn parse(source: &str) -> Result<Self, serde_json::Error> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(source)
    }

    /// Component references declared in `usingComponents`, plugin components excluded.
    pub fn component_specifiers(&self) -> impl Iterator<Item = &str> {
        self.using_components
            .values()
            .map(String::as_str)
            .filter(|spec| !spec.starts_with(PLUGIN_SCHEME))
    }

    /// Page bases from `pages` and every subpackage, relative to the descriptor's directory.
    pub fn page_bases(&self) -> Vec<String> {
        let mut pages: Vec<String> = self
            .pages
            .iter()
            .map(|page| page.trim_start_matches('/').to_string())
            .collect();

        for package in &self.subpackages {
            let root = package.root.trim_matches('/');
            for page in &package.pages {
                pages.push(format!("{root}/{}", page.trim_start_matches('/')));
            }
        }

        pages
    }
}
