//! Path alias handling for import resolution.
//!
//! An alias maps a symbolic prefix (`@/`, `@components`) onto an absolute
//! directory. [`AliasTable`] keeps entries ordered longest-symbol-first so a
//! more specific alias (`@/sub/`) wins over a shorter one that is also a
//! prefix of it (`@/`).

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use serde::{Deserialize, Serialize};

/// One `symbol → directory` mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub symbol: String,
    pub path: PathBuf,
}

impl AliasEntry {
    pub fn new(symbol: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            symbol: symbol.into(),
            path: path.into(),
        }
    }

    /// Whether `import` is addressed through this alias.
    ///
    /// A trailing `$` on the symbol means exact match only. Otherwise the
    /// import must equal the symbol or continue it at a `/` boundary, so `@`
    /// does not capture `@scope/pkg`.
    pub fn matches(&self, import: &str) -> bool {
        if let Some(exact) = self.symbol.strip_suffix('$') {
            return import == exact;
        }

        if self.symbol.ends_with('/') {
            return import.starts_with(&self.symbol);
        }

        match import.strip_prefix(self.symbol.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    fn apply(&self, import: &str) -> PathBuf {
        let symbol = self.symbol.strip_suffix('$').unwrap_or(&self.symbol);
        let rest = import[symbol.len()..].trim_start_matches('/');
        if rest.is_empty() {
            self.path.clean()
        } else {
            self.path.join(rest).clean()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AliasError {
    #[error("alias for '{}' has an empty symbol", path.display())]
    EmptySymbol { path: PathBuf },

    #[error("alias '{symbol}' must not start with '.' or '/'")]
    PathLikeSymbol { symbol: String },

    #[error("alias '{symbol}' points to a relative directory '{}'", path.display())]
    RelativeTarget { symbol: String, path: PathBuf },
}

/// Ordered, validated alias entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
}

impl AliasTable {
    /// Validate and order alias entries.
    ///
    /// Entries are sorted by descending symbol length. The sort is stable, so
    /// entries of equal length keep the order they were given in.
    pub fn new(entries: impl IntoIterator<Item = AliasEntry>) -> Result<Self, AliasError> {
        let mut entries: Vec<AliasEntry> = entries.into_iter().collect();

        for entry in &entries {
            let bare = entry.symbol.strip_suffix('$').unwrap_or(&entry.symbol);
            if bare.is_empty() {
                return Err(AliasError::EmptySymbol {
                    path: entry.path.clone(),
                });
            }
            if bare.starts_with('.') || bare.starts_with('/') {
                return Err(AliasError::PathLikeSymbol {
                    symbol: entry.symbol.clone(),
                });
            }
            if !entry.path.is_absolute() {
                return Err(AliasError::RelativeTarget {
                    symbol: entry.symbol.clone(),
                    path: entry.path.clone(),
                });
            }
        }

        entries.sort_by(|a, b| b.symbol.len().cmp(&a.symbol.len()));
        Ok(Self { entries })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AliasEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry (in precedence order) that matches `import`.
    pub fn find(&self, import: &str) -> Option<&AliasEntry> {
        self.entries.iter().find(|entry| entry.matches(import))
    }
}

/// Outcome of resolving one import string against the alias table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The import used an alias; this is the absolute target.
    Aliased(PathBuf),
    /// `./` or `../` import, to be joined against the importing file's directory.
    Relative(String),
    /// Already an absolute reference.
    Absolute(PathBuf),
    /// Neither aliased nor path-like. Scripts treat these as external packages;
    /// everywhere else this is an unresolved import.
    Bare(String),
}

impl Resolution {
    pub fn is_bare(&self) -> bool {
        matches!(self, Resolution::Bare(_))
    }
}

/// Resolve an import string against the alias table.
pub fn resolve(import: &str, aliases: &AliasTable) -> Resolution {
    if let Some(entry) = aliases.find(import) {
        return Resolution::Aliased(entry.apply(import));
    }

    if is_relative(import) {
        return Resolution::Relative(import.to_string());
    }

    if Path::new(import).is_absolute() {
        return Resolution::Absolute(PathBuf::from(import));
    }

    Resolution::Bare(import.to_string())
}

fn is_relative(import: &str) -> bool {
    import == "." || import == ".." || import.starts_with("./") || import.starts_with("../")
}
