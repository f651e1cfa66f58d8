//! Host bundler adapter.
//!
//! The plugin never compiles anything itself. It reads the host's resolved
//! source root and aliases once, then writes entries, outputs, assets and the
//! runtime-chunk directive back, and attaches one handler to the emit hook.
//! [`BundlerConfig`] is an in-memory host used by tools and tests.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use wxmp_graph::{AliasEntry, AliasTable};

use crate::entries::{AssetMap, EntryMap, OutputMap};
use crate::error::HostError;
use crate::runtime_chunk::RuntimeChunk;

/// The host's own module-resolution configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub src_dir: PathBuf,
    #[serde(default)]
    pub alias_infos: Vec<AliasEntry>,
}

impl SystemInfo {
    pub fn new(src_dir: impl Into<PathBuf>) -> Self {
        Self {
            src_dir: src_dir.into(),
            alias_infos: Vec::new(),
        }
    }

    pub fn with_alias(mut self, symbol: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.alias_infos.push(AliasEntry::new(symbol, path));
        self
    }

    pub fn validate(&self) -> Result<(), HostError> {
        if self.src_dir.as_os_str().is_empty() {
            return Err(HostError::Malformed("source directory is empty".into()));
        }
        if !self.src_dir.is_absolute() {
            return Err(HostError::Malformed(format!(
                "source directory '{}' is not absolute",
                self.src_dir.display()
            )));
        }
        for alias in &self.alias_infos {
            if alias.symbol.is_empty() {
                return Err(HostError::Malformed(format!(
                    "alias for '{}' has no symbol",
                    alias.path.display()
                )));
            }
            if !alias.path.is_absolute() {
                return Err(HostError::Malformed(format!(
                    "alias '{}' points to relative path '{}'",
                    alias.symbol,
                    alias.path.display()
                )));
            }
        }
        Ok(())
    }

    /// Ordered alias table for resolution.
    pub fn alias_table(&self) -> Result<AliasTable, HostError> {
        AliasTable::new(self.alias_infos.iter().cloned())
            .map_err(|e| HostError::Malformed(e.to_string()))
    }
}

/// Host lifecycle points a handler can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostHook {
    /// After a compilation finished, before files are written.
    Emit,
}

/// What the host reports when a hook fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitContext {
    /// 1-based count of compilations in this process.
    pub compilation: u64,
    pub output_dir: Option<PathBuf>,
}

pub type HookHandler = Box<dyn Fn(&EmitContext) + Send + Sync>;

/// The query and mutation surface the plugin needs from a bundler.
pub trait HostBundler {
    fn system_info(&self) -> Result<SystemInfo, HostError>;

    fn set_entries(&mut self, entries: EntryMap);

    fn set_outputs(&mut self, outputs: OutputMap);

    fn set_assets(&mut self, assets: AssetMap);

    /// Replaces any previous directive.
    fn set_runtime_chunk(&mut self, chunk: RuntimeChunk);

    /// Attach `handler` to `hook` under `name`, replacing a handler of the same name.
    fn tap(&mut self, hook: HostHook, name: &str, handler: HookHandler);
}

/// In-memory bundler configuration.
#[derive(Default)]
pub struct BundlerConfig {
    context: Option<PathBuf>,
    aliases: Vec<AliasEntry>,
    output_dir: Option<PathBuf>,
    entries: EntryMap,
    outputs: OutputMap,
    assets: AssetMap,
    runtime_chunk: Option<RuntimeChunk>,
    hooks: IndexMap<(HostHook, String), HookHandler>,
    compilations: u64,
}

impl BundlerConfig {
    /// A host whose resolve context (source root) is `context`.
    pub fn new(context: impl Into<PathBuf>) -> Self {
        Self {
            context: Some(context.into()),
            ..Self::default()
        }
    }

    pub fn with_alias(mut self, symbol: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.aliases.push(AliasEntry::new(symbol, path));
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn entries(&self) -> &EntryMap {
        &self.entries
    }

    pub fn outputs(&self) -> &OutputMap {
        &self.outputs
    }

    pub fn assets(&self) -> &AssetMap {
        &self.assets
    }

    pub fn runtime_chunk(&self) -> Option<&RuntimeChunk> {
        self.runtime_chunk.as_ref()
    }

    /// Names of handlers attached to `hook`, in registration order.
    pub fn hook_names(&self, hook: HostHook) -> Vec<&str> {
        self.hooks
            .keys()
            .filter(|(h, _)| *h == hook)
            .map(|(_, name)| name.as_str())
            .collect()
    }

    /// Finish one compilation: fire every emit handler once.
    ///
    /// Returns the number of handlers fired.
    pub fn emit(&mut self) -> usize {
        self.compilations += 1;
        let ctx = EmitContext {
            compilation: self.compilations,
            output_dir: self.output_dir.clone(),
        };

        let mut fired = 0;
        for ((hook, _), handler) in &self.hooks {
            if *hook == HostHook::Emit {
                handler(&ctx);
                fired += 1;
            }
        }
        fired
    }

    pub fn compilations(&self) -> u64 {
        self.compilations
    }

    pub fn context(&self) -> Option<&Path> {
        self.context.as_deref()
    }
}

impl fmt::Debug for BundlerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundlerConfig")
            .field("context", &self.context)
            .field("aliases", &self.aliases)
            .field("entries", &self.entries)
            .field("outputs", &self.outputs)
            .field("assets", &self.assets.len())
            .field("runtime_chunk", &self.runtime_chunk)
            .field("hooks", &self.hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl HostBundler for BundlerConfig {
    fn system_info(&self) -> Result<SystemInfo, HostError> {
        let src_dir = self
            .context
            .clone()
            .ok_or_else(|| HostError::Query("resolve context is not set".into()))?;

        let info = SystemInfo {
            src_dir,
            alias_infos: self.aliases.clone(),
        };
        info.validate()?;
        Ok(info)
    }

    fn set_entries(&mut self, entries: EntryMap) {
        self.entries = entries;
    }

    fn set_outputs(&mut self, outputs: OutputMap) {
        self.outputs = outputs;
    }

    fn set_assets(&mut self, assets: AssetMap) {
        self.assets = assets;
    }

    fn set_runtime_chunk(&mut self, chunk: RuntimeChunk) {
        self.runtime_chunk = Some(chunk);
    }

    fn tap(&mut self, hook: HostHook, name: &str, handler: HookHandler) {
        self.hooks.insert((hook, name.to_string()), handler);
    }
}
