//! Bundler bridge for WeChat mini-programs.
//!
//! The plugin reads the host bundler's source root and aliases, builds the
//! dependency graph of the mini-program tree, and hands the bundler back:
//!
//! - an entry map (logical component name → logic file),
//! - an output map with the same keys under the output directory,
//! - the non-script files to copy, with framework-native extensions,
//! - one shared runtime chunk required by every entry.
//!
//! ```text
//! host.system_info() → graph → entries/outputs → runtime chunk → host
//! ```
//!
//! Hosts implement [`HostBundler`]; [`BundlerConfig`] is an in-memory host.

pub mod entries;
pub mod environment;
pub mod error;
pub mod host;
pub mod plugin;
pub mod runtime_chunk;
pub mod session;

#[cfg(feature = "logging")]
pub mod logging;

pub use entries::{AssetMap, DerivedEntries, EntryMap, OutputMap, derive_entries, logical_name};
pub use environment::PluginEnvironment;
pub use error::{HostError, PluginError, Result};
pub use host::{BundlerConfig, EmitContext, HookHandler, HostBundler, HostHook, SystemInfo};
pub use plugin::{PLUGIN_NAME, WxMiniProgramPlugin};
pub use runtime_chunk::{RUNTIME_CHUNK_NAME, RuntimeChunk, configure_runtime_chunk};
pub use session::{Configured, EntriesDerived, GraphBuilt, HandedOff, RuntimeWired, Session};

pub use wxmp_config::{Options, PluginOptions};
