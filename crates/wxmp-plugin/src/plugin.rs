use std::sync::Arc;

use wxmp_config::{Options, PluginOptions, WxmpConfig};
use wxmp_graph::{DEFAULT_MAX_FILES, NativeRuntime, Runtime};

use crate::entries::{EntryMap, OutputMap};
use crate::environment::PluginEnvironment;
use crate::error::Result;
use crate::host::{EmitContext, HostBundler, HostHook, SystemInfo};
use crate::runtime_chunk::RuntimeChunk;
use crate::session::{HandedOff, RuntimeWired, Session};

/// Name the emit handler is registered under.
pub const PLUGIN_NAME: &str = "WxMiniProgramPlugin";

/// Configures a host bundler for a mini-program source tree.
///
/// # Example
///
/// ```rust,no_run
/// use wxmp_config::PluginOptions;
/// use wxmp_plugin::{BundlerConfig, PluginEnvironment, WxMiniProgramPlugin};
///
/// # fn main() -> wxmp_plugin::Result<()> {
/// let mut plugin = WxMiniProgramPlugin::new(
///     PluginOptions::new().with_output_dir("/project/dist"),
///     PluginEnvironment::bundled(),
/// )?;
///
/// let mut host = BundlerConfig::new("/project/src").with_alias("@", "/project/src");
/// plugin.apply(&mut host)?;
///
/// for (name, source) in plugin.entry().into_iter().flatten() {
///     println!("{name} <- {}", source.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WxMiniProgramPlugin {
    options: Options,
    environment: PluginEnvironment,
    runtime: Arc<dyn Runtime>,
    max_files: usize,
    applied: Option<Session<HandedOff>>,
}

impl WxMiniProgramPlugin {
    /// Validate options. Nothing touches the host yet.
    ///
    /// # Errors
    ///
    /// [`crate::PluginError::Config`] when `outputDir` is missing or the
    /// style suffix is empty.
    pub fn new(options: PluginOptions, environment: PluginEnvironment) -> Result<Self> {
        let options = Options::from_partial(options)?;
        tracing::debug!(
            output_dir = %options.output_dir().display(),
            style = options.style_src_extension(),
            ts = options.is_use_ts(),
            "plugin configured"
        );

        Ok(Self {
            options,
            environment,
            runtime: Arc::new(NativeRuntime),
            max_files: DEFAULT_MAX_FILES,
            applied: None,
        })
    }

    /// Build from a discovered config file.
    pub fn from_config(config: &WxmpConfig, environment: PluginEnvironment) -> Result<Self> {
        Self::new(config.options.clone(), environment)
    }

    /// Read source trees through `runtime` instead of the filesystem.
    pub fn with_runtime(mut self, runtime: Arc<dyn Runtime>) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Run every stage up to the hand-off without a host.
    pub fn plan(&self, system: &SystemInfo) -> Result<Session<RuntimeWired>> {
        let session = Session::new(
            self.options.clone(),
            self.environment.clone(),
            Arc::clone(&self.runtime),
            system,
        )?
        .max_files(self.max_files)
        .build_graph()?
        .derive_entries()?
        .wire_runtime();
        Ok(session)
    }

    /// Query the host, compute the configuration and hand it over.
    ///
    /// The host is written only after every stage succeeded. Applying again
    /// replaces the previous configuration.
    pub fn apply<H: HostBundler + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        let system = host.system_info()?;
        let session = self.plan(&system)?.hand_off(host);

        let entries = session.entries().len();
        host.tap(
            HostHook::Emit,
            PLUGIN_NAME,
            Box::new(move |ctx: &EmitContext| {
                tracing::info!(
                    plugin = PLUGIN_NAME,
                    compilation = ctx.compilation,
                    entries,
                    "emit"
                );
            }),
        );

        self.applied = Some(session);
        Ok(())
    }

    /// Entry map from the last successful [`WxMiniProgramPlugin::apply`].
    pub fn entry(&self) -> Option<&EntryMap> {
        self.applied.as_ref().map(|session| session.entries())
    }

    /// Output map from the last successful [`WxMiniProgramPlugin::apply`].
    pub fn output(&self) -> Option<&OutputMap> {
        self.applied.as_ref().map(|session| session.outputs())
    }

    pub fn runtime_chunk(&self) -> Option<&RuntimeChunk> {
        self.applied.as_ref().map(|session| session.runtime_chunk())
    }
}
