//! One build session as a sequence of typed stages.
//!
//! ```text
//! Configured → GraphBuilt → EntriesDerived → RuntimeWired → HandedOff
//! ```
//!
//! Each transition consumes the previous stage, so stages cannot be skipped or
//! repeated. Everything up to [`Session::hand_off`] is computed without
//! touching the host; the host only ever sees a finished configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use path_clean::PathClean;
use wxmp_config::Options;
use wxmp_graph::{
    AliasTable, DEFAULT_MAX_FILES, DependencyGraph, Extensions, GraphBuilder, Runtime,
    SourceAnalyzer, discover_roots,
};

use crate::entries::{DerivedEntries, EntryMap, OutputMap, derive_entries};
use crate::environment::PluginEnvironment;
use crate::error::{HostError, Result};
use crate::host::{HostBundler, SystemInfo};
use crate::runtime_chunk::{RuntimeChunk, configure_runtime_chunk};

/// Typestate marker: options and host information captured.
#[derive(Debug)]
pub struct Configured {
    aliases: AliasTable,
}

/// Typestate marker: dependency graph closed.
#[derive(Debug)]
pub struct GraphBuilt {
    graph: DependencyGraph,
}

/// Typestate marker: entry, output and asset maps computed.
#[derive(Debug)]
pub struct EntriesDerived {
    derived: DerivedEntries,
}

/// Typestate marker: runtime chunk directive computed.
#[derive(Debug)]
pub struct RuntimeWired {
    derived: DerivedEntries,
    chunk: RuntimeChunk,
}

/// Typestate marker: configuration written to the host.
#[derive(Debug)]
pub struct HandedOff {
    entries: EntryMap,
    outputs: OutputMap,
    chunk: RuntimeChunk,
}

#[derive(Debug)]
pub struct Session<State> {
    options: Options,
    environment: PluginEnvironment,
    runtime: Arc<dyn Runtime>,
    src_dir: PathBuf,
    output_dir: PathBuf,
    extensions: Extensions,
    max_files: usize,
    state: State,
}

impl<State> Session<State> {
    fn advance<Next>(self, next: impl FnOnce(State) -> Next) -> Session<Next> {
        Session {
            options: self.options,
            environment: self.environment,
            runtime: self.runtime,
            src_dir: self.src_dir,
            output_dir: self.output_dir,
            extensions: self.extensions,
            max_files: self.max_files,
            state: next(self.state),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    /// Output root, made absolute against the runtime's working directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

impl Session<Configured> {
    /// Capture host information for a session.
    ///
    /// # Errors
    ///
    /// [`crate::PluginError::HostQuery`] when the host data is malformed.
    pub fn new(
        options: Options,
        environment: PluginEnvironment,
        runtime: Arc<dyn Runtime>,
        system: &SystemInfo,
    ) -> Result<Self> {
        system.validate()?;
        let aliases = system.alias_table()?;

        let output_dir = if options.output_dir().is_absolute() {
            options.output_dir().clean()
        } else {
            let cwd = runtime
                .get_cwd()
                .map_err(|e| HostError::Query(format!("working directory unavailable: {e}")))?;
            cwd.join(options.output_dir()).clean()
        };

        Ok(Session {
            extensions: Extensions::from_options(&options),
            src_dir: system.src_dir.clean(),
            output_dir,
            options,
            environment,
            runtime,
            max_files: DEFAULT_MAX_FILES,
            state: Configured { aliases },
        })
    }

    pub fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.state.aliases
    }

    pub fn build_graph(self) -> Result<Session<GraphBuilt>> {
        let roots = discover_roots(&self.src_dir, self.runtime.as_ref(), &self.extensions)?;
        let analyzer = SourceAnalyzer::new(
            Arc::clone(&self.runtime),
            &self.src_dir,
            self.extensions.clone(),
        );
        let graph = GraphBuilder::new(analyzer)
            .max_files(self.max_files)
            .build(roots, &self.state.aliases)?;

        Ok(self.advance(|_| GraphBuilt { graph }))
    }
}

impl Session<GraphBuilt> {
    pub fn graph(&self) -> &DependencyGraph {
        &self.state.graph
    }

    pub fn derive_entries(self) -> Result<Session<EntriesDerived>> {
        let derived = derive_entries(
            &self.state.graph,
            &self.src_dir,
            &self.output_dir,
            &self.extensions,
        )?;
        Ok(self.advance(|_| EntriesDerived { derived }))
    }
}

impl Session<EntriesDerived> {
    pub fn derived(&self) -> &DerivedEntries {
        &self.state.derived
    }

    pub fn wire_runtime(self) -> Session<RuntimeWired> {
        let chunk = configure_runtime_chunk(
            self.state.derived.names(),
            &self.output_dir,
            self.environment.plugin_dir(),
        );
        tracing::info!(entries = chunk.requires.len(), "runtime chunk configured");

        self.advance(|EntriesDerived { derived }| RuntimeWired { derived, chunk })
    }
}

impl Session<RuntimeWired> {
    pub fn derived(&self) -> &DerivedEntries {
        &self.state.derived
    }

    pub fn runtime_chunk(&self) -> &RuntimeChunk {
        &self.state.chunk
    }

    /// Write the finished configuration into the host.
    pub fn hand_off<H: HostBundler + ?Sized>(self, host: &mut H) -> Session<HandedOff> {
        let session = self.advance(|RuntimeWired { derived, chunk }| {
            host.set_entries(derived.entries.clone());
            host.set_outputs(derived.outputs.clone());
            host.set_assets(derived.assets);
            host.set_runtime_chunk(chunk.clone());
            HandedOff {
                entries: derived.entries,
                outputs: derived.outputs,
                chunk,
            }
        });

        tracing::info!(entries = session.entries().len(), "configuration handed to host");
        session
    }
}

impl Session<HandedOff> {
    pub fn entries(&self) -> &EntryMap {
        &self.state.entries
    }

    pub fn outputs(&self) -> &OutputMap {
        &self.state.outputs
    }

    pub fn runtime_chunk(&self) -> &RuntimeChunk {
        &self.state.chunk
    }
}
