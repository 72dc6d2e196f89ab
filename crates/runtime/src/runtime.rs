//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for the host integration.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use monarch_content::{Content, ContentFactory};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::authority::Authority;
use crate::events::EventBus;
use crate::host::{ChannelSink, Outbound, SnapshotSink, WorldHost};
use crate::repository::{FileSaveRepository, PlayerRepository};
use crate::workers::SimulationWorker;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Capacity of the default outbound channel. Messages beyond it are dropped.
    pub outbound_buffer_size: usize,
    /// Where [`FileSaveRepository`] keeps player saves when no repository is set.
    pub save_dir: PathBuf,
    /// Ticks between autosaves; zero disables autosave.
    pub autosave_interval: u64,
    /// Fixed seed for chance rolls. Random per session when `None`.
    pub session_seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 100,
            command_buffer_size: 32,
            outbound_buffer_size: 256,
            save_dir: default_save_dir(),
            autosave_interval: monarch_core::GameConfig::seconds(300),
            session_seed: None,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by `MONARCH_SAVE_DIR`, `MONARCH_EVENT_BUFFER` and
    /// `MONARCH_COMMAND_BUFFER`. Unparsable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("MONARCH_SAVE_DIR") {
            config.save_dir = PathBuf::from(dir);
        }
        if let Some(size) = env_usize("MONARCH_EVENT_BUFFER") {
            config.event_buffer_size = size;
        }
        if let Some(size) = env_usize("MONARCH_COMMAND_BUFFER") {
            config.command_buffer_size = size;
        }
        config
    }
}

fn env_usize(key: &str) -> Option<usize> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            warn!(target: "runtime::config", key, value = %raw, "ignoring invalid buffer size");
            None
        }
    }
}

/// Platform data directory for player saves.
///
/// - Linux: `~/.local/share/shadow-monarch/players`
/// - macOS: `~/Library/Application Support/shadow-monarch/players`
/// - Windows: `%APPDATA%\shadow-monarch\players`
/// - Fallback: `./save_data/players`
pub fn default_save_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "shadow-monarch")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
        .join("players")
}

/// Main runtime that owns the authoritative session.
///
/// [`RuntimeHandle`] provides a cloneable façade for the host integration.
pub struct Runtime {
    handle: RuntimeHandle,
    outbound: Option<mpsc::Receiver<Outbound>>,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Receiver of observer traffic when the default channel sink is used.
    ///
    /// Returns `None` if a custom sink was configured or the receiver was
    /// already taken.
    pub fn take_outbound(&mut self) -> Option<mpsc::Receiver<Outbound>> {
        self.outbound.take()
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits for the worker to finish its final save. Every cloned handle
    /// must have been dropped for the worker to stop.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    content: Option<Content>,
    repository: Option<Arc<dyn PlayerRepository>>,
    sink: Option<Box<dyn SnapshotSink>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            content: None,
            repository: None,
            sink: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide skills, balance and classification. Defaults to the bundled set.
    pub fn content(mut self, content: Content) -> Self {
        self.content = Some(content);
        self
    }

    /// Persist players through `repository` instead of the file store.
    pub fn repository(mut self, repository: Arc<dyn PlayerRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Deliver observer traffic to `sink` instead of the outbound channel.
    pub fn sink(mut self, sink: impl SnapshotSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Build the runtime and spawn the simulation worker on the current
    /// tokio runtime.
    pub async fn build<H: WorldHost + 'static>(self, host: H) -> Result<Runtime> {
        let RuntimeBuilder {
            config,
            content,
            repository,
            sink,
        } = self;

        let content = match content {
            Some(content) => content,
            None => ContentFactory::bundled().map_err(|e| RuntimeError::Content(e.to_string()))?,
        };
        let repository: Arc<dyn PlayerRepository> = match repository {
            Some(repository) => repository,
            None => Arc::new(FileSaveRepository::new(&config.save_dir)?),
        };

        let (sink, outbound) = match sink {
            Some(sink) => (sink, None),
            None => {
                let (tx, rx) = mpsc::channel(config.outbound_buffer_size.max(1));
                (Box::new(ChannelSink::new(tx)) as Box<dyn SnapshotSink>, Some(rx))
            }
        };

        let session_seed = config.session_seed.unwrap_or_else(rand::random);
        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let authority = Authority::new(content, session_seed, event_bus.clone());

        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size);
        let worker = SimulationWorker::new(
            authority,
            host,
            sink,
            repository,
            command_rx,
            config.autosave_interval,
        );
        let sim_worker_handle = tokio::spawn(worker.run());

        info!(
            target: "runtime",
            session_seed,
            autosave = config.autosave_interval,
            "runtime started"
        );

        Ok(Runtime {
            handle: RuntimeHandle::new(command_tx, event_bus),
            outbound,
            sim_worker_handle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_sizes() {
        let config = RuntimeConfig::default();
        assert_eq!(config.event_buffer_size, 100);
        assert_eq!(config.command_buffer_size, 32);
        assert!(config.save_dir.ends_with("players"));
        assert_eq!(config.autosave_interval, 6000);
    }
}
