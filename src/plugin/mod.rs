//! Plugins and the dispatcher that feeds them events
//!
//! The dispatcher is the single reader of an [`EventChannel`]. For every event
//! it pops, it calls each registered plugin in registration order and waits for
//! the handler to finish before moving on, so all plugins see every event in
//! the same order.

pub mod console;
pub mod logging;
pub mod progress;

use crate::execution::{Event, EventChannel};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub use console::{ConsolePlugin, OutputFormat};
pub use logging::LogPlugin;
pub use progress::ProgressPlugin;

/// An event observer
///
/// Handlers cannot fail; a plugin that needs to report a problem does so
/// through its own side channel.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Plugin name, for diagnostics
    fn name(&self) -> &str;

    /// Handle one event
    async fn on_event(&self, event: &Event);
}

/// Ordered plugin registry
#[derive(Default)]
pub struct PluginDispatcher {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin; registration order is dispatch order
    pub fn register<P: Plugin + 'static>(&mut self, plugin: P) {
        self.register_shared(Arc::new(plugin));
    }

    /// Register a plugin the caller keeps a handle to
    pub fn register_shared(&mut self, plugin: Arc<dyn Plugin>) {
        debug!("Registered plugin: {}", plugin.name());
        self.plugins.push(plugin);
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Deliver one event to every plugin, in order
    pub async fn dispatch(&self, event: &Event) {
        for plugin in &self.plugins {
            plugin.on_event(event).await;
        }
    }

    /// Launch the dispatch loop on `channel`
    ///
    /// The registry is frozen from here on.
    pub fn start(self, channel: EventChannel) -> DispatcherHandle {
        let cancel = CancellationToken::new();
        let drain = CancellationToken::new();
        info!("Starting plugin dispatcher with {} plugin(s)", self.plugins.len());

        let task = tokio::spawn(run_loop(self.plugins, channel, cancel.clone(), drain.clone()));

        DispatcherHandle { cancel, drain, task }
    }
}

async fn run_loop(
    plugins: Vec<Arc<dyn Plugin>>,
    channel: EventChannel,
    cancel: CancellationToken,
    drain: CancellationToken,
) {
    'events: loop {
        let event = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            event = channel.take() => event,
            _ = drain.cancelled() => match channel.try_take() {
                Some(event) => event,
                None => break,
            },
        };

        for plugin in &plugins {
            if cancel.is_cancelled() {
                break 'events;
            }
            plugin.on_event(&event).await;
        }
    }

    debug!("Plugin dispatcher stopped");
}

/// Handle to a running dispatch loop
#[derive(Debug)]
pub struct DispatcherHandle {
    cancel: CancellationToken,
    drain: CancellationToken,
    task: JoinHandle<()>,
}

impl DispatcherHandle {
    /// Stop dispatching at the next safe point
    ///
    /// A handler that is already running finishes first; events still queued
    /// stay in the channel.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait for the loop to exit
    pub async fn stopped(self) {
        if let Err(e) = self.task.await {
            warn!("Plugin dispatcher task ended abnormally: {}", e);
        }
    }

    /// Dispatch every event already queued, then stop and wait
    pub async fn shutdown(self) {
        self.drain.cancel();
        self.stopped().await;
    }
}
