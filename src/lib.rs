//! nodeflow - run pipelines of nodes and supervise clusters of them
//!
//! A pipeline is an ordered list of steps (source, processors, sink) run one
//! after another, each step receiving the previous step's output. A cluster
//! runs many pipelines side by side. Both publish lifecycle events on an
//! [`EventChannel`], which a [`PluginDispatcher`] fans out to plugins.

pub mod cli;
pub mod core;
pub mod execution;
pub mod node;
pub mod plugin;

// Re-export commonly used types
pub use core::{cluster, pipeline, BuildError, Cluster, Deployment, ExecutionStrategy, Pipeline, Step, StepKind};
pub use execution::{Event, EventChannel, ExecutionError, Orchestrator, PipelineExecutor};
pub use node::{FnNode, Node, Payload};
pub use plugin::{DispatcherHandle, Plugin, PluginDispatcher};
