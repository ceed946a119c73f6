//! Pipeline and cluster execution

pub mod channel;
pub mod event;
pub mod executor;
pub mod orchestrator;

pub use channel::EventChannel;
pub use event::Event;
pub use executor::{ExecutionError, PipelineExecutor};
pub use orchestrator::Orchestrator;
