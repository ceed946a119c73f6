//! Lifecycle events published during execution

use serde::{Deserialize, Serialize};
use std::fmt;

/// Events that can occur while running pipelines and clusters
///
/// Pipeline events serialize as `pipeline_*`; the older `sequence_*` tags are
/// accepted when reading events back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    StepStarted { name: String },
    StepCompleted { name: String },
    StepErrored { name: String, error: String },
    #[serde(alias = "sequence_started")]
    PipelineStarted { name: String },
    #[serde(alias = "sequence_completed")]
    PipelineCompleted { name: String },
    /// Part of the model; the executor reports failures through `StepErrored`
    #[serde(alias = "sequence_errored")]
    PipelineErrored { name: String, error: String },
    DeploymentStarted { name: String },
    DeploymentCompleted { name: String },
    DeploymentErrored { name: String, error: String },
    ClusterStarted { name: String },
    ClusterCompleted { name: String },
    /// Part of the model; deployment failures never escalate to the cluster
    ClusterErrored { name: String, error: String },
}

impl Event {
    /// Name of the step, pipeline, deployment or cluster the event is about
    pub fn name(&self) -> &str {
        match self {
            Event::StepStarted { name }
            | Event::StepCompleted { name }
            | Event::StepErrored { name, .. }
            | Event::PipelineStarted { name }
            | Event::PipelineCompleted { name }
            | Event::PipelineErrored { name, .. }
            | Event::DeploymentStarted { name }
            | Event::DeploymentCompleted { name }
            | Event::DeploymentErrored { name, .. }
            | Event::ClusterStarted { name }
            | Event::ClusterCompleted { name }
            | Event::ClusterErrored { name, .. } => name,
        }
    }

    /// Error message carried by `*Errored` events
    pub fn error(&self) -> Option<&str> {
        match self {
            Event::StepErrored { error, .. }
            | Event::PipelineErrored { error, .. }
            | Event::DeploymentErrored { error, .. }
            | Event::ClusterErrored { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }

    /// Snake-case tag, same as the serialized `type` field
    pub fn kind(&self) -> &'static str {
        match self {
            Event::StepStarted { .. } => "step_started",
            Event::StepCompleted { .. } => "step_completed",
            Event::StepErrored { .. } => "step_errored",
            Event::PipelineStarted { .. } => "pipeline_started",
            Event::PipelineCompleted { .. } => "pipeline_completed",
            Event::PipelineErrored { .. } => "pipeline_errored",
            Event::DeploymentStarted { .. } => "deployment_started",
            Event::DeploymentCompleted { .. } => "deployment_completed",
            Event::DeploymentErrored { .. } => "deployment_errored",
            Event::ClusterStarted { .. } => "cluster_started",
            Event::ClusterCompleted { .. } => "cluster_completed",
            Event::ClusterErrored { .. } => "cluster_errored",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error() {
            Some(error) => write!(f, "{}({}): {}", self.kind(), self.name(), error),
            None => write!(f, "{}({})", self.kind(), self.name()),
        }
    }
}
