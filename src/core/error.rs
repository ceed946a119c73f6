//! Construction-time validation errors

use crate::core::StepKind;
use thiserror::Error;

/// Errors raised while building a pipeline or cluster
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Expected {expected} node, got {actual}")]
    UnexpectedKind {
        expected: &'static str,
        actual: StepKind,
    },

    #[error("Pipeline name cannot be empty")]
    EmptyPipelineName,

    #[error("Pipeline must have at least one node")]
    NoSteps,

    #[error("Pipeline must start with an ingress node")]
    MissingIngress,

    #[error("Pipeline must end with an egress node")]
    MissingEgress,

    #[error("Duplicate step name '{step}' in pipeline '{pipeline}'")]
    DuplicateStep { pipeline: String, step: String },

    #[error("Cluster name cannot be empty")]
    EmptyClusterName,

    #[error("Cluster must have at least one deployment")]
    NoDeployments,

    #[error("Deployment name cannot be empty")]
    EmptyDeploymentName,

    #[error("Duplicate deployment name '{0}'")]
    DuplicateDeployment(String),
}
