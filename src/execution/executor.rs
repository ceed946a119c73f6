//! Pipeline executor - runs the steps of one pipeline in order

use crate::{
    core::Pipeline,
    execution::{Event, EventChannel},
    node::Payload,
};
use thiserror::Error;
use tracing::{debug, error, info};

/// Failure of a pipeline run, attributed to the step that failed
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Step {step} failed: {error}")]
    StepFailed { step: String, error: anyhow::Error },
}

impl ExecutionError {
    /// Name of the failing step
    pub fn step(&self) -> &str {
        match self {
            ExecutionError::StepFailed { step, .. } => step,
        }
    }
}

/// Runs a pipeline, threading each step's output into the next step
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineExecutor;

impl PipelineExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Execute the pipeline, publishing lifecycle events to `channel`
    ///
    /// The first failing step stops the run; later steps are not started and
    /// no `PipelineCompleted` event is published.
    pub async fn execute(&self, pipeline: &Pipeline, channel: &EventChannel) -> Result<(), ExecutionError> {
        info!("Starting pipeline execution: {}", pipeline.name);
        channel.publish(Event::PipelineStarted {
            name: pipeline.name.clone(),
        });

        let mut current: Option<Payload> = None;

        for step in pipeline.steps() {
            channel.publish(Event::StepStarted {
                name: step.name.clone(),
            });
            debug!("Executing step: {} ({})", step.name, step.kind);

            match step.run(current.take()).await {
                Ok(output) => {
                    channel.publish(Event::StepCompleted {
                        name: step.name.clone(),
                    });
                    debug!("Step {} completed", step.name);
                    current = Some(output);
                }
                Err(e) => {
                    error!("Step {} failed in pipeline {}: {}", step.name, pipeline.name, e);
                    channel.publish(Event::StepErrored {
                        name: step.name.clone(),
                        error: e.to_string(),
                    });
                    return Err(ExecutionError::StepFailed {
                        step: step.name.clone(),
                        error: e,
                    });
                }
            }
        }

        channel.publish(Event::PipelineCompleted {
            name: pipeline.name.clone(),
        });
        info!("Pipeline execution finished: {}", pipeline.name);

        Ok(())
    }
}
