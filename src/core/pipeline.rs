//! Pipeline domain model and builder

use crate::core::{
    error::BuildError,
    step::{Step, StepKind},
};
use std::collections::HashSet;

/// An immutable, validated, ordered list of steps
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Pipeline name
    pub name: String,

    /// Steps in execution order
    steps: Vec<Step>,
}

/// Start building a pipeline
pub fn pipeline(name: impl Into<String>) -> PipelineBuilder {
    PipelineBuilder::new(name)
}

impl Pipeline {
    /// Start building a pipeline
    pub fn builder(name: impl Into<String>) -> PipelineBuilder {
        PipelineBuilder::new(name)
    }

    /// Steps in execution order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Get a step by name
    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a built pipeline
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names in execution order
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Incremental pipeline builder
///
/// Each append validates the kind of the step it is given; `build` validates
/// the overall shape again, so a pipeline assembled without `from` still
/// fails if it does not start with a source, and one with two `from` or two
/// `to` calls fails on the edge step left in the middle.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    name: String,
    steps: Vec<Step>,
}

impl PipelineBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append the ingress step
    pub fn from(self, step: Step) -> Result<Self, BuildError> {
        if step.kind != StepKind::Source {
            return Err(BuildError::UnexpectedKind {
                expected: "Source",
                actual: step.kind,
            });
        }
        Ok(self.push(step))
    }

    /// Append an interior step
    pub fn through(self, step: Step) -> Result<Self, BuildError> {
        if !step.kind.is_interior() {
            return Err(BuildError::UnexpectedKind {
                expected: "Processor or Bidirectional",
                actual: step.kind,
            });
        }
        Ok(self.push(step))
    }

    /// Append the egress step
    pub fn to(self, step: Step) -> Result<Self, BuildError> {
        if step.kind != StepKind::Sink {
            return Err(BuildError::UnexpectedKind {
                expected: "Sink",
                actual: step.kind,
            });
        }
        Ok(self.push(step))
    }

    fn push(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Validate and freeze the pipeline
    pub fn build(self) -> Result<Pipeline, BuildError> {
        if self.name.trim().is_empty() {
            return Err(BuildError::EmptyPipelineName);
        }

        let (Some(first), Some(last)) = (self.steps.first(), self.steps.last()) else {
            return Err(BuildError::NoSteps);
        };
        if first.kind != StepKind::Source {
            return Err(BuildError::MissingIngress);
        }
        if last.kind != StepKind::Sink {
            return Err(BuildError::MissingEgress);
        }

        // Repeated `from`/`to` calls can still place an edge kind in the middle.
        let interior = &self.steps[1..self.steps.len() - 1];
        if let Some(misplaced) = interior.iter().find(|s| !s.kind.is_interior()) {
            return Err(BuildError::UnexpectedKind {
                expected: "Processor or Bidirectional",
                actual: misplaced.kind,
            });
        }

        let mut seen = HashSet::new();
        for step in &self.steps {
            if !seen.insert(step.name.as_str()) {
                return Err(BuildError::DuplicateStep {
                    pipeline: self.name.clone(),
                    step: step.name.clone(),
                });
            }
        }

        Ok(Pipeline {
            name: self.name,
            steps: self.steps,
        })
    }
}
