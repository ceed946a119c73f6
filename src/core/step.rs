//! Step domain model

use crate::node::{FnNode, Node, Payload};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Role a step plays in a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    /// Produces the first value; receives no input
    Source,
    /// Transforms a value in the middle of a pipeline
    Processor,
    /// Consumes the final value
    Sink,
    /// Interior step that both consumes and produces
    Bidirectional,
}

impl StepKind {
    /// Whether this kind may occupy an interior position
    pub fn is_interior(&self) -> bool {
        matches!(self, StepKind::Processor | StepKind::Bidirectional)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepKind::Source => "Source",
            StepKind::Processor => "Processor",
            StepKind::Sink => "Sink",
            StepKind::Bidirectional => "Bidirectional",
        };
        f.write_str(name)
    }
}

/// A single step in a pipeline
#[derive(Clone)]
pub struct Step {
    /// Step name, unique within its pipeline
    pub name: String,

    /// Role of the step
    pub kind: StepKind,

    /// The operation run for this step
    pub node: Arc<dyn Node>,
}

impl Step {
    pub fn new(name: impl Into<String>, kind: StepKind, node: Arc<dyn Node>) -> Self {
        Self {
            name: name.into(),
            kind,
            node,
        }
    }

    /// Create a step from an async closure
    pub fn from_fn<F, Fut>(name: impl Into<String>, kind: StepKind, func: F) -> Self
    where
        F: Fn(Option<Payload>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Payload>> + Send + 'static,
    {
        Self::new(name, kind, Arc::new(FnNode::new(func)))
    }

    /// Run the step's operation once
    pub async fn run(&self, input: Option<Payload>) -> anyhow::Result<Payload> {
        self.node.process(input).await
    }

    /// Whether two steps share the same node instance
    pub fn same_node(&self, other: &Step) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
