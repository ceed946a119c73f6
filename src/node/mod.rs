//! Node abstraction - the unit of work behind every pipeline step

pub mod builtin;

use async_trait::async_trait;
use std::fmt;
use std::future::Future;

pub use builtin::NodeConfig;

/// Value passed between steps
pub type Payload = serde_json::Value;

/// Trait for step operations - allows for different implementations
///
/// A node receives the previous step's output (`None` for the first step of a
/// pipeline) and settles exactly once, with one output value or one error.
#[async_trait]
pub trait Node: Send + Sync {
    /// Process one input value
    async fn process(&self, input: Option<Payload>) -> anyhow::Result<Payload>;
}

/// Node backed by an async closure
pub struct FnNode<F> {
    func: F,
}

impl<F, Fut> FnNode<F>
where
    F: Fn(Option<Payload>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Payload>> + Send,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F, Fut> Node for FnNode<F>
where
    F: Fn(Option<Payload>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Payload>> + Send,
{
    async fn process(&self, input: Option<Payload>) -> anyhow::Result<Payload> {
        (self.func)(input).await
    }
}

impl<F> fmt::Debug for FnNode<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnNode").finish_non_exhaustive()
    }
}
