//! Cluster and deployment models

use crate::core::{error::BuildError, pipeline::Pipeline};
use crate::node::Payload;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// How a deployment's pipeline is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStrategy {
    /// Run as a task inside this process
    #[default]
    Local,
}

/// A named pipeline registered for orchestrated execution
#[derive(Debug, Clone)]
pub struct Deployment {
    pub name: String,
    pub pipeline: Arc<Pipeline>,
    pub strategy: ExecutionStrategy,
}

/// A named group of deployments executed together
#[derive(Debug, Clone)]
pub struct Cluster {
    pub name: String,
    deployments: Vec<Deployment>,
    config: HashMap<String, Payload>,
}

/// Start building a cluster
pub fn cluster(name: impl Into<String>) -> ClusterBuilder {
    ClusterBuilder::new(name)
}

impl Cluster {
    pub fn builder(name: impl Into<String>) -> ClusterBuilder {
        ClusterBuilder::new(name)
    }

    /// Deployments in start order
    pub fn deployments(&self) -> &[Deployment] {
        &self.deployments
    }

    /// Get a deployment by name
    pub fn deployment(&self, name: &str) -> Option<&Deployment> {
        self.deployments.iter().find(|d| d.name == name)
    }

    /// Opaque cluster configuration
    pub fn config(&self) -> &HashMap<String, Payload> {
        &self.config
    }
}

/// Cluster builder
#[derive(Debug, Clone, Default)]
pub struct ClusterBuilder {
    name: String,
    deployments: Vec<Deployment>,
    config: HashMap<String, Payload>,
}

impl ClusterBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a deployment with the default (local) strategy
    pub fn deploy(self, name: impl Into<String>, pipeline: impl Into<Arc<Pipeline>>) -> Self {
        self.deploy_with(name, pipeline, ExecutionStrategy::default())
    }

    /// Add a deployment with an explicit strategy
    pub fn deploy_with(
        mut self,
        name: impl Into<String>,
        pipeline: impl Into<Arc<Pipeline>>,
        strategy: ExecutionStrategy,
    ) -> Self {
        self.deployments.push(Deployment {
            name: name.into(),
            pipeline: pipeline.into(),
            strategy,
        });
        self
    }

    /// Set a configuration entry
    pub fn config(mut self, key: impl Into<String>, value: Payload) -> Self {
        self.config.insert(key.into(), value);
        self
    }

    /// Validate and freeze the cluster
    pub fn build(self) -> Result<Cluster, BuildError> {
        if self.name.trim().is_empty() {
            return Err(BuildError::EmptyClusterName);
        }
        if self.deployments.is_empty() {
            return Err(BuildError::NoDeployments);
        }

        let mut seen = HashSet::new();
        for deployment in &self.deployments {
            if deployment.name.trim().is_empty() {
                return Err(BuildError::EmptyDeploymentName);
            }
            if !seen.insert(deployment.name.as_str()) {
                return Err(BuildError::DuplicateDeployment(deployment.name.clone()));
            }
        }

        Ok(Cluster {
            name: self.name,
            deployments: self.deployments,
            config: self.config,
        })
    }
}
