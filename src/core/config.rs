//! Pipeline and cluster configuration from YAML

use crate::core::{
    cluster::{Cluster, ClusterBuilder, ExecutionStrategy},
    pipeline::{Pipeline, PipelineBuilder},
    step::{Step, StepKind},
};
use crate::node::{NodeConfig, Payload};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Pipeline configuration as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pipeline name
    pub name: String,

    /// Optional pipeline description
    #[serde(default)]
    pub description: Option<String>,

    /// Pipeline steps, first is the ingress and last the egress
    pub steps: Vec<StepConfig>,
}

/// Step configuration as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    /// Step name
    pub name: String,

    /// Node type and its settings
    #[serde(flatten)]
    pub node: NodeConfig,
}

/// Cluster configuration as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Cluster name
    pub name: String,

    /// Deployments in start order
    pub deployments: Vec<DeploymentConfig>,

    /// Opaque settings carried on the cluster
    #[serde(default)]
    pub config: HashMap<String, Payload>,
}

/// Deployment configuration as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Deployment name
    pub name: String,

    /// Execution strategy
    #[serde(default)]
    pub strategy: ExecutionStrategy,

    /// The pipeline to deploy
    pub pipeline: PipelineConfig,
}

impl StepConfig {
    /// Instantiate the configured step
    pub fn to_step(&self) -> Result<Step> {
        let node = self
            .node
            .to_node()
            .with_context(|| format!("Failed to create node for step '{}'", self.name))?;
        Ok(Step::new(self.name.clone(), self.node.kind(), node))
    }
}

impl PipelineConfig {
    /// Load pipeline configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse pipeline configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the pipeline configuration by building it
    pub fn validate(&self) -> Result<()> {
        self.to_pipeline().map(|_| ())
    }

    /// Convert config to a Pipeline domain model
    ///
    /// The first step is appended as the ingress, the last as the egress and
    /// everything in between as interior steps.
    pub fn to_pipeline(&self) -> Result<Pipeline> {
        let last = self.steps.len().saturating_sub(1);
        let mut builder = PipelineBuilder::new(self.name.clone());

        for (idx, step_config) in self.steps.iter().enumerate() {
            let step = step_config.to_step()?;
            let appended = if idx == 0 {
                builder.from(step)
            } else if idx == last {
                builder.to(step)
            } else {
                builder.through(step)
            };
            builder = appended.with_context(|| {
                format!("Invalid step '{}' in pipeline '{}'", step_config.name, self.name)
            })?;
        }

        builder
            .build()
            .with_context(|| format!("Invalid pipeline '{}'", self.name))
    }

    /// Step kinds in declaration order
    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(|s| s.node.kind()).collect()
    }
}

impl ClusterConfig {
    /// Load cluster configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse cluster configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ClusterConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the cluster configuration by building it
    pub fn validate(&self) -> Result<()> {
        self.to_cluster().map(|_| ())
    }

    /// Convert config to a Cluster domain model
    pub fn to_cluster(&self) -> Result<Cluster> {
        let mut builder = ClusterBuilder::new(self.name.clone());

        for deployment in &self.deployments {
            let pipeline = deployment
                .pipeline
                .to_pipeline()
                .with_context(|| format!("Invalid deployment '{}'", deployment.name))?;
            builder = builder.deploy_with(deployment.name.clone(), pipeline, deployment.strategy);
        }

        for (key, value) in &self.config {
            builder = builder.config(key.clone(), value.clone());
        }

        builder
            .build()
            .with_context(|| format!("Invalid cluster '{}'", self.name))
    }
}
