//! Cluster orchestrator - runs every deployment of a cluster concurrently

use crate::{
    core::{Cluster, Deployment, ExecutionStrategy},
    execution::{Event, EventChannel, PipelineExecutor},
};
use std::convert::Infallible;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Runs the deployments of a cluster side by side on a shared event channel
///
/// A failing deployment is reported through `DeploymentErrored` only. It never
/// stops its siblings and never fails the run, so a caller with no plugin
/// attached sees a successful run even when every deployment failed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Orchestrator {
    executor: PipelineExecutor,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self {
            executor: PipelineExecutor::new(),
        }
    }

    /// Run every deployment and wait for all of them to finish
    pub async fn run(&self, cluster: &Cluster, channel: &EventChannel) -> Result<(), Infallible> {
        let run_id = Uuid::new_v4();
        info!(
            "Starting cluster {} ({}) with {} deployment(s)",
            cluster.name,
            run_id,
            cluster.deployments().len()
        );
        channel.publish(Event::ClusterStarted {
            name: cluster.name.clone(),
        });

        let mut handles: Vec<(String, JoinHandle<()>)> = Vec::with_capacity(cluster.deployments().len());
        for deployment in cluster.deployments() {
            channel.publish(Event::DeploymentStarted {
                name: deployment.name.clone(),
            });
            let handle = self.start_deployment(deployment, channel);
            handles.push((deployment.name.clone(), handle));
        }

        // Joined in start order.
        for (name, handle) in handles {
            if let Err(e) = handle.await {
                error!("Deployment {} task aborted: {}", name, e);
                channel.publish(Event::DeploymentErrored {
                    name,
                    error: format!("Deployment task panicked: {}", e),
                });
            }
        }

        channel.publish(Event::ClusterCompleted {
            name: cluster.name.clone(),
        });
        info!("Cluster {} ({}) finished", cluster.name, run_id);

        Ok(())
    }

    fn start_deployment(&self, deployment: &Deployment, channel: &EventChannel) -> JoinHandle<()> {
        let executor = self.executor;
        let name = deployment.name.clone();
        let pipeline = deployment.pipeline.clone();
        let channel = channel.clone();

        match deployment.strategy {
            ExecutionStrategy::Local => tokio::spawn(async move {
                match executor.execute(&pipeline, &channel).await {
                    Ok(()) => {
                        info!("Deployment {} completed", name);
                        channel.publish(Event::DeploymentCompleted { name });
                    }
                    Err(e) => {
                        warn!("Deployment {} failed: {}", name, e);
                        channel.publish(Event::DeploymentErrored {
                            name,
                            error: e.to_string(),
                        });
                    }
                }
            }),
        }
    }
}
