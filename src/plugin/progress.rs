//! Progress plugin - a progress bar over the deployments of a cluster

use crate::cli::output::create_progress_bar;
use crate::execution::Event;
use crate::plugin::Plugin;
use async_trait::async_trait;
use indicatif::ProgressBar;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Advances a progress bar each time a deployment settles
pub struct ProgressPlugin {
    bar: ProgressBar,
    completed: AtomicUsize,
    failed: AtomicUsize,
}

impl ProgressPlugin {
    pub fn new(total_deployments: usize) -> Self {
        Self::with_bar(create_progress_bar(total_deployments))
    }

    pub fn with_bar(bar: ProgressBar) -> Self {
        Self {
            bar,
            completed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    /// Deployments that completed so far
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Deployments that failed so far
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    fn summary(&self) -> String {
        format!("{} ok, {} failed", self.completed(), self.failed())
    }
}

#[async_trait]
impl Plugin for ProgressPlugin {
    fn name(&self) -> &str {
        "progress"
    }

    async fn on_event(&self, event: &Event) {
        match event {
            Event::DeploymentStarted { name } => self.bar.set_message(name.clone()),
            Event::DeploymentCompleted { .. } => {
                self.completed.fetch_add(1, Ordering::SeqCst);
                self.bar.inc(1);
                self.bar.set_message(self.summary());
            }
            Event::DeploymentErrored { name, error } => {
                self.failed.fetch_add(1, Ordering::SeqCst);
                self.bar.println(format!("{} failed: {}", name, error));
                self.bar.inc(1);
                self.bar.set_message(self.summary());
            }
            Event::ClusterCompleted { .. } => self.bar.finish_with_message(self.summary()),
            _ => {}
        }
    }
}
