//! CLI output formatting

use crate::core::StepKind;
use crate::execution::Event;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a progress bar
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    progress.set_style(style);
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// A horizontal rule spanning the terminal width
pub fn separator() -> String {
    let width = term_size::dimensions_stdout()
        .map(|(w, _)| w)
        .unwrap_or(80);
    style("─".repeat(width)).dim().to_string()
}

/// Format a step kind for display
pub fn format_step_kind(kind: StepKind) -> String {
    match kind {
        StepKind::Source => style("SOURCE").cyan().to_string(),
        StepKind::Processor => style("PROCESSOR").blue().to_string(),
        StepKind::Sink => style("SINK").magenta().to_string(),
        StepKind::Bidirectional => style("BIDIRECTIONAL").yellow().to_string(),
    }
}

/// Format a lifecycle event for display
pub fn format_event(event: &Event) -> String {
    match event {
        Event::ClusterStarted { name } => {
            format!("{} Starting cluster {}", ROCKET, style(name).bold())
        }
        Event::ClusterCompleted { name } => {
            format!("{} Cluster {} finished", INFO, style(name).bold())
        }
        Event::ClusterErrored { name, error } => format!(
            "{} Cluster {}: {}",
            CROSS,
            style(name).red(),
            style(error).dim()
        ),
        Event::DeploymentStarted { name } => {
            format!("{} Deploying {}", ROCKET, style(name).cyan())
        }
        Event::DeploymentCompleted { name } => {
            format!("{} Deployment {}", CHECK, style(name).green())
        }
        Event::DeploymentErrored { name, error } => format!(
            "{} Deployment {}: {}",
            CROSS,
            style(name).red(),
            style(error).dim()
        ),
        Event::PipelineStarted { name } => {
            format!("{} Starting pipeline {}", ROCKET, style(name).bold())
        }
        Event::PipelineCompleted { name } => format!(
            "{} Pipeline {} completed {}",
            CHECK,
            style(name).bold(),
            style("successfully").green()
        ),
        Event::PipelineErrored { name, error } => format!(
            "{} Pipeline {}: {}",
            CROSS,
            style(name).red(),
            style(error).dim()
        ),
        Event::StepStarted { name } => format!("  {} {}", SPINNER, style(name).cyan()),
        Event::StepCompleted { name } => format!("  {} {}", CHECK, style(name).green()),
        Event::StepErrored { name, error } => format!(
            "  {} {}: {}",
            CROSS,
            style(name).red(),
            style(error).dim()
        ),
    }
}
