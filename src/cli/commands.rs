//! CLI command definitions

use clap::Args;
use crate::core::StepKind;

/// Run a single pipeline
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to pipeline YAML file
    #[arg(short, long)]
    pub file: String,
}

/// Run every deployment of a cluster
#[derive(Debug, Args, Clone)]
pub struct DeployCommand {
    /// Path to cluster YAML file
    #[arg(short, long)]
    pub file: String,

    /// Show a progress bar instead of event lines
    #[arg(long)]
    pub progress: bool,
}

/// Validate a pipeline or cluster configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to YAML file
    #[arg(short, long)]
    pub file: String,

    /// Treat the file as a cluster configuration
    #[arg(long)]
    pub cluster: bool,
}

/// List built-in node types
#[derive(Debug, Args, Clone)]
pub struct NodesCommand {
    /// Only list node types of this kind
    #[arg(long, value_enum)]
    pub kind: Option<StepKindArg>,
}

/// Step kind argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StepKindArg {
    Source,
    Processor,
    Sink,
    Bidirectional,
}

impl From<StepKindArg> for StepKind {
    fn from(arg: StepKindArg) -> Self {
        match arg {
            StepKindArg::Source => StepKind::Source,
            StepKindArg::Processor => StepKind::Processor,
            StepKindArg::Sink => StepKind::Sink,
            StepKindArg::Bidirectional => StepKind::Bidirectional,
        }
    }
}
