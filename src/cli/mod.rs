//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{DeployCommand, NodesCommand, RunCommand, ValidateCommand};
use std::ffi::OsString;

/// Run pipelines and clusters of nodes
#[derive(Debug, Parser, Clone)]
#[command(name = "nodeflow")]
#[command(author = "Nodeflow Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Run pipelines and clusters of nodes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print events and listings as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Do not print lifecycle events
    #[arg(short, long, global = true)]
    pub quiet_events: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run a pipeline
    Run(RunCommand),

    /// Run a cluster
    Deploy(DeployCommand),

    /// Validate a pipeline or cluster configuration
    Validate(ValidateCommand),

    /// List built-in node types
    Nodes(NodesCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
