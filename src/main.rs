use anyhow::{Context, Result};
use nodeflow::cli::commands::{DeployCommand, NodesCommand, RunCommand, ValidateCommand};
use nodeflow::cli::output::*;
use nodeflow::cli::{Cli, Command};
use nodeflow::core::config::{ClusterConfig, PipelineConfig};
use nodeflow::core::StepKind;
use nodeflow::execution::{EventChannel, Orchestrator, PipelineExecutor};
use nodeflow::node::NodeConfig;
use nodeflow::plugin::{ConsolePlugin, LogPlugin, OutputFormat, PluginDispatcher, ProgressPlugin};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    match &cli.command {
        Command::Run(cmd) => run_pipeline(cmd, &cli).await?,
        Command::Deploy(cmd) => deploy_cluster(cmd, &cli).await?,
        Command::Validate(cmd) => validate_config(cmd, &cli)?,
        Command::Nodes(cmd) => list_nodes(cmd, &cli)?,
    }

    Ok(())
}

/// Plugins shared by `run` and `deploy`
fn base_dispatcher(cli: &Cli, console: bool) -> PluginDispatcher {
    let mut dispatcher = PluginDispatcher::new();
    if console && !cli.quiet_events {
        let format = if cli.json { OutputFormat::Json } else { OutputFormat::Pretty };
        dispatcher.register(ConsolePlugin::new(format));
    }
    if cli.verbose {
        dispatcher.register(LogPlugin);
    }
    dispatcher
}

async fn run_pipeline(cmd: &RunCommand, cli: &Cli) -> Result<()> {
    let config = PipelineConfig::from_file(&cmd.file)
        .context("Failed to load pipeline config")?;
    let pipeline = config.to_pipeline()?;

    if !cli.json {
        println!("{} Loaded pipeline: {}", INFO, style(&pipeline.name).bold());
    }

    let channel = EventChannel::new();
    let dispatcher = base_dispatcher(cli, true).start(channel.clone());

    let result = PipelineExecutor::new().execute(&pipeline, &channel).await;
    dispatcher.shutdown().await;

    if let Err(e) = result {
        error!("{}", e);
        eprintln!(
            "\n{} {} {}: {}",
            CROSS,
            style(&pipeline.name).bold(),
            style("failed").red(),
            e
        );
        std::process::exit(1);
    }

    Ok(())
}

async fn deploy_cluster(cmd: &DeployCommand, cli: &Cli) -> Result<()> {
    let config = ClusterConfig::from_file(&cmd.file)
        .context("Failed to load cluster config")?;
    let cluster = config.to_cluster()?;

    if !cli.json {
        println!(
            "{} Loaded cluster: {} ({} deployments)",
            INFO,
            style(&cluster.name).bold(),
            style(cluster.deployments().len()).cyan()
        );
    }

    let channel = EventChannel::new();
    let mut dispatcher = base_dispatcher(cli, !cmd.progress);
    if cmd.progress {
        dispatcher.register(ProgressPlugin::new(cluster.deployments().len()));
    }
    let dispatcher = dispatcher.start(channel.clone());

    // Deployment failures surface only as events; the run itself cannot fail.
    if let Err(never) = Orchestrator::new().run(&cluster, &channel).await {
        match never {}
    }
    dispatcher.shutdown().await;

    Ok(())
}

fn validate_config(cmd: &ValidateCommand, cli: &Cli) -> Result<()> {
    println!("{} Validating {}...", INFO, style(&cmd.file).dim());

    let outcome = if cmd.cluster {
        ClusterConfig::from_file(&cmd.file).and_then(|config| {
            println!("{} Cluster configuration is valid!", CHECK);
            println!("  Name: {}", style(&config.name).bold());
            println!("  Deployments: {}", style(config.deployments.len()).cyan());
            for deployment in &config.deployments {
                println!(
                    "    {} ({} steps)",
                    style(&deployment.name).bold(),
                    deployment.pipeline.steps.len()
                );
            }
            if cli.json {
                println!("\n{}", serde_json::to_string_pretty(&config)?);
            }
            Ok(())
        })
    } else {
        PipelineConfig::from_file(&cmd.file).and_then(|config| {
            println!("{} Pipeline configuration is valid!", CHECK);
            println!("  Name: {}", style(&config.name).bold());
            for step in &config.steps {
                println!(
                    "    {} {} ({})",
                    format_step_kind(step.node.kind()),
                    style(&step.name).bold(),
                    style(step.node.type_name()).dim()
                );
            }
            if cli.json {
                println!("\n{}", serde_json::to_string_pretty(&config)?);
            }
            Ok(())
        })
    };

    if let Err(e) = outcome {
        println!("{} Validation failed:", CROSS);
        println!("  {}", style(format!("{:#}", e)).red());
        std::process::exit(1);
    }

    Ok(())
}

fn list_nodes(cmd: &NodesCommand, cli: &Cli) -> Result<()> {
    let filter: Option<StepKind> = cmd.kind.map(Into::into);
    let nodes: Vec<_> = NodeConfig::catalog()
        .into_iter()
        .filter(|info| filter.map_or(true, |kind| info.kind == kind))
        .collect();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&nodes)?);
        return Ok(());
    }

    if nodes.is_empty() {
        println!("{} No node types match", WARN);
        return Ok(());
    }

    println!("{} Built-in node types:", INFO);
    for info in &nodes {
        println!(
            "  {:<12} {:<24} {}",
            style(info.name).bold(),
            format_step_kind(info.kind),
            style(info.description).dim()
        );
    }

    Ok(())
}
