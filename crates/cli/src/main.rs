//! Cesantías Agent CLI
//!
//! Main entry point for the cesantias command-line tool.
//! Answers severance questions from the records file or the knowledge corpus.

mod commands;

use cesantias_agent::SeveranceAgent;
use cesantias_core::{config::AppConfig, logging, AppResult};
use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, DemoCommand, StatsCommand};
use std::path::PathBuf;

/// Cesantías Agent CLI - answers questions about employee severance records
#[derive(Parser, Debug)]
#[command(name = "cesantias")]
#[command(about = "Answers questions about employee severance records", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "CESANTIAS_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "CESANTIAS_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the severance records CSV
    #[arg(short, long, global = true, env = "CESANTIAS_DATA")]
    data: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a single question
    Ask(AskCommand),

    /// Show aggregate statistics over the records
    Stats(StatsCommand),

    /// Run the reference questions
    Demo(DemoCommand),

    /// Answer questions read line by line from stdin
    Chat(ChatCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Workspace and config file decide which YAML is read, so they go first
    let config = AppConfig::load(cli.workspace, cli.config)?;

    // Apply CLI overrides
    let config = config.with_overrides(cli.data, cli.log_level, cli.verbose, cli.no_color);
    config.validate()?;

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Cesantias Agent CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Data file: {:?}", config.resolved_data_file());

    let agent = SeveranceAgent::from_config(&config)?;

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Stats(_) => "stats",
        Commands::Demo(_) => "demo",
        Commands::Chat(_) => "chat",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&agent).await,
        Commands::Stats(cmd) => cmd.execute(&agent).await,
        Commands::Demo(cmd) => cmd.execute(&agent).await,
        Commands::Chat(cmd) => cmd.execute(&agent).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) if e.is_client_error() => tracing::warn!("Rejected input: {}", e),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
