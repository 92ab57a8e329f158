//! eventctl - describe eventing triggers and the sources that feed them

mod cli;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cli::{ConfigSubcommand, DescribeArgs};
use eventctl::config::ConfigLoader;

/// Describe eventing triggers and the event sources that feed them
#[derive(Parser, Debug)]
#[command(name = "eventctl")]
#[command(about = "Describe eventing triggers and the event sources that feed them", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Manage eventing triggers
    Triggers {
        #[command(subcommand)]
        subcommand: TriggersSubcommand,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Show version information
    Version,
}

/// Trigger subcommands
#[derive(Subcommand, Debug)]
enum TriggersSubcommand {
    /// Get details about a given trigger
    Describe(DescribeArgs),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = cli::init_logging(args.debug, args.log_file.as_deref()) {
        eprintln!("Warning: {:#}", e);
    }

    if let Err(e) = run(args.command).await {
        eprintln!("ERROR: (eventctl) {:#}", e);
        if let Some(hint) = cli::describe_failure_hint(&e) {
            eprintln!("{}", hint);
        }
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Triggers {
            subcommand: TriggersSubcommand::Describe(describe),
        } => {
            let config = ConfigLoader::load().context("Failed to load configuration")?;
            tracing::debug!(
                "Configuration loaded: platform={}, defaultNamespace={}",
                config.platform,
                config.default_namespace
            );
            cli::run_describe(describe, &config).await
        }
        Command::Config { subcommand } => cli::handle_config_command(subcommand),
        Command::Version => {
            cli::display_version();
            Ok(())
        }
    }
}
