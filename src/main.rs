//! automerge CLI

mod cli;

use anstream::eprintln;
use clap::{Parser, Subcommand};
use cli::style::Stylize;
use pr_automerge::config::{AppConfig, load_app_config};
use pr_automerge::error::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "automerge",
    version,
    about = "Automatic merge decisions for GitHub pull requests"
)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// GitHub Enterprise host (overrides the config file)
    #[arg(long, global = true)]
    host: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a pull request and merge it if it is ready
    Evaluate {
        /// Repository as owner/repo
        repo: String,
        /// Pull request number
        number: u64,
    },
    /// Route a webhook event and evaluate the pull requests it affects
    Event {
        /// Event name, as in the X-GitHub-Event header
        #[arg(long)]
        name: String,
        /// JSON payload file (stdin if omitted)
        #[arg(long)]
        payload: Option<PathBuf>,
    },
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_app_config(cli.config.as_deref())?;
    if cli.host.is_some() {
        config.host = cli.host;
    }
    init_logging(&config);

    match cli.command {
        Commands::Evaluate { repo, number } => cli::run_evaluate(config, &repo, number).await,
        Commands::Event { name, payload } => {
            cli::run_event(config, &name, payload.as_deref()).await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".failure());
            ExitCode::FAILURE
        }
    }
}
