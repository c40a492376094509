//! Lendpool CLI - Main entry point

use clap::{Parser, Subcommand};
use lendpool_cli::commands;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lendpool")]
#[command(about = "Lendpool - Single-collateral lending ledger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a pool configuration and print the derived parameters
    CheckConfig {
        /// Pool configuration (JSON)
        config: PathBuf,
    },

    /// Replay a script against a fresh pool
    Simulate {
        /// Pool configuration (JSON)
        #[arg(long)]
        config: PathBuf,
        /// Simulation script (JSON)
        #[arg(long)]
        script: PathBuf,
        /// Directory for the JSONL event journal
        #[arg(long)]
        journal: Option<PathBuf>,
        /// Print the final report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::CheckConfig { config } => {
            commands::check_config(&config)?;
        }

        Commands::Simulate {
            config,
            script,
            journal,
            json,
        } => {
            let report = commands::simulate(&config, &script, journal.as_deref()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            if report.rejected() > 0 {
                tracing::info!(rejected = report.rejected(), "Some steps were rejected");
            }
        }
    }

    Ok(())
}
