//! groundcrew CLI — the main entry point.
//!
//! Commands:
//! - `chat`  — Interactive conversation loop
//! - `ask`   — Answer a single question and exit
//! - `serve` — Start the HTTP gateway

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "groundcrew",
    about = "groundcrew — a context-grounded conversational assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use an explicit config file instead of ~/.groundcrew/config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat interactively with the assistant
    Chat,

    /// Answer a single question and exit
    Ask {
        /// The question to answer
        question: String,
    },

    /// Start the HTTP gateway server
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Chat => commands::chat::run(cli.config).await?,
        Commands::Ask { question } => commands::ask::run(cli.config, &question).await?,
        Commands::Serve { port } => commands::serve::run(cli.config, port).await?,
    }

    Ok(())
}
