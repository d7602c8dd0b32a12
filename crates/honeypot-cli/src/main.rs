use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "honeypot")]
#[command(about = "Honeypot CLI - scam detection and covert engagement", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.config/honeypot/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single message and print detection and extraction results
    Classify {
        /// Message text
        text: String,
    },
    /// Replay a scripted conversation through the engine
    Replay(commands::replay::ReplayArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Classify { text } => commands::classify::run(&config, &text)?,
        Commands::Replay(args) => commands::replay::run(config, args).await?,
    }

    Ok(())
}
