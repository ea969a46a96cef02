//! Fingerprint CLI - Database migrations and record exports.
//!
//! # Usage
//!
//! ```bash
//! # Create or update the fingerprints table
//! fp-cli migrate
//!
//! # Dump every record (newest first) as JSON
//! fp-cli export
//! fp-cli export --output fingerprints.json
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `export` - Write all stored records as a JSON array

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fp-cli")]
#[command(author, version, about = "Fingerprint collector CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Export stored fingerprints as JSON, newest first
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so `export` can be piped
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Export { output } => commands::export::run(output.as_deref()).await,
    }
}
