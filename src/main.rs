//! Clipdeck CLI
//!
//! Terminal front end for the dashboard's orchestration core.
//!
//! # Usage
//!
//! ```bash
//! clipdeck trim --input demo.mp4 --start 00:00:05 --end 00:00:10
//! clipdeck crop --input demo.mp4 --width 1280 --height 720 --preview
//! clipdeck mix --input a.mp4 --input b.mp4
//! clipdeck engine show --json
//! ```

use anyhow::Result;
use clap::Parser;

use clipdeck::cli::{commands, Cli, Commands};

/// Main entry point for the Clipdeck CLI
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let cli = Cli::parse();

    // Execute the requested command
    match cli.command {
        Commands::Crop(args) => commands::execute_crop(args).await?,
        Commands::Trim(args) => commands::execute_trim(args).await?,
        Commands::Compress(args) => commands::execute_compress(args).await?,
        Commands::Mix(args) => commands::execute_mix(args).await?,
        Commands::Engine(args) => commands::execute_engine(args)?,
    }

    Ok(())
}
