//! CLI module for Clipdeck
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// Clipdeck video dashboard
///
/// Runs the dashboard's crop, trim, compress and mix operations from the
/// terminal: builds the canonical command, previews it on a truncated clip
/// or processes it at full fidelity, and saves the result.
#[derive(Parser)]
#[command(name = "clipdeck")]
#[command(about = "Clipdeck - dashboard video operations made simple")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Crop a region out of a video
    Crop(args::CropArgs),
    /// Trim a video between two timestamps (stream copy)
    Trim(args::TrimArgs),
    /// Re-encode a video with quality controls
    Compress(args::CompressArgs),
    /// Concatenate two or more videos in order
    Mix(args::MixArgs),
    /// Show or switch the persisted engine source
    Engine(args::EngineArgs),
}
