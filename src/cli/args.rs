//! Command-line argument definitions

use clap::{Args, Subcommand};

/// Arguments for the crop command
#[derive(Args, Debug)]
pub struct CropArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: String,

    /// Crop width in pixels
    #[arg(long)]
    pub width: u32,

    /// Crop height in pixels
    #[arg(long)]
    pub height: u32,

    /// Horizontal offset of the crop region
    #[arg(short = 'x', long, default_value = "0")]
    pub x_offset: u32,

    /// Vertical offset of the crop region
    #[arg(short = 'y', long, default_value = "0")]
    pub y_offset: u32,

    /// Run a 3-second preview instead of the full process
    #[arg(long)]
    pub preview: bool,

    /// Output file path (default: timestamp-suffixed name)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override the generated command text verbatim
    #[arg(long)]
    pub command: Option<String>,

    /// Print the command without executing it
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the trim command
#[derive(Args, Debug)]
pub struct TrimArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: String,

    /// Start time (HH:MM:SS)
    #[arg(short, long)]
    pub start: String,

    /// End time (HH:MM:SS)
    #[arg(short, long)]
    pub end: String,

    /// Run a 3-second preview instead of the full process
    #[arg(long)]
    pub preview: bool,

    /// Output file path (default: timestamp-suffixed name)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override the generated command text verbatim
    #[arg(long)]
    pub command: Option<String>,

    /// Print the command without executing it
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the compress command
#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: String,

    /// Constant Rate Factor (0-51)
    #[arg(long, default_value = "23")]
    pub crf: u8,

    /// Encoding preset
    #[arg(long, default_value = "medium")]
    pub preset: String,

    /// Run a 3-second preview instead of the full process
    #[arg(long)]
    pub preview: bool,

    /// Output file path (default: timestamp-suffixed name)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override the generated command text verbatim
    #[arg(long)]
    pub command: Option<String>,

    /// Print the command without executing it
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the mix command
#[derive(Args, Debug)]
pub struct MixArgs {
    /// Input video file paths, concatenated in the order given (minimum 2)
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<String>,

    /// Run a 3-second preview instead of the full process
    #[arg(long)]
    pub preview: bool,

    /// Output file path (default: timestamp-suffixed name)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override the generated command text verbatim
    #[arg(long)]
    pub command: Option<String>,

    /// Print the command without executing it
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the engine command
#[derive(Args, Debug)]
pub struct EngineArgs {
    #[command(subcommand)]
    pub action: EngineAction,
}

/// Engine source actions
#[derive(Subcommand, Debug)]
pub enum EngineAction {
    /// Print the persisted engine source
    Show {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Use the remote content-delivery origin (takes effect on next run)
    UseRemote {
        /// Override the content-delivery base URL
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Use a local engine runtime (takes effect on next run)
    UseLocal {
        /// Path to the local runtime binary
        #[arg(long)]
        path: String,
    },
}
