use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "clipmux")]
#[command(author, version, about = "Combine an audio track and a video into a social-media ready MP4")]
pub struct Cli {
    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Start {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Combine an audio file and a video file locally, without the server
    Combine {
        /// Audio input
        audio: String,

        /// Video input
        video: String,

        /// Output file
        output: String,

        /// Output preset (see `clipmux presets`)
        #[arg(long, default_value = "standard")]
        preset: String,

        /// Print the ffmpeg command instead of running it
        #[arg(long)]
        dry_run: bool,
    },

    /// List the available output presets
    Presets,

    /// Check that ffmpeg is available
    CheckTools,

    /// Validate a configuration file
    Validate {
        /// Config file to validate (uses --config if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
