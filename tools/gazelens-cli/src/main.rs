//! GazeLens CLI: command-line interface for reading and conditioning gaze.
//!
//! Usage:
//!   gazelens read              Read the current gaze sample once
//!   gazelens monitor           Print raw coordinates continuously
//!   gazelens status            Check whether the producer is alive
//!   gazelens refresh           Touch the channel to nudge the producer
//!   gazelens track [OPTIONS]   Run the conditioning pipeline live
//!   gazelens config            Show or initialise configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gazelens_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "gazelens",
    about = "Live eye-gaze conditioning for on-screen overlays",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Gaze channel path (overrides config)
    #[arg(long, global = true)]
    channel: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the current gaze sample once
    Read,

    /// Print raw gaze coordinates continuously, updating in place
    Monitor {
        /// Poll interval in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Check whether the gaze producer is refreshing the channel
    Status {
        /// Freshness threshold in seconds
        #[arg(long)]
        freshness_secs: Option<f64>,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Bump the channel's modification time to nudge the producer
    Refresh,

    /// Run the conditioning pipeline and print stable gaze updates
    Track {
        /// History window size (H)
        #[arg(long)]
        window: Option<usize>,

        /// Exponential smoothing factor (alpha, 0 < alpha <= 1)
        #[arg(long)]
        alpha: Option<f64>,

        /// Movement gate threshold (T)
        #[arg(long)]
        gate: Option<f64>,

        /// Poll interval in milliseconds
        #[arg(long)]
        poll_ms: Option<u64>,

        /// JSON file with an overlay layout to place pointer and focus region
        #[arg(long)]
        layout: Option<PathBuf>,

        /// Print one JSON object per update
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,

        /// Overwrite an existing config file with --init
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    gazelens_common::logging::init_logging(&config.logging);

    if let Some(channel) = cli.channel {
        config.channel.path = channel;
    }

    match cli.command {
        Commands::Read => commands::read::run(&config),
        Commands::Monitor { interval_ms } => {
            if let Some(ms) = interval_ms {
                config.channel.poll_interval_ms = ms;
            }
            commands::monitor::run(&config).await
        }
        Commands::Status {
            freshness_secs,
            json,
        } => {
            if let Some(secs) = freshness_secs {
                config.channel.freshness_secs = secs;
            }
            commands::status::run(&config, json)
        }
        Commands::Refresh => commands::refresh::run(&config),
        Commands::Track {
            window,
            alpha,
            gate,
            poll_ms,
            layout,
            json,
        } => {
            if let Some(window) = window {
                config.conditioning.window_size = window;
            }
            if let Some(alpha) = alpha {
                config.conditioning.smoothing_factor = alpha;
            }
            if let Some(gate) = gate {
                config.conditioning.gate_threshold = gate;
            }
            if let Some(ms) = poll_ms {
                config.channel.poll_interval_ms = ms;
            }
            commands::track::run(&config, layout, json).await
        }
        Commands::Config { init, force } => commands::config::run(&config, init, force),
    }
}
