//! Command-Line Interface

use clap::{Parser, Subcommand};
use std::path::{Component, Path, PathBuf};

/// Joint Angles - Lower-limb joint angle time series from pose landmarks
#[derive(Parser, Debug)]
#[command(name = "joint-angles")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute joint angles from a JSON Lines landmark file and record a session
    Process {
        /// Input landmark file (one JSON frame per line)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the session (defaults to the sessions directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Session name (timestamped if not provided)
        #[arg(short, long)]
        name: Option<String>,

        /// Only compute live angles, do not record
        #[arg(long)]
        no_record: bool,
    },

    /// Rebuild a report from a saved recording or angle log
    Report {
        /// Recording JSON or angle log file
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the report files
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List saved sessions
    List {
        /// Show detailed information
        #[arg(short, long)]
        detailed: bool,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Delete a saved session
    Delete {
        /// Session name to delete
        name: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "live.window_seconds")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "recording.throttle_interval_secs")
        key: String,

        /// Value to set
        value: String,
    },

    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Directory holding one subdirectory per saved session
    pub fn sessions_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".joint_angles").join("sessions"))
            .unwrap_or_else(|| PathBuf::from("sessions"))
    }

    /// Directory of a named session, or `None` if the name would resolve
    /// outside [`Cli::sessions_dir`]
    pub fn session_dir(name: &str) -> Option<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) if !name.contains(['/', '\\']) => {
                Some(Self::sessions_dir().join(part))
            }
            _ => None,
        }
    }
}
