use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tray indicator that keeps its panel entry synchronized with the desktop
/// shell's panel service.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Opt {
    /// Write out debug logs.
    #[arg(long = "debug", global = true)]
    pub log_debug: bool,

    #[command(subcommand)]
    pub action: Action,
}

#[derive(Subcommand, Debug)]
pub enum Action {
    /// Show the indicator and keep its entry in sync with the panel service.
    #[command(name = "run")]
    Run {
        /// Bound on the SyncOne round-trip, in seconds.
        #[arg(long, default_value_t = 5)]
        sync_timeout: u64,

        /// Directory the indicator icon is loaded from. Defaults to the
        /// current directory.
        #[arg(long)]
        icon_dir: Option<PathBuf>,
    },

    /// Run a stand-in panel service that announces and activates one entry.
    #[command(name = "serve")]
    Serve {
        /// Seconds between simulated entry activations.
        #[arg(long, default_value_t = 10)]
        activate_every: u64,
    },
}

impl Opt {
    pub fn from_env() -> Self {
        Self::parse()
    }
}
