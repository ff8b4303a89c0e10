//! Command-line argument definitions (§10.4), backed by `clap`'s derive API.

use std::path::PathBuf;

use clap::Parser;

/// Fixed-path battery-swap scheduling optimizer for electric marine vessels.
#[derive(Debug, Parser)]
#[command(name = "swap-route-optimizer", version, about)]
pub struct Cli {
    /// Load a route from a TOML configuration file.
    #[arg(long, conflicts_with = "preset")]
    pub route: Option<PathBuf>,

    /// Use a built-in named preset instead of a file (see `--list-presets`).
    #[arg(long)]
    pub preset: Option<String>,

    /// Print the available preset names and exit.
    #[arg(long)]
    pub list_presets: bool,

    /// Increase log verbosity (`-v` for debug, `-vv` for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
