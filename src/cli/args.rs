//! Command-line arguments

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::completions::CompletionsArgs;
use crate::cli::commands::convert::ConvertArgs;
use crate::cli::commands::frame::FrameArgs;
use crate::cli::commands::palette::PaletteArgs;
use crate::cli::commands::request::RequestArgs;
use crate::cli::commands::tendons::TendonsArgs;
use crate::cli::commands::view::ViewArgs;
use crate::cli::commands::watch::WatchArgs;

/// Tendon Design Toolkit - inspect tendon-driven continuum robot computations
#[derive(Parser, Debug)]
#[command(name = "tendo", version, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub format: OutputFormat,

    /// Extra config file (overrides the user config; falls back to TENDO_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table on a terminal, machine-readable otherwise
    #[default]
    Auto,
    /// Human-readable table
    Table,
    /// Pretty JSON
    Json,
    /// YAML
    Yaml,
    /// Tab-separated values
    Tsv,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a value between display units and SI
    Convert(ConvertArgs),

    /// Compute the bounding frame and camera distances for a result
    Frame(FrameArgs),

    /// Show tendon actuation commands
    Tendons(TendonsArgs),

    /// Draw the robot backbone in the terminal
    View(ViewArgs),

    /// Convert a design file into an SI request body
    Request(RequestArgs),

    /// List the tendon color palette
    Palette(PaletteArgs),

    /// Re-frame a result file whenever it changes
    Watch(WatchArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
