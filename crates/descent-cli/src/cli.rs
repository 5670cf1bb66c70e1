//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{EvalArgs, FunctionsArgs, PresetsArgs, RunArgs};

/// Descent - Gradient descent optimization playground
#[derive(Parser)]
#[command(name = "descent")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log optimizer progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List the built-in objective functions
    Functions(FunctionsArgs),

    /// Evaluate a function and its gradient at a point
    Eval(EvalArgs),

    /// Run gradient descent from a preset, a config file or flags
    Run(RunArgs),

    /// List the standard run presets
    Presets(PresetsArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the value)
    Minimal,
}
