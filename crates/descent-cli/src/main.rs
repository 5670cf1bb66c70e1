//! Descent CLI - Command-line front end for the gradient descent playground.
//!
//! # Usage
//!
//! ```bash
//! # List the built-in surfaces
//! descent functions
//! descent functions --intrinsics
//!
//! # Evaluate a surface and its gradient
//! descent eval --function rosenbrock --x 0.5 --y 0.5
//! descent eval --expr "sin(x) * cos(y)" --x 1 --y 2
//!
//! # Run a standard preset and export the run
//! descent run --preset rosenbrock-momentum --export run.json
//!
//! # Run from flags
//! descent run --function himmelblau --x 0 --y 0 --learning-rate 0.01 --momentum 0.5
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    // Set up output format
    let format = cli.format;

    // Execute command
    match cli.command {
        Commands::Functions(args) => commands::functions::execute(args, format)?,
        Commands::Eval(args) => commands::eval::execute(args, format)?,
        Commands::Run(args) => commands::run::execute(args, format)?,
        Commands::Presets(args) => commands::presets::execute(args, format)?,
    }

    Ok(())
}

/// Logs go to stderr so tables and JSON on stdout stay machine-readable.
fn init_logging(verbose: bool, quiet: bool) {
    let default_directive = if verbose {
        "descent=debug,descent_math=debug,descent_config=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
