//! Eval command implementation.
//!
//! Evaluates a function and its gradient at one point.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use descent_core::Vec2;

use crate::cli::OutputFormat;
use crate::commands::{resolve_function, validate_coordinate};
use crate::output::{format_point, print_header, print_json, print_output, KeyValue};

/// Arguments for the eval command.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Built-in or registered function name
    #[arg(long, conflicts_with = "expr")]
    pub function: Option<String>,

    /// Expression in x and y, e.g. "x^2 + 3*sin(y)"
    #[arg(long)]
    pub expr: Option<String>,

    /// X coordinate
    #[arg(short, long, allow_hyphen_values = true)]
    pub x: f64,

    /// Y coordinate
    #[arg(short, long, allow_hyphen_values = true)]
    pub y: f64,
}

/// Evaluation result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalResult {
    pub function: String,
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub gradient_x: f64,
    pub gradient_y: f64,
    pub gradient_magnitude: f64,
}

/// Execute the eval command.
pub fn execute(args: EvalArgs, format: OutputFormat) -> Result<()> {
    let x = validate_coordinate("x", args.x)?;
    let y = validate_coordinate("y", args.y)?;
    let function = resolve_function(args.function.as_deref(), args.expr.as_deref())?;

    let value = function.value(x, y);
    let gradient = function.gradient(x, y);
    tracing::debug!(function = function.name(), x, y, value, "evaluated");

    let result = EvalResult {
        function: function.name().to_string(),
        x,
        y,
        value,
        gradient_x: gradient.x,
        gradient_y: gradient.y,
        gradient_magnitude: gradient.norm(),
    };

    match format {
        OutputFormat::Table => {
            print_header(&format!("{} at {}", result.function, format_point(Vec2::new(x, y), 4)));
            let rows = vec![
                KeyValue::from_f64("f(x, y)", result.value, 8),
                KeyValue::new("Gradient", format_point(gradient, 8)),
                KeyValue::from_f64("|Gradient|", result.gradient_magnitude, 8),
            ];
            print_output(&rows, format)?;
        }
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.serialize(&result)?;
            wtr.flush()?;
        }
        OutputFormat::Minimal => println!("{}", result.value),
    }

    Ok(())
}
