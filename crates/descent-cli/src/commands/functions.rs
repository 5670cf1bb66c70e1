//! Functions command implementation.
//!
//! Lists the built-in objective functions, or the functions callable
//! from an expression.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use descent_core::ObjectiveFunction;
use descent_math::expression::CompiledExpression;
use descent_math::FunctionRegistry;

use crate::cli::OutputFormat;
use crate::output::{format_float, print_header, print_json, print_output};

/// Arguments for the functions command.
#[derive(Args, Debug)]
pub struct FunctionsArgs {
    /// Include descriptions
    #[arg(short, long)]
    pub long: bool,

    /// List the functions callable from an expression instead
    #[arg(long, conflicts_with = "long")]
    pub intrinsics: bool,
}

/// One built-in function.
#[derive(Debug, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct FunctionRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Bounds")]
    pub bounds: String,
    #[tabled(rename = "Global Minimum")]
    pub minimum: String,
    #[tabled(rename = "Learning Rate")]
    pub learning_rate: f64,
    #[tabled(skip)]
    pub description: String,
}

impl FunctionRow {
    fn from_function(function: &dyn ObjectiveFunction) -> Self {
        let bounds = function.bounds();
        let minimum = function.global_minimum().map_or_else(
            || "none".to_string(),
            |m| {
                format!(
                    "f({}, {}) = {}",
                    format_float(m.x, 4),
                    format_float(m.y, 4),
                    format_float(m.value, 4)
                )
            },
        );

        Self {
            name: function.name().to_string(),
            bounds: format!("[{}, {}]", bounds.min, bounds.max),
            minimum,
            learning_rate: function.recommended_learning_rate(),
            description: function.description().to_string(),
        }
    }
}

/// Execute the functions command.
pub fn execute(args: FunctionsArgs, format: OutputFormat) -> Result<()> {
    if args.intrinsics {
        return list_intrinsics(format);
    }

    let registry = FunctionRegistry::new();
    let rows: Vec<FunctionRow> = registry
        .iter()
        .map(|f| FunctionRow::from_function(f.as_ref()))
        .collect();

    match format {
        OutputFormat::Table => {
            print_header("Built-in Functions");
            print_output(&rows, format)?;
            if args.long {
                for row in &rows {
                    println!("  {:<18} {}", row.name, row.description);
                }
            }
        }
        OutputFormat::Minimal => {
            for row in &rows {
                println!("{}", row.name);
            }
        }
        OutputFormat::Json | OutputFormat::Csv => print_output(&rows, format)?,
    }

    Ok(())
}

fn list_intrinsics(format: OutputFormat) -> Result<()> {
    let names = CompiledExpression::function_names();

    match format {
        OutputFormat::Table => {
            print_header("Expression Functions");
            println!("  {}", names.join(", "));
        }
        OutputFormat::Json => print_json(&names)?,
        OutputFormat::Csv | OutputFormat::Minimal => {
            for name in names {
                println!("{name}");
            }
        }
    }

    Ok(())
}
