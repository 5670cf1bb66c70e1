//! Presets command implementation.
//!
//! Lists the standard run presets, or prints one as a config file body.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use descent_config::{ConfigManager, RunConfig};

use crate::cli::OutputFormat;
use crate::output::{format_float, format_point, print_header, print_json, print_output};

/// Arguments for the presets command.
#[derive(Args, Debug)]
pub struct PresetsArgs {
    /// Show one preset in full
    pub name: Option<String>,
}

/// Summary of one preset.
#[derive(Debug, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct PresetRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Function")]
    pub function: String,
    #[tabled(rename = "Start")]
    pub start: String,
    #[tabled(rename = "Learning Rate")]
    pub learning_rate: String,
    #[tabled(rename = "Momentum")]
    pub momentum: String,
    #[tabled(rename = "Description")]
    pub description: String,
}

impl From<&RunConfig> for PresetRow {
    fn from(run: &RunConfig) -> Self {
        let (learning_rate, momentum) = match &run.optimizer {
            Some(config) => (
                format_float(config.learning_rate, 4),
                format_float(config.momentum, 2),
            ),
            None => ("recommended".to_string(), "-".to_string()),
        };

        Self {
            name: run.name.clone(),
            function: run.function.clone(),
            start: format_point(run.start, 2),
            learning_rate,
            momentum,
            description: run.description.clone().unwrap_or_default(),
        }
    }
}

/// Execute the presets command.
pub fn execute(args: PresetsArgs, format: OutputFormat) -> Result<()> {
    let manager = ConfigManager::new();

    if let Some(name) = args.name {
        let preset = manager.get(&name)?;
        return match format {
            OutputFormat::Minimal => {
                println!("{}", preset.function);
                Ok(())
            }
            _ => print_json(&preset),
        };
    }

    let rows: Vec<PresetRow> = manager.list()?.iter().map(PresetRow::from).collect();

    match format {
        OutputFormat::Table => {
            print_header("Standard Presets");
            print_output(&rows, format)?;
        }
        OutputFormat::Json => print_json(&manager.list()?)?,
        OutputFormat::Csv => print_output(&rows, format)?,
        OutputFormat::Minimal => {
            for row in &rows {
                println!("{}", row.name);
            }
        }
    }

    Ok(())
}
