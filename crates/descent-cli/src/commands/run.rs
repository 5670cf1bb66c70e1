//! Run command implementation.
//!
//! Drives an optimizer in fixed-size chunks, the way an animation loop
//! would, then reports the trail and run statistics.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use descent_config::{load_run_config, ConfigManager, RunConfig};
use descent_core::Vec2;
use descent_math::{FunctionRegistry, Optimizer, Phase, Snapshot, Statistics};

use crate::cli::OutputFormat;
use crate::commands::{validate_count, EXPRESSION_NAME};
use crate::error::CliError;
use crate::output::{
    format_float, format_point, print_header, print_info, print_json, print_output,
    print_success, print_warning, KeyValue,
};

/// Rows shown in the trail when `--every` is not given.
const DEFAULT_TRAIL_ROWS: usize = 20;

/// Arguments for the run command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Standard or registered preset name
    #[arg(short, long, conflicts_with = "config")]
    pub preset: Option<String>,

    /// Run configuration file (.json or .toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Built-in function name
    #[arg(long, conflicts_with = "expr")]
    pub function: Option<String>,

    /// Expression in x and y
    #[arg(long)]
    pub expr: Option<String>,

    /// Start X coordinate
    #[arg(short, long, allow_hyphen_values = true)]
    pub x: Option<f64>,

    /// Start Y coordinate
    #[arg(short, long, allow_hyphen_values = true)]
    pub y: Option<f64>,

    /// Base learning rate
    #[arg(short, long)]
    pub learning_rate: Option<f64>,

    /// Iteration ceiling
    #[arg(short, long)]
    pub max_iterations: Option<u32>,

    /// Gradient-magnitude convergence threshold
    #[arg(short, long)]
    pub tolerance: Option<f64>,

    /// Momentum coefficient in [0, 1)
    #[arg(long)]
    pub momentum: Option<f64>,

    /// Decay the learning rate every iteration
    #[arg(long)]
    pub adaptive: bool,

    /// Decay factor in (0, 1]; implies --adaptive
    #[arg(long)]
    pub decay: Option<f64>,

    /// Steps per tick (defaults to the configuration's stepsPerTick)
    #[arg(long)]
    pub chunk: Option<usize>,

    /// Print every Nth iteration of the trail
    #[arg(long)]
    pub every: Option<usize>,

    /// Write the export bundle to this file as JSON
    #[arg(short, long)]
    pub export: Option<PathBuf>,
}

/// One row of the printed trail.
#[derive(Debug, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct TrailRow {
    #[tabled(rename = "Iter")]
    pub iteration: u32,
    #[tabled(rename = "X", display_with = "display_float")]
    pub x: f64,
    #[tabled(rename = "Y", display_with = "display_float")]
    pub y: f64,
    #[tabled(rename = "f(x, y)", display_with = "display_float")]
    pub value: f64,
    #[tabled(rename = "|Gradient|", display_with = "display_float")]
    pub gradient_magnitude: f64,
    #[tabled(rename = "LR", display_with = "display_float")]
    pub learning_rate: f64,
}

fn display_float(value: &f64) -> String {
    format_float(*value, 6)
}

impl From<&Snapshot> for TrailRow {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            iteration: snapshot.iteration,
            x: snapshot.position.x,
            y: snapshot.position.y,
            value: snapshot.function_value,
            gradient_magnitude: snapshot.gradient_magnitude,
            learning_rate: snapshot.learning_rate,
        }
    }
}

/// JSON report of a finished run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunReport<'a> {
    name: &'a str,
    function: &'a str,
    phase: Phase,
    ticks: usize,
    trail: Vec<&'a Snapshot>,
    statistics: Option<Statistics>,
}

/// Execute the run command.
pub fn execute(args: RunArgs, format: OutputFormat) -> Result<()> {
    let registry = FunctionRegistry::new();
    let run = resolve_run_config(&args, &registry)?;
    let mut optimizer = run.build_with(&registry)?;

    let chunk = run.steps_per_tick;
    let ticks = drive(&mut optimizer, chunk)?;
    tracing::info!(
        run = %run.name,
        phase = %optimizer.phase(),
        iterations = optimizer.state().iteration,
        ticks,
        "run finished"
    );

    let every = match args.every {
        Some(every) => validate_count("every", every)?,
        None => (optimizer.history().len() / DEFAULT_TRAIL_ROWS).max(1),
    };
    let trail = sample_trail(optimizer.history(), every);

    match format {
        OutputFormat::Table => print_table_report(&run, &optimizer, &trail, ticks, chunk)?,
        OutputFormat::Json => print_json(&RunReport {
            name: &run.name,
            function: optimizer.function().name(),
            phase: optimizer.phase(),
            ticks,
            trail: trail.clone(),
            statistics: optimizer.statistics(),
        })?,
        OutputFormat::Csv => {
            let rows: Vec<TrailRow> = trail.iter().map(|s| TrailRow::from(*s)).collect();
            print_output(&rows, format)?;
        }
        OutputFormat::Minimal => {
            let state = optimizer.state();
            println!(
                "{} {} {}",
                state.position.x,
                state.position.y,
                optimizer.function().value_at(state.position)
            );
        }
    }

    if optimizer.phase() == Phase::Exhausted {
        let last_finite = optimizer.history().last().map_or(true, Snapshot::is_finite);
        if last_finite {
            print_warning(&format!(
                "Stopped at the {}-iteration ceiling without converging",
                optimizer.config().max_iterations
            ));
        } else {
            print_warning("Run diverged: non-finite values in the trail");
        }
    }

    if let Some(path) = &args.export {
        let json = optimizer.export_data().to_json_pretty()?;
        std::fs::write(path, json).map_err(CliError::from)?;
        tracing::debug!(path = %path.display(), "export written");
        if format == OutputFormat::Table {
            print_success(&format!("Exported run to {}", path.display()));
        }
    }

    Ok(())
}

/// Builds the run from a preset, a file or flags, with flags overriding.
fn resolve_run_config(args: &RunArgs, registry: &FunctionRegistry) -> Result<RunConfig> {
    let mut run = if let Some(name) = &args.preset {
        ConfigManager::new().get(name)?
    } else if let Some(path) = &args.config {
        load_run_config(path)?
    } else {
        let (Some(x), Some(y)) = (args.x, args.y) else {
            return Err(CliError::MissingArgument("--x and --y (or --preset/--config)".into()).into());
        };
        match (&args.function, &args.expr) {
            (Some(function), _) => RunConfig::new("cli", function.as_str(), x, y),
            (None, Some(_)) => RunConfig::new("cli", EXPRESSION_NAME, x, y),
            (None, None) => {
                return Err(CliError::MissingArgument(
                    "--function or --expr (or --preset/--config)".into(),
                )
                .into())
            }
        }
    };

    if let Some(function) = &args.function {
        run.function.clone_from(function);
        run.expression = None;
    }
    if let Some(expression) = &args.expr {
        run.function = EXPRESSION_NAME.to_string();
        run.expression = Some(expression.clone());
    }
    if let Some(x) = args.x {
        run.start.x = x;
    }
    if let Some(y) = args.y {
        run.start.y = y;
    }
    if let Some(chunk) = args.chunk {
        run.steps_per_tick = validate_count("chunk", chunk)?;
    }

    // Resolve first so flag overrides start from the function's own rate
    let function = run.resolve_function(registry)?;
    let mut config = run.optimizer_config(function.as_ref());
    if let Some(learning_rate) = args.learning_rate {
        config = config.with_learning_rate(learning_rate);
    }
    if let Some(max_iterations) = args.max_iterations {
        config = config.with_max_iterations(max_iterations);
    }
    if let Some(tolerance) = args.tolerance {
        config = config.with_tolerance(tolerance);
    }
    if let Some(momentum) = args.momentum {
        config = config.with_momentum(momentum);
    }
    if args.adaptive {
        config = config.with_adaptive_learning_rate(true);
    }
    if let Some(decay) = args.decay {
        config = config.with_decay(decay);
    }
    run.optimizer = Some(config);

    Ok(run)
}

/// Steps in chunks until the run converges or exhausts. Returns the tick count.
fn drive(optimizer: &mut Optimizer, chunk: usize) -> Result<usize> {
    let mut ticks = 0;
    while !optimizer.phase().is_terminal() {
        let batch = optimizer.run_steps(chunk)?;
        ticks += 1;
        tracing::trace!(tick = ticks, steps = batch.len(), "tick");
    }
    Ok(ticks)
}

/// Every `every`th snapshot, always including the last.
fn sample_trail(history: &[Snapshot], every: usize) -> Vec<&Snapshot> {
    let last = history.len().saturating_sub(1);
    history
        .iter()
        .enumerate()
        .filter(|(i, _)| i % every == 0 || *i == last)
        .map(|(_, s)| s)
        .collect()
}

fn print_table_report(
    run: &RunConfig,
    optimizer: &Optimizer,
    trail: &[&Snapshot],
    ticks: usize,
    chunk: usize,
) -> Result<()> {
    let config = optimizer.config();

    print_header(&format!("Run: {}", run.name));
    let mut settings = vec![
        KeyValue::new("Function", optimizer.function().name()),
        KeyValue::new("Start", format_point(run.start, 4)),
        KeyValue::from_f64("Learning Rate", config.learning_rate, 6),
        KeyValue::new("Max Iterations", config.max_iterations.to_string()),
        KeyValue::from_f64("Tolerance", config.tolerance, 2),
    ];
    if config.uses_momentum() {
        settings.push(KeyValue::from_f64("Momentum", config.momentum, 3));
    }
    if config.adaptive_learning_rate {
        settings.push(KeyValue::from_f64("Decay", config.initial_decay, 4));
    }
    print_output(&settings, OutputFormat::Table)?;

    print_header("Trail");
    let rows: Vec<TrailRow> = trail.iter().map(|s| TrailRow::from(*s)).collect();
    print_output(&rows, OutputFormat::Table)?;

    if let Some(stats) = optimizer.statistics() {
        print_header("Statistics");
        let end: Vec2 = optimizer.state().position;
        let summary = vec![
            KeyValue::new("Phase", optimizer.phase().to_string()),
            KeyValue::new("Iterations", stats.iterations.to_string()),
            KeyValue::new("Final Position", format_point(end, 6)),
            KeyValue::from_f64("Initial Value", stats.initial_value, 6),
            KeyValue::from_f64("Final Value", stats.final_value, 6),
            KeyValue::from_f64("Improvement", stats.improvement, 6),
            KeyValue::new(
                "Improvement %",
                format!("{}%", format_float(stats.improvement_percent, 2)),
            ),
            KeyValue::new(
                "Execution Time",
                format!("{} ms", format_float(stats.execution_time_ms, 3)),
            ),
            KeyValue::new(
                "Avg Step Time",
                format!("{} ms", format_float(stats.average_step_time_ms, 5)),
            ),
        ];
        print_output(&summary, OutputFormat::Table)?;
    }

    print_info(&format!("{ticks} ticks of up to {chunk} steps"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        run: RunArgs,
    }

    fn parse(argv: &[&str]) -> RunArgs {
        let mut full = vec!["run"];
        full.extend_from_slice(argv);
        Harness::parse_from(full).run
    }

    #[test]
    fn test_flags_build_config() {
        let args = parse(&["--function", "rosenbrock", "-x", "-1.2", "-y", "1", "--momentum", "0.9"]);
        let run = resolve_run_config(&args, &FunctionRegistry::new()).unwrap();

        assert_eq!(run.function, "rosenbrock");
        assert_eq!(run.start, Vec2::new(-1.2, 1.0));
        let config = run.optimizer.unwrap();
        assert_eq!(config.learning_rate, 0.001);
        assert_eq!(config.momentum, 0.9);
    }

    #[test]
    fn test_preset_with_overrides() {
        let args = parse(&["--preset", "bowl", "--learning-rate", "0.2", "--decay", "0.9"]);
        let run = resolve_run_config(&args, &FunctionRegistry::new()).unwrap();

        assert_eq!(run.name, "bowl");
        let config = run.optimizer.unwrap();
        assert_eq!(config.learning_rate, 0.2);
        assert!(config.adaptive_learning_rate);
        assert_eq!(config.initial_decay, 0.9);
    }

    #[test]
    fn test_expression_replaces_preset_surface() {
        let args = parse(&["--preset", "booth", "--expr", "(x - 1)^2 + y^2"]);
        let run = resolve_run_config(&args, &FunctionRegistry::new()).unwrap();
        assert_eq!(run.function, EXPRESSION_NAME);

        let mut optimizer = run.build().unwrap();
        drive(&mut optimizer, run.steps_per_tick).unwrap();
        assert!(optimizer.is_converged());
    }

    #[test]
    fn test_missing_start_or_surface() {
        assert!(resolve_run_config(&parse(&["--function", "booth"]), &FunctionRegistry::new()).is_err());
        assert!(resolve_run_config(&parse(&["-x", "0", "-y", "0"]), &FunctionRegistry::new()).is_err());
    }

    #[test]
    fn test_drive_matches_run_to_convergence() {
        let run = RunConfig::himmelblau_decay();
        let mut chunked = run.build().unwrap();
        let ticks = drive(&mut chunked, 7).unwrap();

        let mut direct = run.build().unwrap();
        direct.run_to_convergence().unwrap();

        assert_eq!(chunked.state().position, direct.state().position);
        assert_eq!(chunked.history().len(), direct.history().len());
        assert!(ticks >= (chunked.state().iteration as usize) / 7);
    }

    #[test]
    fn test_sample_trail_keeps_ends() {
        let mut optimizer = RunConfig::bowl().build().unwrap();
        optimizer.run_to_convergence().unwrap();
        let history = optimizer.history();

        let trail = sample_trail(history, 10);
        assert_eq!(trail[0].iteration, 0);
        assert_eq!(trail.last().map(|s| s.iteration), history.last().map(|s| s.iteration));
        assert!(trail.iter().take(trail.len() - 1).all(|s| s.iteration % 10 == 0));
    }
}
