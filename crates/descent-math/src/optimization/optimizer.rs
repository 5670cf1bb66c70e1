//! Step-driven gradient descent.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use descent_core::{ObjectiveFunction, Vec2};
use log::{debug, trace, warn};

use super::config::OptimizerConfig;
use super::export::ExportData;
use super::snapshot::{OptimizerState, Phase, Snapshot};
use super::statistics::Statistics;
use crate::error::{MathError, MathResult};

/// Gradient descent with optional momentum and learning-rate decay.
///
/// The optimizer is a synchronous state machine driven by its caller: each
/// [`step`](Self::step) performs at most one position update and records a
/// [`Snapshot`]. Hosts that animate a run call
/// [`run_steps`](Self::run_steps) with a bounded count per tick; batch
/// callers use [`run_to_convergence`](Self::run_to_convergence).
///
/// Each step evaluates the gradient first. If its magnitude is below the
/// tolerance the run converges without moving. Otherwise, with learning
/// rate `lr` (decayed by `initial_decay^iteration` when adaptive):
///
/// ```text
/// momentum > 0:  v ← momentum·v - lr·∇f,  p ← p + v
/// momentum = 0:  p ← p - lr·∇f
/// ```
///
/// Numerical blow-ups are not guarded against. NaN and infinities are
/// recorded in the history like any other value.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use descent_math::prelude::*;
///
/// let bowl = Arc::new(Quadratic::centered(1.0, 1.0));
/// let config = OptimizerConfig::default().with_learning_rate(0.1);
/// let mut optimizer = Optimizer::new(bowl, config).unwrap();
///
/// optimizer.initialize(2.0, 2.0);
/// let trail = optimizer.run_steps(10).unwrap();
/// assert_eq!(trail.len(), 10);
/// assert!(trail[9].function_value < trail[0].function_value);
/// ```
pub struct Optimizer {
    function: Arc<dyn ObjectiveFunction>,
    config: OptimizerConfig,
    state: OptimizerState,
    phase: Phase,
    history: Vec<Snapshot>,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    warned_non_finite: bool,
}

impl Optimizer {
    /// Creates an optimizer for `function`. The config is validated here.
    pub fn new(function: Arc<dyn ObjectiveFunction>, config: OptimizerConfig) -> MathResult<Self> {
        config.validate()?;
        Ok(Self {
            function,
            config,
            state: OptimizerState::default(),
            phase: Phase::Uninitialized,
            history: Vec::new(),
            started_at: None,
            finished_at: None,
            warned_non_finite: false,
        })
    }

    /// Creates an optimizer using the function's recommended learning rate.
    pub fn with_defaults(function: Arc<dyn ObjectiveFunction>) -> MathResult<Self> {
        let config = OptimizerConfig::for_function(function.as_ref());
        Self::new(function, config)
    }

    /// Starts a fresh run at `(x0, y0)`.
    ///
    /// Discards any previous history and timing and records the starting
    /// snapshot as iteration 0.
    pub fn initialize(&mut self, x0: f64, y0: f64) {
        self.state = OptimizerState::at(Vec2::new(x0, y0));
        self.phase = Phase::Running;
        self.history.clear();
        self.started_at = None;
        self.finished_at = None;
        self.warned_non_finite = false;

        let snapshot = self.capture(self.config.learning_rate);
        debug!(
            "initialized '{}' at ({x0}, {y0}), f = {}",
            self.function.name(),
            snapshot.function_value
        );
        self.record(snapshot);
    }

    /// Performs one iteration and returns the resulting snapshot.
    ///
    /// After convergence or exhaustion this is a no-op that returns the
    /// unchanged state. Fails only if the optimizer was never initialized.
    pub fn step(&mut self) -> MathResult<Snapshot> {
        match self.phase {
            Phase::Uninitialized => return Err(MathError::NotInitialized),
            Phase::Converged | Phase::Exhausted => return Ok(self.current_snapshot()),
            Phase::Running => {}
        }

        if self.state.iteration >= self.config.max_iterations {
            self.finish(Phase::Exhausted);
            return Ok(self.current_snapshot());
        }

        self.started_at.get_or_insert_with(Instant::now);

        let gradient = self.function.gradient_at(self.state.position);
        let magnitude = gradient.norm();
        if magnitude < self.config.tolerance {
            self.state.converged = true;
            self.finish(Phase::Converged);
            debug!(
                "converged after {} iterations at {} (|g| = {magnitude:e})",
                self.state.iteration, self.state.position
            );
            return Ok(self.current_snapshot());
        }

        let lr = self.config.effective_learning_rate(self.state.iteration);
        if self.config.uses_momentum() {
            self.state.velocity = self.state.velocity * self.config.momentum - gradient * lr;
            self.state.position += self.state.velocity;
        } else {
            self.state.position -= gradient * lr;
        }
        self.state.iteration += 1;

        let snapshot = self.capture(lr);
        trace!(
            "iteration {}: p = {}, f = {}, |g| = {}",
            snapshot.iteration,
            snapshot.position,
            snapshot.function_value,
            snapshot.gradient_magnitude
        );
        self.record(snapshot.clone());

        if self.state.iteration >= self.config.max_iterations {
            self.finish(Phase::Exhausted);
            debug!(
                "exhausted {} iterations without converging, f = {}",
                self.config.max_iterations, snapshot.function_value
            );
        }

        Ok(snapshot)
    }

    /// Calls [`step`](Self::step) up to `n` times, stopping early on convergence.
    ///
    /// Returns one snapshot per call made.
    pub fn run_steps(&mut self, n: usize) -> MathResult<Vec<Snapshot>> {
        if self.phase == Phase::Uninitialized {
            return Err(MathError::NotInitialized);
        }
        self.started_at.get_or_insert_with(Instant::now);

        let mut results = Vec::with_capacity(n);
        for _ in 0..n {
            let snapshot = self.step()?;
            let converged = snapshot.converged;
            results.push(snapshot);
            if converged {
                break;
            }
        }
        Ok(results)
    }

    /// Steps until convergence or the iteration ceiling, returning the full history.
    pub fn run_to_convergence(&mut self) -> MathResult<&[Snapshot]> {
        if self.phase == Phase::Uninitialized {
            return Err(MathError::NotInitialized);
        }
        while self.phase == Phase::Running {
            self.step()?;
        }
        Ok(&self.history)
    }

    /// Re-evaluates the function at the current position.
    ///
    /// The learning rate reported is the one the next step would use.
    pub fn current_state(&self) -> MathResult<Snapshot> {
        if self.phase == Phase::Uninitialized {
            return Err(MathError::NotInitialized);
        }
        Ok(self.current_snapshot())
    }

    /// Run summary, or `None` before [`initialize`](Self::initialize).
    pub fn statistics(&self) -> Option<Statistics> {
        Statistics::from_history(
            &self.history,
            self.state.iteration,
            self.state.converged,
            self.elapsed(),
        )
    }

    /// Bundles config, history, statistics and function metadata.
    pub fn export_data(&self) -> ExportData {
        ExportData {
            config: self.config,
            history: self.history.clone(),
            statistics: self.statistics(),
            function_info: self.function.info(),
        }
    }

    /// Returns to `Uninitialized`, dropping history and timing.
    pub fn reset(&mut self) {
        self.state = OptimizerState::default();
        self.phase = Phase::Uninitialized;
        self.history.clear();
        self.started_at = None;
        self.finished_at = None;
        self.warned_non_finite = false;
    }

    /// Changes the base learning rate; takes effect on the next step.
    pub fn set_learning_rate(&mut self, learning_rate: f64) -> MathResult<()> {
        let config = self.config.with_learning_rate(learning_rate);
        config.validate()?;
        debug!(
            "learning rate {} -> {learning_rate} at iteration {}",
            self.config.learning_rate, self.state.iteration
        );
        self.config = config;
        Ok(())
    }

    /// Swaps the objective function and resets the run.
    pub fn set_function(&mut self, function: Arc<dyn ObjectiveFunction>) {
        self.function = function;
        self.reset();
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current iterate.
    pub fn state(&self) -> &OptimizerState {
        &self.state
    }

    /// Recorded snapshots, oldest first.
    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    /// Active settings.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// The objective being minimized.
    pub fn function(&self) -> &Arc<dyn ObjectiveFunction> {
        &self.function
    }

    /// Returns true once the run has converged.
    pub fn is_converged(&self) -> bool {
        self.state.converged
    }

    fn capture(&self, learning_rate: f64) -> Snapshot {
        Snapshot::capture(self.function.as_ref(), &self.state, learning_rate)
    }

    fn current_snapshot(&self) -> Snapshot {
        self.capture(self.config.effective_learning_rate(self.state.iteration))
    }

    fn record(&mut self, snapshot: Snapshot) {
        if !self.warned_non_finite && !snapshot.is_finite() {
            warn!(
                "'{}' produced non-finite values at iteration {} (f = {}, g = {}); the run is diverging",
                self.function.name(),
                snapshot.iteration,
                snapshot.function_value,
                snapshot.gradient
            );
            self.warned_non_finite = true;
        }
        self.history.push(snapshot);
    }

    fn finish(&mut self, phase: Phase) {
        self.phase = phase;
        self.finished_at = Some(Instant::now());
    }

    fn elapsed(&self) -> Duration {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            (Some(start), None) => start.elapsed(),
            _ => Duration::ZERO,
        }
    }
}

impl fmt::Debug for Optimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Optimizer")
            .field("function", &self.function)
            .field("config", &self.config)
            .field("state", &self.state)
            .field("phase", &self.phase)
            .field("history_len", &self.history.len())
            .finish_non_exhaustive()
    }
}
