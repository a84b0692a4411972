//! Frequency constraint: no worker goes too long without any shift.

use tracing::warn;

use super::{ConstraintConfig, ConstraintContext, SchedulingConstraint, ViolationSet};
use crate::cp::{CpModel, LinearExpr};
use crate::error::SolveError;
use crate::solver::SolverVariables;

const DEFAULT_MAX_PERIODS_BETWEEN: i64 = 4;

/// Requires at least one assignment (of any shift type) in every sliding
/// window of `max_periods_between + 1` periods, per active worker.
///
/// Soft form adds a per-window violation boolean `v` with
/// `sum(window) + v >= 1`. Windows larger than the horizon are logged and
/// skipped.
pub struct FrequencyConstraint {
    config: ConstraintConfig,
    violations: ViolationSet,
    emitted: usize,
}

impl FrequencyConstraint {
    /// Creates the constraint with the given configuration.
    pub fn new(config: ConstraintConfig) -> Self {
        Self {
            config,
            violations: ViolationSet::default(),
            emitted: 0,
        }
    }
}

impl SchedulingConstraint for FrequencyConstraint {
    fn constraint_id(&self) -> &'static str {
        "frequency"
    }

    fn config(&self) -> &ConstraintConfig {
        &self.config
    }

    fn apply(
        &mut self,
        model: &mut CpModel,
        vars: &SolverVariables,
        ctx: &ConstraintContext<'_>,
    ) -> Result<(), SolveError> {
        let max_between = self
            .config
            .param_i64("max_periods_between")
            .unwrap_or(DEFAULT_MAX_PERIODS_BETWEEN)
            .max(0) as usize;
        let window_size = max_between + 1;
        let num_periods = ctx.num_periods();

        if window_size > num_periods {
            warn!(
                window_size,
                num_periods, "frequency window exceeds horizon, constraint skipped"
            );
            return Ok(());
        }

        for worker in ctx.workers.iter().filter(|w| w.is_active) {
            for window_start in 0..=(num_periods - window_size) {
                let mut window = LinearExpr::new();
                for period in window_start..window_start + window_size {
                    for var in vars.worker_period_vars(&worker.id, period)? {
                        window.add_term(1, var);
                    }
                }

                if self.config.is_hard {
                    model.add_linear_ge(window, 1);
                } else {
                    let name = format!("freq_viol_{}_w{}", worker.id, window_start);
                    let violation = model.new_bool(name.clone());
                    window.add_term(1, violation);
                    model.add_linear_ge(window, 1);
                    self.violations.record_with_priority(name, violation, 1);
                }
                self.emitted += 1;
            }
        }
        Ok(())
    }

    fn violations(&self) -> &ViolationSet {
        &self.violations
    }

    fn emitted_statements(&self) -> usize {
        self.emitted
    }
}
