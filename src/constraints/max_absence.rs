//! Max-absence constraint: no long gaps away from a shift type.

use tracing::warn;

use super::{ConstraintConfig, ConstraintContext, SchedulingConstraint, ViolationSet};
use crate::cp::{CpModel, LinearExpr};
use crate::error::SolveError;
use crate::solver::SolverVariables;

const DEFAULT_MAX_PERIODS_ABSENT: i64 = 8;

/// Penalizes a worker going more than `max_periods_absent` consecutive
/// periods without a given shift type.
///
/// Per worker and (optionally filtered) shift type, every sliding window of
/// `max_periods_absent + 1` periods must contain an assignment, else the
/// window's violation boolean turns on. Windows larger than the horizon are
/// logged and skipped.
pub struct MaxAbsenceConstraint {
    config: ConstraintConfig,
    violations: ViolationSet,
    emitted: usize,
}

impl MaxAbsenceConstraint {
    /// Creates the constraint with the given configuration.
    pub fn new(config: ConstraintConfig) -> Self {
        Self {
            config,
            violations: ViolationSet::default(),
            emitted: 0,
        }
    }
}

impl SchedulingConstraint for MaxAbsenceConstraint {
    fn constraint_id(&self) -> &'static str {
        "max_absence"
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
        let max_absent = self
            .config
            .param_i64("max_periods_absent")
            .unwrap_or(DEFAULT_MAX_PERIODS_ABSENT)
            .max(0) as usize;
        let window_size = max_absent + 1;
        let num_periods = ctx.num_periods();

        if window_size > num_periods {
            warn!(
                window_size,
                num_periods, "max-absence window exceeds horizon, constraint skipped"
            );
            return Ok(());
        }

        let filter = self.config.param_str_list("shift_types");
        let watched: Vec<&str> = ctx
            .shift_types
            .iter()
            .filter(|st| match &filter {
                Some(ids) => ids.iter().any(|id| id == &st.id),
                None => true,
            })
            .map(|st| st.id.as_str())
            .collect();
        if watched.is_empty() {
            return Ok(());
        }

        for worker in ctx.workers.iter().filter(|w| w.is_active) {
            for shift_type_id in &watched {
                for window_start in 0..=(num_periods - window_size) {
                    let mut window = LinearExpr::new();
                    for period in window_start..window_start + window_size {
                        window.add_term(
                            1,
                            vars.assignment_var(&worker.id, period, shift_type_id)?,
                        );
                    }

                    if self.config.is_hard {
                        model.add_linear_ge(window, 1);
                    } else {
                        let name = format!(
                            "abs_viol_{}_{}_w{}",
                            worker.id, shift_type_id, window_start
                        );
                        let violation = model.new_bool(name.clone());
                        window.add_term(1, violation);
                        model.add_linear_ge(window, 1);
                        self.violations.record_with_priority(name, violation, 1);
                    }
                    self.emitted += 1;
                }
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
