//! Coverage constraint: each shift type gets exactly its required staffing.

use tracing::debug;

use super::{ConstraintConfig, ConstraintContext, SchedulingConstraint, ViolationSet};
use crate::cp::{CpModel, LinearExpr};
use crate::error::SolveError;
use crate::solver::SolverVariables;

/// Hard constraint fixing per-period staffing to `workers_required`.
///
/// For every `(period, shift_type)` the worker sum must equal the demand.
/// When a shift type's `applicable_days` leave it no valid day in a period,
/// the coverage equation is omitted for that period and every assignment of
/// that column is pinned to zero instead.
///
/// Coverage shortfalls are never modeled as soft penalties; an unstaffable
/// demand makes the model infeasible.
pub struct CoverageConstraint {
    config: ConstraintConfig,
    violations: ViolationSet,
    emitted: usize,
}

impl CoverageConstraint {
    /// Creates the constraint with the given configuration.
    pub fn new(config: ConstraintConfig) -> Self {
        Self {
            config,
            violations: ViolationSet::default(),
            emitted: 0,
        }
    }
}

impl SchedulingConstraint for CoverageConstraint {
    fn constraint_id(&self) -> &'static str {
        "coverage"
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
        for period in 0..ctx.num_periods() {
            for shift_type in ctx.shift_types {
                let applicable = ctx
                    .calendar
                    .applicable_day_count(period, shift_type.applicable_days.as_ref());

                if applicable == 0 {
                    // Shift cannot occur in this period at all.
                    for worker in ctx.workers {
                        let x = vars.assignment_var(&worker.id, period, &shift_type.id)?;
                        model.add_linear_eq(LinearExpr::term(1, x), 0);
                        self.emitted += 1;
                    }
                    debug!(
                        shift_type = %shift_type.id,
                        period,
                        "no applicable days in period, coverage omitted"
                    );
                    continue;
                }

                let expr = vars.coverage_expr(period, &shift_type.id)?;
                model.add_linear_eq(expr, i64::from(shift_type.workers_required));
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
