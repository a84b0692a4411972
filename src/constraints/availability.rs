//! Availability constraint: unavailable workers are never assigned.

use tracing::warn;

use super::{ConstraintConfig, ConstraintContext, SchedulingConstraint, ViolationSet};
use crate::cp::{CpModel, LinearExpr};
use crate::error::SolveError;
use crate::models::AvailabilityType;
use crate::solver::SolverVariables;

/// Hard constraint enforcing `Unavailable` records.
///
/// A record blocks every period its date range overlaps: the worker's
/// assignments for the named shift type (or all shift types when none is
/// named) are pinned to zero there. `Preferred`/`Required` records are
/// positive signals consumed elsewhere and enforce nothing here.
pub struct AvailabilityConstraint {
    config: ConstraintConfig,
    violations: ViolationSet,
    emitted: usize,
}

impl AvailabilityConstraint {
    /// Creates the constraint with the given configuration.
    pub fn new(config: ConstraintConfig) -> Self {
        Self {
            config,
            violations: ViolationSet::default(),
            emitted: 0,
        }
    }
}

impl SchedulingConstraint for AvailabilityConstraint {
    fn constraint_id(&self) -> &'static str {
        "availability"
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
        for record in ctx.availabilities {
            if record.availability_type != AvailabilityType::Unavailable {
                continue;
            }
            if !ctx.workers.iter().any(|w| w.id == record.worker_id) {
                warn!(
                    worker_id = %record.worker_id,
                    "availability record references unknown worker, skipped"
                );
                continue;
            }

            for (period, (start, end)) in ctx.calendar.period_dates().iter().enumerate() {
                if !record.overlaps(*start, *end) {
                    continue;
                }
                match &record.shift_type_id {
                    Some(shift_type_id) => {
                        let x = vars.assignment_var(&record.worker_id, period, shift_type_id)?;
                        model.add_linear_eq(LinearExpr::term(1, x), 0);
                    }
                    None => {
                        let period_vars = vars.worker_period_vars(&record.worker_id, period)?;
                        model.add_linear_eq(LinearExpr::sum(period_vars), 0);
                    }
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
