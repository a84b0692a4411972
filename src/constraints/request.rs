//! Request constraint: honor per-period worker requests.

use tracing::debug;

use super::{ConstraintConfig, ConstraintContext, SchedulingConstraint, ViolationSet};
use crate::cp::{CpModel, LinearConstraint, LinearExpr};
use crate::error::SolveError;
use crate::solver::SolverVariables;

/// Honors positive ("I want this shift") and negative ("keep me off it")
/// requests.
///
/// Soft form reifies one violation boolean per request onto the targeted
/// assignment variable; its objective coefficient is the request priority,
/// carried in the violation metadata rather than the variable name. Hard form
/// enforces the request directly.
pub struct RequestConstraint {
    config: ConstraintConfig,
    violations: ViolationSet,
    emitted: usize,
}

impl RequestConstraint {
    /// Creates the constraint with the given configuration.
    pub fn new(config: ConstraintConfig) -> Self {
        Self {
            config,
            violations: ViolationSet::default(),
            emitted: 0,
        }
    }
}

impl SchedulingConstraint for RequestConstraint {
    fn constraint_id(&self) -> &'static str {
        "request"
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
        for (idx, request) in ctx.requests.iter().enumerate() {
            if !ctx.workers.iter().any(|w| w.id == request.worker_id)
                || !ctx
                    .shift_types
                    .iter()
                    .any(|st| st.id == request.shift_type_id)
            {
                debug!(
                    worker_id = %request.worker_id,
                    shift_type_id = %request.shift_type_id,
                    "request references unknown worker or shift type, skipped"
                );
                continue;
            }

            let x = vars.assignment_var(
                &request.worker_id,
                request.period_index,
                &request.shift_type_id,
            )?;

            if self.config.is_hard {
                if request.is_positive {
                    model.add_linear_ge(LinearExpr::term(1, x), 1);
                } else {
                    model.add_linear_eq(LinearExpr::term(1, x), 0);
                }
                self.emitted += 1;
                continue;
            }

            let name = format!(
                "req_viol_{}_{}_p{}_r{idx}",
                request.worker_id, request.shift_type_id, request.period_index
            );
            let violation = model.new_bool(name.clone());

            // Reified both ways: the violation boolean tracks exactly
            // whether the request went unmet.
            let (if_violated, if_met) = if request.is_positive {
                (
                    LinearConstraint::eq(LinearExpr::term(1, x), 0),
                    LinearConstraint::ge(LinearExpr::term(1, x), 1),
                )
            } else {
                (
                    LinearConstraint::ge(LinearExpr::term(1, x), 1),
                    LinearConstraint::eq(LinearExpr::term(1, x), 0),
                )
            };
            model.add_implication(violation.literal(), if_violated);
            model.add_implication(violation.negated(), if_met);
            self.emitted += 2;

            self.violations
                .record_with_priority(name, violation, i64::from(request.priority));
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
