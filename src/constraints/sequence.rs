//! Sequence constraint: discourage same-category shifts in consecutive
//! periods.

use std::collections::BTreeMap;

use super::{ConstraintConfig, ConstraintContext, SchedulingConstraint, ViolationSet};
use crate::cp::{CpModel, IntVar, LinearConstraint, LinearExpr};
use crate::error::SolveError;
use crate::models::ShiftType;
use crate::solver::SolverVariables;

/// Penalizes a worker holding shifts of the same category in two consecutive
/// periods.
///
/// For each worker, category, and period pair `(p, p+1)`, a boolean `c` is
/// linearized as the AND of the two per-period occupancy indicators:
/// `c >= a_p + a_{p+1} - 1`, `c <= a_p`, `c <= a_{p+1}`. Categories spanning
/// several shift types get a reified occupancy indicator first, so the
/// inequalities always operate on 0/1 values.
///
/// The `categories` parameter limits which categories are watched; by
/// default all of them are.
pub struct SequenceConstraint {
    config: ConstraintConfig,
    violations: ViolationSet,
    emitted: usize,
}

impl SequenceConstraint {
    /// Creates the constraint with the given configuration.
    pub fn new(config: ConstraintConfig) -> Self {
        Self {
            config,
            violations: ViolationSet::default(),
            emitted: 0,
        }
    }

    /// Occupancy of a category in one period: the assignment variable itself
    /// for single-shift categories, otherwise a reified indicator.
    fn occupancy_indicator(
        &mut self,
        model: &mut CpModel,
        vars: &SolverVariables,
        worker_id: &str,
        period: usize,
        category: &str,
        shifts: &[&ShiftType],
    ) -> Result<IntVar, SolveError> {
        if shifts.len() == 1 {
            return Ok(vars.assignment_var(worker_id, period, &shifts[0].id)?);
        }

        let mut sum = LinearExpr::new();
        for shift in shifts {
            sum.add_term(1, vars.assignment_var(worker_id, period, &shift.id)?);
        }
        let indicator = model.new_bool(format!("seq_occ_{worker_id}_{category}_p{period}"));
        model.add_implication(indicator.literal(), LinearConstraint::ge(sum.clone(), 1));
        model.add_implication(indicator.negated(), LinearConstraint::eq(sum, 0));
        self.emitted += 2;
        Ok(indicator)
    }
}

impl SchedulingConstraint for SequenceConstraint {
    fn constraint_id(&self) -> &'static str {
        "sequence"
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
        let num_periods = ctx.num_periods();
        if num_periods < 2 {
            return Ok(());
        }

        let watched: Option<Vec<String>> = self.config.param_str_list("categories");
        let mut by_category: BTreeMap<&str, Vec<&ShiftType>> = BTreeMap::new();
        for shift_type in ctx.shift_types {
            let included = match &watched {
                Some(list) => list.iter().any(|c| c == &shift_type.category),
                None => true,
            };
            if included {
                by_category
                    .entry(shift_type.category.as_str())
                    .or_default()
                    .push(shift_type);
            }
        }
        if by_category.is_empty() {
            return Ok(());
        }

        let worker_ids: Vec<String> = ctx
            .workers
            .iter()
            .filter(|w| w.is_active)
            .map(|w| w.id.clone())
            .collect();

        for worker_id in &worker_ids {
            for (category, shifts) in &by_category {
                for period in 0..num_periods - 1 {
                    let a_curr = self.occupancy_indicator(
                        model, vars, worker_id, period, category, shifts,
                    )?;
                    let a_next = self.occupancy_indicator(
                        model,
                        vars,
                        worker_id,
                        period + 1,
                        category,
                        shifts,
                    )?;

                    if self.config.is_hard {
                        model.add_linear_le(LinearExpr::sum([a_curr, a_next]), 1);
                        self.emitted += 1;
                        continue;
                    }

                    let name = format!("seq_viol_{worker_id}_{category}_p{period}");
                    let c = model.new_bool(name.clone());

                    // c = a_curr AND a_next, linearized
                    let mut ge = LinearExpr::term(1, c);
                    ge.add_term(-1, a_curr);
                    ge.add_term(-1, a_next);
                    model.add_linear_ge(ge, -1);

                    let mut le_curr = LinearExpr::term(1, c);
                    le_curr.add_term(-1, a_curr);
                    model.add_linear_le(le_curr, 0);

                    let mut le_next = LinearExpr::term(1, c);
                    le_next.add_term(-1, a_next);
                    model.add_linear_le(le_next, 0);

                    self.emitted += 3;
                    self.violations.record_with_priority(name, c, 1);
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
