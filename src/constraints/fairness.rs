//! Fairness constraint: balance undesirable workload across workers.

use std::collections::BTreeSet;

use tracing::debug;

use super::{
    ConstraintConfig, ConstraintContext, SchedulingConstraint, ViolationKind, ViolationSet,
};
use crate::cp::{CpModel, IntVar, LinearExpr};
use crate::error::SolveError;
use crate::solver::SolverVariables;

/// Balances undesirable-shift counts across active workers.
///
/// Tracks per-worker undesirable totals `U_w`, bounds them with shared
/// `max`/`min` variables, and penalizes (soft) or forbids (hard) the spread
/// `max - min`.
///
/// The `categories` parameter narrows the counted shifts to the listed
/// categories; by default every shift flagged `is_undesirable` counts.
///
/// Variable roles: `fairness_spread` is the objective target; the max/min
/// trackers are auxiliary and never enter the objective.
pub struct FairnessConstraint {
    config: ConstraintConfig,
    violations: ViolationSet,
    emitted: usize,
}

impl FairnessConstraint {
    /// Creates the constraint with the given configuration.
    pub fn new(config: ConstraintConfig) -> Self {
        Self {
            config,
            violations: ViolationSet::default(),
            emitted: 0,
        }
    }

    fn counted_shift_ids(&self, ctx: &ConstraintContext<'_>) -> BTreeSet<String> {
        match self.config.param_str_list("categories") {
            Some(categories) => ctx
                .shift_types
                .iter()
                .filter(|st| categories.iter().any(|c| c == &st.category))
                .map(|st| st.id.clone())
                .collect(),
            None => ctx
                .shift_types
                .iter()
                .filter(|st| st.is_undesirable)
                .map(|st| st.id.clone())
                .collect(),
        }
    }
}

impl SchedulingConstraint for FairnessConstraint {
    fn constraint_id(&self) -> &'static str {
        "fairness"
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
        let active: Vec<_> = ctx.workers.iter().filter(|w| w.is_active).collect();
        if active.len() < 2 {
            debug!("fewer than two active workers, fairness skipped");
            return Ok(());
        }

        let counted = self.counted_shift_ids(ctx);
        if counted.is_empty() {
            debug!("no undesirable shifts to balance, fairness skipped");
            return Ok(());
        }

        let num_periods = ctx.num_periods();
        let max_possible = (num_periods * counted.len()) as i64;
        let custom_filter = self.config.parameters.contains_key("categories");

        // Per-worker totals over the counted set. The default set reuses the
        // prebuilt undesirable totals; a category filter needs its own sums.
        let mut worker_totals: Vec<IntVar> = Vec::with_capacity(active.len());
        for worker in &active {
            let total = if custom_filter {
                let total =
                    model.new_int(0, max_possible, format!("fairness_total_{}", worker.id));
                let mut link = LinearExpr::term(-1, total);
                for period in 0..num_periods {
                    for shift_id in &counted {
                        link.add_term(1, vars.assignment_var(&worker.id, period, shift_id)?);
                    }
                }
                model.add_linear_eq(link, 0);
                self.emitted += 1;
                total
            } else {
                vars.undesirable_total_var(&worker.id)?
            };
            worker_totals.push(total);
        }

        let max_u = model.new_int(0, max_possible, "fairness_max_undesirable");
        let min_u = model.new_int(0, max_possible, "fairness_min_undesirable");
        for total in &worker_totals {
            let mut le_max = LinearExpr::term(1, *total);
            le_max.add_term(-1, max_u);
            model.add_linear_le(le_max, 0);

            let mut ge_min = LinearExpr::term(1, *total);
            ge_min.add_term(-1, min_u);
            model.add_linear_ge(ge_min, 0);
            self.emitted += 2;
        }

        let spread = model.new_int(0, max_possible, "fairness_spread");
        let mut diff = LinearExpr::term(1, max_u);
        diff.add_term(-1, min_u);
        diff.add_term(-1, spread);
        model.add_linear_eq(diff, 0);
        self.emitted += 1;

        if self.config.is_hard {
            model.add_linear_eq(LinearExpr::term(1, spread), 0);
            self.emitted += 1;
        }

        self.violations
            .record("fairness_spread", spread, ViolationKind::ObjectiveTarget);
        self.violations
            .record("fairness_max_undesirable", max_u, ViolationKind::Auxiliary);
        self.violations
            .record("fairness_min_undesirable", min_u, ViolationKind::Auxiliary);

        Ok(())
    }

    fn violations(&self) -> &ViolationSet {
        &self.violations
    }

    fn emitted_statements(&self) -> usize {
        self.emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::{CpSolver, SimpleCpSolver, SolveStatus, SolverParams};
    use crate::models::{PeriodCalendar, ShiftType, Worker};
    use crate::solver::VariableBuilder;

    fn setup(
        workers: &[Worker],
        shift_types: &[ShiftType],
        periods: u32,
    ) -> (CpModel, SolverVariables, PeriodCalendar) {
        let start: chrono::NaiveDate = "2026-02-02".parse().unwrap();
        let end = start + chrono::Days::new(u64::from(periods) - 1);
        let cal = PeriodCalendar::new(start, end, 1).unwrap();
        let mut model = CpModel::new("fairness");
        let vars = VariableBuilder::new(workers, shift_types, cal.num_periods())
            .build(&mut model)
            .unwrap();
        (model, vars, cal)
    }

    fn ctx<'a>(
        workers: &'a [Worker],
        shift_types: &'a [ShiftType],
        cal: &'a PeriodCalendar,
    ) -> ConstraintContext<'a> {
        ConstraintContext {
            workers,
            shift_types,
            calendar: cal,
            availabilities: &[],
            requests: &[],
            shift_frequency_requirements: &[],
        }
    }

    #[test]
    fn test_soft_fairness_minimizes_spread() {
        let workers = vec![Worker::new("W1", "A"), Worker::new("W2", "B")];
        let shift_types = vec![
            ShiftType::new("day", "Day"),
            ShiftType::new("night", "Night").undesirable(),
        ];
        let (mut model, vars, cal) = setup(&workers, &shift_types, 2);
        let context = ctx(&workers, &shift_types, &cal);

        // One night worker per period.
        for period in 0..2 {
            model.add_linear_eq(vars.coverage_expr(period, "night").unwrap(), 1);
        }

        let mut constraint = FairnessConstraint::new(ConstraintConfig::soft(1000));
        constraint.apply(&mut model, &vars, &context).unwrap();

        let spread = constraint
            .violations()
            .iter()
            .find(|(name, _)| *name == "fairness_spread")
            .map(|(_, var)| var)
            .unwrap();
        model.minimize(LinearExpr::term(1000, spread));

        let sol = SimpleCpSolver::new()
            .solve(&model, &SolverParams::default())
            .unwrap();
        assert_eq!(sol.status, SolveStatus::Optimal);
        // Two nights split across two workers: spread 0.
        assert_eq!(sol.value_of(spread), 0);
        assert_eq!(sol.objective_value, Some(0));
    }

    #[test]
    fn test_variable_roles() {
        let workers = vec![Worker::new("W1", "A"), Worker::new("W2", "B")];
        let shift_types = vec![ShiftType::new("night", "Night").undesirable()];
        let (mut model, vars, cal) = setup(&workers, &shift_types, 2);
        let context = ctx(&workers, &shift_types, &cal);

        let mut constraint = FairnessConstraint::new(ConstraintConfig::soft(1000));
        constraint.apply(&mut model, &vars, &context).unwrap();

        let violations = constraint.violations();
        assert_eq!(
            violations.kind_of("fairness_spread"),
            Some(ViolationKind::ObjectiveTarget)
        );
        assert_eq!(
            violations.kind_of("fairness_max_undesirable"),
            Some(ViolationKind::Auxiliary)
        );
        assert_eq!(
            violations.kind_of("fairness_min_undesirable"),
            Some(ViolationKind::Auxiliary)
        );
    }

    #[test]
    fn test_hard_fairness_forces_zero_spread() {
        let workers = vec![Worker::new("W1", "A"), Worker::new("W2", "B")];
        let shift_types = vec![ShiftType::new("night", "Night").undesirable()];
        let (mut model, vars, cal) = setup(&workers, &shift_types, 2);
        let context = ctx(&workers, &shift_types, &cal);

        // Exactly one night per period; with 2 periods an even split exists.
        for period in 0..2 {
            model.add_linear_eq(vars.coverage_expr(period, "night").unwrap(), 1);
        }

        let mut constraint = FairnessConstraint::new(ConstraintConfig {
            is_hard: true,
            ..ConstraintConfig::soft(0)
        });
        constraint.apply(&mut model, &vars, &context).unwrap();

        let sol = SimpleCpSolver::new()
            .solve(&model, &SolverParams::default())
            .unwrap();
        assert_eq!(sol.status, SolveStatus::Optimal);
        let w1 = sol.value_of(vars.undesirable_total_var("W1").unwrap());
        let w2 = sol.value_of(vars.undesirable_total_var("W2").unwrap());
        assert_eq!(w1, 1);
        assert_eq!(w2, 1);
    }

    #[test]
    fn test_single_worker_skipped() {
        let workers = vec![Worker::new("W1", "A")];
        let shift_types = vec![ShiftType::new("night", "Night").undesirable()];
        let (mut model, vars, cal) = setup(&workers, &shift_types, 2);
        let context = ctx(&workers, &shift_types, &cal);

        let mut constraint = FairnessConstraint::new(ConstraintConfig::soft(1000));
        constraint.apply(&mut model, &vars, &context).unwrap();
        assert!(constraint.violations().is_empty());
        assert_eq!(constraint.emitted_statements(), 0);
    }

    #[test]
    fn test_no_undesirable_shifts_skipped() {
        let workers = vec![Worker::new("W1", "A"), Worker::new("W2", "B")];
        let shift_types = vec![ShiftType::new("day", "Day")];
        let (mut model, vars, cal) = setup(&workers, &shift_types, 2);
        let context = ctx(&workers, &shift_types, &cal);

        let mut constraint = FairnessConstraint::new(ConstraintConfig::soft(1000));
        constraint.apply(&mut model, &vars, &context).unwrap();
        assert!(constraint.violations().is_empty());
    }

    #[test]
    fn test_category_filter() {
        let workers = vec![Worker::new("W1", "A"), Worker::new("W2", "B")];
        let shift_types = vec![
            ShiftType::new("eve", "Evening").with_category("evening"),
            ShiftType::new("night", "Night").with_category("night").undesirable(),
        ];
        let (mut model, vars, cal) = setup(&workers, &shift_types, 2);
        let context = ctx(&workers, &shift_types, &cal);

        // Filter counts the evening category even though it is not flagged
        // undesirable.
        let config = ConstraintConfig::soft(1000)
            .with_param("categories", serde_json::json!(["evening"]));
        let mut constraint = FairnessConstraint::new(config);
        constraint.apply(&mut model, &vars, &context).unwrap();

        assert_eq!(
            constraint.violations().kind_of("fairness_spread"),
            Some(ViolationKind::ObjectiveTarget)
        );
        // Custom totals were linked: one equality per worker.
        assert!(constraint.emitted_statements() >= 2);
    }
}
