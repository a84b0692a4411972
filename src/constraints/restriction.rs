//! Worker-restriction constraint: restricted and inactive workers are never
//! assigned.

use super::{ConstraintConfig, ConstraintContext, SchedulingConstraint, ViolationSet};
use crate::cp::{CpModel, LinearExpr};
use crate::error::SolveError;
use crate::solver::SolverVariables;

/// Hard constraint pinning forbidden assignments to zero.
///
/// Two sources of prohibition:
/// - a worker's `restricted_shifts` set, per shift type
/// - `is_active == false`, which blocks the worker entirely
pub struct RestrictionConstraint {
    config: ConstraintConfig,
    violations: ViolationSet,
    emitted: usize,
}

impl RestrictionConstraint {
    /// Creates the constraint with the given configuration.
    pub fn new(config: ConstraintConfig) -> Self {
        Self {
            config,
            violations: ViolationSet::default(),
            emitted: 0,
        }
    }
}

impl SchedulingConstraint for RestrictionConstraint {
    fn constraint_id(&self) -> &'static str {
        "restriction"
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
        for worker in ctx.workers {
            if !worker.is_active {
                for period in 0..ctx.num_periods() {
                    let period_vars = vars.worker_period_vars(&worker.id, period)?;
                    model.add_linear_eq(LinearExpr::sum(period_vars), 0);
                    self.emitted += 1;
                }
                continue;
            }

            for restricted_id in &worker.restricted_shifts {
                // A restriction may reference a shift type outside this
                // problem; it constrains nothing then.
                if !ctx.shift_types.iter().any(|st| &st.id == restricted_id) {
                    continue;
                }
                for period in 0..ctx.num_periods() {
                    let x = vars.assignment_var(&worker.id, period, restricted_id)?;
                    model.add_linear_eq(LinearExpr::term(1, x), 0);
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
        let mut model = CpModel::new("restriction");
        let vars = VariableBuilder::new(workers, shift_types, cal.num_periods())
            .build(&mut model)
            .unwrap();
        (model, vars, cal)
    }

    #[test]
    fn test_restricted_worker_never_assigned() {
        let workers = vec![
            Worker::new("W1", "A").with_restricted_shift("night"),
            Worker::new("W2", "B"),
        ];
        let shift_types = vec![
            ShiftType::new("day", "Day"),
            ShiftType::new("night", "Night"),
        ];
        let (mut model, vars, cal) = setup(&workers, &shift_types, 2);
        let ctx = ConstraintContext {
            workers: &workers,
            shift_types: &shift_types,
            calendar: &cal,
            availabilities: &[],
            requests: &[],
            shift_frequency_requirements: &[],
        };

        let mut constraint = RestrictionConstraint::new(ConstraintConfig::hard());
        constraint.apply(&mut model, &vars, &ctx).unwrap();
        assert_eq!(constraint.emitted_statements(), 2); // W1 x night x 2 periods

        // Force coverage so the solver would otherwise want W1 on night.
        model.add_linear_ge(vars.coverage_expr(0, "night").unwrap(), 1);

        let sol = SimpleCpSolver::new()
            .solve(&model, &SolverParams::default())
            .unwrap();
        assert_eq!(sol.status, SolveStatus::Optimal);
        assert_eq!(
            sol.value_of(vars.assignment_var("W1", 0, "night").unwrap()),
            0
        );
        assert_eq!(
            sol.value_of(vars.assignment_var("W2", 0, "night").unwrap()),
            1
        );
    }

    #[test]
    fn test_inactive_worker_blocked_everywhere() {
        let workers = vec![Worker::new("W1", "A").inactive(), Worker::new("W2", "B")];
        let shift_types = vec![ShiftType::new("day", "Day")];
        let (mut model, vars, cal) = setup(&workers, &shift_types, 2);
        let ctx = ConstraintContext {
            workers: &workers,
            shift_types: &shift_types,
            calendar: &cal,
            availabilities: &[],
            requests: &[],
            shift_frequency_requirements: &[],
        };

        let mut constraint = RestrictionConstraint::new(ConstraintConfig::hard());
        constraint.apply(&mut model, &vars, &ctx).unwrap();

        let sol = SimpleCpSolver::new()
            .solve(&model, &SolverParams::default())
            .unwrap();
        assert_eq!(sol.status, SolveStatus::Optimal);
        for period in 0..2 {
            assert_eq!(
                sol.value_of(vars.assignment_var("W1", period, "day").unwrap()),
                0
            );
        }
    }

    #[test]
    fn test_unknown_restricted_shift_ignored() {
        let workers = vec![Worker::new("W1", "A").with_restricted_shift("ghost")];
        let shift_types = vec![ShiftType::new("day", "Day")];
        let (mut model, vars, cal) = setup(&workers, &shift_types, 1);
        let ctx = ConstraintContext {
            workers: &workers,
            shift_types: &shift_types,
            calendar: &cal,
            availabilities: &[],
            requests: &[],
            shift_frequency_requirements: &[],
        };

        let mut constraint = RestrictionConstraint::new(ConstraintConfig::hard());
        constraint.apply(&mut model, &vars, &ctx).unwrap();
        assert_eq!(constraint.emitted_statements(), 0);
    }
}
