//! Shift-frequency constraint: per-worker recurring duty requirements.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::{ConstraintConfig, ConstraintContext, SchedulingConstraint, ViolationSet};
use crate::cp::{CpModel, LinearExpr};
use crate::error::SolveError;
use crate::solver::SolverVariables;

/// Enforces [`ShiftFrequencyRequirement`](crate::models::ShiftFrequencyRequirement)s:
/// within every window of `max_periods_between` periods, the worker must hold
/// at least one shift from the requirement's set.
///
/// Unlike the uniform frequency rule, requirements are per worker and accept
/// a group of qualifying shift types. Hard form demands `T >= 1` per window;
/// soft form relaxes it to `T + v * M >= 1` with `M` the window's assignment
/// capacity, so the violation boolean `v` alone can absorb the shortfall.
///
/// A requirement whose window exceeds the horizon degrades to a single
/// whole-horizon window with a warning.
pub struct ShiftFrequencyConstraint {
    config: ConstraintConfig,
    violations: ViolationSet,
    emitted: usize,
}

impl ShiftFrequencyConstraint {
    /// Creates the constraint with the given configuration.
    pub fn new(config: ConstraintConfig) -> Self {
        Self {
            config,
            violations: ViolationSet::default(),
            emitted: 0,
        }
    }
}

impl SchedulingConstraint for ShiftFrequencyConstraint {
    fn constraint_id(&self) -> &'static str {
        "shift_frequency"
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
        let shift_ids: BTreeSet<&str> =
            ctx.shift_types.iter().map(|st| st.id.as_str()).collect();

        // Disambiguate violation names when one worker carries several
        // requirements.
        let mut seen_workers: BTreeSet<&str> = BTreeSet::new();

        for (req_idx, req) in ctx.shift_frequency_requirements.iter().enumerate() {
            if !ctx.workers.iter().any(|w| w.id == req.worker_id) {
                debug!(
                    worker_id = %req.worker_id,
                    "shift frequency requirement references unknown worker, skipped"
                );
                continue;
            }
            let valid_shifts: Vec<&str> = req
                .shift_types
                .iter()
                .map(String::as_str)
                .filter(|id| shift_ids.contains(id))
                .collect();
            if valid_shifts.is_empty() {
                debug!(
                    worker_id = %req.worker_id,
                    "shift frequency requirement has no known shift types, skipped"
                );
                continue;
            }

            let mut window_size = req.max_periods_between;
            if window_size > num_periods {
                warn!(
                    worker_id = %req.worker_id,
                    window_size,
                    num_periods,
                    "shift frequency window exceeds horizon, clamped to whole horizon"
                );
                window_size = num_periods;
            }

            let fresh_worker = seen_workers.insert(req.worker_id.as_str());

            for window_start in 0..=(num_periods - window_size) {
                let mut window = LinearExpr::new();
                for period in window_start..window_start + window_size {
                    for shift_type_id in &valid_shifts {
                        window.add_term(
                            1,
                            vars.assignment_var(&req.worker_id, period, shift_type_id)?,
                        );
                    }
                }

                if self.config.is_hard {
                    model.add_linear_ge(window, 1);
                } else {
                    let name = if fresh_worker {
                        format!("sf_viol_{}_w{window_start}", req.worker_id)
                    } else {
                        format!("sf_viol_{}_r{req_idx}_w{window_start}", req.worker_id)
                    };
                    let violation = model.new_bool(name.clone());
                    let capacity = (window_size * valid_shifts.len()) as i64;
                    window.add_term(capacity, violation);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::{CpSolver, SimpleCpSolver, SolveStatus, SolverParams};
    use crate::models::{PeriodCalendar, ShiftFrequencyRequirement, ShiftType, Worker};
    use crate::solver::VariableBuilder;

    fn setup(
        workers: &[Worker],
        shift_types: &[ShiftType],
        periods: u32,
    ) -> (CpModel, SolverVariables, PeriodCalendar) {
        let start: chrono::NaiveDate = "2026-02-02".parse().unwrap();
        let end = start + chrono::Days::new(u64::from(periods) - 1);
        let cal = PeriodCalendar::new(start, end, 1).unwrap();
        let mut model = CpModel::new("shift_frequency");
        let vars = VariableBuilder::new(workers, shift_types, cal.num_periods())
            .build(&mut model)
            .unwrap();
        (model, vars, cal)
    }

    fn req(worker: &str, shifts: &[&str], n: usize) -> ShiftFrequencyRequirement {
        ShiftFrequencyRequirement::new(
            worker,
            shifts.iter().map(|s| s.to_string()),
            n,
        )
    }

    #[test]
    fn test_hard_requirement_forces_assignment() {
        let workers = vec![Worker::new("W1", "A")];
        let shift_types = vec![ShiftType::new("x", "X"), ShiftType::new("y", "Y")];
        let requirements = vec![req("W1", &["x", "y"], 2)];
        let (mut model, vars, cal) = setup(&workers, &shift_types, 4);
        let context = ConstraintContext {
            workers: &workers,
            shift_types: &shift_types,
            calendar: &cal,
            availabilities: &[],
            requests: &[],
            shift_frequency_requirements: &requirements,
        };

        let config = ConstraintConfig {
            is_hard: true,
            ..ConstraintConfig::soft(500)
        };
        let mut constraint = ShiftFrequencyConstraint::new(config);
        constraint.apply(&mut model, &vars, &context).unwrap();
        assert_eq!(constraint.emitted_statements(), 3); // windows 0..2

        let sol = SimpleCpSolver::new()
            .solve(&model, &SolverParams::default())
            .unwrap();
        assert_eq!(sol.status, SolveStatus::Optimal);
        // Every window of 2 periods holds at least one x or y.
        for window_start in 0..3 {
            let total: i64 = (window_start..window_start + 2)
                .flat_map(|p| {
                    ["x", "y"].into_iter().map(move |s| (p, s))
                })
                .map(|(p, s)| sol.value_of(vars.assignment_var("W1", p, s).unwrap()))
                .sum();
            assert!(total >= 1);
        }
    }

    #[test]
    fn test_soft_requirement_absorbs_shortfall() {
        let workers = vec![Worker::new("W1", "A")];
        let shift_types = vec![ShiftType::new("x", "X")];
        let requirements = vec![req("W1", &["x"], 2)];
        let (mut model, vars, cal) = setup(&workers, &shift_types, 2);
        let context = ConstraintContext {
            workers: &workers,
            shift_types: &shift_types,
            calendar: &cal,
            availabilities: &[],
            requests: &[],
            shift_frequency_requirements: &requirements,
        };

        // Worker can never work x.
        for period in 0..2 {
            model.add_linear_eq(
                LinearExpr::term(1, vars.assignment_var("W1", period, "x").unwrap()),
                0,
            );
        }

        let mut constraint = ShiftFrequencyConstraint::new(ConstraintConfig::soft(500));
        constraint.apply(&mut model, &vars, &context).unwrap();

        let (name, violation) = constraint.violations().iter().next().unwrap();
        assert_eq!(name, "sf_viol_W1_w0");
        model.minimize(LinearExpr::term(500, violation));

        let sol = SimpleCpSolver::new()
            .solve(&model, &SolverParams::default())
            .unwrap();
        assert_eq!(sol.status, SolveStatus::Optimal);
        assert_eq!(sol.value_of(violation), 1);
        assert_eq!(sol.objective_value, Some(500));
    }

    #[test]
    fn test_oversized_window_clamps_to_horizon() {
        let workers = vec![Worker::new("W1", "A")];
        let shift_types = vec![ShiftType::new("x", "X")];
        let requirements = vec![req("W1", &["x"], 10)];
        let (mut model, vars, cal) = setup(&workers, &shift_types, 3);
        let context = ConstraintContext {
            workers: &workers,
            shift_types: &shift_types,
            calendar: &cal,
            availabilities: &[],
            requests: &[],
            shift_frequency_requirements: &requirements,
        };

        let mut constraint = ShiftFrequencyConstraint::new(ConstraintConfig::soft(500));
        constraint.apply(&mut model, &vars, &context).unwrap();
        // One whole-horizon window.
        assert_eq!(constraint.violations().len(), 1);
        assert_eq!(constraint.emitted_statements(), 1);
    }

    #[test]
    fn test_unknown_references_skipped() {
        let workers = vec![Worker::new("W1", "A")];
        let shift_types = vec![ShiftType::new("x", "X")];
        let requirements = vec![req("W9", &["x"], 2), req("W1", &["ghost"], 2)];
        let (mut model, vars, cal) = setup(&workers, &shift_types, 4);
        let context = ConstraintContext {
            workers: &workers,
            shift_types: &shift_types,
            calendar: &cal,
            availabilities: &[],
            requests: &[],
            shift_frequency_requirements: &requirements,
        };

        let mut constraint = ShiftFrequencyConstraint::new(ConstraintConfig::soft(500));
        constraint.apply(&mut model, &vars, &context).unwrap();
        assert!(constraint.violations().is_empty());
        assert_eq!(constraint.emitted_statements(), 0);
    }

    #[test]
    fn test_second_requirement_gets_distinct_names() {
        let workers = vec![Worker::new("W1", "A")];
        let shift_types = vec![ShiftType::new("x", "X"), ShiftType::new("y", "Y")];
        let requirements = vec![req("W1", &["x"], 2), req("W1", &["y"], 2)];
        let (mut model, vars, cal) = setup(&workers, &shift_types, 2);
        let context = ConstraintContext {
            workers: &workers,
            shift_types: &shift_types,
            calendar: &cal,
            availabilities: &[],
            requests: &[],
            shift_frequency_requirements: &requirements,
        };

        let mut constraint = ShiftFrequencyConstraint::new(ConstraintConfig::soft(500));
        constraint.apply(&mut model, &vars, &context).unwrap();

        let names: Vec<&str> = constraint.violations().iter().map(|(n, _)| n).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"sf_viol_W1_w0"));
        assert!(names.contains(&"sf_viol_W1_r1_w0"));
    }
}
