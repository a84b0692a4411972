//! Solution extraction: from solved variables back to a typed schedule.

use std::collections::BTreeMap;

use crate::constraints::{SchedulingConstraint, ViolationKind};
use crate::cp::CpSolution;
use crate::error::SolveError;
use crate::models::{
    Assignment, ConstraintStats, PeriodAssignment, PeriodCalendar, Schedule,
    ScheduleStatistics, ShiftType, Worker,
};
use crate::solver::SolverVariables;

/// Number of named offenders kept per constraint.
const MAX_WORST_OFFENDERS: usize = 5;

/// Reads a solved model back into a [`Schedule`].
///
/// Every assignment boolean valued 1 becomes an [`Assignment`] dated at the
/// first day of its period, grouped per period; per-worker counters are
/// accumulated alongside.
pub struct SolutionExtractor<'a> {
    solution: &'a CpSolution,
    vars: &'a SolverVariables,
    workers: &'a [Worker],
    shift_types: &'a [ShiftType],
    calendar: &'a PeriodCalendar,
    schedule_id: &'a str,
}

impl<'a> SolutionExtractor<'a> {
    /// Creates an extractor over a solved model.
    pub fn new(
        solution: &'a CpSolution,
        vars: &'a SolverVariables,
        workers: &'a [Worker],
        shift_types: &'a [ShiftType],
        calendar: &'a PeriodCalendar,
        schedule_id: &'a str,
    ) -> Self {
        Self {
            solution,
            vars,
            workers,
            shift_types,
            calendar,
            schedule_id,
        }
    }

    /// Builds the schedule with per-worker statistics.
    ///
    /// Per-constraint statistics are attached by the orchestrator, which
    /// owns the applied constraint set.
    pub fn extract(&self) -> Result<Schedule, SolveError> {
        if !self.solution.is_solution_found() {
            return Err(SolveError::CoreInvariantBroken(
                "extraction attempted without a solution".into(),
            ));
        }

        let num_periods = self.calendar.num_periods();
        let mut periods: Vec<PeriodAssignment> = self
            .calendar
            .period_dates()
            .iter()
            .enumerate()
            .map(|(index, (start, end))| PeriodAssignment::new(index, *start, *end))
            .collect();

        let mut worker_stats: BTreeMap<String, crate::models::WorkerStats> = BTreeMap::new();

        for worker in self.workers {
            let stats = worker_stats.entry(worker.id.clone()).or_default();
            for period in 0..num_periods {
                let mut assigned_here = 0u32;
                for shift_type in self.shift_types {
                    let var = self.vars.assignment_var(&worker.id, period, &shift_type.id)?;
                    if self.solution.value_of(var) != 1 {
                        continue;
                    }
                    let date = periods[period].period_start;
                    periods[period]
                        .assignments
                        .entry(worker.id.clone())
                        .or_default()
                        .push(Assignment {
                            shift_type_id: shift_type.id.clone(),
                            date,
                            worker_id: worker.id.clone(),
                            period_index: period,
                        });
                    assigned_here += 1;
                    *stats.shifts_by_type.entry(shift_type.id.clone()).or_insert(0) += 1;
                }
                if assigned_here > 0 {
                    stats.periods_worked += 1;
                    stats.total_shifts += assigned_here;
                }
            }
        }

        Ok(Schedule {
            schedule_id: self.schedule_id.to_string(),
            start_date: self.calendar.start_date(),
            end_date: self.calendar.end_date(),
            period_type: self.calendar.period_type(),
            num_periods,
            workers: self.workers.to_vec(),
            shift_types: self.shift_types.to_vec(),
            periods,
            status: self.solution.status,
            objective_value: self.solution.objective_value,
            solve_time: self.solution.wall_time.as_secs_f64(),
            statistics: ScheduleStatistics {
                workers: worker_stats,
                constraints: BTreeMap::new(),
            },
        })
    }
}

/// Summarizes each applied constraint's violations against a solution.
///
/// `violation` variables count as active when valued 1; `objective_target`
/// variables contribute their value times the constraint weight; `auxiliary`
/// variables are introspection-only.
pub fn constraint_statistics(
    applied: &[Box<dyn SchedulingConstraint>],
    solution: &CpSolution,
) -> BTreeMap<String, ConstraintStats> {
    let mut all_stats = BTreeMap::new();

    for constraint in applied {
        let mut stats = ConstraintStats::default();
        let mut contributions: Vec<(String, i64)> = Vec::new();

        if !constraint.is_hard() {
            let violations = constraint.violations();
            for (name, var) in violations.iter() {
                let value = solution.value_of(var);
                let contribution = match violations.kind_of(name) {
                    Some(ViolationKind::Auxiliary) => continue,
                    Some(ViolationKind::ObjectiveTarget) => constraint.weight() * value,
                    _ => {
                        if value == 1 {
                            stats.active_violations += 1;
                        }
                        constraint.weight() * violations.priority_of(name).unwrap_or(1) * value
                    }
                };
                if contribution > 0 {
                    contributions.push((name.to_string(), contribution));
                }
                stats.weighted_penalty += contribution;
            }
        }

        contributions.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        stats.worst_offenders = contributions
            .into_iter()
            .take(MAX_WORST_OFFENDERS)
            .map(|(name, _)| name)
            .collect();

        all_stats.insert(constraint.constraint_id().to_string(), stats);
    }
    all_stats
}
