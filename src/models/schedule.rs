//! Schedule (solution) model.
//!
//! A schedule is the complete assignment of workers to shift types across
//! all periods of the horizon, together with solve metadata and statistics.
//! Assignments reference workers and shift types by id; times and durations
//! always come from the [`ShiftType`] at presentation time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::calendar::PeriodType;
use super::shift::ShiftType;
use super::worker::Worker;
use crate::cp::SolveStatus;

/// One worker-shift-date assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned shift type.
    pub shift_type_id: String,
    /// Date the assignment starts (first day of its period).
    pub date: NaiveDate,
    /// Assigned worker.
    pub worker_id: String,
    /// Period the assignment belongs to (0-indexed).
    pub period_index: usize,
}

/// All assignments for one scheduling period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodAssignment {
    /// 0-based index of this period.
    pub period_index: usize,
    /// Period start date (inclusive).
    #[serde(rename = "start")]
    pub period_start: NaiveDate,
    /// Period end date (inclusive).
    #[serde(rename = "end")]
    pub period_end: NaiveDate,
    /// Worker id to that worker's assignments in this period.
    #[serde(default)]
    pub assignments: BTreeMap<String, Vec<Assignment>>,
}

impl PeriodAssignment {
    /// Creates an empty period assignment.
    pub fn new(period_index: usize, period_start: NaiveDate, period_end: NaiveDate) -> Self {
        Self {
            period_index,
            period_start,
            period_end,
            assignments: BTreeMap::new(),
        }
    }

    /// All shifts assigned to a worker in this period (empty if none).
    pub fn worker_shifts(&self, worker_id: &str) -> &[Assignment] {
        self.assignments
            .get(worker_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All assignments of a given shift type in this period.
    pub fn shifts_by_type(&self, shift_type_id: &str) -> Vec<&Assignment> {
        self.assignments
            .values()
            .flatten()
            .filter(|a| a.shift_type_id == shift_type_id)
            .collect()
    }

    /// Total number of assignments in this period.
    pub fn assignment_count(&self) -> usize {
        self.assignments.values().map(Vec::len).sum()
    }
}

/// Per-worker assignment counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStats {
    /// Total assignments across the horizon.
    pub total_shifts: u32,
    /// Periods with at least one assignment.
    pub periods_worked: u32,
    /// Assignment count per shift type.
    #[serde(default)]
    pub shifts_by_type: BTreeMap<String, u32>,
}

/// Per-constraint violation summary for one solve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintStats {
    /// Violation variables that are true in the solution.
    pub active_violations: u32,
    /// Weighted penalty this constraint contributed to the objective.
    pub weighted_penalty: i64,
    /// Names of the largest contributors, worst first.
    #[serde(default)]
    pub worst_offenders: Vec<String>,
}

/// Schedule-level statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStatistics {
    /// Per-worker counters.
    #[serde(default)]
    pub workers: BTreeMap<String, WorkerStats>,
    /// Per-constraint violation summaries.
    #[serde(default)]
    pub constraints: BTreeMap<String, ConstraintStats>,
}

/// Complete schedule for a horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Identifier for this schedule.
    pub schedule_id: String,
    /// First day of the horizon (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the horizon (inclusive).
    pub end_date: NaiveDate,
    /// Label derived from the period length.
    pub period_type: PeriodType,
    /// Number of periods in the horizon.
    pub num_periods: usize,
    /// Workers this schedule covers.
    pub workers: Vec<Worker>,
    /// Shift types this schedule covers.
    pub shift_types: Vec<ShiftType>,
    /// One entry per period, in order.
    pub periods: Vec<PeriodAssignment>,
    /// Solver outcome that produced this schedule.
    pub status: SolveStatus,
    /// Objective value, when one was computed.
    pub objective_value: Option<i64>,
    /// Wall-clock solve time in seconds.
    pub solve_time: f64,
    /// Per-worker and per-constraint statistics.
    #[serde(default)]
    pub statistics: ScheduleStatistics,
}

impl Schedule {
    /// Finds a worker by id.
    pub fn worker_by_id(&self, worker_id: &str) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == worker_id)
    }

    /// Finds a shift type by id.
    pub fn shift_type_by_id(&self, shift_type_id: &str) -> Option<&ShiftType> {
        self.shift_types.iter().find(|st| st.id == shift_type_id)
    }

    /// Total number of assignments across all periods.
    pub fn assignment_count(&self) -> usize {
        self.periods.iter().map(PeriodAssignment::assignment_count).sum()
    }

    /// Iterates every assignment in period order.
    pub fn all_assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.periods
            .iter()
            .flat_map(|p| p.assignments.values().flatten())
    }
}
