//! Post-solve schedule validation.
//!
//! Re-verifies every hard rule on a finished [`Schedule`] without any solver
//! involvement, so solver output and hand-edited schedules are held to the
//! same standard. Soft rules are quantified into statistics with the same
//! semantics the model uses.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{
    Availability, AvailabilityType, Schedule, SchedulingRequest, ShiftFrequencyRequirement,
};

/// Classification of a hard-rule violation found in a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    /// Fewer workers assigned than the shift demands.
    CoverageShortfall,
    /// More workers assigned than the shift demands.
    CoverageExcess,
    /// A worker holds a shift they are restricted from (or is inactive).
    RestrictedAssignment,
    /// A worker holds a shift during an unavailable period.
    UnavailableAssignment,
    /// A frequency-requirement window contains no qualifying assignment.
    MissedFrequencyWindow,
    /// An assignment references an unknown worker or shift type.
    UnknownReference,
}

/// One hard-rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Kind of rule broken.
    pub violation_type: ViolationType,
    /// Worker, shift type, or period the violation attaches to.
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

/// Outcome of validating one schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Hard-rule violations.
    pub violations: Vec<Violation>,
    /// Non-blocking observations.
    pub warnings: Vec<String>,
    /// Quantified soft-rule counters.
    pub statistics: BTreeMap<String, i64>,
}

impl ValidationReport {
    /// Whether no hard rule is violated.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Validates a schedule against the rules its inputs imply.
pub struct ScheduleValidator<'a> {
    schedule: &'a Schedule,
    availabilities: &'a [Availability],
    requests: &'a [SchedulingRequest],
    shift_frequency_requirements: &'a [ShiftFrequencyRequirement],
    shift_frequency_hard: bool,
}

impl<'a> ScheduleValidator<'a> {
    /// Creates a validator for the given schedule.
    pub fn new(schedule: &'a Schedule) -> Self {
        Self {
            schedule,
            availabilities: &[],
            requests: &[],
            shift_frequency_requirements: &[],
            shift_frequency_hard: false,
        }
    }

    /// Supplies availability records to check against.
    pub fn with_availabilities(mut self, availabilities: &'a [Availability]) -> Self {
        self.availabilities = availabilities;
        self
    }

    /// Supplies requests for soft-fulfillment statistics.
    pub fn with_requests(mut self, requests: &'a [SchedulingRequest]) -> Self {
        self.requests = requests;
        self
    }

    /// Supplies frequency requirements; `hard` decides whether missed
    /// windows are violations or statistics.
    pub fn with_shift_frequency_requirements(
        mut self,
        requirements: &'a [ShiftFrequencyRequirement],
        hard: bool,
    ) -> Self {
        self.shift_frequency_requirements = requirements;
        self.shift_frequency_hard = hard;
        self
    }

    /// Runs every check.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        self.check_references(&mut report);
        self.check_coverage(&mut report);
        self.check_restrictions(&mut report);
        self.check_availability(&mut report);
        self.check_shift_frequency(&mut report);
        self.compute_statistics(&mut report);

        report
    }

    fn check_references(&self, report: &mut ValidationReport) {
        for assignment in self.schedule.all_assignments() {
            if self.schedule.worker_by_id(&assignment.worker_id).is_none() {
                report.violations.push(Violation::new(
                    ViolationType::UnknownReference,
                    assignment.worker_id.clone(),
                    format!("assignment references unknown worker '{}'", assignment.worker_id),
                ));
            }
            if self
                .schedule
                .shift_type_by_id(&assignment.shift_type_id)
                .is_none()
            {
                report.violations.push(Violation::new(
                    ViolationType::UnknownReference,
                    assignment.shift_type_id.clone(),
                    format!(
                        "assignment references unknown shift type '{}'",
                        assignment.shift_type_id
                    ),
                ));
            }
        }
    }

    fn check_coverage(&self, report: &mut ValidationReport) {
        for period in &self.schedule.periods {
            for shift_type in &self.schedule.shift_types {
                let applicable = match &shift_type.applicable_days {
                    None => true,
                    Some(days) => {
                        count_weekdays(period.period_start, period.period_end, days) > 0
                    }
                };
                let expected = if applicable {
                    i64::from(shift_type.workers_required)
                } else {
                    0
                };
                let actual = period.shifts_by_type(&shift_type.id).len() as i64;

                if actual < expected {
                    report.violations.push(Violation::new(
                        ViolationType::CoverageShortfall,
                        shift_type.id.clone(),
                        format!(
                            "period {}: shift type '{}' has {actual} assigned, \
                             {expected} required",
                            period.period_index, shift_type.id
                        ),
                    ));
                } else if actual > expected {
                    report.violations.push(Violation::new(
                        ViolationType::CoverageExcess,
                        shift_type.id.clone(),
                        format!(
                            "period {}: shift type '{}' has {actual} assigned, \
                             only {expected} allowed",
                            period.period_index, shift_type.id
                        ),
                    ));
                }
            }
        }
    }

    fn check_restrictions(&self, report: &mut ValidationReport) {
        for assignment in self.schedule.all_assignments() {
            let Some(worker) = self.schedule.worker_by_id(&assignment.worker_id) else {
                continue;
            };
            if !worker.is_active {
                report.violations.push(Violation::new(
                    ViolationType::RestrictedAssignment,
                    worker.id.clone(),
                    format!(
                        "inactive worker '{}' assigned to '{}' in period {}",
                        worker.id, assignment.shift_type_id, assignment.period_index
                    ),
                ));
            } else if !worker.can_work_shift(&assignment.shift_type_id) {
                report.violations.push(Violation::new(
                    ViolationType::RestrictedAssignment,
                    worker.id.clone(),
                    format!(
                        "worker '{}' assigned to restricted shift type '{}' in period {}",
                        worker.id, assignment.shift_type_id, assignment.period_index
                    ),
                ));
            }
        }
    }

    fn check_availability(&self, report: &mut ValidationReport) {
        for period in &self.schedule.periods {
            for assignment in period.assignments.values().flatten() {
                let blocked = self.availabilities.iter().any(|a| {
                    a.availability_type == AvailabilityType::Unavailable
                        && a.worker_id == assignment.worker_id
                        && a.overlaps(period.period_start, period.period_end)
                        && a.applies_to_shift(&assignment.shift_type_id)
                });
                if blocked {
                    report.violations.push(Violation::new(
                        ViolationType::UnavailableAssignment,
                        assignment.worker_id.clone(),
                        format!(
                            "worker '{}' assigned to '{}' in period {} while unavailable",
                            assignment.worker_id,
                            assignment.shift_type_id,
                            period.period_index
                        ),
                    ));
                }
            }
        }
    }

    /// Count of a worker's assignments to any of the given shift types within
    /// `[window_start, window_start + window_size)`.
    fn window_count(
        &self,
        worker_id: &str,
        shift_types: &std::collections::BTreeSet<String>,
        window_start: usize,
        window_size: usize,
    ) -> usize {
        self.schedule
            .periods
            .iter()
            .skip(window_start)
            .take(window_size)
            .flat_map(|p| p.worker_shifts(worker_id))
            .filter(|a| shift_types.contains(&a.shift_type_id))
            .count()
    }

    fn check_shift_frequency(&self, report: &mut ValidationReport) {
        let num_periods = self.schedule.periods.len();
        let mut missed: i64 = 0;

        for req in self.shift_frequency_requirements {
            if self.schedule.worker_by_id(&req.worker_id).is_none() {
                report.warnings.push(format!(
                    "shift frequency requirement references unknown worker '{}'",
                    req.worker_id
                ));
                continue;
            }
            let window_size = req.max_periods_between.min(num_periods);
            if window_size == 0 {
                continue;
            }

            for window_start in 0..=(num_periods - window_size) {
                if self.window_count(&req.worker_id, &req.shift_types, window_start, window_size)
                    > 0
                {
                    continue;
                }
                if self.shift_frequency_hard {
                    report.violations.push(Violation::new(
                        ViolationType::MissedFrequencyWindow,
                        req.worker_id.clone(),
                        format!(
                            "worker '{}' has no qualifying shift in periods \
                             {window_start}..{}",
                            req.worker_id,
                            window_start + window_size
                        ),
                    ));
                } else {
                    missed += 1;
                }
            }
        }
        if !self.shift_frequency_hard {
            report
                .statistics
                .insert("shift_frequency_missed_windows".into(), missed);
        }
    }

    fn compute_statistics(&self, report: &mut ValidationReport) {
        report
            .statistics
            .insert("total_assignments".into(), self.schedule.assignment_count() as i64);

        // Undesirable spread across active workers.
        let undesirable: Vec<&str> = self
            .schedule
            .shift_types
            .iter()
            .filter(|st| st.is_undesirable)
            .map(|st| st.id.as_str())
            .collect();
        let active: Vec<&str> = self
            .schedule
            .workers
            .iter()
            .filter(|w| w.is_active)
            .map(|w| w.id.as_str())
            .collect();
        if !undesirable.is_empty() && active.len() >= 2 {
            let counts: Vec<i64> = active
                .iter()
                .map(|worker_id| {
                    self.schedule
                        .all_assignments()
                        .filter(|a| {
                            a.worker_id == *worker_id
                                && undesirable.contains(&a.shift_type_id.as_str())
                        })
                        .count() as i64
                })
                .collect();
            let spread = counts.iter().max().unwrap_or(&0) - counts.iter().min().unwrap_or(&0);
            report.statistics.insert("fairness_spread".into(), spread);
        }

        // Unmet requests.
        let unmet = self
            .requests
            .iter()
            .filter(|r| {
                let Some(period) = self.schedule.periods.get(r.period_index) else {
                    return false;
                };
                let assigned = period
                    .worker_shifts(&r.worker_id)
                    .iter()
                    .any(|a| a.shift_type_id == r.shift_type_id);
                assigned != r.is_positive
            })
            .count() as i64;
        report.statistics.insert("unmet_requests".into(), unmet);

        // Consecutive same-category assignments.
        let mut consecutive: i64 = 0;
        for worker in &self.schedule.workers {
            let mut categories: Vec<std::collections::BTreeSet<&str>> = Vec::new();
            for period in &self.schedule.periods {
                let held: std::collections::BTreeSet<&str> = period
                    .worker_shifts(&worker.id)
                    .iter()
                    .filter_map(|a| {
                        self.schedule
                            .shift_type_by_id(&a.shift_type_id)
                            .map(|st| st.category.as_str())
                    })
                    .collect();
                categories.push(held);
            }
            for pair in categories.windows(2) {
                consecutive += pair[0].intersection(&pair[1]).count() as i64;
            }
        }
        report
            .statistics
            .insert("consecutive_same_category".into(), consecutive);
    }
}

fn count_weekdays(
    start: NaiveDate,
    end: NaiveDate,
    days: &std::collections::BTreeSet<u8>,
) -> usize {
    let mut count = 0;
    let mut cursor = start;
    while cursor <= end {
        if days.contains(&(cursor.weekday().num_days_from_monday() as u8)) {
            count += 1;
        }
        cursor = cursor + Days::new(1);
    }
    count
}
