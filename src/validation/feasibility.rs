//! Pre-solve feasibility analysis.
//!
//! Detects input configurations that provably have no solution before any
//! model is built, and reports them with actionable messages naming the
//! workers, shifts, and windows involved. Fatal issues short-circuit the
//! solve; warnings are attached to the result but do not block it.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::constraints::ConstraintConfig;
use crate::models::{
    Availability, AvailabilityType, PeriodCalendar, SchedulingRequest,
    ShiftFrequencyRequirement, ShiftType, Worker,
};

/// How severe a feasibility finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The problem provably has no solution; the backend is never invoked.
    Fatal,
    /// Suspicious but survivable; attached to the result for the caller.
    Warning,
}

/// Category of a feasibility finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Horizon or period grid defect.
    Horizon,
    /// Duplicate worker or shift type id.
    DuplicateId,
    /// Staffing demand exceeds the eligible worker pool.
    Coverage,
    /// Unavailability empties the per-period pool.
    Availability,
    /// A hard request contradicts a restriction.
    RequestConflict,
    /// A shift frequency requirement cannot be met.
    ShiftFrequency,
}

/// One pre-solve diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeasibilityIssue {
    /// Severity of the finding.
    pub severity: Severity,
    /// Category of the finding.
    pub kind: IssueKind,
    /// Actionable description naming the entities involved.
    pub message: String,
}

/// Result of a feasibility check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeasibilityReport {
    /// All findings, in check order.
    pub issues: Vec<FeasibilityIssue>,
}

impl FeasibilityReport {
    /// Whether no fatal issue was found.
    pub fn is_feasible(&self) -> bool {
        !self
            .issues
            .iter()
            .any(|i| i.severity == Severity::Fatal)
    }

    /// The fatal findings.
    pub fn fatal_issues(&self) -> Vec<&FeasibilityIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Fatal)
            .collect()
    }

    /// The warning findings.
    pub fn warnings(&self) -> Vec<&FeasibilityIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .collect()
    }

    fn fatal(&mut self, kind: IssueKind, message: impl Into<String>) {
        self.issues.push(FeasibilityIssue {
            severity: Severity::Fatal,
            kind,
            message: message.into(),
        });
    }

    fn warning(&mut self, kind: IssueKind, message: impl Into<String>) {
        self.issues.push(FeasibilityIssue {
            severity: Severity::Warning,
            kind,
            message: message.into(),
        });
    }
}

/// Pre-solve analyzer over the full input set.
pub struct FeasibilityChecker<'a> {
    workers: &'a [Worker],
    shift_types: &'a [ShiftType],
    calendar: &'a PeriodCalendar,
    availabilities: &'a [Availability],
    requests: &'a [SchedulingRequest],
    shift_frequency_requirements: &'a [ShiftFrequencyRequirement],
    request_config: Option<&'a ConstraintConfig>,
}

impl<'a> FeasibilityChecker<'a> {
    /// Creates a checker over the given inputs.
    ///
    /// `request_config` is the resolved request-constraint configuration, if
    /// any; hard request mode turns request/restriction conflicts fatal.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        workers: &'a [Worker],
        shift_types: &'a [ShiftType],
        calendar: &'a PeriodCalendar,
        availabilities: &'a [Availability],
        requests: &'a [SchedulingRequest],
        shift_frequency_requirements: &'a [ShiftFrequencyRequirement],
        request_config: Option<&'a ConstraintConfig>,
    ) -> Self {
        Self {
            workers,
            shift_types,
            calendar,
            availabilities,
            requests,
            shift_frequency_requirements,
            request_config,
        }
    }

    /// Runs every check and collects the findings.
    pub fn check(&self) -> FeasibilityReport {
        let mut report = FeasibilityReport::default();

        self.check_horizon(&mut report);
        self.check_duplicate_ids(&mut report);
        self.check_coverage_reachability(&mut report);
        self.check_per_period_availability(&mut report);
        self.check_hard_request_conflicts(&mut report);
        self.check_shift_frequency(&mut report);

        if report.is_feasible() {
            info!(
                warnings = report.warnings().len(),
                "feasibility check passed"
            );
        } else {
            warn!(
                issues = report.fatal_issues().len(),
                "feasibility check failed"
            );
            for issue in report.fatal_issues() {
                warn!(kind = ?issue.kind, "{}", issue.message);
            }
        }
        report
    }

    fn check_horizon(&self, report: &mut FeasibilityReport) {
        if self.calendar.num_periods() == 0 {
            report.fatal(IssueKind::Horizon, "no scheduling periods defined");
        }
        if self.calendar.period_length_days() == 0 {
            report.fatal(IssueKind::Horizon, "period length must be at least one day");
        }
        if self.workers.is_empty() {
            report.fatal(IssueKind::Coverage, "no workers defined");
        }
        if self.shift_types.is_empty() {
            report.fatal(IssueKind::Coverage, "no shift types defined");
        }
    }

    fn check_duplicate_ids(&self, report: &mut FeasibilityReport) {
        let mut worker_ids = HashSet::new();
        for worker in self.workers {
            if !worker_ids.insert(worker.id.as_str()) {
                report.fatal(
                    IssueKind::DuplicateId,
                    format!("duplicate worker id '{}'", worker.id),
                );
            }
        }
        let mut shift_ids = HashSet::new();
        for shift_type in self.shift_types {
            if !shift_ids.insert(shift_type.id.as_str()) {
                report.fatal(
                    IssueKind::DuplicateId,
                    format!("duplicate shift type id '{}'", shift_type.id),
                );
            }
        }
    }

    fn eligible_workers(&self, shift_type: &ShiftType) -> Vec<&Worker> {
        self.workers
            .iter()
            .filter(|w| w.is_active && w.can_work_shift(&shift_type.id))
            .collect()
    }

    fn check_coverage_reachability(&self, report: &mut FeasibilityReport) {
        for shift_type in self.shift_types {
            let eligible = self.eligible_workers(shift_type).len();
            if (eligible as u32) < shift_type.workers_required {
                report.fatal(
                    IssueKind::Coverage,
                    format!(
                        "not enough workers for shift type '{}': {} required, {} eligible",
                        shift_type.id, shift_type.workers_required, eligible
                    ),
                );
            }
        }
    }

    fn check_per_period_availability(&self, report: &mut FeasibilityReport) {
        if self.availabilities.is_empty() {
            return;
        }
        for (period, (start, end)) in self.calendar.period_dates().iter().enumerate() {
            for shift_type in self.shift_types {
                if shift_type.workers_required == 0 {
                    continue;
                }
                // A shift with no applicable day in this period demands no one.
                if self
                    .calendar
                    .applicable_day_count(period, shift_type.applicable_days.as_ref())
                    == 0
                {
                    continue;
                }

                let available = self
                    .eligible_workers(shift_type)
                    .iter()
                    .filter(|w| {
                        !self.availabilities.iter().any(|a| {
                            a.availability_type == AvailabilityType::Unavailable
                                && a.worker_id == w.id
                                && a.overlaps(*start, *end)
                                && a.applies_to_shift(&shift_type.id)
                        })
                    })
                    .count();

                if (available as u32) < shift_type.workers_required {
                    report.fatal(
                        IssueKind::Availability,
                        format!(
                            "period {period} ({start} to {end}): not enough workers for \
                             shift type '{}' after restrictions and unavailability: \
                             {} required, {available} eligible",
                            shift_type.id, shift_type.workers_required
                        ),
                    );
                }
            }
        }
    }

    fn check_hard_request_conflicts(&self, report: &mut FeasibilityReport) {
        let hard_requests = self
            .request_config
            .is_some_and(|c| c.enabled && c.is_hard);
        if !hard_requests {
            return;
        }
        for request in self.requests {
            if !request.is_positive {
                continue;
            }
            let Some(worker) = self.workers.iter().find(|w| w.id == request.worker_id) else {
                continue;
            };
            if worker.restricted_shifts.contains(&request.shift_type_id) {
                report.fatal(
                    IssueKind::RequestConflict,
                    format!(
                        "hard positive request by worker '{}' names restricted \
                         shift type '{}'",
                        worker.id, request.shift_type_id
                    ),
                );
            }
        }
    }

    fn check_shift_frequency(&self, report: &mut FeasibilityReport) {
        let num_periods = self.calendar.num_periods();
        let shift_ids: BTreeSet<&str> =
            self.shift_types.iter().map(|st| st.id.as_str()).collect();

        for req in self.shift_frequency_requirements {
            let unknown: Vec<&str> = req
                .shift_types
                .iter()
                .map(String::as_str)
                .filter(|id| !shift_ids.contains(id))
                .collect();
            if !unknown.is_empty() {
                report.warning(
                    IssueKind::ShiftFrequency,
                    format!(
                        "shift frequency requirement for worker '{}' names unknown \
                         shift types: {}",
                        req.worker_id,
                        unknown.join(", ")
                    ),
                );
            }

            let Some(worker) = self.workers.iter().find(|w| w.id == req.worker_id) else {
                report.warning(
                    IssueKind::ShiftFrequency,
                    format!(
                        "shift frequency requirement references unknown worker '{}'",
                        req.worker_id
                    ),
                );
                continue;
            };

            if req.max_periods_between > num_periods {
                report.warning(
                    IssueKind::ShiftFrequency,
                    format!(
                        "shift frequency requirement for worker '{}' has window {} \
                         larger than the {num_periods}-period horizon",
                        req.worker_id, req.max_periods_between
                    ),
                );
            }

            let workable: Vec<&str> = req
                .shift_types
                .iter()
                .map(String::as_str)
                .filter(|id| shift_ids.contains(id) && worker.can_work_shift(id))
                .collect();
            if workable.is_empty() {
                let listed: Vec<&str> = req.shift_types.iter().map(String::as_str).collect();
                report.fatal(
                    IssueKind::ShiftFrequency,
                    format!(
                        "worker '{}' is restricted from every shift type in \
                         their frequency requirement ({})",
                        worker.name,
                        listed.join(", ")
                    ),
                );
            }
        }
    }
}
