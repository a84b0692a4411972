//! Solver orchestration: wiring inputs, constraints, backend, and extraction.
//!
//! One [`ShiftSolver`] instance owns one model and one solve. It walks a
//! fixed phase sequence (`Init → PreCheck → Build → Solve → Extract → Done`),
//! short-circuiting to a `PreSolveInfeasible` result when the pre-solve
//! analysis finds a fatal issue and never touching the backend in that case.
//! Instances are not thread safe; concurrent schedules get their own
//! orchestrator each.

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, info};

use crate::constraints::{ConstraintConfig, ConstraintContext, SchedulingConstraint};
use crate::cp::{CpModel, CpSolution, CpSolver, SolveStatus, SolverParams};
use crate::error::{SolveError, ValidationError};
use crate::models::{
    Availability, ConstraintStats, PeriodCalendar, Schedule, SchedulingRequest,
    ShiftFrequencyRequirement, ShiftType, Worker,
};
use crate::solver::extractor::{constraint_statistics, SolutionExtractor};
use crate::solver::objective::ObjectiveBuilder;
use crate::solver::registry::ConstraintRegistry;
use crate::solver::variables::VariableBuilder;
use crate::validation::{FeasibilityChecker, FeasibilityIssue};

/// Phase of one solve run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SolvePhase {
    Init,
    PreCheck,
    Build,
    Solve,
    Extract,
    Done,
}

impl SolvePhase {
    fn advance(&mut self, next: SolvePhase) {
        debug!(from = ?self, to = ?next, "solve phase transition");
        *self = next;
    }
}

/// Outcome of one solve.
#[derive(Debug, Clone)]
pub struct SolverResult {
    /// Final status, propagated unchanged from the backend (or
    /// `PreSolveInfeasible` when the backend was never invoked).
    pub status: SolveStatus,
    /// The extracted schedule, when a solution exists.
    pub schedule: Option<Schedule>,
    /// Pre-solve findings: every fatal issue on the infeasible path,
    /// surviving warnings otherwise.
    pub feasibility_issues: Vec<FeasibilityIssue>,
    /// Objective value, when a solution exists.
    pub objective_value: Option<i64>,
    /// Wall-clock seconds spent in this call.
    pub wall_time_seconds: f64,
    /// Violation summaries per applied constraint.
    pub per_constraint_stats: BTreeMap<String, ConstraintStats>,
}

/// Orchestrates a single shift-scheduling solve.
///
/// # Example
/// ```no_run
/// use u_roster::cp::{SimpleCpSolver, SolverParams};
/// use u_roster::models::{PeriodCalendar, ShiftType, Worker};
/// use u_roster::solver::ShiftSolver;
///
/// let workers = vec![Worker::new("W1", "Alice"), Worker::new("W2", "Bob")];
/// let shift_types = vec![ShiftType::new("day", "Day")];
/// let calendar = PeriodCalendar::new(
///     "2026-02-02".parse().unwrap(),
///     "2026-02-15".parse().unwrap(),
///     7,
/// ).unwrap();
///
/// let mut solver = ShiftSolver::new(workers, shift_types, calendar, SimpleCpSolver::new())
///     .unwrap();
/// let result = solver.solve(&SolverParams::default()).unwrap();
/// if let Some(schedule) = result.schedule {
///     println!("{} assignments", schedule.assignment_count());
/// }
/// ```
#[derive(Debug)]
pub struct ShiftSolver<S: CpSolver> {
    workers: Vec<Worker>,
    shift_types: Vec<ShiftType>,
    calendar: PeriodCalendar,
    availabilities: Vec<Availability>,
    requests: Vec<SchedulingRequest>,
    shift_frequency_requirements: Vec<ShiftFrequencyRequirement>,
    constraint_configs: BTreeMap<String, ConstraintConfig>,
    registry: ConstraintRegistry,
    schedule_id: String,
    backend: S,
}

impl<S: CpSolver> ShiftSolver<S> {
    /// Creates an orchestrator over validated inputs.
    ///
    /// Every worker and shift type is checked against its own invariants;
    /// defects fail here and never reach the solver.
    pub fn new(
        workers: Vec<Worker>,
        shift_types: Vec<ShiftType>,
        calendar: PeriodCalendar,
        backend: S,
    ) -> Result<Self, ValidationError> {
        for worker in &workers {
            worker.validate()?;
        }
        for shift_type in &shift_types {
            shift_type.validate()?;
        }
        Ok(Self {
            workers,
            shift_types,
            calendar,
            availabilities: Vec::new(),
            requests: Vec::new(),
            shift_frequency_requirements: Vec::new(),
            constraint_configs: BTreeMap::new(),
            registry: ConstraintRegistry::builtin(),
            schedule_id: "schedule".into(),
            backend,
        })
    }

    /// Sets the schedule identifier carried into the output.
    pub fn with_schedule_id(mut self, schedule_id: impl Into<String>) -> Self {
        self.schedule_id = schedule_id.into();
        self
    }

    /// Adds availability records, validating each.
    pub fn with_availabilities(
        mut self,
        availabilities: Vec<Availability>,
    ) -> Result<Self, ValidationError> {
        for record in &availabilities {
            record.validate()?;
        }
        self.availabilities = availabilities;
        Ok(self)
    }

    /// Adds scheduling requests, validating each against the horizon.
    pub fn with_requests(
        mut self,
        requests: Vec<SchedulingRequest>,
    ) -> Result<Self, ValidationError> {
        let num_periods = self.calendar.num_periods();
        for request in &requests {
            request.validate()?;
            if request.period_index >= num_periods {
                return Err(ValidationError::InvalidRequest {
                    worker_id: request.worker_id.clone(),
                    reason: format!(
                        "period_index {} outside the {num_periods}-period horizon",
                        request.period_index
                    ),
                });
            }
        }
        self.requests = requests;
        Ok(self)
    }

    /// Adds shift frequency requirements, validating each.
    pub fn with_shift_frequency_requirements(
        mut self,
        requirements: Vec<ShiftFrequencyRequirement>,
    ) -> Result<Self, ValidationError> {
        for requirement in &requirements {
            requirement.validate()?;
        }
        self.shift_frequency_requirements = requirements;
        Ok(self)
    }

    /// Overrides the configuration of one constraint.
    pub fn with_constraint_config(
        mut self,
        constraint_id: impl Into<String>,
        config: ConstraintConfig,
    ) -> Self {
        self.constraint_configs.insert(constraint_id.into(), config);
        self
    }

    /// Whether a registry entry applies in this run.
    ///
    /// The request constraint auto-enables only when requests exist and the
    /// caller did not configure it explicitly; an explicit `enabled = false`
    /// always wins.
    fn is_applied(&self, constraint_id: &str, config: &ConstraintConfig) -> bool {
        if constraint_id == "request" && !self.constraint_configs.contains_key("request") {
            return !self.requests.is_empty();
        }
        config.enabled
    }

    /// Runs the full solve pipeline.
    pub fn solve(&mut self, params: &SolverParams) -> Result<SolverResult, SolveError> {
        let started = Instant::now();
        let mut phase = SolvePhase::Init;
        params.validate()?;

        // Reject configs naming constraints the registry does not know.
        for constraint_id in self.constraint_configs.keys() {
            self.registry.resolve_config(
                constraint_id,
                self.constraint_configs.get(constraint_id),
            )?;
        }

        phase.advance(SolvePhase::PreCheck);
        let request_config = self
            .registry
            .resolve_config("request", self.constraint_configs.get("request"))?;
        let report = FeasibilityChecker::new(
            &self.workers,
            &self.shift_types,
            &self.calendar,
            &self.availabilities,
            &self.requests,
            &self.shift_frequency_requirements,
            Some(&request_config),
        )
        .check();

        if !report.is_feasible() {
            return Ok(SolverResult {
                status: SolveStatus::PreSolveInfeasible,
                schedule: None,
                feasibility_issues: report.issues,
                objective_value: None,
                wall_time_seconds: started.elapsed().as_secs_f64(),
                per_constraint_stats: BTreeMap::new(),
            });
        }
        let warnings: Vec<FeasibilityIssue> =
            report.warnings().into_iter().cloned().collect();

        phase.advance(SolvePhase::Build);
        let mut model = CpModel::new(self.schedule_id.clone());
        let vars = VariableBuilder::new(
            &self.workers,
            &self.shift_types,
            self.calendar.num_periods(),
        )
        .build(&mut model)?;

        let ctx = ConstraintContext {
            workers: &self.workers,
            shift_types: &self.shift_types,
            calendar: &self.calendar,
            availabilities: &self.availabilities,
            requests: &self.requests,
            shift_frequency_requirements: &self.shift_frequency_requirements,
        };

        let mut applied: Vec<Box<dyn SchedulingConstraint>> = Vec::new();
        for entry in self.registry.iter() {
            let config = self.registry.resolve_config(
                entry.constraint_id,
                self.constraint_configs.get(entry.constraint_id),
            )?;
            if !self.is_applied(entry.constraint_id, &config) {
                continue;
            }
            let mut constraint = self
                .registry
                .instantiate(entry.constraint_id, config)
                .ok_or_else(|| {
                    SolveError::CoreInvariantBroken(format!(
                        "registry entry '{}' has no implementation",
                        entry.constraint_id
                    ))
                })?;
            constraint.apply(&mut model, &vars, &ctx).map_err(|e| {
                tracing::error!(
                    constraint_id = entry.constraint_id,
                    error = %e,
                    "constraint application failed"
                );
                e
            })?;
            debug!(
                constraint_id = entry.constraint_id,
                statements = constraint.emitted_statements(),
                violations = constraint.violations().len(),
                "constraint applied"
            );
            applied.push(constraint);
        }

        let mut objective = ObjectiveBuilder::new();
        for constraint in &applied {
            objective.add_constraint(constraint.as_ref());
        }
        objective.build(&mut model);
        debug!(
            variables = model.num_vars(),
            constraints = model.constraint_count(),
            objective_terms = objective.terms().len(),
            "model built"
        );

        phase.advance(SolvePhase::Solve);
        let solution = self.run_backend(&model, params)?;
        info!(
            status = %solution.status,
            objective = ?solution.objective_value,
            "solve finished"
        );

        phase.advance(SolvePhase::Extract);
        let result = if solution.is_solution_found() {
            let per_constraint_stats = constraint_statistics(&applied, &solution);
            let mut schedule = SolutionExtractor::new(
                &solution,
                &vars,
                &self.workers,
                &self.shift_types,
                &self.calendar,
                &self.schedule_id,
            )
            .extract()?;
            schedule.statistics.constraints = per_constraint_stats.clone();

            SolverResult {
                status: solution.status,
                schedule: Some(schedule),
                feasibility_issues: warnings,
                objective_value: solution.objective_value,
                wall_time_seconds: started.elapsed().as_secs_f64(),
                per_constraint_stats,
            }
        } else {
            SolverResult {
                status: solution.status,
                schedule: None,
                feasibility_issues: warnings,
                objective_value: None,
                wall_time_seconds: started.elapsed().as_secs_f64(),
                per_constraint_stats: BTreeMap::new(),
            }
        };

        phase.advance(SolvePhase::Done);
        Ok(result)
    }

    /// Runs the backend, optionally with a quick first pass.
    ///
    /// A positive `quick_solve_seconds` bounds an initial attempt; its
    /// solution is kept if one is found, otherwise the full limit runs.
    fn run_backend(
        &self,
        model: &CpModel,
        params: &SolverParams,
    ) -> Result<CpSolution, SolveError> {
        if params.quick_solve_seconds > 0 {
            let quick = params.with_time_limit(params.quick_solve_seconds);
            let first = self.backend.solve(model, &quick)?;
            if first.is_solution_found() {
                debug!("quick solve succeeded");
                return Ok(first);
            }
            debug!("quick solve found nothing, falling through to full limit");
        }
        self.backend.solve(model, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::SimpleCpSolver;
    use crate::models::PeriodType;
    use crate::validation::{IssueKind, ScheduleValidator};

    fn d(s: &str) -> chrono::NaiveDate {
        s.parse().unwrap()
    }

    fn daily_calendar(periods: u32) -> PeriodCalendar {
        let start = d("2026-02-02");
        let end = start + chrono::Days::new(u64::from(periods) - 1);
        PeriodCalendar::new(start, end, 1).unwrap()
    }

    fn solver(
        workers: Vec<Worker>,
        shift_types: Vec<ShiftType>,
        calendar: PeriodCalendar,
    ) -> ShiftSolver<SimpleCpSolver> {
        ShiftSolver::new(workers, shift_types, calendar, SimpleCpSolver::new()).unwrap()
    }

    /// Minimal feasibility: two shifts, three workers, two periods.
    #[test]
    fn test_minimal_feasibility() {
        let workers = vec![
            Worker::new("A", "A"),
            Worker::new("B", "B"),
            Worker::new("C", "C"),
        ];
        let shift_types = vec![
            ShiftType::new("day", "Day"),
            ShiftType::new("night", "Night").undesirable(),
        ];
        let mut solver = solver(workers, shift_types, daily_calendar(2));
        let result = solver.solve(&SolverParams::default()).unwrap();

        assert_eq!(result.status, SolveStatus::Optimal);
        let schedule = result.schedule.unwrap();

        // Each period has exactly one day and one night assignment.
        for period in &schedule.periods {
            assert_eq!(period.shifts_by_type("day").len(), 1);
            assert_eq!(period.shifts_by_type("night").len(), 1);
        }

        // Fairness kept the night spread at 1 (two nights over three workers).
        let fairness = &result.per_constraint_stats["fairness"];
        assert_eq!(fairness.weighted_penalty, 1000);
        assert_eq!(result.objective_value, Some(1000));
    }

    /// Restriction bottleneck: the two eligible workers take the shift.
    #[test]
    fn test_restriction_bottleneck() {
        let workers = vec![
            Worker::new("A", "A"),
            Worker::new("B", "B"),
            Worker::new("C", "C").with_restricted_shift("night"),
        ];
        let shift_types = vec![ShiftType::new("night", "Night").with_workers_required(2)];
        let mut solver = solver(workers, shift_types, daily_calendar(1));
        let result = solver.solve(&SolverParams::default()).unwrap();

        assert_eq!(result.status, SolveStatus::Optimal);
        let schedule = result.schedule.unwrap();
        let night_workers: Vec<&str> = schedule.periods[0]
            .shifts_by_type("night")
            .iter()
            .map(|a| a.worker_id.as_str())
            .collect();
        assert_eq!(night_workers.len(), 2);
        assert!(night_workers.contains(&"A"));
        assert!(night_workers.contains(&"B"));
        assert!(!night_workers.contains(&"C"));
    }

    /// Infeasible restrictions are caught before the backend runs.
    #[test]
    fn test_infeasible_restrictions_pre_solve() {
        let workers = vec![
            Worker::new("A", "A").with_restricted_shift("night"),
            Worker::new("B", "B"),
            Worker::new("C", "C").with_restricted_shift("night"),
        ];
        let shift_types = vec![ShiftType::new("night", "Night").with_workers_required(2)];
        let mut solver = solver(workers, shift_types, daily_calendar(1));
        let result = solver.solve(&SolverParams::default()).unwrap();

        assert_eq!(result.status, SolveStatus::PreSolveInfeasible);
        assert!(result.schedule.is_none());
        let issue = &result.feasibility_issues[0];
        assert_eq!(issue.kind, IssueKind::Coverage);
        assert!(issue.message.contains("night"));
        assert!(issue.message.contains("2 required, 1 eligible"));
    }

    /// Soft shift-frequency: unmeetable windows surface as counted
    /// violations with their penalty in the stats.
    #[test]
    fn test_shift_frequency_soft_violations_counted() {
        let workers = vec![Worker::new("A", "A")];
        let shift_types = vec![
            ShiftType::new("X", "X").with_workers_required(0),
            ShiftType::new("Y", "Y").with_workers_required(0),
            ShiftType::new("Z", "Z"),
        ];
        let requirements = vec![ShiftFrequencyRequirement::new(
            "A",
            ["X".to_string(), "Y".to_string()],
            2,
        )];
        let mut solver = solver(workers, shift_types, daily_calendar(4))
            .with_shift_frequency_requirements(requirements)
            .unwrap()
            .with_constraint_config("shift_frequency", ConstraintConfig::soft(500));
        let result = solver.solve(&SolverParams::default()).unwrap();

        assert_eq!(result.status, SolveStatus::Optimal);
        let schedule = result.schedule.as_ref().unwrap();
        // Coverage pins X and Y to zero, so A works Z every period and every
        // window of 2 is violated: 3 windows over 4 periods.
        assert_eq!(schedule.statistics.workers["A"].total_shifts, 4);
        let stats = &result.per_constraint_stats["shift_frequency"];
        assert_eq!(stats.active_violations, 3);
        assert_eq!(stats.weighted_penalty, 1500);
        assert!(!stats.worst_offenders.is_empty());
    }

    /// Unavailability: the blocked day goes to the other worker.
    #[test]
    fn test_unavailability_routes_assignment() {
        let workers = vec![Worker::new("A", "A"), Worker::new("B", "B")];
        let shift_types = vec![ShiftType::new("day", "Day")];
        let calendar = PeriodCalendar::new(d("2026-02-01"), d("2026-02-03"), 1).unwrap();
        let availabilities =
            vec![Availability::unavailable("A", d("2026-02-02"), d("2026-02-02"))];

        let mut solver = ShiftSolver::new(workers, shift_types, calendar, SimpleCpSolver::new())
            .unwrap()
            .with_availabilities(availabilities)
            .unwrap();
        let result = solver.solve(&SolverParams::default()).unwrap();

        assert_eq!(result.status, SolveStatus::Optimal);
        let schedule = result.schedule.unwrap();
        // Day 1 (2026-02-02) must be B; A never appears there.
        let day1 = schedule.periods[1].shifts_by_type("day");
        assert_eq!(day1.len(), 1);
        assert_eq!(day1[0].worker_id, "B");
        assert!(schedule.periods[1].worker_shifts("A").is_empty());
        // Every period is covered.
        for period in &schedule.periods {
            assert_eq!(period.shifts_by_type("day").len(), 1);
        }
    }

    /// Single period, single worker, single shift: trivially solvable.
    #[test]
    fn test_single_period_trivial() {
        let workers = vec![Worker::new("A", "A")];
        let shift_types = vec![ShiftType::new("day", "Day")];
        let mut solver = solver(workers, shift_types, daily_calendar(1));
        let result = solver.solve(&SolverParams::default()).unwrap();

        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.schedule.unwrap().assignment_count(), 1);
    }

    /// Worker pool equal to the demand: the assignment is unique.
    #[test]
    fn test_tight_pool_unique_assignment() {
        let workers = vec![
            Worker::new("A", "A"),
            Worker::new("B", "B"),
            Worker::new("C", "C"),
        ];
        let shift_types = vec![ShiftType::new("day", "Day").with_workers_required(3)];
        let mut solver = solver(workers, shift_types, daily_calendar(1));
        let result = solver.solve(&SolverParams::default()).unwrap();

        assert_eq!(result.status, SolveStatus::Optimal);
        let schedule = result.schedule.unwrap();
        assert_eq!(schedule.periods[0].shifts_by_type("day").len(), 3);
        for worker in ["A", "B", "C"] {
            assert_eq!(schedule.periods[0].worker_shifts(worker).len(), 1);
        }
    }

    /// No requests and no explicit request config: the constraint is absent.
    #[test]
    fn test_request_not_applied_without_requests() {
        let workers = vec![Worker::new("A", "A")];
        let shift_types = vec![ShiftType::new("day", "Day")];
        let mut solver = solver(workers, shift_types, daily_calendar(1));
        let result = solver.solve(&SolverParams::default()).unwrap();

        assert!(!result.per_constraint_stats.contains_key("request"));
    }

    /// Requests auto-enable the constraint; explicit disable wins.
    #[test]
    fn test_request_auto_enable_policy() {
        let workers = vec![Worker::new("A", "A"), Worker::new("B", "B")];
        let shift_types = vec![ShiftType::new("day", "Day")];
        let requests = vec![SchedulingRequest::positive("A", "day", 0)];

        let mut auto = solver(
            workers.clone(),
            shift_types.clone(),
            daily_calendar(1),
        )
        .with_requests(requests.clone())
        .unwrap();
        let result = auto.solve(&SolverParams::default()).unwrap();
        assert!(result.per_constraint_stats.contains_key("request"));
        // The request was grantable, so it was granted.
        let schedule = result.schedule.unwrap();
        assert_eq!(schedule.periods[0].shifts_by_type("day")[0].worker_id, "A");

        let mut disabled = solver(workers, shift_types, daily_calendar(1))
            .with_requests(requests)
            .unwrap()
            .with_constraint_config("request", ConstraintConfig::soft(150).disabled());
        let result = disabled.solve(&SolverParams::default()).unwrap();
        assert!(!result.per_constraint_stats.contains_key("request"));
    }

    /// Unknown constraint names are rejected as configuration errors.
    #[test]
    fn test_unknown_constraint_config_rejected() {
        let workers = vec![Worker::new("A", "A")];
        let shift_types = vec![ShiftType::new("day", "Day")];
        let mut solver = solver(workers, shift_types, daily_calendar(1))
            .with_constraint_config("no_such_rule", ConstraintConfig::hard());
        let err = solver.solve(&SolverParams::default()).unwrap_err();
        assert!(matches!(
            err,
            SolveError::Config(crate::error::ConfigError::UnknownConstraint(ref id))
                if id == "no_such_rule"
        ));
    }

    /// Invalid domain objects fail at construction, never at solve.
    #[test]
    fn test_validation_fails_fast() {
        let bad_worker = Worker::new("A", "A")
            .with_restricted_shift("day")
            .with_preferred_shift("day");
        let err = ShiftSolver::new(
            vec![bad_worker],
            vec![ShiftType::new("day", "Day")],
            daily_calendar(1),
            SimpleCpSolver::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidWorker { .. }));

        let err = solver(
            vec![Worker::new("A", "A")],
            vec![ShiftType::new("day", "Day")],
            daily_calendar(1),
        )
        .with_requests(vec![SchedulingRequest::positive("A", "day", 9)])
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidRequest { .. }));
    }

    /// The post-solve validator agrees with the model: no hard violations.
    #[test]
    fn test_validator_agrees_with_solver() {
        let workers = vec![
            Worker::new("A", "A").with_restricted_shift("night"),
            Worker::new("B", "B"),
            Worker::new("C", "C"),
        ];
        let shift_types = vec![
            ShiftType::new("day", "Day"),
            ShiftType::new("night", "Night").undesirable(),
        ];
        let availabilities =
            vec![Availability::unavailable("B", d("2026-02-03"), d("2026-02-03"))];
        let calendar = PeriodCalendar::new(d("2026-02-02"), d("2026-02-04"), 1).unwrap();

        let mut solver = ShiftSolver::new(
            workers,
            shift_types,
            calendar,
            SimpleCpSolver::new(),
        )
        .unwrap()
        .with_availabilities(availabilities.clone())
        .unwrap();
        let result = solver.solve(&SolverParams::default()).unwrap();
        assert_eq!(result.status, SolveStatus::Optimal);

        let schedule = result.schedule.unwrap();
        let report = ScheduleValidator::new(&schedule)
            .with_availabilities(&availabilities)
            .validate();
        assert!(report.is_valid(), "violations: {:?}", report.violations);
    }

    /// Schedule JSON round-trips through the persisted shape.
    #[test]
    fn test_schedule_round_trip() {
        let workers = vec![Worker::new("A", "A"), Worker::new("B", "B")];
        let shift_types = vec![ShiftType::new("day", "Day")];
        let calendar = PeriodCalendar::new(d("2026-02-02"), d("2026-02-15"), 7).unwrap();
        let mut solver =
            ShiftSolver::new(workers, shift_types, calendar, SimpleCpSolver::new())
                .unwrap()
                .with_schedule_id("SCH-RT");
        let result = solver.solve(&SolverParams::default()).unwrap();

        let schedule = result.schedule.unwrap();
        assert_eq!(schedule.schedule_id, "SCH-RT");
        assert_eq!(schedule.period_type, PeriodType::Week);

        let json = serde_json::to_string(&schedule).unwrap();
        let back: Schedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schedule);
    }

    /// Quick-solve keeps the first solution it finds.
    #[test]
    fn test_quick_solve_path() {
        let workers = vec![Worker::new("A", "A")];
        let shift_types = vec![ShiftType::new("day", "Day")];
        let mut solver = solver(workers, shift_types, daily_calendar(1));
        let params = SolverParams {
            quick_solve_seconds: 5,
            ..Default::default()
        };
        let result = solver.solve(&params).unwrap();
        assert!(result.status.has_solution());
    }

    /// Feasibility warnings survive onto a successful result.
    #[test]
    fn test_warnings_attached_to_result() {
        let workers = vec![Worker::new("A", "A")];
        let shift_types = vec![ShiftType::new("day", "Day")];
        // Oversized shift-frequency window: warning, not fatal.
        let requirements =
            vec![ShiftFrequencyRequirement::new("A", ["day".to_string()], 9)];
        let mut solver = solver(workers, shift_types, daily_calendar(2))
            .with_shift_frequency_requirements(requirements)
            .unwrap()
            .with_constraint_config("shift_frequency", ConstraintConfig::soft(500));
        let result = solver.solve(&SolverParams::default()).unwrap();

        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.feasibility_issues.len(), 1);
        assert_eq!(result.feasibility_issues[0].kind, IssueKind::ShiftFrequency);
    }
}
