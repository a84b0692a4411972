//! Solver interface: parameters, statuses, solutions.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::model::{CpModel, IntVar};
use crate::error::{ConfigError, SolveError};

/// Outcome classification of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Proven-optimal solution found.
    Optimal,
    /// Feasible solution found; optimality not proven (typically a timeout).
    Feasible,
    /// Proven infeasible.
    Infeasible,
    /// No conclusion within the limit.
    Unknown,
    /// Pre-solve analysis found the inputs provably unsatisfiable; the
    /// backend was never invoked.
    PreSolveInfeasible,
}

impl SolveStatus {
    /// Whether a solution is available for extraction.
    pub fn has_solution(self) -> bool {
        matches!(self, Self::Optimal | Self::Feasible)
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Optimal => "optimal",
            Self::Feasible => "feasible",
            Self::Infeasible => "infeasible",
            Self::Unknown => "unknown",
            Self::PreSolveInfeasible => "pre_solve_infeasible",
        };
        f.write_str(s)
    }
}

/// Backend solver parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverParams {
    /// Overall wall-clock limit in seconds, >= 1.
    pub time_limit_seconds: u64,
    /// Initial quick-pass limit in seconds; 0 disables the quick pass.
    pub quick_solve_seconds: u64,
    /// Worker threads the backend may use, >= 1.
    pub num_search_workers: u32,
    /// Whether the backend should log search progress.
    pub log_search_progress: bool,
    /// Relative optimality gap the backend may stop at, >= 0.
    pub optimality_tolerance: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            time_limit_seconds: 300,
            quick_solve_seconds: 0,
            num_search_workers: 1,
            log_search_progress: false,
            optimality_tolerance: 0.0,
        }
    }
}

impl SolverParams {
    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_limit_seconds < 1 {
            return Err(ConfigError::InvalidTime(
                "time_limit_seconds must be >= 1".into(),
            ));
        }
        if self.num_search_workers < 1 {
            return Err(ConfigError::InvalidTime(
                "num_search_workers must be >= 1".into(),
            ));
        }
        if self.optimality_tolerance < 0.0 {
            return Err(ConfigError::InvalidTime(
                "optimality_tolerance must be >= 0".into(),
            ));
        }
        Ok(())
    }

    /// A copy of these parameters with a different time limit.
    pub fn with_time_limit(&self, seconds: u64) -> Self {
        Self {
            time_limit_seconds: seconds,
            ..self.clone()
        }
    }
}

/// A solved (or failed) model with value readback.
#[derive(Debug, Clone)]
pub struct CpSolution {
    /// Outcome classification.
    pub status: SolveStatus,
    /// Objective value, when a solution exists and an objective was set.
    pub objective_value: Option<i64>,
    /// Wall-clock time spent solving.
    pub wall_time: Duration,
    values: Vec<i64>,
}

impl CpSolution {
    /// Builds a solution holding concrete variable values.
    pub fn with_values(
        status: SolveStatus,
        objective_value: Option<i64>,
        wall_time: Duration,
        values: Vec<i64>,
    ) -> Self {
        Self {
            status,
            objective_value,
            wall_time,
            values,
        }
    }

    /// Builds a solution with no values (infeasible / unknown).
    pub fn empty(status: SolveStatus, wall_time: Duration) -> Self {
        Self {
            status,
            objective_value: None,
            wall_time,
            values: Vec::new(),
        }
    }

    /// Whether variable values can be read back.
    pub fn is_solution_found(&self) -> bool {
        self.status.has_solution()
    }

    /// Reads a variable's value. Only meaningful when a solution was found.
    pub fn value_of(&self, var: IntVar) -> i64 {
        self.values[var.index()]
    }
}

/// Abstract CP solver backend.
///
/// A backend receives the finished model read-only and returns a solution.
/// It may parallelize internally (`num_search_workers`) but must not retain
/// references past the call.
pub trait CpSolver {
    /// Solves the model within the given parameters.
    ///
    /// Timeouts are not errors: they surface as [`SolveStatus::Feasible`]
    /// (best-so-far) or [`SolveStatus::Unknown`]. `Err` is reserved for
    /// backend faults.
    fn solve(&self, model: &CpModel, params: &SolverParams) -> Result<CpSolution, SolveError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_validation() {
        assert!(SolverParams::default().validate().is_ok());

        let p = SolverParams {
            time_limit_seconds: 0,
            ..Default::default()
        };
        assert!(p.validate().is_err());

        let p = SolverParams {
            num_search_workers: 0,
            ..Default::default()
        };
        assert!(p.validate().is_err());

        let p = SolverParams {
            optimality_tolerance: -0.1,
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_with_time_limit() {
        let p = SolverParams::default().with_time_limit(5);
        assert_eq!(p.time_limit_seconds, 5);
        assert_eq!(p.num_search_workers, 1);
    }

    #[test]
    fn test_status_has_solution() {
        assert!(SolveStatus::Optimal.has_solution());
        assert!(SolveStatus::Feasible.has_solution());
        assert!(!SolveStatus::Infeasible.has_solution());
        assert!(!SolveStatus::Unknown.has_solution());
        assert!(!SolveStatus::PreSolveInfeasible.has_solution());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SolveStatus::Optimal.to_string(), "optimal");
        assert_eq!(
            SolveStatus::PreSolveInfeasible.to_string(),
            "pre_solve_infeasible"
        );
    }
}
