//! Input and output validation.
//!
//! Two independent gates around the solver:
//!
//! - [`FeasibilityChecker`] runs before model construction and reports
//!   provable infeasibilities without touching the backend.
//! - [`ScheduleValidator`] runs after (or entirely without) a solve and
//!   re-verifies hard rules on any [`Schedule`](crate::models::Schedule),
//!   including hand-edited ones.

mod feasibility;
mod schedule;

pub use feasibility::{FeasibilityChecker, FeasibilityIssue, FeasibilityReport, IssueKind, Severity};
pub use schedule::{ScheduleValidator, ValidationReport, Violation, ViolationType};
