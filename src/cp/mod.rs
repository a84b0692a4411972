//! Constraint-programming abstraction.
//!
//! Defines the minimal CP-SAT-style surface the scheduling core depends on:
//! boolean variables, bounded integers, linear (in)equalities, reified
//! implications, and a linear minimization objective. Any backend that can
//! express these qualifies; the host wires in a real one, while
//! [`SimpleCpSolver`] provides an exact, deterministic in-process backend
//! for tests and small instances.
//!
//! # Reference
//! - Rossi et al. (2006), "Handbook of Constraint Programming"

mod model;
mod simple;
mod solve;

pub use model::{CmpOp, CpModel, IntVar, LinearConstraint, LinearExpr, Literal};
pub use simple::SimpleCpSolver;
pub use solve::{CpSolution, CpSolver, SolveStatus, SolverParams};
