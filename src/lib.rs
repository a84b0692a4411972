//! Workforce shift rostering framework for the U-Engine ecosystem.
//!
//! Compiles a rostering problem (workers, shift types, a period calendar,
//! and a library of pluggable rules) into a constraint-programming model,
//! drives a CP-SAT-style backend through an abstract solver interface, and
//! reconstructs a typed [`Schedule`](models::Schedule) with per-constraint
//! diagnostics from the solution.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Worker`, `ShiftType`, `PeriodCalendar`,
//!   `Availability`, `SchedulingRequest`, `ShiftFrequencyRequirement`,
//!   `Schedule`
//! - **`cp`**: The minimal CP surface the core depends on, plus an exact
//!   deterministic backend for tests and small instances
//! - **`constraints`**: Nine pluggable rules (coverage, restriction,
//!   availability, fairness, frequency, request, sequence, max-absence,
//!   shift-frequency)
//! - **`solver`**: Variable builder, objective builder, constraint registry,
//!   orchestrator, and solution extractor
//! - **`validation`**: Pre-solve feasibility analysis and post-solve
//!   schedule validation
//! - **`dates`**: Date parsing for I/O collaborators (ISO/US/EU formats)
//!
//! # Architecture
//!
//! The orchestrator owns one model per solve: it pre-checks feasibility,
//! allocates variables, applies enabled constraints in registry order,
//! minimizes the weighted violation objective, and extracts the schedule.
//! Hard rules become equalities the backend must satisfy; soft rules become
//! boolean violation variables whose weighted sum is minimized. Parallelism
//! is delegated to the backend; the core itself is single-threaded and each
//! solve owns its state exclusively.
//!
//! # References
//!
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"
//! - Van den Bergh et al. (2013), "Personnel scheduling: A literature review"
//! - Rossi et al. (2006), "Handbook of Constraint Programming"

pub mod constraints;
pub mod cp;
pub mod dates;
pub mod error;
pub mod models;
pub mod solver;
pub mod validation;
