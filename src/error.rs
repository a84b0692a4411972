//! Error taxonomy for the rostering core.
//!
//! Three layers, matching where a failure can occur:
//!
//! - [`ConfigError`]: rejected configuration input (horizon, times, weights,
//!   constraint names). Raised before any model exists.
//! - [`ValidationError`]: a domain object violates its own invariants.
//!   Raised at construction; never reaches the solver.
//! - [`SolveError`]: a failure while building or running the model, including
//!   backend faults and broken internal invariants.
//!
//! Solver timeouts are NOT errors: they surface as
//! [`SolveStatus`](crate::cp::SolveStatus) values with best-effort data.

use thiserror::Error;

/// Errors raised while validating configuration inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The schedule horizon is not a positive multiple of the period length.
    #[error("bad horizon: {0}")]
    BadHorizon(String),

    /// A time value is malformed (shift start times, solver time limits).
    #[error("invalid time: {0}")]
    InvalidTime(String),

    /// A constraint configuration names a constraint the registry does not know.
    #[error("unknown constraint '{0}'")]
    UnknownConstraint(String),

    /// A soft-constraint weight is negative.
    #[error("bad weight {weight} for constraint '{constraint_id}': must be >= 0")]
    BadWeight {
        /// Constraint the weight was configured for.
        constraint_id: String,
        /// The rejected weight.
        weight: i64,
    },
}

/// Errors raised when a domain object violates its invariants at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A worker definition is inconsistent (empty id, fte out of range,
    /// overlapping restricted/preferred sets).
    #[error("invalid worker '{id}': {reason}")]
    InvalidWorker {
        /// Worker identifier (may be empty when that is the defect).
        id: String,
        /// What failed.
        reason: String,
    },

    /// A shift type definition is inconsistent.
    #[error("invalid shift type '{id}': {reason}")]
    InvalidShiftType {
        /// Shift type identifier.
        id: String,
        /// What failed.
        reason: String,
    },

    /// A scheduling request or availability record is inconsistent.
    #[error("invalid request for worker '{worker_id}': {reason}")]
    InvalidRequest {
        /// Worker the record belongs to.
        worker_id: String,
        /// What failed.
        reason: String,
    },

    /// A shift frequency requirement is inconsistent.
    #[error("invalid shift frequency requirement for worker '{worker_id}': {reason}")]
    InvalidFrequencyReq {
        /// Worker the requirement applies to.
        worker_id: String,
        /// What failed.
        reason: String,
    },
}

/// Errors raised by typed variable lookups.
///
/// Accessors identify the offending key; callers log and propagate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No variables exist for the named worker.
    #[error("unknown worker '{0}' in variable lookup")]
    UnknownWorker(String),

    /// No variables exist for the named shift type.
    #[error("unknown shift type '{0}' in variable lookup")]
    UnknownShift(String),

    /// The period index is outside the horizon.
    #[error("period index {index} out of range (horizon has {num_periods} periods)")]
    BadPeriod {
        /// The rejected index.
        index: usize,
        /// Number of periods in the horizon.
        num_periods: usize,
    },
}

/// Errors raised while building or running the model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// A variable lookup failed during constraint application.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Rejected configuration discovered at solve time.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Opaque wrapper for solver-backend faults; the message is propagated
    /// unchanged.
    #[error("solver backend error: {0}")]
    Backend(String),

    /// An internal precondition failed. Indicates a bug in the core, not in
    /// the caller's input.
    #[error("core invariant broken: {0}")]
    CoreInvariantBroken(String),
}
