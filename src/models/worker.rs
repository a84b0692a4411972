//! Worker model.
//!
//! Workers are the entities shifts are assigned to. Each worker carries an
//! opaque type tag, an FTE fraction, restriction/preference sets over shift
//! type ids, and free-form attributes for host extensions.
//!
//! # Reference
//! Van den Bergh et al. (2013), "Personnel scheduling: A literature review"

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::error::ValidationError;

/// A worker that can be assigned to shifts.
///
/// Value type: constructed once from inputs, never mutated afterwards.
/// Identity is the stable string `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique worker identifier (e.g., "W001").
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Opaque classification tag (e.g., "full_time").
    pub worker_type: Option<String>,
    /// Full-time-equivalent fraction, in (0, 1].
    pub fte: f64,
    /// Inactive workers are never eligible for assignment.
    pub is_active: bool,
    /// Shift type ids this worker must never be assigned to.
    pub restricted_shifts: BTreeSet<String>,
    /// Shift type ids this worker prefers (informational only).
    pub preferred_shifts: BTreeSet<String>,
    /// Domain-specific metadata, opaque to the core.
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
}

impl Worker {
    /// Creates a new active full-time worker.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            worker_type: None,
            fte: 1.0,
            is_active: true,
            restricted_shifts: BTreeSet::new(),
            preferred_shifts: BTreeSet::new(),
            attributes: HashMap::new(),
        }
    }

    /// Sets the worker type tag.
    pub fn with_type(mut self, worker_type: impl Into<String>) -> Self {
        self.worker_type = Some(worker_type.into());
        self
    }

    /// Sets the FTE fraction.
    pub fn with_fte(mut self, fte: f64) -> Self {
        self.fte = fte;
        self
    }

    /// Marks the worker inactive.
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Adds a restricted shift type.
    pub fn with_restricted_shift(mut self, shift_type_id: impl Into<String>) -> Self {
        self.restricted_shifts.insert(shift_type_id.into());
        self
    }

    /// Adds a preferred shift type.
    pub fn with_preferred_shift(mut self, shift_type_id: impl Into<String>) -> Self {
        self.preferred_shifts.insert(shift_type_id.into());
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Whether this worker may work a given shift type.
    pub fn can_work_shift(&self, shift_type_id: &str) -> bool {
        !self.restricted_shifts.contains(shift_type_id)
    }

    /// Whether this worker prefers a given shift type.
    pub fn prefers_shift(&self, shift_type_id: &str) -> bool {
        self.preferred_shifts.contains(shift_type_id)
    }

    /// Checks the worker's invariants.
    ///
    /// - `id` and `name` are non-empty
    /// - `fte` is in (0, 1]
    /// - restricted and preferred sets are disjoint
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fail = |reason: String| ValidationError::InvalidWorker {
            id: self.id.clone(),
            reason,
        };

        if self.id.is_empty() {
            return Err(fail("id cannot be empty".into()));
        }
        if self.name.is_empty() {
            return Err(fail("name cannot be empty".into()));
        }
        if !(self.fte > 0.0 && self.fte <= 1.0) {
            return Err(fail(format!("fte must be in (0, 1], got {}", self.fte)));
        }

        let conflicting: Vec<&str> = self
            .restricted_shifts
            .intersection(&self.preferred_shifts)
            .map(String::as_str)
            .collect();
        if !conflicting.is_empty() {
            return Err(fail(format!(
                "shifts cannot be both restricted and preferred: {}",
                conflicting.join(", ")
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_builder() {
        let w = Worker::new("W1", "Alice")
            .with_type("full_time")
            .with_fte(0.8)
            .with_restricted_shift("night")
            .with_preferred_shift("day")
            .with_attribute("team", "cardiology");

        assert_eq!(w.id, "W1");
        assert_eq!(w.worker_type.as_deref(), Some("full_time"));
        assert!((w.fte - 0.8).abs() < 1e-10);
        assert!(w.is_active);
        assert!(!w.can_work_shift("night"));
        assert!(w.can_work_shift("day"));
        assert!(w.prefers_shift("day"));
        assert!(w.validate().is_ok());
    }

    #[test]
    fn test_restricted_preferred_conflict() {
        let w = Worker::new("W1", "Alice")
            .with_restricted_shift("night")
            .with_preferred_shift("night");

        let err = w.validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidWorker { .. }));
        assert!(err.to_string().contains("night"));
    }

    #[test]
    fn test_fte_out_of_range() {
        assert!(Worker::new("W1", "A").with_fte(0.0).validate().is_err());
        assert!(Worker::new("W1", "A").with_fte(1.5).validate().is_err());
        assert!(Worker::new("W1", "A").with_fte(1.0).validate().is_ok());
    }

    #[test]
    fn test_empty_id_rejected() {
        assert!(Worker::new("", "A").validate().is_err());
        assert!(Worker::new("W1", "").validate().is_err());
    }

    #[test]
    fn test_inactive() {
        let w = Worker::new("W1", "A").inactive();
        assert!(!w.is_active);
    }
}
