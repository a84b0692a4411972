//! Scheduling input records: availability, requests, frequency requirements.
//!
//! These are worker-supplied (or planner-supplied) signals that constraints
//! consume. They reference workers, shift types, and periods by id/index and
//! are immutable once validated.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::ValidationError;

/// How an availability record is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityType {
    /// Worker must not be assigned in the date range. Hard.
    Unavailable,
    /// Worker prefers to work; a positive signal, enforces nothing by itself.
    Preferred,
    /// Worker is expected to work; a positive signal, enforces nothing by
    /// itself.
    Required,
}

/// Worker availability over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    /// Worker this record applies to.
    pub worker_id: String,
    /// Range start (inclusive).
    pub start_date: NaiveDate,
    /// Range end (inclusive).
    pub end_date: NaiveDate,
    /// Interpretation of the record.
    pub availability_type: AvailabilityType,
    /// If set, applies only to this shift type; otherwise to all shifts.
    pub shift_type_id: Option<String>,
}

impl Availability {
    /// Creates an unavailability record covering all shifts.
    pub fn unavailable(
        worker_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            worker_id: worker_id.into(),
            start_date,
            end_date,
            availability_type: AvailabilityType::Unavailable,
            shift_type_id: None,
        }
    }

    /// Narrows the record to a single shift type.
    pub fn for_shift(mut self, shift_type_id: impl Into<String>) -> Self {
        self.shift_type_id = Some(shift_type_id.into());
        self
    }

    /// Sets the availability type.
    pub fn with_type(mut self, availability_type: AvailabilityType) -> Self {
        self.availability_type = availability_type;
        self
    }

    /// Whether a date falls within this record's range.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Whether this record overlaps an inclusive date range.
    pub fn overlaps(&self, range_start: NaiveDate, range_end: NaiveDate) -> bool {
        self.start_date <= range_end && self.end_date >= range_start
    }

    /// Whether this record applies to the given shift type.
    pub fn applies_to_shift(&self, shift_type_id: &str) -> bool {
        match &self.shift_type_id {
            None => true,
            Some(id) => id == shift_type_id,
        }
    }

    /// Checks the record's invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.worker_id.is_empty() {
            return Err(ValidationError::InvalidRequest {
                worker_id: self.worker_id.clone(),
                reason: "availability worker_id cannot be empty".into(),
            });
        }
        if self.end_date < self.start_date {
            return Err(ValidationError::InvalidRequest {
                worker_id: self.worker_id.clone(),
                reason: format!(
                    "availability end_date {} before start_date {}",
                    self.end_date, self.start_date
                ),
            });
        }
        Ok(())
    }
}

/// A worker's request for or against a specific shift in a specific period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingRequest {
    /// Worker making the request.
    pub worker_id: String,
    /// Shift type the request targets.
    pub shift_type_id: String,
    /// Period the request targets (0-indexed).
    pub period_index: usize,
    /// `true` = wants the shift; `false` = wants to avoid it.
    pub is_positive: bool,
    /// Priority multiplier, >= 1. Higher means more important.
    pub priority: u32,
}

impl SchedulingRequest {
    /// Creates a positive request with normal priority.
    pub fn positive(
        worker_id: impl Into<String>,
        shift_type_id: impl Into<String>,
        period_index: usize,
    ) -> Self {
        Self {
            worker_id: worker_id.into(),
            shift_type_id: shift_type_id.into(),
            period_index,
            is_positive: true,
            priority: 1,
        }
    }

    /// Creates a negative (avoid) request with normal priority.
    pub fn negative(
        worker_id: impl Into<String>,
        shift_type_id: impl Into<String>,
        period_index: usize,
    ) -> Self {
        Self {
            is_positive: false,
            ..Self::positive(worker_id, shift_type_id, period_index)
        }
    }

    /// Sets the priority multiplier.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Checks the request's invariants. Priority zero is rejected.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fail = |reason: String| ValidationError::InvalidRequest {
            worker_id: self.worker_id.clone(),
            reason,
        };
        if self.worker_id.is_empty() {
            return Err(fail("worker_id cannot be empty".into()));
        }
        if self.shift_type_id.is_empty() {
            return Err(fail("shift_type_id cannot be empty".into()));
        }
        if self.priority < 1 {
            return Err(fail("priority must be >= 1".into()));
        }
        Ok(())
    }
}

/// Per-worker requirement to work one of a set of shift types at least once
/// within every sliding window of `max_periods_between` periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftFrequencyRequirement {
    /// Worker the requirement applies to.
    pub worker_id: String,
    /// Shift types that satisfy the requirement (any one of them).
    pub shift_types: BTreeSet<String>,
    /// Window length in periods, >= 1.
    pub max_periods_between: usize,
}

impl ShiftFrequencyRequirement {
    /// Creates a new requirement.
    pub fn new(
        worker_id: impl Into<String>,
        shift_types: impl IntoIterator<Item = String>,
        max_periods_between: usize,
    ) -> Self {
        Self {
            worker_id: worker_id.into(),
            shift_types: shift_types.into_iter().collect(),
            max_periods_between,
        }
    }

    /// Checks the requirement's invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fail = |reason: String| ValidationError::InvalidFrequencyReq {
            worker_id: self.worker_id.clone(),
            reason,
        };
        if self.worker_id.is_empty() {
            return Err(fail("worker_id cannot be empty".into()));
        }
        if self.shift_types.is_empty() {
            return Err(fail("shift_types cannot be empty".into()));
        }
        if self.max_periods_between < 1 {
            return Err(fail("max_periods_between must be >= 1".into()));
        }
        Ok(())
    }
}
