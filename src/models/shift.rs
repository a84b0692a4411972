//! Shift type model.
//!
//! A `ShiftType` is a template: it defines the shape of a shift (times,
//! category, staffing demand). Concrete assignments reference the template by
//! id and a date; they never duplicate its times.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{ConfigError, ValidationError};

/// Defines a type of shift that can be scheduled.
///
/// Value type: constructed once, never mutated. Identity is the stable
/// string `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftType {
    /// Unique identifier (e.g., "day_shift", "night").
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// Grouping category used by fairness and sequence rules.
    pub category: String,
    /// Shift start time.
    pub start_time: NaiveTime,
    /// Duration in hours, > 0.
    pub duration_hours: f64,
    /// Per-period staffing demand.
    pub workers_required: u32,
    /// Whether this shift counts toward undesirable-shift fairness.
    pub is_undesirable: bool,
    /// Weekdays this shift applies to (0 = Monday .. 6 = Sunday).
    /// `None` means every day.
    pub applicable_days: Option<BTreeSet<u8>>,
    /// Upper staffing bound. `None` means equal to `workers_required`.
    pub max_workers: Option<u32>,
}

impl ShiftType {
    /// Creates a new shift type requiring one worker per period.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            duration_hours: 8.0,
            workers_required: 1,
            is_undesirable: false,
            applicable_days: None,
            max_workers: None,
        }
    }

    /// Sets the category tag.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the start time.
    pub fn with_start_time(mut self, start_time: NaiveTime) -> Self {
        self.start_time = start_time;
        self
    }

    /// Sets the duration in hours.
    pub fn with_duration_hours(mut self, hours: f64) -> Self {
        self.duration_hours = hours;
        self
    }

    /// Sets the per-period staffing demand.
    pub fn with_workers_required(mut self, count: u32) -> Self {
        self.workers_required = count;
        self
    }

    /// Marks the shift undesirable for fairness balancing.
    pub fn undesirable(mut self) -> Self {
        self.is_undesirable = true;
        self
    }

    /// Restricts the shift to the given weekdays (0 = Monday .. 6 = Sunday).
    pub fn with_applicable_days(mut self, days: impl IntoIterator<Item = u8>) -> Self {
        self.applicable_days = Some(days.into_iter().collect());
        self
    }

    /// Sets the upper staffing bound.
    pub fn with_max_workers(mut self, max: u32) -> Self {
        self.max_workers = Some(max);
        self
    }

    /// Effective staffing ceiling: `max_workers` or `workers_required`.
    pub fn effective_max_workers(&self) -> u32 {
        self.max_workers.unwrap_or(self.workers_required)
    }

    /// Whether this shift applies on a weekday (0 = Monday .. 6 = Sunday).
    pub fn is_applicable_on(&self, weekday: u8) -> bool {
        match &self.applicable_days {
            None => true,
            Some(days) => days.contains(&weekday),
        }
    }

    /// Checks the shift type's invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fail = |reason: String| ValidationError::InvalidShiftType {
            id: self.id.clone(),
            reason,
        };

        if self.id.is_empty() {
            return Err(fail("id cannot be empty".into()));
        }
        if self.duration_hours <= 0.0 {
            return Err(fail(format!(
                "duration_hours must be positive, got {}",
                self.duration_hours
            )));
        }
        if let Some(days) = &self.applicable_days {
            let invalid: Vec<u8> = days.iter().copied().filter(|d| *d > 6).collect();
            if !invalid.is_empty() {
                return Err(fail(format!(
                    "applicable_days must be 0-6, got {invalid:?}"
                )));
            }
        }
        if let Some(max) = self.max_workers {
            if max < self.workers_required {
                return Err(fail(format!(
                    "max_workers ({max}) below workers_required ({})",
                    self.workers_required
                )));
            }
        }
        Ok(())
    }
}

/// Parses a strict `HH:MM` time string (0-23 hours, 0-59 minutes).
pub fn parse_shift_time(input: &str) -> Result<NaiveTime, ConfigError> {
    let invalid = || ConfigError::InvalidTime(format!("'{input}': expected HH:MM"));

    let (h, m) = input.split_once(':').ok_or_else(invalid)?;
    if h.len() != 2 || m.len() != 2 {
        return Err(invalid());
    }
    let hours: u32 = h.parse().map_err(|_| invalid())?;
    let minutes: u32 = m.parse().map_err(|_| invalid())?;

    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(|| {
        ConfigError::InvalidTime(format!(
            "'{input}': hours must be 0-23 and minutes 0-59"
        ))
    })
}
