//! Rostering domain models.
//!
//! Immutable value types describing a shift scheduling problem and its
//! solution. Identity is always a stable string id; cross-references between
//! entities use ids, never shared handles.
//!
//! | Type | Role |
//! |------|------|
//! | [`Worker`] | Person that shifts are assigned to |
//! | [`ShiftType`] | Template for a kind of shift (times, demand, category) |
//! | [`PeriodCalendar`] | Equal-length period grid over the horizon |
//! | [`Availability`] | Unavailability / preference over a date range |
//! | [`SchedulingRequest`] | Per-period request for or against a shift |
//! | [`ShiftFrequencyRequirement`] | "Work one of these at least every N periods" |
//! | [`Schedule`] | Complete solved assignment with statistics |

mod calendar;
mod inputs;
mod schedule;
mod shift;
mod worker;

pub use calendar::{PeriodCalendar, PeriodType};
pub use inputs::{
    Availability, AvailabilityType, SchedulingRequest, ShiftFrequencyRequirement,
};
pub use schedule::{
    Assignment, ConstraintStats, PeriodAssignment, Schedule, ScheduleStatistics, WorkerStats,
};
pub use shift::{parse_shift_time, ShiftType};
pub use worker::Worker;
