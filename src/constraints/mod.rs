//! Constraint library.
//!
//! Every scheduling rule is a [`SchedulingConstraint`]: it receives the model,
//! the typed variables, and the immutable input context, and emits linear
//! statements and/or violation variables. Soft constraints register their
//! violation variables with kind metadata so the objective builder never has
//! to parse variable names.
//!
//! | id | default | kind |
//! |----|---------|------|
//! | `coverage` | on | hard |
//! | `restriction` | on | hard |
//! | `availability` | on | hard |
//! | `fairness` | on | soft |
//! | `frequency` | off | soft |
//! | `request` | auto | soft |
//! | `sequence` | off | soft |
//! | `max_absence` | off | soft |
//! | `shift_frequency` | off | soft |

mod availability;
mod coverage;
mod fairness;
mod frequency;
mod max_absence;
mod request;
mod restriction;
mod sequence;
mod shift_frequency;

pub use availability::AvailabilityConstraint;
pub use coverage::CoverageConstraint;
pub use fairness::FairnessConstraint;
pub use frequency::FrequencyConstraint;
pub use max_absence::MaxAbsenceConstraint;
pub use request::RequestConstraint;
pub use restriction::RestrictionConstraint;
pub use sequence::SequenceConstraint;
pub use shift_frequency::ShiftFrequencyConstraint;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cp::{CpModel, IntVar};
use crate::error::SolveError;
use crate::models::{
    Availability, PeriodCalendar, SchedulingRequest, ShiftFrequencyRequirement, ShiftType, Worker,
};
use crate::solver::SolverVariables;

/// Configuration for one constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintConfig {
    /// Whether the constraint is applied at all.
    pub enabled: bool,
    /// Hard constraints must hold; soft ones penalize the objective.
    pub is_hard: bool,
    /// Penalty weight for soft violations. Ignored when `is_hard`.
    pub weight: i64,
    /// Constraint-specific parameters, opaque to the orchestrator.
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            is_hard: true,
            weight: 100,
            parameters: BTreeMap::new(),
        }
    }
}

impl ConstraintConfig {
    /// A hard, enabled configuration.
    pub fn hard() -> Self {
        Self::default()
    }

    /// A soft, enabled configuration with the given weight.
    pub fn soft(weight: i64) -> Self {
        Self {
            enabled: true,
            is_hard: false,
            weight,
            parameters: BTreeMap::new(),
        }
    }

    /// Disables the constraint.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Adds a parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Reads an integer parameter.
    pub fn param_i64(&self, key: &str) -> Option<i64> {
        self.parameters.get(key).and_then(serde_json::Value::as_i64)
    }

    /// Reads a string-list parameter.
    pub fn param_str_list(&self, key: &str) -> Option<Vec<String>> {
        let list = self.parameters.get(key)?.as_array()?;
        Some(
            list.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        )
    }
}

/// Role of a registered violation variable in the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Boolean that is 1 iff a specific soft rule is violated. Enters the
    /// objective with the constraint weight times its priority.
    Violation,
    /// Integer penalty variable (e.g., a spread) that enters the objective
    /// with the constraint weight alone.
    ObjectiveTarget,
    /// Structural helper; registered for introspection, excluded from the
    /// objective.
    Auxiliary,
}

/// Violation variables registered by one constraint, with side-channel
/// metadata keyed by variable name.
#[derive(Debug, Clone, Default)]
pub struct ViolationSet {
    vars: BTreeMap<String, IntVar>,
    kinds: BTreeMap<String, ViolationKind>,
    priorities: BTreeMap<String, i64>,
}

impl ViolationSet {
    /// Registers a variable with its kind.
    pub fn record(&mut self, name: impl Into<String>, var: IntVar, kind: ViolationKind) {
        let name = name.into();
        self.kinds.insert(name.clone(), kind);
        self.vars.insert(name, var);
    }

    /// Registers a violation variable carrying a priority multiplier.
    pub fn record_with_priority(&mut self, name: impl Into<String>, var: IntVar, priority: i64) {
        let name = name.into();
        self.priorities.insert(name.clone(), priority);
        self.record(name, var, ViolationKind::Violation);
    }

    /// Iterates `(name, var)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, IntVar)> + '_ {
        self.vars.iter().map(|(name, var)| (name.as_str(), *var))
    }

    /// Kind of a registered variable.
    pub fn kind_of(&self, name: &str) -> Option<ViolationKind> {
        self.kinds.get(name).copied()
    }

    /// Priority of a registered variable, if one was declared.
    pub fn priority_of(&self, name: &str) -> Option<i64> {
        self.priorities.get(name).copied()
    }

    /// Number of registered variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no variables are registered.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Immutable input set every constraint receives.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintContext<'a> {
    /// Workers to schedule.
    pub workers: &'a [Worker],
    /// Shift types with their demands.
    pub shift_types: &'a [ShiftType],
    /// Period grid over the horizon.
    pub calendar: &'a PeriodCalendar,
    /// Availability records.
    pub availabilities: &'a [Availability],
    /// Scheduling requests.
    pub requests: &'a [SchedulingRequest],
    /// Per-worker frequency requirements.
    pub shift_frequency_requirements: &'a [ShiftFrequencyRequirement],
}

impl ConstraintContext<'_> {
    /// Number of periods in the horizon.
    pub fn num_periods(&self) -> usize {
        self.calendar.num_periods()
    }
}

/// A pluggable scheduling rule.
///
/// Constraints are applied once per solve, in registry order. Hard and soft
/// behavior is decided by the configuration, not the type.
pub trait SchedulingConstraint {
    /// Stable identifier, matching the registry key.
    fn constraint_id(&self) -> &'static str;

    /// The resolved configuration this instance runs with.
    fn config(&self) -> &ConstraintConfig;

    /// Emits this rule's statements into the model.
    fn apply(
        &mut self,
        model: &mut CpModel,
        vars: &SolverVariables,
        ctx: &ConstraintContext<'_>,
    ) -> Result<(), SolveError>;

    /// Violation variables registered during [`apply`](Self::apply).
    fn violations(&self) -> &ViolationSet;

    /// Number of model statements emitted during [`apply`](Self::apply).
    fn emitted_statements(&self) -> usize;

    /// Whether the constraint is treated as hard.
    fn is_hard(&self) -> bool {
        self.config().is_hard
    }

    /// The soft-violation weight.
    fn weight(&self) -> i64 {
        self.config().weight
    }
}
