//! Declarative constraint catalogue.
//!
//! The registry is the single source of constraint defaults: enablement,
//! hard/soft classification, weight, and accepted parameters. Constraints
//! never override these in their own constructors. A registry instance is
//! immutable; hosts needing different defaults construct a fresh one.

use crate::constraints::{
    AvailabilityConstraint, ConstraintConfig, CoverageConstraint, FairnessConstraint,
    FrequencyConstraint, MaxAbsenceConstraint, RequestConstraint, RestrictionConstraint,
    SchedulingConstraint, SequenceConstraint, ShiftFrequencyConstraint,
};
use crate::error::ConfigError;

/// Accepted value shape of a constraint parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Integer value.
    Int,
    /// List of strings (ids or categories).
    StringList,
}

/// One accepted parameter of a constraint.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    /// Parameter key.
    pub name: &'static str,
    /// Accepted shape.
    pub kind: ParamKind,
}

/// Registry entry for one constraint.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintRegistration {
    /// Stable constraint identifier.
    pub constraint_id: &'static str,
    /// Whether the constraint applies without explicit configuration.
    pub default_enabled: bool,
    /// Default hard/soft classification.
    pub default_hard: bool,
    /// Default soft weight (meaningless for hard defaults).
    pub default_weight: i64,
    /// Parameters the constraint understands.
    pub parameter_schema: &'static [ParamSpec],
}

impl ConstraintRegistration {
    /// The default configuration this entry describes.
    pub fn default_config(&self) -> ConstraintConfig {
        ConstraintConfig {
            enabled: self.default_enabled,
            is_hard: self.default_hard,
            weight: self.default_weight,
            parameters: Default::default(),
        }
    }
}

/// Built-in catalogue, in application order: hard rules first.
static BUILTIN: &[ConstraintRegistration] = &[
    ConstraintRegistration {
        constraint_id: "coverage",
        default_enabled: true,
        default_hard: true,
        default_weight: 0,
        parameter_schema: &[],
    },
    ConstraintRegistration {
        constraint_id: "restriction",
        default_enabled: true,
        default_hard: true,
        default_weight: 0,
        parameter_schema: &[],
    },
    ConstraintRegistration {
        constraint_id: "availability",
        default_enabled: true,
        default_hard: true,
        default_weight: 0,
        parameter_schema: &[],
    },
    ConstraintRegistration {
        constraint_id: "fairness",
        default_enabled: true,
        default_hard: false,
        default_weight: 1000,
        parameter_schema: &[ParamSpec {
            name: "categories",
            kind: ParamKind::StringList,
        }],
    },
    ConstraintRegistration {
        constraint_id: "frequency",
        default_enabled: false,
        default_hard: false,
        default_weight: 100,
        parameter_schema: &[ParamSpec {
            name: "max_periods_between",
            kind: ParamKind::Int,
        }],
    },
    ConstraintRegistration {
        constraint_id: "request",
        default_enabled: true,
        default_hard: false,
        default_weight: 150,
        parameter_schema: &[],
    },
    ConstraintRegistration {
        constraint_id: "sequence",
        default_enabled: false,
        default_hard: false,
        default_weight: 100,
        parameter_schema: &[ParamSpec {
            name: "categories",
            kind: ParamKind::StringList,
        }],
    },
    ConstraintRegistration {
        constraint_id: "max_absence",
        default_enabled: false,
        default_hard: false,
        default_weight: 100,
        parameter_schema: &[
            ParamSpec {
                name: "max_periods_absent",
                kind: ParamKind::Int,
            },
            ParamSpec {
                name: "shift_types",
                kind: ParamKind::StringList,
            },
        ],
    },
    ConstraintRegistration {
        constraint_id: "shift_frequency",
        default_enabled: false,
        default_hard: false,
        default_weight: 500,
        parameter_schema: &[],
    },
];

/// Immutable constraint catalogue.
#[derive(Debug, Clone)]
pub struct ConstraintRegistry {
    entries: &'static [ConstraintRegistration],
}

impl Default for ConstraintRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ConstraintRegistry {
    /// The built-in catalogue.
    pub fn builtin() -> Self {
        Self { entries: BUILTIN }
    }

    /// Entries in declared (application) order.
    pub fn iter(&self) -> impl Iterator<Item = &ConstraintRegistration> {
        self.entries.iter()
    }

    /// Looks up an entry by id.
    pub fn get(&self, constraint_id: &str) -> Option<&ConstraintRegistration> {
        self.entries
            .iter()
            .find(|e| e.constraint_id == constraint_id)
    }

    /// Resolves the effective configuration for one constraint.
    ///
    /// An explicit override replaces the defaults wholesale; its weight must
    /// be non-negative when soft.
    pub fn resolve_config(
        &self,
        constraint_id: &str,
        explicit: Option<&ConstraintConfig>,
    ) -> Result<ConstraintConfig, ConfigError> {
        let entry = self
            .get(constraint_id)
            .ok_or_else(|| ConfigError::UnknownConstraint(constraint_id.to_string()))?;

        let config = match explicit {
            Some(config) => config.clone(),
            None => entry.default_config(),
        };
        if !config.is_hard && config.weight < 0 {
            return Err(ConfigError::BadWeight {
                constraint_id: constraint_id.to_string(),
                weight: config.weight,
            });
        }
        Ok(config)
    }

    /// Instantiates the constraint behind an id with a resolved config.
    pub fn instantiate(
        &self,
        constraint_id: &str,
        config: ConstraintConfig,
    ) -> Option<Box<dyn SchedulingConstraint>> {
        let constraint: Box<dyn SchedulingConstraint> = match constraint_id {
            "coverage" => Box::new(CoverageConstraint::new(config)),
            "restriction" => Box::new(RestrictionConstraint::new(config)),
            "availability" => Box::new(AvailabilityConstraint::new(config)),
            "fairness" => Box::new(FairnessConstraint::new(config)),
            "frequency" => Box::new(FrequencyConstraint::new(config)),
            "request" => Box::new(RequestConstraint::new(config)),
            "sequence" => Box::new(SequenceConstraint::new(config)),
            "max_absence" => Box::new(MaxAbsenceConstraint::new(config)),
            "shift_frequency" => Box::new(ShiftFrequencyConstraint::new(config)),
            _ => return None,
        };
        Some(constraint)
    }
}
