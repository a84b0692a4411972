//! Objective construction from soft-constraint violations.

use std::collections::BTreeMap;

use crate::constraints::{SchedulingConstraint, ViolationKind};
use crate::cp::{CpModel, IntVar, LinearExpr};

/// One weighted term of the minimization objective.
#[derive(Debug, Clone)]
pub struct ObjectiveTerm {
    /// Constraint that registered the variable.
    pub constraint_id: &'static str,
    /// Registered variable name.
    pub variable_name: String,
    /// The penalized variable.
    pub var: IntVar,
    /// The constraint's configured weight.
    pub base_weight: i64,
    /// Per-violation priority multiplier (1 unless declared).
    pub priority: i64,
}

impl ObjectiveTerm {
    /// Coefficient this term enters the objective with.
    pub fn effective_weight(&self) -> i64 {
        self.base_weight * self.priority
    }
}

/// Aggregates violation variables into one weighted minimization objective.
///
/// Coefficients come from the violation metadata, never from variable names:
/// `violation` variables use the constraint weight times their declared
/// priority, `objective_target` variables use the weight alone, and
/// `auxiliary` variables are excluded.
#[derive(Debug, Default)]
pub struct ObjectiveBuilder {
    terms: Vec<ObjectiveTerm>,
}

impl ObjectiveBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the objective terms of one applied constraint.
    ///
    /// Hard constraints contribute nothing: they have no violations.
    pub fn add_constraint(&mut self, constraint: &dyn SchedulingConstraint) {
        if constraint.is_hard() {
            return;
        }
        let base_weight = constraint.weight();
        let violations = constraint.violations();

        for (name, var) in violations.iter() {
            let kind = violations
                .kind_of(name)
                .unwrap_or(ViolationKind::Violation);
            let priority = match kind {
                ViolationKind::Auxiliary => continue,
                ViolationKind::ObjectiveTarget => 1,
                ViolationKind::Violation => violations.priority_of(name).unwrap_or(1),
            };
            self.terms.push(ObjectiveTerm {
                constraint_id: constraint.constraint_id(),
                variable_name: name.to_string(),
                var,
                base_weight,
                priority,
            });
        }
    }

    /// Emits the minimization objective into the model.
    ///
    /// With no terms, the constant 0 is minimized so every status path still
    /// reports an objective value.
    pub fn build(&self, model: &mut CpModel) {
        let mut expr = LinearExpr::new();
        for term in &self.terms {
            expr.add_term(term.effective_weight(), term.var);
        }
        model.minimize(expr);
    }

    /// The collected terms, in collection order.
    pub fn terms(&self) -> &[ObjectiveTerm] {
        &self.terms
    }

    /// Terms grouped by constraint id.
    pub fn breakdown(&self) -> BTreeMap<&'static str, Vec<&ObjectiveTerm>> {
        let mut grouped: BTreeMap<&'static str, Vec<&ObjectiveTerm>> = BTreeMap::new();
        for term in &self.terms {
            grouped.entry(term.constraint_id).or_default().push(term);
        }
        grouped
    }

    /// Total potential penalty weight per constraint id.
    pub fn total_weight_by_constraint(&self) -> BTreeMap<&'static str, i64> {
        let mut totals: BTreeMap<&'static str, i64> = BTreeMap::new();
        for term in &self.terms {
            *totals.entry(term.constraint_id).or_insert(0) += term.effective_weight();
        }
        totals
    }
}
