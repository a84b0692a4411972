//! Decision-variable construction and typed lookup.
//!
//! Creates every variable the scheduling model needs:
//! - assignment booleans `x[w,p,s]`: worker `w` works shift `s` in period `p`
//! - shift counts `count[w,s]`: total assignments per worker per shift type,
//!   linked by `count == sum(x)`
//! - undesirable totals per worker, linked the same way
//!
//! Variables live in flat vectors indexed by `(worker, period, shift)`
//! positions; lookup is by id and fails with a [`LookupError`] naming the
//! offending key.

use std::collections::HashMap;

use crate::cp::{CpModel, IntVar, LinearExpr};
use crate::error::{LookupError, SolveError};
use crate::models::{ShiftType, Worker};

/// Typed container for all solver variables.
#[derive(Debug, Clone)]
pub struct SolverVariables {
    worker_ids: Vec<String>,
    shift_type_ids: Vec<String>,
    worker_index: HashMap<String, usize>,
    shift_index: HashMap<String, usize>,
    num_periods: usize,
    /// `[w * P * S + p * S + s]`
    assignment: Vec<IntVar>,
    /// `[w * S + s]`
    shift_counts: Vec<IntVar>,
    /// `[w]`
    undesirable_totals: Vec<IntVar>,
}

impl SolverVariables {
    /// Number of periods the variables span.
    pub fn num_periods(&self) -> usize {
        self.num_periods
    }

    fn worker_idx(&self, worker_id: &str) -> Result<usize, LookupError> {
        self.worker_index
            .get(worker_id)
            .copied()
            .ok_or_else(|| LookupError::UnknownWorker(worker_id.to_string()))
    }

    fn shift_idx(&self, shift_type_id: &str) -> Result<usize, LookupError> {
        self.shift_index
            .get(shift_type_id)
            .copied()
            .ok_or_else(|| LookupError::UnknownShift(shift_type_id.to_string()))
    }

    fn check_period(&self, period: usize) -> Result<(), LookupError> {
        if period >= self.num_periods {
            return Err(LookupError::BadPeriod {
                index: period,
                num_periods: self.num_periods,
            });
        }
        Ok(())
    }

    /// The assignment boolean `x[w,p,s]`.
    pub fn assignment_var(
        &self,
        worker_id: &str,
        period: usize,
        shift_type_id: &str,
    ) -> Result<IntVar, LookupError> {
        let w = self.worker_idx(worker_id)?;
        self.check_period(period)?;
        let s = self.shift_idx(shift_type_id)?;
        let stride = self.shift_type_ids.len();
        Ok(self.assignment[w * self.num_periods * stride + period * stride + s])
    }

    /// The per-worker per-shift-type total `count[w,s]`.
    pub fn shift_count_var(
        &self,
        worker_id: &str,
        shift_type_id: &str,
    ) -> Result<IntVar, LookupError> {
        let w = self.worker_idx(worker_id)?;
        let s = self.shift_idx(shift_type_id)?;
        Ok(self.shift_counts[w * self.shift_type_ids.len() + s])
    }

    /// The per-worker undesirable-shift total.
    pub fn undesirable_total_var(&self, worker_id: &str) -> Result<IntVar, LookupError> {
        let w = self.worker_idx(worker_id)?;
        Ok(self.undesirable_totals[w])
    }

    /// All assignment booleans of one worker in one period.
    pub fn worker_period_vars(
        &self,
        worker_id: &str,
        period: usize,
    ) -> Result<Vec<IntVar>, LookupError> {
        let w = self.worker_idx(worker_id)?;
        self.check_period(period)?;
        let stride = self.shift_type_ids.len();
        let base = w * self.num_periods * stride + period * stride;
        Ok(self.assignment[base..base + stride].to_vec())
    }

    /// On-demand coverage aggregate: `sum_w x[w,p,s]`.
    pub fn coverage_expr(
        &self,
        period: usize,
        shift_type_id: &str,
    ) -> Result<LinearExpr, LookupError> {
        self.check_period(period)?;
        let s = self.shift_idx(shift_type_id)?;
        let stride = self.shift_type_ids.len();
        let mut expr = LinearExpr::new();
        for w in 0..self.worker_ids.len() {
            expr.add_term(1, self.assignment[w * self.num_periods * stride + period * stride + s]);
        }
        Ok(expr)
    }

    /// Iterates `(worker_id, period, shift_type_id, var)` in allocation order.
    pub fn all_assignment_vars(
        &self,
    ) -> impl Iterator<Item = (&str, usize, &str, IntVar)> + '_ {
        let stride = self.shift_type_ids.len();
        self.assignment.iter().enumerate().map(move |(i, var)| {
            let w = i / (self.num_periods * stride);
            let p = (i / stride) % self.num_periods;
            let s = i % stride;
            (
                self.worker_ids[w].as_str(),
                p,
                self.shift_type_ids[s].as_str(),
                *var,
            )
        })
    }
}

/// Builds solver variables and their linking constraints from domain models.
pub struct VariableBuilder<'a> {
    workers: &'a [Worker],
    shift_types: &'a [ShiftType],
    num_periods: usize,
}

impl<'a> VariableBuilder<'a> {
    /// Creates a builder over the given inputs.
    pub fn new(workers: &'a [Worker], shift_types: &'a [ShiftType], num_periods: usize) -> Self {
        Self {
            workers,
            shift_types,
            num_periods,
        }
    }

    /// Allocates every variable and its linking constraints.
    pub fn build(&self, model: &mut CpModel) -> Result<SolverVariables, SolveError> {
        if self.workers.is_empty() {
            return Err(SolveError::CoreInvariantBroken(
                "variable builder invoked with no workers".into(),
            ));
        }
        if self.shift_types.is_empty() {
            return Err(SolveError::CoreInvariantBroken(
                "variable builder invoked with no shift types".into(),
            ));
        }
        if self.num_periods == 0 {
            return Err(SolveError::CoreInvariantBroken(
                "variable builder invoked with zero periods".into(),
            ));
        }

        let p = self.num_periods;
        let s_count = self.shift_types.len();
        let undesirable: Vec<usize> = self
            .shift_types
            .iter()
            .enumerate()
            .filter(|(_, st)| st.is_undesirable)
            .map(|(i, _)| i)
            .collect();

        // Assignment booleans, in (worker, period, shift) order.
        let mut assignment = Vec::with_capacity(self.workers.len() * p * s_count);
        for worker in self.workers {
            for period in 0..p {
                for shift_type in self.shift_types {
                    let name = format!("assign_{}_p{}_{}", worker.id, period, shift_type.id);
                    assignment.push(model.new_bool(name));
                }
            }
        }

        // Shift counts, linked to their assignment columns.
        let mut shift_counts = Vec::with_capacity(self.workers.len() * s_count);
        for (w, worker) in self.workers.iter().enumerate() {
            for (s, shift_type) in self.shift_types.iter().enumerate() {
                let name = format!("count_{}_{}", worker.id, shift_type.id);
                let count = model.new_int(0, p as i64, name);

                let mut link = LinearExpr::term(-1, count);
                for period in 0..p {
                    link.add_term(1, assignment[w * p * s_count + period * s_count + s]);
                }
                model.add_linear_eq(link, 0);
                shift_counts.push(count);
            }
        }

        // Undesirable totals per worker.
        let max_undesirable = (p * undesirable.len().max(1)) as i64;
        let mut undesirable_totals = Vec::with_capacity(self.workers.len());
        for (w, worker) in self.workers.iter().enumerate() {
            let name = format!("undesirable_total_{}", worker.id);
            let total = model.new_int(0, max_undesirable, name);

            if undesirable.is_empty() {
                model.add_linear_eq(LinearExpr::term(1, total), 0);
            } else {
                let mut link = LinearExpr::term(-1, total);
                for period in 0..p {
                    for &s in &undesirable {
                        link.add_term(1, assignment[w * p * s_count + period * s_count + s]);
                    }
                }
                model.add_linear_eq(link, 0);
            }
            undesirable_totals.push(total);
        }

        Ok(SolverVariables {
            worker_ids: self.workers.iter().map(|w| w.id.clone()).collect(),
            shift_type_ids: self.shift_types.iter().map(|st| st.id.clone()).collect(),
            worker_index: self
                .workers
                .iter()
                .enumerate()
                .map(|(i, w)| (w.id.clone(), i))
                .collect(),
            shift_index: self
                .shift_types
                .iter()
                .enumerate()
                .map(|(i, st)| (st.id.clone(), i))
                .collect(),
            num_periods: p,
            assignment,
            shift_counts,
            undesirable_totals,
        })
    }
}
