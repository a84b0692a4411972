//! Exact in-process solver backend.
//!
//! `SimpleCpSolver` performs depth-first branch-and-bound over the model's
//! variables in allocation order, with equality propagation and interval
//! pruning. It is deterministic and exact on small models, which makes it the
//! reference backend for tests; production hosts wire in a real CP-SAT
//! backend through the same [`CpSolver`] trait.
//!
//! # Algorithm
//!
//! 1. Propagate: any equality (or implication whose literal is decided true)
//!    with exactly one unassigned variable fixes that variable.
//! 2. Prune: a constraint whose value interval excludes its right-hand side,
//!    or a partial objective lower bound at or above the incumbent, cuts the
//!    branch.
//! 3. Branch: the lowest-index unassigned variable is enumerated over its
//!    domain, smallest value first.
//!
//! The time limit is honored between nodes; on expiry the incumbent (if any)
//! is returned as `Feasible`, otherwise `Unknown`.

use std::time::{Duration, Instant};

use tracing::debug;

use super::model::{CmpOp, CpModel, LinearConstraint, LinearExpr, Literal};
use super::solve::{CpSolution, CpSolver, SolveStatus, SolverParams};
use crate::error::SolveError;

/// Deterministic exact backend for small models.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleCpSolver;

impl SimpleCpSolver {
    /// Creates a new backend instance.
    pub fn new() -> Self {
        Self
    }
}

impl CpSolver for SimpleCpSolver {
    fn solve(&self, model: &CpModel, params: &SolverParams) -> Result<CpSolution, SolveError> {
        let started = Instant::now();
        let mut search = Search {
            model,
            deadline: started + Duration::from_secs(params.time_limit_seconds),
            timed_out: false,
            best: None,
            nodes: 0,
        };

        let values: Vec<Option<i64>> = vec![None; model.num_vars()];
        search.explore(values);

        if params.log_search_progress {
            debug!(
                model = model.name(),
                nodes = search.nodes,
                timed_out = search.timed_out,
                "search finished"
            );
        }

        let wall_time = started.elapsed();
        let solution = match search.best {
            Some((objective, values)) => {
                let status = if search.timed_out {
                    SolveStatus::Feasible
                } else {
                    SolveStatus::Optimal
                };
                let objective_value = model.objective().map(|_| objective);
                CpSolution::with_values(status, objective_value, wall_time, values)
            }
            None => {
                let status = if search.timed_out {
                    SolveStatus::Unknown
                } else {
                    SolveStatus::Infeasible
                };
                CpSolution::empty(status, wall_time)
            }
        };
        Ok(solution)
    }
}

/// Whether the search should keep exploring siblings.
enum Flow {
    Continue,
    Stop,
}

struct Search<'a> {
    model: &'a CpModel,
    deadline: Instant,
    timed_out: bool,
    best: Option<(i64, Vec<i64>)>,
    nodes: u64,
}

impl Search<'_> {
    fn explore(&mut self, mut values: Vec<Option<i64>>) -> Flow {
        self.nodes += 1;
        if self.nodes % 256 == 0 && Instant::now() >= self.deadline {
            self.timed_out = true;
            return Flow::Stop;
        }

        if !self.propagate(&mut values) {
            return Flow::Continue;
        }
        if let Some((best_obj, _)) = &self.best {
            if self.objective_lower_bound(&values) >= *best_obj {
                return Flow::Continue;
            }
        }

        let Some(var_idx) = values.iter().position(Option::is_none) else {
            return self.record_solution(&values);
        };

        let (lo, hi) = self.model.domain(super::model::IntVar(var_idx));
        for value in lo..=hi {
            let mut child = values.clone();
            child[var_idx] = Some(value);
            if !self.consistent(&child) {
                continue;
            }
            if let Flow::Stop = self.explore(child) {
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    /// Records a complete assignment. Without an objective any feasible
    /// assignment is final, so the search stops there.
    fn record_solution(&mut self, values: &[Option<i64>]) -> Flow {
        let concrete: Vec<i64> = values.iter().map(|v| v.unwrap_or(0)).collect();

        let objective = match self.model.objective() {
            Some(expr) => eval_expr(expr, &concrete),
            None => 0,
        };
        let improved = match &self.best {
            Some((best_obj, _)) => objective < *best_obj,
            None => true,
        };
        if improved {
            self.best = Some((objective, concrete));
        }
        if self.model.objective().is_none() {
            // Satisfaction problem: the first feasible assignment is optimal.
            return Flow::Stop;
        }
        Flow::Continue
    }

    /// Fixes single-unassigned-variable equalities to a fixpoint.
    /// Returns `false` on conflict.
    fn propagate(&self, values: &mut [Option<i64>]) -> bool {
        loop {
            let mut changed = false;

            for constraint in self.model.constraints() {
                match self.step(constraint, values) {
                    Step::Conflict => return false,
                    Step::Assigned => changed = true,
                    Step::NoOp => {}
                }
            }
            for (literal, constraint) in self.model.implications() {
                if literal_value(*literal, values) != Some(true) {
                    continue;
                }
                match self.step(constraint, values) {
                    Step::Conflict => return false,
                    Step::Assigned => changed = true,
                    Step::NoOp => {}
                }
            }

            if !changed {
                return true;
            }
        }
    }

    /// One propagation step over a single constraint.
    fn step(&self, constraint: &LinearConstraint, values: &mut [Option<i64>]) -> Step {
        if !self.constraint_feasible(constraint, values) {
            return Step::Conflict;
        }
        if constraint.op != CmpOp::Eq {
            return Step::NoOp;
        }

        let mut unassigned: Option<(i64, usize)> = None;
        let mut assigned_sum = constraint.expr.constant();
        for (coef, var) in constraint.expr.terms() {
            match values[var.index()] {
                Some(v) => assigned_sum += coef * v,
                None => {
                    if unassigned.is_some() {
                        return Step::NoOp; // more than one free variable
                    }
                    unassigned = Some((*coef, var.index()));
                }
            }
        }
        let Some((coef, var_idx)) = unassigned else {
            return Step::NoOp; // fully assigned, feasibility already checked
        };

        let needed = constraint.rhs - assigned_sum;
        if coef == 0 || needed % coef != 0 {
            return Step::Conflict;
        }
        let value = needed / coef;
        let (lo, hi) = self.model.domain(super::model::IntVar(var_idx));
        if value < lo || value > hi {
            return Step::Conflict;
        }
        values[var_idx] = Some(value);
        Step::Assigned
    }

    /// Interval-checks every constraint and every active implication.
    fn consistent(&self, values: &[Option<i64>]) -> bool {
        self.model
            .constraints()
            .iter()
            .all(|c| self.constraint_feasible(c, values))
            && self.model.implications().iter().all(|(lit, c)| {
                literal_value(*lit, values) != Some(true) || self.constraint_feasible(c, values)
            })
    }

    /// Whether a constraint can still be satisfied under the partial
    /// assignment (interval reasoning over unassigned variables).
    fn constraint_feasible(&self, constraint: &LinearConstraint, values: &[Option<i64>]) -> bool {
        let (min, max) = self.expr_bounds(&constraint.expr, values);
        match constraint.op {
            CmpOp::Eq => min <= constraint.rhs && constraint.rhs <= max,
            CmpOp::Le => min <= constraint.rhs,
            CmpOp::Ge => max >= constraint.rhs,
        }
    }

    fn expr_bounds(&self, expr: &LinearExpr, values: &[Option<i64>]) -> (i64, i64) {
        let mut min = expr.constant();
        let mut max = expr.constant();
        for (coef, var) in expr.terms() {
            match values[var.index()] {
                Some(v) => {
                    min += coef * v;
                    max += coef * v;
                }
                None => {
                    let (lo, hi) = self.model.domain(*var);
                    if *coef >= 0 {
                        min += coef * lo;
                        max += coef * hi;
                    } else {
                        min += coef * hi;
                        max += coef * lo;
                    }
                }
            }
        }
        (min, max)
    }

    fn objective_lower_bound(&self, values: &[Option<i64>]) -> i64 {
        match self.model.objective() {
            Some(expr) => self.expr_bounds(expr, values).0,
            None => i64::MIN,
        }
    }
}

enum Step {
    NoOp,
    Assigned,
    Conflict,
}

fn eval_expr(expr: &LinearExpr, values: &[i64]) -> i64 {
    expr.constant()
        + expr
            .terms()
            .iter()
            .map(|(coef, var)| coef * values[var.index()])
            .sum::<i64>()
}

fn literal_value(literal: Literal, values: &[Option<i64>]) -> Option<bool> {
    values[literal.var.index()].map(|v| if literal.negated { v == 0 } else { v != 0 })
}
