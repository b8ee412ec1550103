//! Constraint store with "unique value or fail" evaluation.

use bureau_ir::{Constraint, Expr};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Evaluation failures.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SolverError {
    #[error("no satisfying assignment under the current constraints")]
    Unsatisfiable,
    #[error("expression has more than one solution")]
    MultipleSolutions,
    #[error("symbol '{0}' is unconstrained")]
    Unbounded(String),
}

/// Path constraints of one state.
#[derive(Clone, Debug, Default)]
pub struct Solver {
    constraints: Vec<Constraint>,
}

impl Solver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path constraint. Trivial `true` guards are not stored.
    pub fn add(&mut self, constraint: Constraint) {
        if !constraint.is_true() {
            self.constraints.push(constraint);
        }
    }

    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Check that the constraints admit at least one assignment.
    #[must_use]
    pub fn satisfiable(&self) -> bool {
        self.pinned().is_some()
    }

    /// Symbol -> value bindings, or `None` if the constraints contradict.
    fn pinned(&self) -> Option<FxHashMap<&str, u64>> {
        let mut pinned = FxHashMap::default();
        for constraint in &self.constraints {
            match constraint {
                Constraint::True => {}
                Constraint::False => return None,
                Constraint::Eq { symbol, value } => {
                    if let Some(prev) = pinned.insert(symbol.as_str(), *value)
                        && prev != *value
                    {
                        return None;
                    }
                }
            }
        }
        Some(pinned)
    }

    /// Enumerate up to `n` solutions of `expr`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Unsatisfiable`] if the constraints contradict or
    /// the candidate set is empty, and [`SolverError::Unbounded`] for a free
    /// symbol no constraint pins.
    pub fn eval_upto(&self, expr: &Expr, n: usize) -> Result<Vec<u64>, SolverError> {
        let pinned = self.pinned().ok_or(SolverError::Unsatisfiable)?;
        match expr {
            Expr::Const(value) => Ok(vec![*value]),
            Expr::OneOf(values) if values.is_empty() => Err(SolverError::Unsatisfiable),
            Expr::OneOf(values) => Ok(values.iter().take(n).copied().collect()),
            Expr::Symbol(name) => pinned
                .get(name.as_str())
                .map(|value| vec![*value])
                .ok_or_else(|| SolverError::Unbounded(name.clone())),
        }
    }

    /// Evaluate `expr` to its single solution.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::MultipleSolutions`] if more than one value is
    /// possible, or any error from [`Solver::eval_upto`].
    pub fn eval_one(&self, expr: &Expr) -> Result<u64, SolverError> {
        match self.eval_upto(expr, 2)?.as_slice() {
            [value] => Ok(*value),
            _ => Err(SolverError::MultipleSolutions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_one_const() {
        let solver = Solver::new();
        assert_eq!(solver.eval_one(&Expr::constant(42)), Ok(42));
    }

    #[test]
    fn test_eval_one_single_candidate() {
        let solver = Solver::new();
        assert_eq!(solver.eval_one(&Expr::one_of([9])), Ok(9));
    }

    #[test]
    fn test_eval_one_many_candidates() {
        let solver = Solver::new();
        assert_eq!(
            solver.eval_one(&Expr::one_of([1, 2])),
            Err(SolverError::MultipleSolutions)
        );
    }

    #[test]
    fn test_large_candidate_set_is_not_unique() {
        let solver = Solver::new();
        let expr = Expr::one_of(0..32);
        assert_eq!(solver.eval_upto(&expr, 3), Ok(vec![0, 1, 2]));
        assert_eq!(solver.eval_one(&expr), Err(SolverError::MultipleSolutions));
    }

    #[test]
    fn test_pinned_symbol() {
        let mut solver = Solver::new();
        solver.add(Constraint::eq("fd", 3));
        assert_eq!(solver.eval_one(&Expr::symbol("fd")), Ok(3));
        assert_eq!(
            solver.eval_one(&Expr::symbol("len")),
            Err(SolverError::Unbounded("len".to_string()))
        );
    }

    #[test]
    fn test_contradiction_is_unsat() {
        let mut solver = Solver::new();
        solver.add(Constraint::eq("x", 1));
        solver.add(Constraint::eq("x", 2));
        assert!(!solver.satisfiable());
        assert_eq!(
            solver.eval_one(&Expr::constant(0)),
            Err(SolverError::Unsatisfiable)
        );
    }

    #[test]
    fn test_true_not_stored() {
        let mut solver = Solver::new();
        solver.add(Constraint::True);
        assert!(solver.constraints().is_empty());
        solver.add(Constraint::False);
        assert!(!solver.satisfiable());
    }
}
