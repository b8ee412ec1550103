//! The accessor surface the dispatch layer requires of an engine state.

use bureau_ir::{Constraint, Expr, JumpKind};

use crate::inspect::InspectEvent;
use crate::solver::SolverError;

/// Per-state engine options consulted during dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateOption {
    /// Tolerate syscalls the tables do not know instead of failing.
    BypassUnsupportedSyscall,
}

/// Bookkeeping the engine resets at each step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scratch {
    /// Blocks executed during the most recent step.
    pub recent_block_count: u32,
    /// Name of the modeled procedure currently running, if any.
    pub sim_procedure: Option<String>,
}

/// Access to one execution state.
///
/// The dispatch layer holds exclusive access to a state for the duration of
/// one decision; states are never shared between concurrent decisions.
pub trait ExecutionState: Clone + Send {
    /// Jump kind of the step that produced this state.
    fn previous_jumpkind(&self) -> Option<JumpKind>;

    /// Enumerate up to `n` solutions of `expr`.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the state is unsatisfiable or `expr` is
    /// an unpinned free symbol.
    fn eval_upto(&self, expr: &Expr, n: usize) -> Result<Vec<u64>, SolverError>;

    /// Evaluate `expr` to its single solution.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::MultipleSolutions`] if there is more than one
    /// solution, or any error from [`ExecutionState::eval_upto`].
    fn eval_one(&self, expr: &Expr) -> Result<u64, SolverError> {
        match self.eval_upto(expr, 2)?.as_slice() {
            [value] => Ok(*value),
            _ => Err(SolverError::MultipleSolutions),
        }
    }

    /// Check that the path constraints admit an assignment.
    fn satisfiable(&self) -> bool;

    fn has_option(&self, option: StateOption) -> bool;

    /// Read a register by name.
    fn register(&self, name: &str) -> Option<Expr>;

    /// Write a register by name.
    fn set_register(&mut self, name: &str, value: Expr);

    /// Deliver an instrumentation event.
    fn inspect(&mut self, event: InspectEvent);

    fn scratch(&self) -> &Scratch;

    fn scratch_mut(&mut self) -> &mut Scratch;

    /// Record the control-flow exit that produced this state as a successor.
    fn record_exit(&mut self, target: &Expr, guard: &Constraint, jumpkind: JumpKind);
}
