//! In-memory reference state.

use bureau_ir::{Constraint, Expr, JumpKind};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::inspect::{InspectEvent, Inspector};
use crate::solver::{Solver, SolverError};
use crate::state::{ExecutionState, Scratch, StateOption};

/// Register that holds the address of the next block.
pub const IP_REGISTER: &str = "ip";

/// A register file, jump history and constraint store.
#[derive(Clone, Debug, Default)]
pub struct SimState {
    registers: FxHashMap<String, Expr>,
    history: Vec<JumpKind>,
    solver: Solver,
    options: FxHashSet<StateOption>,
    scratch: Scratch,
    inspector: Inspector,
}

impl SimState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_register(mut self, name: &str, value: impl Into<Expr>) -> Self {
        self.registers.insert(name.to_string(), value.into());
        self
    }

    /// Append a jump kind to the history, as if a step just ended with it.
    #[must_use]
    pub fn with_jumpkind(mut self, jumpkind: JumpKind) -> Self {
        self.history.push(jumpkind);
        self
    }

    #[must_use]
    pub fn with_option(mut self, option: StateOption) -> Self {
        self.options.insert(option);
        self
    }

    #[must_use]
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.solver.add(constraint);
        self
    }

    pub fn remove_option(&mut self, option: StateOption) {
        self.options.remove(&option);
    }

    /// Jump kinds of all steps so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[JumpKind] {
        &self.history
    }

    #[must_use]
    pub const fn solver(&self) -> &Solver {
        &self.solver
    }

    #[must_use]
    pub const fn inspector(&self) -> &Inspector {
        &self.inspector
    }

    pub const fn inspector_mut(&mut self) -> &mut Inspector {
        &mut self.inspector
    }
}

impl ExecutionState for SimState {
    fn previous_jumpkind(&self) -> Option<JumpKind> {
        self.history.last().copied()
    }

    fn eval_upto(&self, expr: &Expr, n: usize) -> Result<Vec<u64>, SolverError> {
        self.solver.eval_upto(expr, n)
    }

    fn satisfiable(&self) -> bool {
        self.solver.satisfiable()
    }

    fn has_option(&self, option: StateOption) -> bool {
        self.options.contains(&option)
    }

    fn register(&self, name: &str) -> Option<Expr> {
        self.registers.get(name).cloned()
    }

    fn set_register(&mut self, name: &str, value: Expr) {
        self.registers.insert(name.to_string(), value);
    }

    fn inspect(&mut self, event: InspectEvent) {
        self.inspector.fire(event);
    }

    fn scratch(&self) -> &Scratch {
        &self.scratch
    }

    fn scratch_mut(&mut self) -> &mut Scratch {
        &mut self.scratch
    }

    fn record_exit(&mut self, target: &Expr, guard: &Constraint, jumpkind: JumpKind) {
        self.registers.insert(IP_REGISTER.to_string(), target.clone());
        self.solver.add(guard.clone());
        self.history.push(jumpkind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bureau_ir::SyscallTrap;

    #[test]
    fn test_previous_jumpkind_is_last() {
        let state = SimState::new()
            .with_jumpkind(JumpKind::Call)
            .with_jumpkind(JumpKind::Syscall(SyscallTrap::Syscall));
        assert_eq!(
            state.previous_jumpkind(),
            Some(JumpKind::Syscall(SyscallTrap::Syscall))
        );
        assert_eq!(SimState::new().previous_jumpkind(), None);
    }

    #[test]
    fn test_record_exit() {
        let mut state = SimState::new();
        state.record_exit(&Expr::constant(0x40_1000), &Constraint::True, JumpKind::Ret);
        assert_eq!(state.register(IP_REGISTER), Some(Expr::constant(0x40_1000)));
        assert_eq!(state.history(), &[JumpKind::Ret]);
        assert!(state.solver().constraints().is_empty());
    }

    #[test]
    fn test_options() {
        let mut state = SimState::new().with_option(StateOption::BypassUnsupportedSyscall);
        assert!(state.has_option(StateOption::BypassUnsupportedSyscall));
        state.remove_option(StateOption::BypassUnsupportedSyscall);
        assert!(!state.has_option(StateOption::BypassUnsupportedSyscall));
    }

    #[test]
    fn test_eval_through_trait() {
        let state = SimState::new().with_constraint(Constraint::eq("n", 5));
        assert_eq!(state.eval_one(&Expr::symbol("n")), Ok(5));
        assert!(state.satisfiable());
    }
}
