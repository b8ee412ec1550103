//! Successor sink for one step.

use std::collections::BTreeMap;
use std::fmt;

use bureau_ir::{Constraint, Expr, JumpKind};
use bureau_state::ExecutionState;

/// What kind of step produced the successors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepSort {
    Block,
    Procedure,
    Syscall,
}

impl StepSort {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Procedure => "procedure",
            Self::Syscall => "syscall",
        }
    }
}

/// Step metadata value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Artifact {
    Bool(bool),
    Str(String),
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// One outgoing control-flow edge.
#[derive(Clone, Debug)]
pub struct Successor<S> {
    pub state: S,
    pub target: Expr,
    pub guard: Constraint,
    pub jumpkind: JumpKind,
}

/// Everything one step produced.
#[derive(Clone, Debug)]
pub struct Successors<S> {
    pub sort: Option<StepSort>,
    pub artifacts: BTreeMap<&'static str, Artifact>,
    pub description: String,
    /// Set once a stage has fully handled the step.
    pub processed: bool,
    exits: Vec<Successor<S>>,
}

impl<S> Default for Successors<S> {
    fn default() -> Self {
        Self {
            sort: None,
            artifacts: BTreeMap::new(),
            description: String::new(),
            processed: false,
            exits: Vec::new(),
        }
    }
}

impl<S: ExecutionState> Successors<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the exit on `state` and append it.
    pub fn add_successor(
        &mut self,
        mut state: S,
        target: Expr,
        guard: Constraint,
        jumpkind: JumpKind,
    ) {
        state.record_exit(&target, &guard, jumpkind);
        self.exits.push(Successor {
            state,
            target,
            guard,
            jumpkind,
        });
    }

    pub fn set_artifact(&mut self, key: &'static str, value: Artifact) {
        self.artifacts.insert(key, value);
    }

    #[must_use]
    pub fn artifact(&self, key: &str) -> Option<&Artifact> {
        self.artifacts.get(key)
    }

    /// Outgoing edges in the order they were added.
    #[must_use]
    pub fn successors(&self) -> &[Successor<S>] {
        &self.exits
    }

    #[must_use]
    pub fn into_successors(self) -> Vec<Successor<S>> {
        self.exits
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.exits.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.exits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bureau_state::{IP_REGISTER, SimState};

    #[test]
    fn test_add_successor_records_exit() {
        let mut succ = Successors::new();
        succ.add_successor(
            SimState::new(),
            Expr::constant(0x4000),
            Constraint::True,
            JumpKind::Ret,
        );
        assert_eq!(succ.len(), 1);
        let out = &succ.successors()[0];
        assert_eq!(
            out.state.register(IP_REGISTER),
            Some(Expr::constant(0x4000))
        );
        assert_eq!(out.state.previous_jumpkind(), Some(JumpKind::Ret));
        assert!(!succ.processed);
    }

    #[test]
    fn test_artifacts_ordered() {
        let mut succ: Successors<SimState> = Successors::new();
        succ.set_artifact("name", Artifact::Str("open".into()));
        succ.set_artifact("is_syscall", Artifact::Bool(true));
        let keys: Vec<_> = succ.artifacts.keys().copied().collect();
        assert_eq!(keys, vec!["is_syscall", "name"]);
        assert_eq!(succ.artifact("name").unwrap().to_string(), "open");
    }
}
