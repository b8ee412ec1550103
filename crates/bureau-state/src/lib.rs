//! Execution state as seen by the dispatch layer.
//!
//! The engine owns its states; this crate only fixes the accessor surface the
//! dispatch layer needs ([`ExecutionState`]) and provides [`SimState`], a small
//! in-memory state used by the CLI and by tests.
//!
//! ```ignore
//! use bureau_ir::{Expr, JumpKind, SyscallTrap};
//! use bureau_state::{ExecutionState, SimState};
//!
//! let state = SimState::new()
//!     .with_register("rax", Expr::constant(2))
//!     .with_jumpkind(JumpKind::Syscall(SyscallTrap::Syscall));
//! assert_eq!(state.eval_one(&Expr::constant(2)), Ok(2));
//! ```

mod inspect;
mod sim;
mod solver;
mod state;

pub use inspect::{Breakpoint, InspectEvent, InspectWhen, Inspector};
pub use sim::{IP_REGISTER, SimState};
pub use solver::{Solver, SolverError};
pub use state::{ExecutionState, Scratch, StateOption};
