//! Syscall argument concretization.

use bureau_abi::{SyscallCc, SyscallPrototype};
use bureau_ir::Expr;
use bureau_state::ExecutionState;

/// Why arguments could not be concretized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgFallback {
    /// The argument does not have exactly one solution.
    Symbolic { index: usize, expr: Expr },
    /// The calling convention has no register slot for the argument.
    NoSlot { index: usize },
}

impl ArgFallback {
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Symbolic { index, .. } | Self::NoSlot { index } => *index,
        }
    }
}

/// Read every declared argument of `prototype` as a single concrete value.
///
/// Stops at the first argument without a unique solution; no value is ever
/// sampled from a symbolic argument.
///
/// # Errors
///
/// Returns the [`ArgFallback`] for the first argument that is not passed in a
/// register or does not have exactly one solution.
pub fn concretize<S: ExecutionState>(
    state: &S,
    cc: &SyscallCc,
    prototype: &SyscallPrototype,
) -> Result<Vec<u64>, ArgFallback> {
    let mut args = Vec::with_capacity(prototype.arg_count());
    for index in 0..prototype.arg_count() {
        let expr = cc.arg(state, index).ok_or(ArgFallback::NoSlot { index })?;
        match state.eval_one(&expr) {
            Ok(value) => args.push(value),
            Err(_) => return Err(ArgFallback::Symbolic { index, expr }),
        }
    }
    Ok(args)
}
