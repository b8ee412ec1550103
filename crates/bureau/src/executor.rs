//! Remote syscall executor contract.
//!
//! A bureau is the process that performs a syscall against a real operating
//! system and hands back a state reflecting its effect. Transport, sandboxing
//! and lifecycle are the bureau's business; dispatch only sees a blocking
//! request/response call.

use bureau_abi::SyscallCc;
use bureau_state::ExecutionState;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BureauError {
    #[error("bureau unavailable: {0}")]
    Unavailable(String),

    #[error("bureau rejected {name}: {reason}")]
    Rejected { name: String, reason: String },

    #[error("bureau protocol error: {0}")]
    Protocol(String),
}

/// Executes one syscall remotely.
pub trait Bureau<S: ExecutionState>: Send + Sync {
    /// Run syscall `num` with concrete `args` and return the resulting state.
    ///
    /// `state` is the snapshot at the trap; implementations must not assume
    /// they may mutate it.
    ///
    /// # Errors
    ///
    /// Returns a [`BureauError`] if the bureau cannot be reached, refuses the
    /// call, or answers with something that is not a state.
    fn invoke_syscall(
        &self,
        state: &S,
        num: u64,
        args: &[u64],
        cc: &SyscallCc,
    ) -> Result<S, BureauError>;
}

impl<S, F> Bureau<S> for F
where
    S: ExecutionState,
    F: Fn(&S, u64, &[u64], &SyscallCc) -> Result<S, BureauError> + Send + Sync,
{
    fn invoke_syscall(
        &self,
        state: &S,
        num: u64,
        args: &[u64],
        cc: &SyscallCc,
    ) -> Result<S, BureauError> {
        self(state, num, args, cc)
    }
}

/// Bureau that performs nothing and reports a fixed return value.
///
/// Useful for dry runs: the successor is a copy of the request state with the
/// return register set.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedReturnBureau {
    ret: u64,
}

impl FixedReturnBureau {
    #[must_use]
    pub const fn new(ret: u64) -> Self {
        Self { ret }
    }

    #[must_use]
    pub const fn ret(&self) -> u64 {
        self.ret
    }
}

impl<S: ExecutionState> Bureau<S> for FixedReturnBureau {
    fn invoke_syscall(
        &self,
        state: &S,
        _num: u64,
        _args: &[u64],
        cc: &SyscallCc,
    ) -> Result<S, BureauError> {
        let mut next = state.clone();
        cc.set_return_value(&mut next, self.ret);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bureau_abi::AbiId;
    use bureau_ir::Expr;
    use bureau_state::SimState;

    type Reply = Result<SimState, BureauError>;

    #[test]
    fn test_fixed_return_writes_ret_reg() {
        let cc = SyscallCc::for_abi(&AbiId::RISCV64).unwrap();
        let state = SimState::new().with_register("a0", 0x1000_u64);
        let next = FixedReturnBureau::new(3)
            .invoke_syscall(&state, 56, &[0x1000], &cc)
            .unwrap();
        assert_eq!(next.register("a0"), Some(Expr::constant(3)));
        assert_eq!(state.register("a0"), Some(Expr::constant(0x1000)));
    }

    #[test]
    fn test_closure_is_a_bureau() {
        let cc = SyscallCc::for_abi(&AbiId::AMD64).unwrap();
        let failing = |_: &SimState, num: u64, _: &[u64], _: &SyscallCc| -> Reply {
            Err(BureauError::Rejected {
                name: num.to_string(),
                reason: "denied".to_string(),
            })
        };
        let err = failing
            .invoke_syscall(&SimState::new(), 2, &[], &cc)
            .unwrap_err();
        assert_eq!(err.to_string(), "bureau rejected 2: denied");
    }
}
