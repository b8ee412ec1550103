//! Remote syscall dispatch.
//!
//! [`RemoteSyscallStage`] runs once per step whose previous jump was a
//! syscall trap. It either declines ([`Decision::Local`]), leaving the state
//! untouched for the next stage, or commits: the syscall goes to the bureau
//! and exactly one successor is produced.

use std::sync::Arc;

use bureau_abi::{AbiId, OsModel, SyscallCatalog, SyscallCc};
use bureau_ir::{Constraint, Expr, JumpKind};
use bureau_state::{ExecutionState, InspectEvent, InspectWhen, StateOption};
use rayon::prelude::*;
use tracing::{debug, info, trace_span, warn};

use crate::abi::resolve_abi;
use crate::chain::{Flow, SuccessorsStage};
use crate::concretize::{ArgFallback, concretize};
use crate::config::DispatchConfig;
use crate::error::{DispatchError, Result};
use crate::executor::Bureau;
use crate::metrics;
use crate::successors::{Artifact, StepSort, Successors};

/// Instrumentation event fired around a remote syscall.
pub const SYSCALL_EVENT: &str = "syscall";

/// One committed dispatch attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyscallInvocation {
    pub abi: AbiId,
    pub num: u64,
    pub name: String,
    pub args: Vec<u64>,
    pub cc: SyscallCc,
}

/// Why remote handling was declined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LocalReason {
    /// The previous jump was not a syscall trap.
    NotSyscall,
    /// The syscall is always modeled locally.
    Bypassed,
    /// Argument `index` has no unique concrete value.
    SymbolicArgument { index: usize },
    /// Argument `index` is not passed in a register.
    NoArgumentSlot { index: usize },
    /// The number has no table entry and unsupported syscalls are tolerated.
    UnsupportedSyscall,
    /// The name has no prototype and unsupported syscalls are tolerated.
    MissingPrototype,
}

impl LocalReason {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NotSyscall => "not_syscall",
            Self::Bypassed => "bypassed",
            Self::SymbolicArgument { .. } => "symbolic_argument",
            Self::NoArgumentSlot { .. } => "no_argument_slot",
            Self::UnsupportedSyscall => "unsupported_syscall",
            Self::MissingPrototype => "missing_prototype",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Local(LocalReason),
    Remote(SyscallInvocation),
}

/// Result of stepping one state in [`RemoteSyscallStage::process_batch`].
#[derive(Debug)]
pub struct StepOutcome<S> {
    pub state: S,
    pub result: Result<Decision>,
    pub successors: Successors<S>,
}

/// Forwards eligible syscalls to a bureau.
pub struct RemoteSyscallStage<S> {
    os: Arc<dyn OsModel>,
    catalog: Arc<dyn SyscallCatalog>,
    bureau: Arc<dyn Bureau<S>>,
    config: DispatchConfig,
}

impl<S: ExecutionState> RemoteSyscallStage<S> {
    #[must_use]
    pub fn new(
        os: Arc<dyn OsModel>,
        catalog: Arc<dyn SyscallCatalog>,
        bureau: Arc<dyn Bureau<S>>,
    ) -> Self {
        Self {
            os,
            catalog,
            bureau,
            config: DispatchConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &DispatchConfig {
        &self.config
    }

    fn tolerates_unsupported(&self, state: &S) -> bool {
        self.config.tolerate_unsupported || state.has_option(StateOption::BypassUnsupportedSyscall)
    }

    /// Decide how the syscall at `state` should be handled. Does not mutate.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if the syscall number is not a single
    /// concrete value, no ABI or calling convention fits it, or the tables do
    /// not know it and unsupported syscalls are not tolerated.
    pub fn decide(&self, state: &S) -> Result<Decision> {
        let Some(trap) = state.previous_jumpkind().and_then(JumpKind::trap) else {
            return Ok(Decision::Local(LocalReason::NotSyscall));
        };

        let entry_cc = self
            .os
            .syscall_cc(Some(trap))
            .ok_or_else(|| DispatchError::NoCallingConvention {
                arch: self.os.arch(),
            })?;
        let num = self.syscall_number(state, &entry_cc)?;
        let abi = resolve_abi(self.os.as_ref(), Some(trap), num)?;
        let tolerate = self.tolerates_unsupported(state);

        let Some(name) = self.catalog.syscall_name(&abi, num) else {
            if tolerate {
                debug!(num, %abi, "unknown syscall tolerated");
                return Ok(Decision::Local(LocalReason::UnsupportedSyscall));
            }
            return Err(DispatchError::UnknownSyscallNumber { num, abi });
        };

        if self.config.bypass.is_bypassed(&abi, name) {
            debug!(name, %abi, "bypassed");
            return Ok(Decision::Local(LocalReason::Bypassed));
        }

        let Some(prototype) = self.catalog.prototype(&abi, name) else {
            if tolerate {
                debug!(name, %abi, "missing prototype tolerated");
                return Ok(Decision::Local(LocalReason::MissingPrototype));
            }
            return Err(DispatchError::UnknownPrototype {
                num,
                name: name.to_string(),
                abi,
            });
        };

        // MIPS64 can trap into o32 through the n64 entry; read arguments per ABI.
        let cc = SyscallCc::for_abi(&abi).unwrap_or(entry_cc);
        let args = match concretize(state, &cc, prototype) {
            Ok(args) => args,
            Err(ArgFallback::Symbolic { index, expr }) => {
                debug!(name, index, %expr, "symbolic argument");
                return Ok(Decision::Local(LocalReason::SymbolicArgument { index }));
            }
            Err(ArgFallback::NoSlot { index }) => {
                debug!(name, index, "argument not in a register");
                return Ok(Decision::Local(LocalReason::NoArgumentSlot { index }));
            }
        };

        Ok(Decision::Remote(SyscallInvocation {
            abi,
            num,
            name: name.to_string(),
            args,
            cc,
        }))
    }

    fn syscall_number(&self, state: &S, cc: &SyscallCc) -> Result<u64> {
        let expr = cc.syscall_num(state);
        if let Ok(num) = state.eval_one(&expr) {
            return Ok(num);
        }
        Err(self.symbolic_number(state, &expr))
    }

    fn symbolic_number(&self, state: &S, expr: &Expr) -> DispatchError {
        if self.tolerates_unsupported(state) {
            if state.satisfiable() {
                DispatchError::SymbolicSyscallNumber {
                    expr: expr.to_string(),
                }
            } else {
                DispatchError::UnsatisfiableState
            }
        } else {
            DispatchError::AmbiguousSyscallNumber {
                expr: expr.to_string(),
            }
        }
    }

    /// Forward `invocation` to the bureau and build its successor.
    ///
    /// Nothing is written to `successors` unless the bureau succeeds. The
    /// `syscall` event fires before the call and again after it, whether or
    /// not the bureau succeeded; a failed call carries an `error` attribute.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Remote`] if the bureau call fails.
    pub fn execute(
        &self,
        state: &mut S,
        invocation: &SyscallInvocation,
        successors: &mut Successors<S>,
    ) -> Result<()> {
        let SyscallInvocation {
            num,
            name,
            args,
            cc,
            ..
        } = invocation;

        let scratch = state.scratch_mut();
        scratch.recent_block_count = 1;
        scratch.sim_procedure = None;

        state.inspect(syscall_event(InspectWhen::Before, name));

        let next = match self.bureau.invoke_syscall(state, *num, args, cc) {
            Ok(next) => next,
            Err(err) => {
                let event = syscall_event(InspectWhen::After, name);
                state.inspect(event.with_attr("error", err.to_string()));
                return Err(err.into());
            }
        };
        let return_addr = cc.return_addr(state);
        successors.add_successor(next, return_addr, Constraint::True, JumpKind::Ret);

        state.inspect(syscall_event(InspectWhen::After, name));

        successors.sort = Some(StepSort::Syscall);
        successors.set_artifact("is_syscall", Artifact::Bool(true));
        successors.set_artifact("name", Artifact::Str(name.clone()));
        successors.set_artifact("no_ret", Artifact::Bool(false));
        successors.set_artifact("adds_exits", Artifact::Bool(true));
        successors.description = format!("syscall {name}");
        successors.processed = true;
        Ok(())
    }

    /// Decide and, if remote, execute. Records metrics for every outcome.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Self::decide`] or [`Self::execute`].
    pub fn step(&self, state: &mut S, successors: &mut Successors<S>) -> Result<Decision> {
        let _span = trace_span!("remote_syscall").entered();

        let decision = self.decide(state).inspect_err(metrics::record_error)?;
        match &decision {
            Decision::Local(reason) => metrics::record_local(reason),
            Decision::Remote(invocation) => {
                info!(
                    name = %invocation.name,
                    abi = %invocation.abi,
                    args = ?invocation.args,
                    "forwarding syscall"
                );
                self.execute(state, invocation, successors)
                    .inspect_err(|err| {
                        warn!(name = %invocation.name, "{err}");
                        metrics::record_error(err);
                    })?;
                metrics::record_remote(&invocation.abi, &invocation.name, invocation.args.len());
            }
        }
        Ok(decision)
    }

    /// Step independent states in parallel.
    #[must_use]
    pub fn process_batch(&self, states: Vec<S>) -> Vec<StepOutcome<S>> {
        states
            .into_par_iter()
            .map(|mut state| {
                let mut successors = Successors::new();
                let result = self.step(&mut state, &mut successors);
                StepOutcome {
                    state,
                    result,
                    successors,
                }
            })
            .collect()
    }
}

fn syscall_event(when: InspectWhen, name: &str) -> InspectEvent {
    InspectEvent::new(SYSCALL_EVENT, when).with_attr("syscall_name", name)
}

impl<S: ExecutionState> SuccessorsStage<S> for RemoteSyscallStage<S> {
    fn name(&self) -> &'static str {
        "remote_syscall"
    }

    fn process(&self, state: &mut S, successors: &mut Successors<S>) -> Result<Flow> {
        Ok(match self.step(state, successors)? {
            Decision::Local(_) => Flow::Pass,
            Decision::Remote(_) => Flow::Handled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bureau_abi::{Arch, LinuxUserland, SyscallLibrary, syscall_nr};
    use bureau_ir::SyscallTrap;
    use bureau_state::SimState;

    use crate::bypass::BypassPolicy;
    use crate::executor::FixedReturnBureau;

    fn stage(arch: Arch) -> RemoteSyscallStage<SimState> {
        RemoteSyscallStage::new(
            Arc::new(LinuxUserland::new(arch)),
            Arc::new(SyscallLibrary::linux()),
            Arc::new(FixedReturnBureau::new(0)),
        )
    }

    fn riscv_state(num: u64) -> SimState {
        SimState::new()
            .with_jumpkind(JumpKind::Syscall(SyscallTrap::Ecall))
            .with_register("a7", num)
            .with_register("a0", 3_u64)
            .with_register("a1", 0x1000_u64)
            .with_register("a2", 0_u64)
            .with_register("a3", 0_u64)
            .with_register("ip_at_syscall", 0x1_0004_u64)
    }

    #[test]
    fn test_not_syscall() {
        let state = SimState::new().with_jumpkind(JumpKind::Boring);
        assert_eq!(
            stage(Arch::RiscV64).decide(&state).unwrap(),
            Decision::Local(LocalReason::NotSyscall)
        );
        assert_eq!(
            stage(Arch::RiscV64).decide(&SimState::new()).unwrap(),
            Decision::Local(LocalReason::NotSyscall)
        );
    }

    #[test]
    fn test_openat_goes_remote() {
        let decision = stage(Arch::RiscV64)
            .decide(&riscv_state(syscall_nr::SYS_OPENAT))
            .unwrap();
        let Decision::Remote(invocation) = decision else {
            panic!("expected remote, got {decision:?}");
        };
        assert_eq!(invocation.name, "openat");
        assert_eq!(invocation.abi, AbiId::RISCV64);
        assert_eq!(invocation.args.len(), 4);
        assert_eq!(&invocation.args[..2], &[3, 0x1000]);
    }

    #[test]
    fn test_decide_does_not_mutate() {
        let state = riscv_state(syscall_nr::SYS_OPENAT);
        stage(Arch::RiscV64).decide(&state).unwrap();
        assert!(state.inspector().fired().is_empty());
        assert_eq!(state.scratch().recent_block_count, 0);
    }

    #[test]
    fn test_execute_resets_scratch() {
        let dispatcher = stage(Arch::RiscV64);
        let mut state = riscv_state(syscall_nr::SYS_OPENAT);
        state.scratch_mut().recent_block_count = 7;
        state.scratch_mut().sim_procedure = Some("openat".to_string());

        let mut succ = Successors::new();
        let decision = dispatcher.step(&mut state, &mut succ).unwrap();
        assert!(matches!(decision, Decision::Remote(_)));
        assert_eq!(succ.description, "syscall openat");
        assert_eq!(state.scratch().recent_block_count, 1);
        assert_eq!(state.scratch().sim_procedure, None);

        let fired = state.inspector().fired();
        assert_eq!(fired.len(), 2);
        assert_eq!(fired[0].when, InspectWhen::Before);
        assert_eq!(fired[1].when, InspectWhen::After);
        assert_eq!(fired[1].attr("syscall_name"), Some("openat"));
    }

    #[test]
    fn test_symbolic_number_without_tolerance() {
        let state = riscv_state(0).with_register("a7", Expr::one_of([56, 57]));
        assert!(matches!(
            stage(Arch::RiscV64).decide(&state),
            Err(DispatchError::AmbiguousSyscallNumber { .. })
        ));
    }

    #[test]
    fn test_symbolic_number_with_tolerance() {
        let state = riscv_state(0)
            .with_register("a7", Expr::symbol("nr"))
            .with_option(StateOption::BypassUnsupportedSyscall);
        assert!(matches!(
            stage(Arch::RiscV64).decide(&state),
            Err(DispatchError::SymbolicSyscallNumber { .. })
        ));

        let unsat = state
            .with_constraint(Constraint::eq("x", 1))
            .with_constraint(Constraint::eq("x", 2));
        assert!(matches!(
            stage(Arch::RiscV64).decide(&unsat),
            Err(DispatchError::UnsatisfiableState)
        ));
    }

    #[test]
    fn test_missing_prototype() {
        let catalog = SyscallLibrary::new().with_table(
            bureau_abi::SyscallTable::new(AbiId::RISCV64).with_number(500, "mystery"),
        );
        let dispatcher = RemoteSyscallStage::<SimState>::new(
            Arc::new(LinuxUserland::new(Arch::RiscV64)),
            Arc::new(catalog),
            Arc::new(FixedReturnBureau::new(0)),
        );
        assert!(matches!(
            dispatcher.decide(&riscv_state(500)),
            Err(DispatchError::UnknownPrototype { num: 500, .. })
        ));

        let tolerant = DispatchConfig::new().with_tolerate_unsupported(true);
        let dispatcher = dispatcher.with_config(tolerant);
        assert_eq!(
            dispatcher.decide(&riscv_state(500)).unwrap(),
            Decision::Local(LocalReason::MissingPrototype)
        );
    }

    #[test]
    fn test_mips64_o32_uses_o32_registers() {
        // o32 mmap2 has six arguments; the last two live on the stack.
        let state = SimState::new()
            .with_jumpkind(JumpKind::Syscall(SyscallTrap::Syscall))
            .with_register("v0", 4000_u64 + 210)
            .with_register("a0", 0_u64)
            .with_register("a1", 0x1000_u64)
            .with_register("a2", 3_u64)
            .with_register("a3", 0x22_u64)
            .with_register("a4", 0_u64)
            .with_register("a5", 0_u64);
        let config = DispatchConfig::new().with_bypass(BypassPolicy::new(["exit"]));
        let dispatcher = stage(Arch::Mips64).with_config(config);
        assert_eq!(
            dispatcher.decide(&state).unwrap(),
            Decision::Local(LocalReason::NoArgumentSlot { index: 4 })
        );
    }
}
