//! `dispatch` command: one dry-run decision against a synthetic state.

use std::sync::Arc;

use bureau::{
    Decision, DispatchConfig, FixedReturnBureau, RemoteSyscallStage, Successors, resolve_abi,
};
use bureau_abi::{Arch, LinuxUserland, OsModel, RETURN_ADDR_REGISTER, SyscallCc, SyscallLibrary};
use bureau_ir::JumpKind;
use bureau_state::{ExecutionState, SimState};
use tracing::{debug, error};

use crate::cli::{ArgValue, EXIT_FAILURE, EXIT_SUCCESS, TrapArg, resolve_trap};
use crate::terminal;

pub struct DispatchArgs<'a> {
    pub arch: Arch,
    pub trap: Option<TrapArg>,
    pub num: ArgValue,
    pub args: &'a [ArgValue],
    pub ret: u64,
    pub ip: u64,
    pub tolerate: bool,
}

pub fn cmd_dispatch(opts: &DispatchArgs<'_>) -> i32 {
    let os = Arc::new(LinuxUserland::new(opts.arch));
    let trap = resolve_trap(opts.arch, opts.trap);

    let Some(entry_cc) = os.syscall_cc(Some(trap)) else {
        terminal::error(&format!("no syscall convention for {}", opts.arch));
        return EXIT_FAILURE;
    };

    // Place arguments where the resolved ABI will read them.
    let arg_cc = match opts.num {
        ArgValue::Concrete(num) => resolve_abi(os.as_ref(), Some(trap), num)
            .ok()
            .and_then(|abi| SyscallCc::for_abi(&abi))
            .unwrap_or_else(|| entry_cc.clone()),
        ArgValue::Symbolic => entry_cc.clone(),
    };
    debug!(abi = %arg_cc.abi(), "argument registers");

    let mut state = SimState::new()
        .with_jumpkind(JumpKind::Syscall(trap))
        .with_register(entry_cc.num_reg(), opts.num.to_expr("syscall_nr"))
        .with_register(RETURN_ADDR_REGISTER, opts.ip);
    for (index, value) in opts.args.iter().enumerate() {
        let Some(reg) = arg_cc.arg_reg(index) else {
            terminal::warning(&format!("argument {index} has no register; ignored"));
            continue;
        };
        state = state.with_register(reg, value.to_expr(&format!("arg{index}")));
    }

    let config = DispatchConfig::new().with_tolerate_unsupported(opts.tolerate);
    let dispatcher = RemoteSyscallStage::new(
        os,
        Arc::new(SyscallLibrary::linux()),
        Arc::new(FixedReturnBureau::new(opts.ret)),
    )
    .with_config(config);

    let mut successors = Successors::new();
    match dispatcher.step(&mut state, &mut successors) {
        Ok(Decision::Local(reason)) => {
            terminal::info(&format!("local: {}", reason.name()));
            EXIT_SUCCESS
        }
        Ok(Decision::Remote(invocation)) => {
            terminal::success(&successors.description);
            terminal::field("abi", invocation.abi.as_str());
            terminal::field("number", &invocation.num.to_string());
            let args: Vec<String> = invocation.args.iter().map(|a| format!("{a:#x}")).collect();
            terminal::field("args", &args.join(", "));
            for (key, value) in &successors.artifacts {
                terminal::field(key, &value.to_string());
            }
            for succ in successors.successors() {
                let ret = succ
                    .state
                    .register(invocation.cc.ret_reg())
                    .map_or_else(|| "?".to_string(), |expr| expr.to_string());
                terminal::field("target", &succ.target.to_string());
                terminal::field("jumpkind", &succ.jumpkind.to_string());
                terminal::field("returned", &ret);
            }
            EXIT_SUCCESS
        }
        Err(err) => {
            error!(class = err.class().name(), "{err}");
            terminal::error(&err.to_string());
            EXIT_FAILURE
        }
    }
}
