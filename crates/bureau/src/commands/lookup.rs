//! `lookup` command.

use bureau::{BypassPolicy, resolve_abi};
use bureau_abi::{Arch, LinuxUserland, SyscallCatalog, SyscallLibrary};

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS, TrapArg, resolve_trap};
use crate::terminal;

pub fn cmd_lookup(arch: Arch, trap: Option<TrapArg>, num: u64) -> i32 {
    let os = LinuxUserland::new(arch);
    let catalog = SyscallLibrary::linux();
    let bypass = BypassPolicy::linux();
    let trap = resolve_trap(arch, trap);

    let abi = match resolve_abi(&os, Some(trap), num) {
        Ok(abi) => abi,
        Err(err) => {
            terminal::error(&err.to_string());
            return EXIT_FAILURE;
        }
    };

    terminal::field("arch", arch.name());
    terminal::field("trap", trap.name());
    terminal::field("abi", abi.as_str());
    terminal::field("number", &num.to_string());

    let Some(name) = catalog.syscall_name(&abi, num) else {
        terminal::warning(&format!("syscall {num} is not in the {abi} table"));
        return EXIT_FAILURE;
    };
    terminal::field("name", name);

    catalog.prototype(&abi, name).map_or_else(
        || terminal::warning(&format!("no prototype for {name}")),
        |proto| {
            let args: Vec<String> = proto.args.iter().map(|ty| format!("{ty:?}")).collect();
            terminal::field(
                "prototype",
                &format!("{name}({}) -> {:?}", args.join(", "), proto.ret),
            );
        },
    );

    let verdict = if bypass.is_bypassed(&abi, name) {
        "local (always modeled)"
    } else {
        "remote when arguments are concrete"
    };
    terminal::field("dispatch", verdict);
    EXIT_SUCCESS
}
