//! Command implementations.

mod abis;
mod dispatch;
mod lookup;

use crate::cli::{Cli, Commands};

/// Dispatch CLI command to the appropriate handler.
pub fn run_command(cli: &Cli) -> i32 {
    match &cli.command {
        Commands::Abis { arch } => abis::cmd_abis((*arch).into()),
        Commands::Lookup { .. } => handle_lookup(cli),
        Commands::Dispatch { .. } => handle_dispatch(cli),
    }
}

fn handle_lookup(cli: &Cli) -> i32 {
    let Commands::Lookup { arch, trap, num } = &cli.command else {
        unreachable!("lookup command variant mismatch");
    };
    lookup::cmd_lookup((*arch).into(), *trap, *num)
}

fn handle_dispatch(cli: &Cli) -> i32 {
    let Commands::Dispatch {
        arch,
        trap,
        num,
        args,
        ret,
        ip,
        tolerate,
    } = &cli.command
    else {
        unreachable!("dispatch command variant mismatch");
    };

    dispatch::cmd_dispatch(&dispatch::DispatchArgs {
        arch: (*arch).into(),
        trap: *trap,
        num: *num,
        args,
        ret: *ret,
        ip: *ip,
        tolerate: *tolerate,
    })
}
