//! `abis` command.

use bureau_abi::{Arch, LinuxUserland, OsModel, SyscallCc};

use crate::cli::EXIT_SUCCESS;
use crate::terminal::{self, Alignment, Table};

pub fn cmd_abis(arch: Arch) -> i32 {
    let os = LinuxUserland::new(arch);
    terminal::info(&format!("syscall ABIs for {arch}"));

    let mut table = Table::new(vec!["abi", "min", "max", "number", "return", "reg args"])
        .with_alignments(vec![
            Alignment::Left,
            Alignment::Right,
            Alignment::Right,
            Alignment::Left,
            Alignment::Left,
            Alignment::Right,
        ]);
    for range in os.syscall_abis() {
        let (num_reg, ret_reg, reg_args) = SyscallCc::for_abi(&range.abi).map_or_else(
            || ("-".to_string(), "-".to_string(), "-".to_string()),
            |cc| {
                (
                    cc.num_reg().to_string(),
                    cc.ret_reg().to_string(),
                    cc.register_args().to_string(),
                )
            },
        );
        table.add_row(vec![
            range.abi.to_string(),
            range.min.to_string(),
            range.max.to_string(),
            num_reg,
            ret_reg,
            reg_args,
        ]);
    }
    table.print();
    EXIT_SUCCESS
}
