//! CLI definitions and argument types.

use bureau_abi::Arch;
use bureau_ir::{Expr, SyscallTrap};
use clap::{Parser, Subcommand, ValueEnum};

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "bureau")]
#[command(about = "Decide which emulated syscalls are forwarded to a real OS")]
#[command(version)]
pub struct Cli {
    /// Show metrics summary after execution
    #[arg(long, global = true)]
    pub metrics: bool,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output (only show errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the syscall ABIs an architecture supports
    Abis {
        #[arg(long, value_enum)]
        arch: ArchArg,
    },
    /// Resolve a syscall number to its ABI, name and prototype
    Lookup {
        #[arg(long, value_enum)]
        arch: ArchArg,

        /// Trap instruction (defaults to the architecture's native one)
        #[arg(long, value_enum)]
        trap: Option<TrapArg>,

        /// Syscall number (decimal or 0x-prefixed hex)
        #[arg(value_name = "NUM", value_parser = parse_u64)]
        num: u64,
    },
    /// Dry-run a dispatch decision against a synthetic state
    Dispatch {
        #[arg(long, value_enum)]
        arch: ArchArg,

        /// Trap instruction (defaults to the architecture's native one)
        #[arg(long, value_enum)]
        trap: Option<TrapArg>,

        /// Syscall number (decimal or 0x-prefixed hex), or `?` for symbolic
        #[arg(value_name = "NUM", value_parser = parse_value)]
        num: ArgValue,

        /// Argument values in order; `?` marks a symbolic argument
        #[arg(long = "arg", value_name = "VALUE", value_parser = parse_value)]
        args: Vec<ArgValue>,

        /// Value the dry-run bureau returns
        #[arg(long, default_value = "0", value_parser = parse_u64)]
        ret: u64,

        /// Address of the instruction after the trap
        #[arg(long, default_value = "0x401000", value_parser = parse_u64)]
        ip: u64,

        /// Defer unknown syscalls to the local model instead of failing
        #[arg(long)]
        tolerate: bool,
    },
}

// ============================================================================
// Argument types with conversions
// ============================================================================

/// Target architecture.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ArchArg {
    Amd64,
    X86,
    Mips32,
    Mips64,
    Riscv64,
    Aarch64,
}

impl From<ArchArg> for Arch {
    fn from(arg: ArchArg) -> Self {
        match arg {
            ArchArg::Amd64 => Self::Amd64,
            ArchArg::X86 => Self::X86,
            ArchArg::Mips32 => Self::Mips32,
            ArchArg::Mips64 => Self::Mips64,
            ArchArg::Riscv64 => Self::RiscV64,
            ArchArg::Aarch64 => Self::Aarch64,
        }
    }
}

/// Syscall trap instruction.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TrapArg {
    Syscall,
    Sysenter,
    Int80,
    Svc,
    Ecall,
}

impl From<TrapArg> for SyscallTrap {
    fn from(arg: TrapArg) -> Self {
        match arg {
            TrapArg::Syscall => Self::Syscall,
            TrapArg::Sysenter => Self::Sysenter,
            TrapArg::Int80 => Self::Int80,
            TrapArg::Svc => Self::Svc,
            TrapArg::Ecall => Self::Ecall,
        }
    }
}

/// Native trap instruction for `arch` when `--trap` is not given.
pub fn resolve_trap(arch: Arch, trap: Option<TrapArg>) -> SyscallTrap {
    if let Some(trap) = trap {
        return trap.into();
    }
    match arch {
        Arch::Amd64 | Arch::Mips32 | Arch::Mips64 => SyscallTrap::Syscall,
        Arch::X86 => SyscallTrap::Int80,
        Arch::RiscV64 => SyscallTrap::Ecall,
        Arch::Aarch64 => SyscallTrap::Svc,
    }
}

/// A register value given on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgValue {
    Concrete(u64),
    Symbolic,
}

impl ArgValue {
    /// Expression for this value; symbolic values become a free symbol named `name`.
    pub fn to_expr(self, name: &str) -> Expr {
        match self {
            Self::Concrete(value) => Expr::constant(value),
            Self::Symbolic => Expr::symbol(name),
        }
    }
}

fn parse_u64(s: &str) -> Result<u64, String> {
    let parsed = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .map_or_else(|| s.parse(), |hex| u64::from_str_radix(hex, 16));
    parsed.map_err(|e| format!("invalid number '{s}': {e}"))
}

fn parse_value(s: &str) -> Result<ArgValue, String> {
    if s == "?" {
        return Ok(ArgValue::Symbolic);
    }
    parse_u64(s).map(ArgValue::Concrete)
}
