//! Register-based syscall calling conventions.

use bureau_ir::Expr;
use bureau_state::ExecutionState;

use crate::arch::AbiId;

/// Register holding the address of the instruction after the trap.
pub const RETURN_ADDR_REGISTER: &str = "ip_at_syscall";

const AMD64_ARGS: &[&str] = &["rdi", "rsi", "rdx", "r10", "r8", "r9"];
const I386_ARGS: &[&str] = &["ebx", "ecx", "edx", "esi", "edi", "ebp"];
// o32 passes arguments 5 and up on the stack.
const MIPS_O32_ARGS: &[&str] = &["a0", "a1", "a2", "a3"];
const MIPS_N64_ARGS: &[&str] = &["a0", "a1", "a2", "a3", "a4", "a5"];
const RISCV_ARGS: &[&str] = &["a0", "a1", "a2", "a3", "a4", "a5"];
const AARCH64_ARGS: &[&str] = &["x0", "x1", "x2", "x3", "x4", "x5"];

/// Where a syscall's number, arguments and result live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyscallCc {
    abi: AbiId,
    num_reg: &'static str,
    arg_regs: &'static [&'static str],
    ret_reg: &'static str,
}

impl SyscallCc {
    #[must_use]
    pub const fn new(
        abi: AbiId,
        num_reg: &'static str,
        arg_regs: &'static [&'static str],
        ret_reg: &'static str,
    ) -> Self {
        Self {
            abi,
            num_reg,
            arg_regs,
            ret_reg,
        }
    }

    /// Linux convention for a known ABI.
    #[must_use]
    pub fn for_abi(abi: &AbiId) -> Option<Self> {
        let (num_reg, arg_regs, ret_reg) = match abi.as_str() {
            "amd64" => ("rax", AMD64_ARGS, "rax"),
            "i386" => ("eax", I386_ARGS, "eax"),
            "mips-o32" => ("v0", MIPS_O32_ARGS, "v0"),
            "mips-n32" | "mips-n64" => ("v0", MIPS_N64_ARGS, "v0"),
            "riscv64" => ("a7", RISCV_ARGS, "a0"),
            "aarch64" => ("x8", AARCH64_ARGS, "x0"),
            _ => return None,
        };
        Some(Self::new(abi.clone(), num_reg, arg_regs, ret_reg))
    }

    #[must_use]
    pub const fn abi(&self) -> &AbiId {
        &self.abi
    }

    #[must_use]
    pub const fn num_reg(&self) -> &'static str {
        self.num_reg
    }

    #[must_use]
    pub const fn ret_reg(&self) -> &'static str {
        self.ret_reg
    }

    /// Number of arguments passed in registers.
    #[must_use]
    pub const fn register_args(&self) -> usize {
        self.arg_regs.len()
    }

    /// The syscall number expression. Unwritten registers read as free symbols.
    #[must_use]
    pub fn syscall_num<S: ExecutionState>(&self, state: &S) -> Expr {
        read_reg(state, self.num_reg)
    }

    /// Register carrying argument `index`, if any.
    #[must_use]
    pub fn arg_reg(&self, index: usize) -> Option<&'static str> {
        self.arg_regs.get(index).copied()
    }

    /// Argument `index`, or `None` if it is not passed in a register.
    #[must_use]
    pub fn arg<S: ExecutionState>(&self, state: &S, index: usize) -> Option<Expr> {
        let reg = self.arg_reg(index)?;
        Some(read_reg(state, reg))
    }

    /// Where execution continues once the syscall returns.
    #[must_use]
    pub fn return_addr<S: ExecutionState>(&self, state: &S) -> Expr {
        read_reg(state, RETURN_ADDR_REGISTER)
    }

    /// Store a syscall result in the return register.
    pub fn set_return_value<S: ExecutionState>(&self, state: &mut S, value: u64) {
        state.set_register(self.ret_reg, Expr::constant(value));
    }
}

fn read_reg<S: ExecutionState>(state: &S, name: &str) -> Expr {
    state.register(name).unwrap_or_else(|| Expr::symbol(name))
}
