//! Control-flow transfer kinds.

use std::fmt;

/// Instruction used to enter the kernel.
///
/// Some ABIs are identified by the entry mechanism alone (for example
/// `int 0x80` on x86-64 always selects the 32-bit table).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyscallTrap {
    /// x86-64 `syscall`, MIPS `syscall`.
    Syscall,
    /// x86 `sysenter`.
    Sysenter,
    /// x86 `int 0x80`.
    Int80,
    /// AArch64 `svc`.
    Svc,
    /// RISC-V `ecall`.
    Ecall,
}

impl SyscallTrap {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Syscall => "syscall",
            Self::Sysenter => "sysenter",
            Self::Int80 => "int80",
            Self::Svc => "svc",
            Self::Ecall => "ecall",
        }
    }
}

/// How execution left a block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum JumpKind {
    /// Plain jump or fall-through.
    #[default]
    Boring,
    /// Function call.
    Call,
    /// Function or procedure return.
    Ret,
    /// Trap into the kernel.
    Syscall(SyscallTrap),
    /// Program exit.
    Exit,
    /// Undecodable instruction.
    NoDecode,
    /// Breakpoint trap.
    SigTrap,
}

impl JumpKind {
    /// Check if this transfer is a system-call trap.
    #[must_use]
    pub const fn is_syscall(self) -> bool {
        matches!(self, Self::Syscall(_))
    }

    /// The trap mechanism, if this is a system-call trap.
    #[must_use]
    pub const fn trap(self) -> Option<SyscallTrap> {
        match self {
            Self::Syscall(trap) => Some(trap),
            _ => None,
        }
    }
}

impl fmt::Display for JumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boring => f.write_str("boring"),
            Self::Call => f.write_str("call"),
            Self::Ret => f.write_str("ret"),
            Self::Syscall(trap) => write!(f, "sys_{}", trap.name()),
            Self::Exit => f.write_str("exit"),
            Self::NoDecode => f.write_str("nodecode"),
            Self::SigTrap => f.write_str("sigtrap"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syscall_kinds() {
        let kind = JumpKind::Syscall(SyscallTrap::Int80);
        assert!(kind.is_syscall());
        assert_eq!(kind.trap(), Some(SyscallTrap::Int80));
        assert_eq!(kind.to_string(), "sys_int80");
    }

    #[test]
    fn test_non_syscall_kinds() {
        for kind in [
            JumpKind::Boring,
            JumpKind::Call,
            JumpKind::Ret,
            JumpKind::Exit,
        ] {
            assert!(!kind.is_syscall());
            assert_eq!(kind.trap(), None);
        }
    }
}
