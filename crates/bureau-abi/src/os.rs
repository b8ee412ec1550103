//! Operating-system model: which syscall ABIs a target exposes.

use bureau_ir::SyscallTrap;

use crate::arch::{AbiId, Arch};
use crate::cc::SyscallCc;

/// Half-open syscall number range `[min, max)` owned by one ABI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbiRange {
    pub abi: AbiId,
    pub min: u64,
    pub max: u64,
}

impl AbiRange {
    #[must_use]
    pub const fn new(abi: AbiId, min: u64, max: u64) -> Self {
        Self { abi, min, max }
    }

    #[must_use]
    pub const fn contains(&self, num: u64) -> bool {
        self.min <= num && num < self.max
    }
}

/// What the dispatch layer needs to know about the target OS.
pub trait OsModel: Send + Sync {
    fn arch(&self) -> Arch;

    /// ABI implied by the trap instruction alone, if the architecture encodes it there.
    fn syscall_abi_hint(&self, trap: Option<SyscallTrap>) -> Option<AbiId>;

    /// Declared ABIs and their number ranges, in declaration order.
    fn syscall_abis(&self) -> &[AbiRange];

    /// Calling convention for a syscall entered via `trap`.
    fn syscall_cc(&self, trap: Option<SyscallTrap>) -> Option<SyscallCc>;
}

/// Linux userland on one architecture.
#[derive(Clone, Debug)]
pub struct LinuxUserland {
    arch: Arch,
    abis: Vec<AbiRange>,
}

/// Upper bound used for architectures whose numbering starts at zero.
const GENERIC_MAX: u64 = 1024;

impl LinuxUserland {
    #[must_use]
    pub fn new(arch: Arch) -> Self {
        let abis = match arch {
            Arch::Amd64 => vec![
                AbiRange::new(AbiId::AMD64, 0, GENERIC_MAX),
                AbiRange::new(AbiId::I386, 0, GENERIC_MAX),
            ],
            Arch::X86 => vec![AbiRange::new(AbiId::I386, 0, GENERIC_MAX)],
            Arch::Mips32 => vec![AbiRange::new(AbiId::MIPS_O32, 4000, 5000)],
            Arch::Mips64 => vec![
                AbiRange::new(AbiId::MIPS_N64, 5000, 6000),
                AbiRange::new(AbiId::MIPS_N32, 6000, 7000),
                AbiRange::new(AbiId::MIPS_O32, 4000, 5000),
            ],
            Arch::RiscV64 => vec![AbiRange::new(AbiId::RISCV64, 0, GENERIC_MAX)],
            Arch::Aarch64 => vec![AbiRange::new(AbiId::AARCH64, 0, GENERIC_MAX)],
        };
        Self { arch, abis }
    }

    /// Replace the declared ABI ranges.
    #[must_use]
    pub fn with_abis(mut self, abis: Vec<AbiRange>) -> Self {
        self.abis = abis;
        self
    }
}

impl OsModel for LinuxUserland {
    fn arch(&self) -> Arch {
        self.arch
    }

    fn syscall_abi_hint(&self, trap: Option<SyscallTrap>) -> Option<AbiId> {
        match (self.arch, trap?) {
            (Arch::Amd64, SyscallTrap::Syscall) => Some(AbiId::AMD64),
            (Arch::Amd64, SyscallTrap::Int80 | SyscallTrap::Sysenter) => Some(AbiId::I386),
            _ => None,
        }
    }

    fn syscall_abis(&self) -> &[AbiRange] {
        &self.abis
    }

    fn syscall_cc(&self, trap: Option<SyscallTrap>) -> Option<SyscallCc> {
        let abi = self
            .syscall_abi_hint(trap)
            .or_else(|| self.abis.first().map(|range| range.abi.clone()))?;
        SyscallCc::for_abi(&abi)
    }
}
