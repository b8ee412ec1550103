//! ABI resolution across OS models.

use bureau::{DispatchError, resolve_abi};
use bureau_abi::{AbiId, AbiRange, Arch, LinuxUserland, OsModel, SyscallCc};
use bureau_ir::SyscallTrap;

/// OS model with explicit ABI ranges and no trap hint.
struct RangedOs {
    abis: Vec<AbiRange>,
}

impl OsModel for RangedOs {
    fn arch(&self) -> Arch {
        Arch::Mips64
    }

    fn syscall_abi_hint(&self, _trap: Option<SyscallTrap>) -> Option<AbiId> {
        None
    }

    fn syscall_abis(&self) -> &[AbiRange] {
        &self.abis
    }

    fn syscall_cc(&self, _trap: Option<SyscallTrap>) -> Option<SyscallCc> {
        None
    }
}

#[test]
fn test_two_ranges() {
    let first = AbiId::from("first");
    let second = AbiId::from("second");
    let os = RangedOs {
        abis: vec![
            AbiRange::new(first.clone(), 0, 300),
            AbiRange::new(second.clone(), 300, 600),
        ],
    };

    for (num, expected) in [(0, &first), (299, &first), (300, &second), (599, &second)] {
        assert_eq!(&resolve_abi(&os, None, num).unwrap(), expected, "{num}");
    }
    assert!(matches!(
        resolve_abi(&os, None, 600),
        Err(DispatchError::UnresolvedAbi {
            num: 600,
            arch: Arch::Mips64,
        })
    ));
}

#[test]
fn test_single_abi_covers_everything() {
    let os = RangedOs {
        abis: vec![AbiRange::new(AbiId::from("only"), 0, 300)],
    };
    for num in [0, 299, 300, 600, u64::MAX] {
        assert_eq!(resolve_abi(&os, None, num).unwrap().as_str(), "only");
    }
}

#[test]
fn test_no_ranges_is_unresolved() {
    let os = RangedOs { abis: Vec::new() };
    assert!(resolve_abi(&os, None, 0).is_err());
}

#[test]
fn test_linux_single_abi_arches() {
    for (arch, abi) in [
        (Arch::X86, AbiId::I386),
        (Arch::RiscV64, AbiId::RISCV64),
        (Arch::Aarch64, AbiId::AARCH64),
    ] {
        let os = LinuxUserland::new(arch);
        assert_eq!(resolve_abi(&os, None, 100_000).unwrap(), abi);
    }
}
