//! ABI resolution for a concrete syscall number.

use bureau_abi::{AbiId, OsModel};
use bureau_ir::SyscallTrap;
use tracing::trace;

use crate::error::{DispatchError, Result};

/// Determine which ABI governs syscall `num`.
///
/// The first rule that answers wins: the OS model's hint from the trap
/// instruction, then the only declared ABI, then the declared ABI whose
/// half-open number range contains `num`.
///
/// # Errors
///
/// Returns [`DispatchError::UnresolvedAbi`] if no rule matches.
pub fn resolve_abi(os: &dyn OsModel, trap: Option<SyscallTrap>, num: u64) -> Result<AbiId> {
    if let Some(abi) = os.syscall_abi_hint(trap) {
        trace!(%abi, "ABI from trap hint");
        return Ok(abi);
    }

    let abis = os.syscall_abis();
    if let [only] = abis {
        return Ok(only.abi.clone());
    }

    abis.iter()
        .find(|range| range.contains(num))
        .map(|range| range.abi.clone())
        .ok_or_else(|| DispatchError::UnresolvedAbi {
            num,
            arch: os.arch(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bureau_abi::{AbiRange, Arch, LinuxUserland};

    fn two_abis() -> LinuxUserland {
        LinuxUserland::new(Arch::Mips64).with_abis(vec![
            AbiRange::new(AbiId::from("first"), 0, 300),
            AbiRange::new(AbiId::from("second"), 300, 600),
        ])
    }

    #[test]
    fn test_range_boundaries() {
        let os = two_abis();
        let trap = Some(SyscallTrap::Syscall);
        assert_eq!(resolve_abi(&os, trap, 0).unwrap().as_str(), "first");
        assert_eq!(resolve_abi(&os, trap, 299).unwrap().as_str(), "first");
        assert_eq!(resolve_abi(&os, trap, 300).unwrap().as_str(), "second");
        assert_eq!(resolve_abi(&os, trap, 599).unwrap().as_str(), "second");
        assert!(matches!(
            resolve_abi(&os, trap, 600),
            Err(DispatchError::UnresolvedAbi { num: 600, .. })
        ));
    }

    #[test]
    fn test_single_abi_ignores_ranges() {
        let os = LinuxUserland::new(Arch::Mips32);
        for num in [0, 4001, 4999, 5000, u64::MAX] {
            assert_eq!(
                resolve_abi(&os, Some(SyscallTrap::Syscall), num).unwrap(),
                AbiId::MIPS_O32
            );
        }
    }

    #[test]
    fn test_hint_wins_over_ranges() {
        let os = LinuxUserland::new(Arch::Amd64);
        assert_eq!(
            resolve_abi(&os, Some(SyscallTrap::Int80), 5).unwrap(),
            AbiId::I386
        );
        assert_eq!(
            resolve_abi(&os, Some(SyscallTrap::Syscall), 5).unwrap(),
            AbiId::AMD64
        );
    }

    #[test]
    fn test_mips64_ranges() {
        let os = LinuxUserland::new(Arch::Mips64);
        let trap = Some(SyscallTrap::Syscall);
        assert_eq!(resolve_abi(&os, trap, 5001).unwrap(), AbiId::MIPS_N64);
        assert_eq!(resolve_abi(&os, trap, 6001).unwrap(), AbiId::MIPS_N32);
        assert_eq!(resolve_abi(&os, trap, 4004).unwrap(), AbiId::MIPS_O32);
        assert!(resolve_abi(&os, trap, 7000).is_err());
    }
}
