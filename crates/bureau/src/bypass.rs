//! Syscalls that always stay with the engine's own models.

use bureau_abi::AbiId;
use rustc_hash::{FxHashMap, FxHashSet};

/// Always-local syscalls shared by every ABI.
///
/// Memory-mapping and heap primitives feed the engine's address-space
/// bookkeeping, exits terminate states, and raw I/O is modeled by the engine's
/// file system.
pub const BASE_BYPASS: &[&str] = &[
    "mmap",
    "munmap",
    "brk",
    "write",
    "read",
    "exit",
    "exit_group",
];

/// Per-ABI allow/deny policy for remote dispatch.
#[derive(Clone, Debug)]
pub struct BypassPolicy {
    base: FxHashSet<String>,
    extra: FxHashMap<AbiId, FxHashSet<String>>,
}

impl Default for BypassPolicy {
    fn default() -> Self {
        Self::linux()
    }
}

impl BypassPolicy {
    /// Policy with the given shared set and no ABI-specific additions.
    #[must_use]
    pub fn new<I, N>(base: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            base: base.into_iter().map(Into::into).collect(),
            extra: FxHashMap::default(),
        }
    }

    /// [`BASE_BYPASS`] everywhere; MIPS ABIs also keep `set_thread_area` local.
    #[must_use]
    pub fn linux() -> Self {
        Self::new(BASE_BYPASS.iter().copied())
            .with_extra(AbiId::MIPS_O32, ["set_thread_area"])
            .with_extra(AbiId::MIPS_N32, ["set_thread_area"])
            .with_extra(AbiId::MIPS_N64, ["set_thread_area"])
    }

    /// Add always-local syscalls for one ABI. Additions never remove base entries.
    #[must_use]
    pub fn with_extra<I, N>(mut self, abi: AbiId, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.extra
            .entry(abi)
            .or_default()
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Check if `name` must stay local under `abi`.
    #[must_use]
    pub fn is_bypassed(&self, abi: &AbiId, name: &str) -> bool {
        self.base.contains(name) || self.extra.get(abi).is_some_and(|set| set.contains(name))
    }

    /// All always-local names for `abi`, sorted.
    #[must_use]
    pub fn names(&self, abi: &AbiId) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .base
            .iter()
            .chain(self.extra.get(abi).into_iter().flatten())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_set_applies_to_every_abi() {
        let policy = BypassPolicy::linux();
        for abi in [
            AbiId::AMD64,
            AbiId::I386,
            AbiId::MIPS_N64,
            AbiId::from("other"),
        ] {
            for name in BASE_BYPASS {
                assert!(policy.is_bypassed(&abi, name), "{abi}: {name}");
            }
            assert!(!policy.is_bypassed(&abi, "open"));
        }
    }

    #[test]
    fn test_mips_adds_set_thread_area() {
        let policy = BypassPolicy::linux();
        assert!(policy.is_bypassed(&AbiId::MIPS_O32, "set_thread_area"));
        assert!(policy.is_bypassed(&AbiId::MIPS_N32, "set_thread_area"));
        assert!(!policy.is_bypassed(&AbiId::I386, "set_thread_area"));
    }

    #[test]
    fn test_extras_are_additive() {
        let policy = BypassPolicy::linux().with_extra(AbiId::AMD64, ["close"]);
        assert!(policy.is_bypassed(&AbiId::AMD64, "close"));
        assert!(policy.is_bypassed(&AbiId::AMD64, "mmap"));
        assert!(!policy.is_bypassed(&AbiId::I386, "close"));
    }

    #[test]
    fn test_names_sorted() {
        let policy = BypassPolicy::new(["write", "brk"]).with_extra(AbiId::AMD64, ["arch_prctl"]);
        assert_eq!(
            policy.names(&AbiId::AMD64),
            vec!["arch_prctl", "brk", "write"]
        );
        assert_eq!(policy.names(&AbiId::I386), vec!["brk", "write"]);
    }
}
