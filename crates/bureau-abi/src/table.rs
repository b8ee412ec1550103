//! Table-driven syscall lookup.

use rustc_hash::FxHashMap;

use crate::arch::AbiId;
use crate::prototype::{ArgType, SyscallPrototype};

/// Source of syscall names and prototypes per ABI.
pub trait SyscallCatalog: Send + Sync {
    /// Name of syscall `num` under `abi`.
    fn syscall_name(&self, abi: &AbiId, num: u64) -> Option<&str>;

    /// Prototype of syscall `name` under `abi`.
    fn prototype(&self, abi: &AbiId, name: &str) -> Option<&SyscallPrototype>;
}

/// Syscall numbering and prototypes of one ABI.
#[derive(Clone, Debug)]
pub struct SyscallTable {
    abi: AbiId,
    names: FxHashMap<u64, &'static str>,
    prototypes: FxHashMap<&'static str, SyscallPrototype>,
}

impl SyscallTable {
    /// Create an empty table for the given ABI.
    #[must_use]
    pub fn new(abi: AbiId) -> Self {
        Self {
            abi,
            names: FxHashMap::default(),
            prototypes: FxHashMap::default(),
        }
    }

    /// Add a numbered syscall together with its prototype.
    #[must_use]
    pub fn with_syscall(
        self,
        num: u64,
        name: &'static str,
        args: &[ArgType],
        ret: ArgType,
    ) -> Self {
        self.with_number(num, name)
            .with_prototype(SyscallPrototype::new(name, args, ret))
    }

    /// Add a number -> name mapping without a prototype.
    #[must_use]
    pub fn with_number(mut self, num: u64, name: &'static str) -> Self {
        self.names.insert(num, name);
        self
    }

    /// Add a prototype without a number.
    #[must_use]
    pub fn with_prototype(mut self, prototype: SyscallPrototype) -> Self {
        self.prototypes.insert(prototype.name, prototype);
        self
    }

    #[must_use]
    pub const fn abi(&self) -> &AbiId {
        &self.abi
    }

    #[must_use]
    pub fn name(&self, num: u64) -> Option<&'static str> {
        self.names.get(&num).copied()
    }

    #[must_use]
    pub fn prototype(&self, name: &str) -> Option<&SyscallPrototype> {
        self.prototypes.get(name)
    }

    /// Number of a syscall by name (reverse lookup).
    #[must_use]
    pub fn number(&self, name: &str) -> Option<u64> {
        self.names
            .iter()
            .filter(|(_, n)| **n == name)
            .map(|(num, _)| *num)
            .min()
    }

    /// All (number, name) entries, sorted by number.
    #[must_use]
    pub fn entries(&self) -> Vec<(u64, &'static str)> {
        let mut entries: Vec<_> = self
            .names
            .iter()
            .map(|(num, name)| (*num, *name))
            .collect();
        entries.sort_unstable();
        entries
    }
}

/// Syscall tables keyed by ABI.
#[derive(Clone, Debug, Default)]
pub struct SyscallLibrary {
    tables: FxHashMap<AbiId, SyscallTable>,
}

impl SyscallLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the table for its ABI.
    #[must_use]
    pub fn with_table(mut self, table: SyscallTable) -> Self {
        self.tables.insert(table.abi.clone(), table);
        self
    }

    #[must_use]
    pub fn table(&self, abi: &AbiId) -> Option<&SyscallTable> {
        self.tables.get(abi)
    }

    /// ABIs with a table, sorted by name.
    #[must_use]
    pub fn abis(&self) -> Vec<&AbiId> {
        let mut abis: Vec<_> = self.tables.keys().collect();
        abis.sort_unstable();
        abis
    }
}

impl SyscallCatalog for SyscallLibrary {
    fn syscall_name(&self, abi: &AbiId, num: u64) -> Option<&str> {
        self.table(abi)?.name(num)
    }

    fn prototype(&self, abi: &AbiId, name: &str) -> Option<&SyscallPrototype> {
        self.table(abi)?.prototype(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syscall_table_custom() {
        let table = SyscallTable::new(AbiId::AMD64)
            .with_syscall(2, "open", &[ArgType::CStr, ArgType::Int], ArgType::Int)
            .with_number(500, "mystery");

        assert_eq!(table.name(2), Some("open"));
        assert_eq!(
            table.prototype("open").map(SyscallPrototype::arg_count),
            Some(2)
        );
        assert_eq!(table.name(500), Some("mystery"));
        assert!(table.prototype("mystery").is_none());
        assert_eq!(table.number("open"), Some(2));
        assert_eq!(table.entries(), vec![(2, "open"), (500, "mystery")]);
    }

    #[test]
    fn test_library_lookup_by_abi() {
        let lib = SyscallLibrary::new()
            .with_table(SyscallTable::new(AbiId::AMD64).with_number(60, "exit"))
            .with_table(SyscallTable::new(AbiId::I386).with_number(1, "exit"));

        assert_eq!(lib.syscall_name(&AbiId::AMD64, 60), Some("exit"));
        assert_eq!(lib.syscall_name(&AbiId::I386, 60), None);
        assert_eq!(lib.syscall_name(&AbiId::MIPS_O32, 1), None);
        assert_eq!(lib.abis(), vec![&AbiId::AMD64, &AbiId::I386]);
    }
}
