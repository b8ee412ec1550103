//! Architectures and ABI identifiers.

use std::borrow::Cow;
use std::fmt;

/// Guest architecture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Arch {
    Amd64,
    X86,
    Mips32,
    Mips64,
    RiscV64,
    Aarch64,
}

impl Arch {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::X86 => "x86",
            Self::Mips32 => "mips32",
            Self::Mips64 => "mips64",
            Self::RiscV64 => "riscv64",
            Self::Aarch64 => "aarch64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name of a syscall ABI (numbering plus calling convention).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AbiId(Cow<'static, str>);

impl AbiId {
    pub const AMD64: Self = Self::from_static("amd64");
    pub const I386: Self = Self::from_static("i386");
    pub const MIPS_O32: Self = Self::from_static("mips-o32");
    pub const MIPS_N32: Self = Self::from_static("mips-n32");
    pub const MIPS_N64: Self = Self::from_static("mips-n64");
    pub const RISCV64: Self = Self::from_static("riscv64");
    pub const AARCH64: Self = Self::from_static("aarch64");

    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for AbiId {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for AbiId {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl fmt::Display for AbiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
