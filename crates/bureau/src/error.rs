//! Dispatch error types and their classification.

use bureau_abi::{AbiId, Arch};
use thiserror::Error;

use crate::executor::BureauError;

/// Fatal outcomes of a dispatch attempt.
///
/// Declining remote handling is not an error; see [`crate::Decision::Local`].
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(
        "syscall number {expr} is not a single concrete value; set the bypass-unsupported-syscall option to tolerate it"
    )]
    AmbiguousSyscallNumber { expr: String },

    #[error("the program state is not satisfiable at a syscall")]
    UnsatisfiableState,

    #[error("got a symbolic syscall number: {expr}")]
    SymbolicSyscallNumber { expr: String },

    #[error("cannot determine the ABI for syscall {num} on architecture {arch}")]
    UnresolvedAbi { num: u64, arch: Arch },

    #[error("no syscall calling convention for architecture {arch}")]
    NoCallingConvention { arch: Arch },

    #[error("syscall {num} for ABI {abi} is not found in the syscall mapping")]
    UnknownSyscallNumber { num: u64, abi: AbiId },

    #[error("syscall {num} ({name}) for ABI {abi} is not found in the syscall prototypes")]
    UnknownPrototype { num: u64, name: String, abi: AbiId },

    #[error("remote executor failed: {0}")]
    Remote(#[from] BureauError),
}

/// Broad category of a [`DispatchError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The syscall cannot be handled as configured; tolerance settings may change that.
    Unsupported,
    /// Target description and tables disagree.
    Configuration,
    /// The state reached dispatch in a condition that indicates an upstream bug.
    Logic,
    /// The remote executor failed.
    Remote,
}

impl ErrorClass {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unsupported => "unsupported",
            Self::Configuration => "configuration",
            Self::Logic => "logic",
            Self::Remote => "remote",
        }
    }
}

impl DispatchError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::AmbiguousSyscallNumber { .. }
            | Self::SymbolicSyscallNumber { .. }
            | Self::UnknownSyscallNumber { .. }
            | Self::UnknownPrototype { .. } => ErrorClass::Unsupported,
            Self::UnresolvedAbi { .. } | Self::NoCallingConvention { .. } => {
                ErrorClass::Configuration
            }
            Self::UnsatisfiableState => ErrorClass::Logic,
            Self::Remote(_) => ErrorClass::Remote,
        }
    }

    /// Whether enabling unsupported-syscall tolerance turns this into a local fallback.
    #[must_use]
    pub const fn is_recoverable_by_tolerance(&self) -> bool {
        matches!(
            self,
            Self::UnknownSyscallNumber { .. } | Self::UnknownPrototype { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let unknown = DispatchError::UnknownSyscallNumber {
            num: 999,
            abi: AbiId::AMD64,
        };
        assert_eq!(unknown.class(), ErrorClass::Unsupported);
        assert!(unknown.is_recoverable_by_tolerance());

        let unresolved = DispatchError::UnresolvedAbi {
            num: 600,
            arch: Arch::Mips64,
        };
        assert_eq!(unresolved.class(), ErrorClass::Configuration);
        assert!(!unresolved.is_recoverable_by_tolerance());

        assert_eq!(DispatchError::UnsatisfiableState.class(), ErrorClass::Logic);
    }

    #[test]
    fn test_messages_name_the_syscall() {
        let err = DispatchError::UnknownPrototype {
            num: 2,
            name: "open".to_string(),
            abi: AbiId::AMD64,
        };
        let msg = err.to_string();
        assert!(msg.contains("open"));
        assert!(msg.contains("amd64"));
    }
}
