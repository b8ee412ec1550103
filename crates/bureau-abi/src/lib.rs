//! Syscall ABIs for the dispatch layer.
//!
//! Provides the per-ABI syscall tables (number -> name -> prototype), the
//! register-based syscall calling conventions, and the OS model that says
//! which ABIs a target supports and how to tell them apart.
//!
//! # Usage
//!
//! ```ignore
//! use bureau_abi::{AbiId, SyscallCatalog, SyscallLibrary};
//!
//! let lib = SyscallLibrary::linux();
//! assert_eq!(lib.syscall_name(&AbiId::AMD64, 2), Some("open"));
//! ```

mod arch;
mod cc;
mod linux;
mod os;
mod prototype;
mod table;

pub use arch::{AbiId, Arch};
pub use cc::{RETURN_ADDR_REGISTER, SyscallCc};
pub use linux::syscall_nr;
pub use os::{AbiRange, LinuxUserland, OsModel};
pub use prototype::{ArgType, SyscallPrototype};
pub use table::{SyscallCatalog, SyscallLibrary, SyscallTable};
