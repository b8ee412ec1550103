//! Bureau - remote syscall dispatch for symbolic execution
//!
//! When an execution state reaches a syscall trap, [`RemoteSyscallStage`]
//! decides whether the call stays with the engine's own models or is
//! forwarded to a [`Bureau`] that performs it against a real OS. Forwarded
//! calls produce exactly one successor that returns to the instruction after
//! the trap; declined calls leave the state to the next stage of a
//! [`StageChain`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use bureau::{FixedReturnBureau, RemoteSyscallStage, Successors};
//! use bureau_abi::{Arch, LinuxUserland, SyscallLibrary};
//!
//! let stage = RemoteSyscallStage::new(
//!     Arc::new(LinuxUserland::new(Arch::Amd64)),
//!     Arc::new(SyscallLibrary::linux()),
//!     Arc::new(FixedReturnBureau::new(0)),
//! );
//! let mut successors = Successors::new();
//! let decision = stage.step(&mut state, &mut successors)?;
//! ```

mod abi;
mod bypass;
mod chain;
mod concretize;
mod config;
mod dispatch;
mod error;
mod executor;
pub mod metrics;
mod successors;

pub use abi::resolve_abi;
pub use bypass::{BASE_BYPASS, BypassPolicy};
pub use chain::{Flow, StageChain, SuccessorsStage};
pub use concretize::{ArgFallback, concretize};
pub use config::DispatchConfig;
pub use dispatch::{
    Decision, LocalReason, RemoteSyscallStage, SYSCALL_EVENT, StepOutcome, SyscallInvocation,
};
pub use error::{DispatchError, ErrorClass, Result};
pub use executor::{Bureau, BureauError, FixedReturnBureau};
pub use successors::{Artifact, StepSort, Successor, Successors};
