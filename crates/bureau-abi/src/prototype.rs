//! Syscall prototypes.

/// Advisory argument type. Only the argument count drives dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArgType {
    Int,
    UInt,
    Long,
    ULong,
    SizeT,
    Pointer,
    CStr,
}

/// Declared signature of one syscall.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyscallPrototype {
    pub name: &'static str,
    pub args: Vec<ArgType>,
    pub ret: ArgType,
}

impl SyscallPrototype {
    #[must_use]
    pub fn new(name: &'static str, args: &[ArgType], ret: ArgType) -> Self {
        Self {
            name,
            args: args.to_vec(),
            ret,
        }
    }

    /// Number of declared arguments.
    #[must_use]
    pub const fn arg_count(&self) -> usize {
        self.args.len()
    }
}
