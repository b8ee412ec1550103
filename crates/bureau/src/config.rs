//! Dispatch configuration.

use crate::bypass::BypassPolicy;

/// Settings shared by every dispatch decision. Read-only once built.
#[derive(Clone, Debug, Default)]
pub struct DispatchConfig {
    pub bypass: BypassPolicy,
    /// Tolerate unsupported syscalls for every state, in addition to the
    /// per-state option.
    pub tolerate_unsupported: bool,
}

impl DispatchConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bypass(mut self, bypass: BypassPolicy) -> Self {
        self.bypass = bypass;
        self
    }

    #[must_use]
    pub const fn with_tolerate_unsupported(mut self, tolerate: bool) -> Self {
        self.tolerate_unsupported = tolerate;
        self
    }
}
