//! Path constraints and successor guards.

use std::fmt;

/// A path constraint over free symbols.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// Always holds.
    #[default]
    True,
    /// Never holds.
    False,
    /// The named symbol equals a value.
    Eq { symbol: String, value: u64 },
}

impl Constraint {
    /// Pin a symbol to a value.
    #[must_use]
    pub fn eq(symbol: impl Into<String>, value: u64) -> Self {
        Self::Eq {
            symbol: symbol.into(),
            value,
        }
    }

    /// Check if this guard is the trivial `true`.
    #[must_use]
    pub const fn is_true(&self) -> bool {
        matches!(self, Self::True)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => f.write_str("true"),
            Self::False => f.write_str("false"),
            Self::Eq { symbol, value } => write!(f, "{symbol} == {value:#x}"),
        }
    }
}
