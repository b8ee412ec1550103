//! Expression values: concrete, finitely constrained, or free symbols.

use std::fmt;

/// A possibly symbolic machine word.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A single known value.
    Const(u64),
    /// One of these values (sorted, deduplicated). Empty means no value satisfies it.
    OneOf(Vec<u64>),
    /// A free variable, constrained only by path constraints naming it.
    Symbol(String),
}

impl Default for Expr {
    fn default() -> Self {
        Self::Const(0)
    }
}

impl From<u64> for Expr {
    fn from(value: u64) -> Self {
        Self::Const(value)
    }
}

impl Expr {
    /// Create a concrete value.
    #[must_use]
    pub const fn constant(value: u64) -> Self {
        Self::Const(value)
    }

    /// Create a value drawn from a finite candidate set.
    #[must_use]
    pub fn one_of(values: impl IntoIterator<Item = u64>) -> Self {
        let mut values: Vec<u64> = values.into_iter().collect();
        values.sort_unstable();
        values.dedup();
        Self::OneOf(values)
    }

    /// Create a free symbol.
    #[must_use]
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(value) => write!(f, "{value:#x}"),
            Self::OneOf(values) => {
                f.write_str("{")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value:#x}")?;
                }
                f.write_str("}")
            }
            Self::Symbol(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_of_sorts_and_dedups() {
        let expr = Expr::one_of([3, 1, 3, 2]);
        assert_eq!(expr, Expr::OneOf(vec![1, 2, 3]));
    }

    #[test]
    fn test_large_candidate_sets_stay_exact() {
        let low = Expr::one_of(0..40);
        let high = Expr::one_of(100..140);
        assert_eq!(low, Expr::OneOf((0..40).collect()));
        assert_ne!(low, high);
    }

    #[test]
    fn test_display() {
        assert_eq!(Expr::constant(16).to_string(), "0x10");
        assert_eq!(Expr::one_of([1, 2]).to_string(), "{0x1, 0x2}");
        assert_eq!(Expr::symbol("buf").to_string(), "buf");
    }
}
