//! Value model shared by the dispatch layer.
//!
//! This crate has no knowledge of ABIs or states. It only describes what a
//! value, a path constraint and a control-flow transfer look like.

mod constraint;
mod expr;
mod jumpkind;

pub use constraint::*;
pub use expr::*;
pub use jumpkind::*;
