//! The portable boolean-logic form rule configurations compile into, plus
//! the evaluator that applies a logic tree to a single bound value.

mod eval;
mod tree;

pub use eval::{Validation, evaluate};
pub use tree::{CompareOp, Logic, Value};
