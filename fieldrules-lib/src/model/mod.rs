//! Typed models

mod rule_set;
mod values;
mod verdict;

pub use rule_set::*;
pub use values::*;
pub use verdict::*;
