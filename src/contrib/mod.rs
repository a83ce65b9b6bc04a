//! Ready made parsers built from the public factories.

mod arithmetic;
mod contrib_parsers;

pub use arithmetic::{evaluate, expression, ArithmeticOperators, GROUP};
pub use contrib_parsers::{block_comment, email, identifier, whitespace};
