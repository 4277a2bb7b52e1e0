//! Shared parser combinators

mod parsers;

pub use parsers::*;
