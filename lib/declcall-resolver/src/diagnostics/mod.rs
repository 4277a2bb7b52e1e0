//! Structured error types for program building and call-target
//! resolution, organized by category:
//!
//! - `declaration` - errors while building the program from declarations
//! - `call` - lookup and overload resolution errors
//! - `addressability` - call forms whose target has no address
//! - `constant` - results that are not constant expressions

mod addressability;
mod call;
mod constant;
mod declaration;

pub use addressability::*;
pub use call::*;
pub use constant::*;
pub use declaration::*;
