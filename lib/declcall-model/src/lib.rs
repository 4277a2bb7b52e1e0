//! Semantic model of a translation unit
//!
//! The model is an arena-style `Program` holding classes, functions and
//! variables, with plain index handles (`ClassId`, `FunctionId`,
//! `VariableId`) linking them together. On top of the program sit the
//! value types the resolution layer produces and consumes:
//! [`pointer::TargetPointer`] for resolved call targets and
//! [`invoke::invoke`] for following a target pointer to the function that
//! would actually run on a given object.

pub mod class;
pub mod function;
pub mod invoke;
pub mod pointer;
pub mod program;
pub mod signature;
pub mod ty;

pub use class::{Class, ClassId};
pub use function::{Function, FunctionId, FunctionKind, Virtuality};
pub use invoke::{invoke, InvokeError};
pub use pointer::{ComparisonPolicy, Dispatch, TargetPointer};
pub use program::{Program, Variable, VariableId};
pub use signature::Signature;
pub use ty::{Ty, TyKind};
