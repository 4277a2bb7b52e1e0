//! Invocation through target pointers
//!
//! Given a target pointer and the dynamic type of the object it is bound
//! to, `invoke` answers which function declaration actually runs. Dynamic
//! member pointers dispatch to the final overrider; devirtualized member
//! pointers call the stored declaration exactly, which makes calling a
//! pure virtual function with an out-of-line definition well-defined.

use crate::class::ClassId;
use crate::function::FunctionId;
use crate::pointer::{Dispatch, TargetPointer};
use crate::program::Program;

/// Why invoking a target pointer would not be well-defined
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    /// The call lands on a pure virtual function with no definition
    PureVirtualCall { function: FunctionId },
}

/// Find the final overrider of `declared` for an object whose dynamic
/// type is `dynamic_class`. Walks from the dynamic type toward its bases
/// and returns the most-derived declaration in the override chain.
pub fn final_overrider(
    program: &Program,
    dynamic_class: ClassId,
    declared: FunctionId,
) -> FunctionId {
    for &member in program.class(dynamic_class).members() {
        if member == declared || overrides_transitively(program, member, declared) {
            return member;
        }
    }
    for &base in program.class(dynamic_class).bases() {
        if program.function(declared).owner().is_some_and(|owner| {
            program.derives_from(base, owner)
        }) {
            return final_overrider(program, base, declared);
        }
    }
    declared
}

fn overrides_transitively(program: &Program, derived_fn: FunctionId, base_fn: FunctionId) -> bool {
    let mut current = program.function(derived_fn).overrides();
    while let Some(overridden) = current {
        if overridden == base_fn {
            return true;
        }
        current = program.function(overridden).overrides();
    }
    false
}

/// Determine the function that runs when `pointer` is invoked on an
/// object of dynamic type `object_class` (ignored for plain function
/// pointers).
pub fn invoke(
    program: &Program,
    pointer: &TargetPointer,
    object_class: Option<ClassId>,
) -> Result<FunctionId, InvokeError> {
    match pointer {
        TargetPointer::Function { function } => Ok(*function),
        TargetPointer::Member {
            function, dispatch, ..
        } => {
            let target = match (dispatch, object_class) {
                (Dispatch::Dynamic, Some(dynamic_class))
                    if program.function(*function).is_virtual() =>
                {
                    final_overrider(program, dynamic_class, *function)
                }
                _ => *function,
            };

            let resolved = program.function(target);
            if resolved.is_pure() && !resolved.has_definition() {
                return Err(InvokeError::PureVirtualCall { function: target });
            }
            Ok(target)
        }
    }
}
