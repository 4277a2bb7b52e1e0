//! Resolved call targets
//!
//! A `TargetPointer` is the value a `declcall` expression evaluates to: a
//! pointer to the one function overload resolution selected. Targets with
//! an implicit object parameter become pointers-to-member; everything else
//! becomes a plain function pointer.
//!
//! A pointer-to-member selected through a qualified virtual call carries
//! the `Devirtualized` dispatch tag: it stores the same declaration a
//! dynamic pointer would, but invoking it calls that exact declaration
//! instead of the final overrider.

use crate::class::ClassId;
use crate::function::FunctionId;
use crate::program::Program;
use crate::signature::Signature;
use crate::ty::Ty;

/// How a pointer-to-member dispatches when invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Virtual dispatch to the final overrider of the object's dynamic type
    Dynamic,
    /// Call exactly the stored declaration, bypassing virtual dispatch
    Devirtualized,
}

/// The value a resolved call-target expression produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetPointer {
    /// A plain pointer to function
    Function { function: FunctionId },
    /// A pointer to member function of `class`
    Member {
        class: ClassId,
        function: FunctionId,
        dispatch: Dispatch,
    },
}

/// How comparing a devirtualized pointer against an ordinary pointer to
/// the same function behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComparisonPolicy {
    /// The comparison has no specified result
    #[default]
    Unspecified,
    /// The comparison is specified to be unequal
    ForcedUnequal,
}

impl TargetPointer {
    /// The static type of this pointer value
    pub fn ty(&self, program: &Program) -> Ty {
        match self {
            TargetPointer::Function { function } => {
                let signature = program.function(*function).signature().clone();
                Ty::synthesized(crate::ty::TyKind::FunctionPointer(signature))
            }
            TargetPointer::Member {
                class, function, ..
            } => {
                let signature = program.function(*function).signature().clone();
                Ty::synthesized(crate::ty::TyKind::MemberFunctionPointer {
                    class: *class,
                    signature,
                })
            }
        }
    }

    pub fn function(&self) -> FunctionId {
        match self {
            TargetPointer::Function { function } => *function,
            TargetPointer::Member { function, .. } => *function,
        }
    }

    pub fn signature<'a>(&self, program: &'a Program) -> &'a Signature {
        program.function(self.function()).signature()
    }

    pub fn is_devirtualized(&self) -> bool {
        matches!(
            self,
            TargetPointer::Member {
                dispatch: Dispatch::Devirtualized,
                ..
            }
        )
    }

    /// Compare two target pointers for equality.
    ///
    /// `None` means the comparison result is unspecified. That happens in
    /// two situations: comparing pointers to two different virtual member
    /// functions, and (under [`ComparisonPolicy::Unspecified`]) comparing
    /// a devirtualized pointer against a dynamic pointer to the same
    /// declaration. [`ComparisonPolicy::ForcedUnequal`] pins the latter
    /// case to `Some(false)`.
    pub fn compare(
        &self,
        other: &TargetPointer,
        policy: ComparisonPolicy,
        program: &Program,
    ) -> Option<bool> {
        match (self, other) {
            (TargetPointer::Function { function: a }, TargetPointer::Function { function: b }) => {
                Some(a == b)
            }
            (
                TargetPointer::Member {
                    class: ca,
                    function: fa,
                    dispatch: da,
                },
                TargetPointer::Member {
                    class: cb,
                    function: fb,
                    dispatch: db,
                },
            ) => {
                if fa != fb {
                    // Pointers to two different virtual members compare
                    // unspecified; non-virtual members compare by identity.
                    let either_virtual =
                        program.function(*fa).is_virtual() || program.function(*fb).is_virtual();
                    return if either_virtual { None } else { Some(false) };
                }
                match (da, db) {
                    (Dispatch::Dynamic, Dispatch::Dynamic) => Some(true),
                    (Dispatch::Devirtualized, Dispatch::Devirtualized) if ca == cb => Some(true),
                    _ => match policy {
                        ComparisonPolicy::Unspecified => None,
                        ComparisonPolicy::ForcedUnequal => Some(false),
                    },
                }
            }
            // A function pointer and a member pointer have different types
            // and never compare equal.
            _ => Some(false),
        }
    }
}
