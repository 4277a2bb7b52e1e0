//! Semantic types

use declcall_span::Span;

use crate::class::ClassId;
use crate::program::Program;
use crate::signature::Signature;

/// Represents a semantic type with its kind and source location
#[derive(Debug, Clone)]
pub struct Ty {
    kind: TyKind,
    span: Span,
}

/// The kind of a semantic type
#[derive(Debug, Clone)]
pub enum TyKind {
    Void,
    Int,
    Bool,
    Char,
    Float,
    Double,
    /// A class type
    Class(ClassId),
    /// A pointer type: `T*`
    Pointer(Box<Ty>),
    /// A reference type: `T&`
    Reference(Box<Ty>),
    /// A pointer-to-function type: `R (*)(P1, P2)`
    FunctionPointer(Signature),
    /// A pointer-to-member-function type: `R (C::*)(P1, P2)`
    MemberFunctionPointer { class: ClassId, signature: Signature },
    /// Produced when a type in the source could not be resolved
    Error,
}

impl Ty {
    /// Create a new type with the given kind and span
    pub fn new(kind: TyKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Create a type with no source location, for types the resolver
    /// synthesizes rather than reads from the source
    pub fn synthesized(kind: TyKind) -> Self {
        Self { kind, span: 0..0 }
    }

    /// Get the kind of this type
    pub fn kind(&self) -> &TyKind {
        &self.kind
    }

    /// Get the span of this type
    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn void(span: Span) -> Self {
        Self::new(TyKind::Void, span)
    }

    pub fn int(span: Span) -> Self {
        Self::new(TyKind::Int, span)
    }

    pub fn bool(span: Span) -> Self {
        Self::new(TyKind::Bool, span)
    }

    pub fn char(span: Span) -> Self {
        Self::new(TyKind::Char, span)
    }

    pub fn double(span: Span) -> Self {
        Self::new(TyKind::Double, span)
    }

    pub fn class(class: ClassId, span: Span) -> Self {
        Self::new(TyKind::Class(class), span)
    }

    pub fn pointer(pointee: Ty, span: Span) -> Self {
        Self::new(TyKind::Pointer(Box::new(pointee)), span)
    }

    pub fn reference(referent: Ty, span: Span) -> Self {
        Self::new(TyKind::Reference(Box::new(referent)), span)
    }

    pub fn function_pointer(signature: Signature, span: Span) -> Self {
        Self::new(TyKind::FunctionPointer(signature), span)
    }

    pub fn member_function_pointer(class: ClassId, signature: Signature, span: Span) -> Self {
        Self::new(TyKind::MemberFunctionPointer { class, signature }, span)
    }

    pub fn error(span: Span) -> Self {
        Self::new(TyKind::Error, span)
    }

    /// Whether this is a builtin arithmetic type
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self.kind,
            TyKind::Int | TyKind::Bool | TyKind::Char | TyKind::Float | TyKind::Double
        )
    }

    /// Whether this is a class type, returning the class
    pub fn as_class(&self) -> Option<ClassId> {
        match &self.kind {
            TyKind::Class(class) => Some(*class),
            TyKind::Reference(inner) => inner.as_class(),
            _ => None,
        }
    }

    /// Whether this is a pointer-to-function type, returning the signature
    pub fn as_function_pointer(&self) -> Option<&Signature> {
        match &self.kind {
            TyKind::FunctionPointer(signature) => Some(signature),
            TyKind::Reference(inner) => inner.as_function_pointer(),
            _ => None,
        }
    }

    /// Structural type equality, ignoring source locations
    pub fn same_type(&self, other: &Ty) -> bool {
        match (&self.kind, &other.kind) {
            (TyKind::Void, TyKind::Void)
            | (TyKind::Int, TyKind::Int)
            | (TyKind::Bool, TyKind::Bool)
            | (TyKind::Char, TyKind::Char)
            | (TyKind::Float, TyKind::Float)
            | (TyKind::Double, TyKind::Double) => true,
            (TyKind::Class(a), TyKind::Class(b)) => a == b,
            (TyKind::Pointer(a), TyKind::Pointer(b)) => a.same_type(b),
            (TyKind::Reference(a), TyKind::Reference(b)) => a.same_type(b),
            (TyKind::FunctionPointer(a), TyKind::FunctionPointer(b)) => a.same_signature(b),
            (
                TyKind::MemberFunctionPointer {
                    class: ca,
                    signature: sa,
                },
                TyKind::MemberFunctionPointer {
                    class: cb,
                    signature: sb,
                },
            ) => ca == cb && sa.same_signature(sb),
            _ => false,
        }
    }

    /// Render this type the way it would be spelled in the source,
    /// e.g. `int`, `const char*`, `int (*)(int, int)`, `int (B::*)(int)`
    pub fn display(&self, program: &Program) -> String {
        match &self.kind {
            TyKind::Void => "void".to_string(),
            TyKind::Int => "int".to_string(),
            TyKind::Bool => "bool".to_string(),
            TyKind::Char => "char".to_string(),
            TyKind::Float => "float".to_string(),
            TyKind::Double => "double".to_string(),
            TyKind::Class(class) => program.class(*class).name().to_string(),
            TyKind::Pointer(pointee) => format!("{}*", pointee.display(program)),
            TyKind::Reference(referent) => format!("{}&", referent.display(program)),
            TyKind::FunctionPointer(signature) => format!(
                "{} (*)({})",
                signature.ret().display(program),
                signature.display_params(program)
            ),
            TyKind::MemberFunctionPointer { class, signature } => {
                let constness = if signature.is_const() { " const" } else { "" };
                format!(
                    "{} ({}::*)({}){}",
                    signature.ret().display(program),
                    program.class(*class).name(),
                    signature.display_params(program),
                    constness
                )
            }
            TyKind::Error => "<error>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_type_ignores_spans() {
        let a = Ty::int(0..3);
        let b = Ty::int(10..13);
        assert!(a.same_type(&b));
    }

    #[test]
    fn test_pointer_types_compare_structurally() {
        let a = Ty::pointer(Ty::char(0..4), 0..5);
        let b = Ty::pointer(Ty::char(8..12), 8..13);
        let c = Ty::pointer(Ty::int(0..3), 0..4);
        assert!(a.same_type(&b));
        assert!(!a.same_type(&c));
    }

    #[test]
    fn test_arithmetic_classification() {
        assert!(Ty::int(0..0).is_arithmetic());
        assert!(Ty::double(0..0).is_arithmetic());
        assert!(!Ty::void(0..0).is_arithmetic());
        assert!(!Ty::pointer(Ty::int(0..0), 0..0).is_arithmetic());
    }
}
