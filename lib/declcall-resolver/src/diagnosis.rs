//! The two diagnosis kinds
//!
//! Every resolution failure is one of two compile-time kinds:
//!
//! - [`DiagnosisKind::IllFormed`]: a hard error. The operand is not a call
//!   form, or it resolves to something that has no address (constructors,
//!   destructors, builtin and synthesized operators, new/delete).
//! - [`DiagnosisKind::NotConstant`]: a soft error, recoverable by
//!   substitution. The operand is a legal call form whose target cannot be
//!   named without evaluating something (a call through a function-pointer
//!   value, a surrogate conversion call). The result is still well-typed
//!   and legal in type-only contexts.

use declcall_reporting::{Diagnostic, IntoDiagnostic};

/// Which of the two failure kinds a diagnosis is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosisKind {
    /// Hard error: the program is ill-formed
    IllFormed,
    /// Soft error: well-typed, but not a constant expression
    NotConstant,
}

/// A resolution failure: a kind plus the structured error behind it
pub struct Diagnosis {
    kind: DiagnosisKind,
    error: Box<dyn IntoDiagnostic>,
}

impl Diagnosis {
    pub fn ill_formed<E: IntoDiagnostic + 'static>(error: E) -> Self {
        Self {
            kind: DiagnosisKind::IllFormed,
            error: Box::new(error),
        }
    }

    pub fn not_constant<E: IntoDiagnostic + 'static>(error: E) -> Self {
        Self {
            kind: DiagnosisKind::NotConstant,
            error: Box::new(error),
        }
    }

    pub fn kind(&self) -> DiagnosisKind {
        self.kind
    }

    /// Whether this failure is recoverable by substitution rather than a
    /// hard compilation failure
    pub fn is_recoverable(&self) -> bool {
        self.kind == DiagnosisKind::NotConstant
    }
}

impl IntoDiagnostic for Diagnosis {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        self.error.into_diagnostic(file_id)
    }
}

impl std::fmt::Debug for Diagnosis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnosis")
            .field("kind", &self.kind)
            .field("message", &self.error.into_diagnostic(0).message)
            .finish()
    }
}

/// Result alias used throughout resolution
pub type ResolveResult<T> = Result<T, Diagnosis>;
