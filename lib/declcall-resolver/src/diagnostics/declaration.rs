//! Declaration errors.
//!
//! Errors reported while building the semantic program from a parsed
//! translation unit.

use declcall_reporting::{Diagnostic, IntoDiagnostic, Label};
use declcall_span::Span;

/// A type name that is neither a builtin type nor a declared class.
pub struct UnknownTypeError {
    pub span: Span,
    pub name: String,
}

impl IntoDiagnostic for UnknownTypeError {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(format!("unknown type '{}'", self.name))
            .with_labels(vec![
                Label::primary(file_id, self.span.clone()).with_message("not a known type")
            ])
    }
}

/// A base clause naming a class that is not declared anywhere in the
/// translation unit.
pub struct UnknownBaseClassError {
    pub span: Span,
    pub name: String,
    pub class: String,
}

impl IntoDiagnostic for UnknownBaseClassError {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(format!(
                "unknown base class '{}' for '{}'",
                self.name, self.class
            ))
            .with_labels(vec![Label::primary(file_id, self.span.clone())
                .with_message("not a declared class")])
    }
}

/// An out-of-line definition `R C::f(...) { }` that matches no declared
/// member of `C`.
pub struct UnmatchedDefinitionError {
    pub span: Span,
    pub class: String,
    pub name: String,
}

impl IntoDiagnostic for UnmatchedDefinitionError {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(format!(
                "definition of '{}::{}' matches no declaration",
                self.class, self.name
            ))
            .with_labels(vec![Label::primary(file_id, self.span.clone())
                .with_message("no member declaration with this name and signature")])
    }
}
