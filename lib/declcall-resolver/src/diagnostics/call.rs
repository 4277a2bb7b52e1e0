//! Call-related errors.
//!
//! Errors from name lookup and overload resolution over the operand.

use declcall_reporting::{Diagnostic, IntoDiagnostic, Label};
use declcall_span::Span;

/// A name in the operand that resolves to nothing in scope.
pub struct UnknownIdentifierError {
    pub span: Span,
    pub name: String,
}

impl IntoDiagnostic for UnknownIdentifierError {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(format!("use of undeclared identifier '{}'", self.name))
            .with_labels(vec![
                Label::primary(file_id, self.span.clone()).with_message("not found in this scope")
            ])
    }
}

/// A member access naming no member of the object's class (or of the
/// qualifying base class).
pub struct NoSuchMemberError {
    pub span: Span,
    pub class: String,
    pub name: String,
}

impl IntoDiagnostic for NoSuchMemberError {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(format!("'{}' has no member named '{}'", self.class, self.name))
            .with_labels(vec![
                Label::primary(file_id, self.span.clone()).with_message("member not found")
            ])
    }
}

/// A qualified member access `o.B::f(...)` where `B` is not a base of
/// the object's class.
pub struct InvalidQualifierError {
    pub span: Span,
    pub qualifier: String,
    pub class: String,
}

impl IntoDiagnostic for InvalidQualifierError {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(format!(
                "'{}' is not a base class of '{}'",
                self.qualifier, self.class
            ))
            .with_labels(vec![Label::primary(file_id, self.span.clone())
                .with_message("qualifier must name the class or one of its bases")])
    }
}

/// No viable candidate for the call.
pub struct NoMatchingOverloadError {
    /// Span of the entire call expression
    pub call_span: Span,
    pub name: String,
    /// Rendered types of the provided arguments
    pub argument_types: Vec<String>,
    /// Rendered signatures of the non-matching candidates
    pub candidates: Vec<String>,
}

impl IntoDiagnostic for NoMatchingOverloadError {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        let mut notes = vec![];
        if !self.candidates.is_empty() {
            notes.push("candidates:".to_string());
            for candidate in &self.candidates {
                notes.push(format!("  - {}", candidate));
            }
        }

        Diagnostic::error()
            .with_message(format!(
                "no matching overload for call to '{}({})'",
                self.name,
                self.argument_types.join(", ")
            ))
            .with_labels(vec![Label::primary(file_id, self.call_span.clone())
                .with_message("no candidate accepts these arguments")])
            .with_notes(notes)
    }
}

/// More than one candidate is equally good for the call.
pub struct AmbiguousOverloadError {
    pub call_span: Span,
    pub name: String,
    pub candidates: Vec<String>,
}

impl IntoDiagnostic for AmbiguousOverloadError {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        let mut notes = vec!["equally ranked candidates:".to_string()];
        for candidate in &self.candidates {
            notes.push(format!("  - {}", candidate));
        }

        Diagnostic::error()
            .with_message(format!("call to '{}' is ambiguous", self.name))
            .with_labels(vec![Label::primary(file_id, self.call_span.clone())
                .with_message("more than one best candidate")])
            .with_notes(notes)
    }
}

/// A non-static member function named without an object argument.
pub struct MissingObjectError {
    pub span: Span,
    pub name: String,
}

impl IntoDiagnostic for MissingObjectError {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(format!(
                "call to non-static member function '{}' without an object",
                self.name
            ))
            .with_labels(vec![Label::primary(file_id, self.span.clone())
                .with_message("an implicit object parameter has nothing to bind to")])
    }
}

/// A callee whose type cannot be called at all.
pub struct NotCallableError {
    pub span: Span,
    /// Rendered type of the callee
    pub ty: String,
}

impl IntoDiagnostic for NotCallableError {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(format!("expression of type '{}' is not callable", self.ty))
            .with_labels(vec![Label::primary(file_id, self.span.clone())
                .with_message("not a function, function pointer, or callable object")])
    }
}
