//! Addressability errors.
//!
//! The hard rejection set: operands that are not call forms, and call
//! forms whose selected target is not a function anyone can point at.

use declcall_reporting::{Diagnostic, IntoDiagnostic, Label};
use declcall_span::Span;

/// The operand is not a call form and not rewritable to one.
pub struct NotACallError {
    pub span: Span,
}

impl IntoDiagnostic for NotACallError {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message("operand is not a call expression")
            .with_labels(vec![Label::primary(file_id, self.span.clone())
                .with_message("expected a call or an operator expression rewritable to a call")])
    }
}

/// What an unaddressable call form selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaddressableForm {
    Constructor,
    Destructor,
    BuiltinOperator,
    SynthesizedOperator,
    NewExpression,
    DeleteExpression,
}

impl UnaddressableForm {
    fn describe(&self) -> &'static str {
        match self {
            UnaddressableForm::Constructor => "a constructor",
            UnaddressableForm::Destructor => "a destructor",
            UnaddressableForm::BuiltinOperator => "a built-in operator",
            UnaddressableForm::SynthesizedOperator => "a synthesized comparison operator",
            UnaddressableForm::NewExpression => "a new-expression",
            UnaddressableForm::DeleteExpression => "a delete-expression",
        }
    }
}

/// The call resolves, but to something without an address.
pub struct NotAddressableError {
    pub span: Span,
    pub form: UnaddressableForm,
    /// The name of the selected entity, when it has one
    pub name: Option<String>,
}

impl IntoDiagnostic for NotAddressableError {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        let subject = match &self.name {
            Some(name) => format!("{} ('{}')", self.form.describe(), name),
            None => self.form.describe().to_string(),
        };
        Diagnostic::error()
            .with_message(format!("cannot take the address of {}", subject))
            .with_labels(vec![Label::primary(file_id, self.span.clone())
                .with_message("this call has no addressable target")])
    }
}

/// A call through an immediately invoked lambda, rejected by policy.
pub struct LambdaCallError {
    pub span: Span,
}

impl IntoDiagnostic for LambdaCallError {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message("call through an immediately invoked lambda is not supported here")
            .with_labels(vec![Label::primary(file_id, self.span.clone())
                .with_message("the lambda's result only exists after evaluation")])
    }
}
