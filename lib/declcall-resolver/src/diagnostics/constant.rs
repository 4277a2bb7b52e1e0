//! Constant-expression errors.
//!
//! The soft rejection kind: operands whose target is well-typed but
//! cannot be named without evaluation.

use declcall_reporting::{Diagnostic, IntoDiagnostic, Label};
use declcall_span::Span;

/// Why a result is not a constant expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotConstantReason {
    /// The callee is a function-pointer value; its target is runtime state
    PointerCall,
    /// The call goes through a conversion-to-function-pointer
    SurrogateCall,
    /// The callee is the result of an immediately invoked lambda
    LambdaResult,
}

impl NotConstantReason {
    fn describe(&self) -> &'static str {
        match self {
            NotConstantReason::PointerCall => {
                "the callee is a function-pointer value; the target depends on its runtime value"
            }
            NotConstantReason::SurrogateCall => {
                "the call goes through a surrogate conversion function; the target requires evaluation"
            }
            NotConstantReason::LambdaResult => {
                "the callee is produced by evaluating a lambda call"
            }
        }
    }
}

/// The result is well-typed but demands evaluation to produce a value.
/// Legal as a type source (under `decltype`), rejected as a constant.
pub struct NotConstantError {
    pub span: Span,
    pub reason: NotConstantReason,
}

impl IntoDiagnostic for NotConstantError {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message("result is not a constant expression")
            .with_labels(vec![
                Label::primary(file_id, self.span.clone()).with_message(self.reason.describe())
            ])
            .with_notes(vec![
                "the expression is well-typed and may be used as the operand of decltype"
                    .to_string(),
            ])
    }
}
