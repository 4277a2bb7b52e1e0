//! Operator-to-call rewriting
//!
//! An operator expression is a call form when its operands make a
//! user-declared operator function the selected candidate. Rewriting
//! classifies the expression the way the equivalent member call would
//! be classified. What does not reach a user declaration is a builtin
//! or synthesized candidate, both of which the resolver rejects as
//! unaddressable:
//!
//! - `a != b` where only `operator==` is declared selects a synthesized
//!   candidate, as do the relationals derived from `operator<=>`
//! - operators over arithmetic or pointer operands are builtin

use declcall_model::TyKind;
use declcall_syntax_tree::{SyntaxKind, SyntaxNode};

use crate::diagnosis::{Diagnosis, ResolveResult};
use crate::diagnostics::{NoMatchingOverloadError, NotACallError, NotCallableError};
use crate::resolver::{AccessForm, CallTargetResolver, ResolvedCandidate};
use crate::syntax;

impl CallTargetResolver<'_> {
    /// Rewrite `lhs op rhs` to `lhs.operator op(rhs)` where a user
    /// overload exists
    pub(crate) fn rewrite_binary(&self, expr: &SyntaxNode) -> ResolveResult<ResolvedCandidate> {
        let (lhs, rhs) = match syntax::binary_operands(expr) {
            Some(operands) => operands,
            None => {
                return Err(Diagnosis::ill_formed(NotACallError {
                    span: syntax::span_of(expr),
                }))
            }
        };
        let op = match syntax::operator_token(expr) {
            Some(op) => op,
            None => {
                return Err(Diagnosis::ill_formed(NotACallError {
                    span: syntax::span_of(expr),
                }))
            }
        };
        let spelling = op.text().to_string();

        let lhs_ty = self.type_of(&lhs)?;
        let rhs_ty = self.type_of(&rhs)?;

        let class = match lhs_ty.as_class() {
            Some(class) => class,
            // No class operand: every operator form is builtin
            None => return Ok(ResolvedCandidate::BuiltinOperator { spelling }),
        };

        let op_name = format!("operator{}", spelling);
        if let Some((_, set)) = self.program.member_lookup(class, &op_name) {
            let function = self.select(expr, &op_name, &set, &[rhs_ty])?;
            return Ok(ResolvedCandidate::ImplicitObjectMemberFunction {
                function,
                access: AccessForm::Unqualified,
            });
        }

        // No direct overload: comparison forms may still resolve through
        // a rewritten candidate.
        let synthesized = match op.kind() {
            SyntaxKind::BangEquals => self.program.member_lookup(class, "operator==").is_some(),
            SyntaxKind::Less
            | SyntaxKind::Greater
            | SyntaxKind::LessEquals
            | SyntaxKind::GreaterEquals => {
                self.program.member_lookup(class, "operator<=>").is_some()
            }
            _ => false,
        };
        if synthesized {
            return Ok(ResolvedCandidate::SynthesizedOperator { spelling });
        }

        Err(Diagnosis::ill_formed(NoMatchingOverloadError {
            call_span: syntax::span_of(expr),
            name: op_name,
            argument_types: vec![
                lhs_ty.display(self.program),
                rhs_ty.display(self.program),
            ],
            candidates: Vec::new(),
        }))
    }

    /// Rewrite a prefix operator expression. Dereference and address-of
    /// are not call forms at all.
    pub(crate) fn rewrite_unary(&self, expr: &SyntaxNode) -> ResolveResult<ResolvedCandidate> {
        let operand = match syntax::unary_operand(expr) {
            Some(operand) => operand,
            None => {
                return Err(Diagnosis::ill_formed(NotACallError {
                    span: syntax::span_of(expr),
                }))
            }
        };
        let op = match syntax::operator_token(expr) {
            Some(op) => op,
            None => {
                return Err(Diagnosis::ill_formed(NotACallError {
                    span: syntax::span_of(expr),
                }))
            }
        };

        match op.kind() {
            SyntaxKind::Minus | SyntaxKind::Plus | SyntaxKind::Bang | SyntaxKind::Tilde => {
                let ty = self.type_of(&operand)?;
                let spelling = op.text().to_string();
                match ty.as_class() {
                    Some(class) => {
                        let op_name = format!("operator{}", spelling);
                        match self.program.member_lookup(class, &op_name) {
                            Some((_, set)) => {
                                let function = self.select(expr, &op_name, &set, &[])?;
                                Ok(ResolvedCandidate::ImplicitObjectMemberFunction {
                                    function,
                                    access: AccessForm::Unqualified,
                                })
                            }
                            None => Err(Diagnosis::ill_formed(NoMatchingOverloadError {
                                call_span: syntax::span_of(expr),
                                name: op_name,
                                argument_types: vec![ty.display(self.program)],
                                candidates: Vec::new(),
                            })),
                        }
                    }
                    None => Ok(ResolvedCandidate::BuiltinOperator { spelling }),
                }
            }
            _ => Err(Diagnosis::ill_formed(NotACallError {
                span: syntax::span_of(expr),
            })),
        }
    }

    /// Rewrite `base[index]` to `base.operator[](index)` where a user
    /// overload exists
    pub(crate) fn rewrite_index(&self, expr: &SyntaxNode) -> ResolveResult<ResolvedCandidate> {
        let (base, index) = match syntax::binary_operands(expr) {
            Some(operands) => operands,
            None => {
                return Err(Diagnosis::ill_formed(NotACallError {
                    span: syntax::span_of(expr),
                }))
            }
        };

        let base_ty = self.type_of(&base)?;
        let index_ty = self.type_of(&index)?;

        match base_ty.as_class() {
            Some(class) => match self.program.member_lookup(class, "operator[]") {
                Some((_, set)) => {
                    let function = self.select(expr, "operator[]", &set, &[index_ty])?;
                    Ok(ResolvedCandidate::ImplicitObjectMemberFunction {
                        function,
                        access: AccessForm::Unqualified,
                    })
                }
                None => Err(Diagnosis::ill_formed(NoMatchingOverloadError {
                    call_span: syntax::span_of(expr),
                    name: "operator[]".to_string(),
                    argument_types: vec![index_ty.display(self.program)],
                    candidates: Vec::new(),
                })),
            },
            None => match base_ty.kind() {
                TyKind::Pointer(_) => Ok(ResolvedCandidate::BuiltinOperator {
                    spelling: "[]".to_string(),
                }),
                _ => Err(Diagnosis::ill_formed(NotCallableError {
                    span: syntax::span_of(&base),
                    ty: base_ty.display(self.program),
                })),
            },
        }
    }
}
