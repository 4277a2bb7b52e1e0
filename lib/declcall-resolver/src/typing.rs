//! Expression typing
//!
//! Argument and callee expressions are typed without being evaluated:
//! the type of every expression form is computable from declarations
//! alone. Function names decay to their pointer types, operator forms
//! take the type the selected candidate produces, and nested `declcall`
//! operands are resolved in a type-only context.

use declcall_model::{Signature, Ty, TyKind};
use declcall_syntax_tree::{SyntaxKind, SyntaxNode};

use crate::diagnosis::{Diagnosis, ResolveResult};
use crate::diagnostics::{
    AmbiguousOverloadError, LambdaCallError, MissingObjectError, NoSuchMemberError, NotACallError,
    NotCallableError, UnknownIdentifierError, UnknownTypeError,
};
use crate::resolver::{CallTargetResolver, EvaluationContext, LambdaCallPolicy, ResolvedCandidate};
use crate::syntax;

impl CallTargetResolver<'_> {
    /// The static type of an expression
    pub fn type_of(&self, expr: &SyntaxNode) -> ResolveResult<Ty> {
        let expr = syntax::skip_parens(expr.clone());
        let span = syntax::span_of(&expr);
        match expr.kind() {
            SyntaxKind::ExprLiteral => {
                let token = syntax::literal_token(&expr).ok_or_else(|| {
                    Diagnosis::ill_formed(NotACallError { span: span.clone() })
                })?;
                Ok(match token.kind() {
                    SyntaxKind::Integer => Ty::int(span),
                    SyntaxKind::Float => Ty::double(span),
                    SyntaxKind::String => Ty::pointer(Ty::char(span.clone()), span),
                    _ => Ty::bool(span),
                })
            }
            SyntaxKind::ExprPath => self.type_of_path(&expr),
            SyntaxKind::ExprUnary => self.type_of_unary(&expr),
            SyntaxKind::ExprBinary => self.type_of_binary(&expr),
            SyntaxKind::ExprIndex => self.type_of_index(&expr),
            SyntaxKind::ExprCall => self.type_of_call(&expr),
            SyntaxKind::ExprNew => {
                let ty_node = syntax::new_ty(&expr).ok_or_else(|| {
                    Diagnosis::ill_formed(NotACallError { span: span.clone() })
                })?;
                let pointee = self.resolve_type_node(&ty_node)?;
                Ok(Ty::pointer(pointee, span))
            }
            SyntaxKind::ExprDelete => Ok(Ty::void(span)),
            SyntaxKind::ExprDeclcall => {
                let operand = syntax::declcall_operand(&expr).ok_or_else(|| {
                    Diagnosis::ill_formed(NotACallError { span: span.clone() })
                })?;
                // A nested declcall is itself unevaluated, so only its
                // type escapes into the enclosing expression.
                let target = self.resolve(&operand, EvaluationContext::TypeOnly)?;
                Ok(target.ty)
            }
            _ => Err(Diagnosis::ill_formed(NotACallError { span })),
        }
    }

    fn type_of_path(&self, path: &SyntaxNode) -> ResolveResult<Ty> {
        let segments = syntax::path_segments(path);
        match segments.as_slice() {
            [(name, span)] => {
                if let Some(var) = self.program.variable_by_name(name) {
                    return Ok(self.program.variable(var).ty().clone());
                }
                let set = self.program.free_functions(name);
                match set.as_slice() {
                    [] => Err(Diagnosis::ill_formed(UnknownIdentifierError {
                        span: span.clone(),
                        name: name.clone(),
                    })),
                    // Function-to-pointer decay
                    [function] => {
                        let signature = self.program.function(*function).signature().clone();
                        Ok(Ty::function_pointer(signature, span.clone()))
                    }
                    _ => Err(Diagnosis::ill_formed(AmbiguousOverloadError {
                        call_span: span.clone(),
                        name: name.clone(),
                        candidates: set.iter().map(|&f| self.describe(f)).collect(),
                    })),
                }
            }
            [(class_name, class_span), (name, name_span)] => {
                let class = self.program.class_by_name(class_name).ok_or_else(|| {
                    Diagnosis::ill_formed(UnknownIdentifierError {
                        span: class_span.clone(),
                        name: class_name.clone(),
                    })
                })?;
                let set = match self.program.member_lookup(class, name) {
                    Some((_, set)) => set,
                    None => {
                        return Err(Diagnosis::ill_formed(NoSuchMemberError {
                            span: name_span.clone(),
                            class: class_name.clone(),
                            name: name.clone(),
                        }))
                    }
                };
                match set.as_slice() {
                    [function] => {
                        let f = self.program.function(*function);
                        match f.kind() {
                            declcall_model::FunctionKind::StaticMethod
                            | declcall_model::FunctionKind::ExplicitObjectMethod => Ok(
                                Ty::function_pointer(f.signature().clone(), name_span.clone()),
                            ),
                            _ => Err(Diagnosis::ill_formed(MissingObjectError {
                                span: name_span.clone(),
                                name: format!("{}::{}", class_name, name),
                            })),
                        }
                    }
                    _ => Err(Diagnosis::ill_formed(AmbiguousOverloadError {
                        call_span: name_span.clone(),
                        name: format!("{}::{}", class_name, name),
                        candidates: set.iter().map(|&f| self.describe(f)).collect(),
                    })),
                }
            }
            _ => Err(Diagnosis::ill_formed(NotACallError {
                span: syntax::span_of(path),
            })),
        }
    }

    fn type_of_unary(&self, expr: &SyntaxNode) -> ResolveResult<Ty> {
        let span = syntax::span_of(expr);
        let operand = syntax::unary_operand(expr)
            .ok_or_else(|| Diagnosis::ill_formed(NotACallError { span: span.clone() }))?;
        let op = syntax::operator_token(expr)
            .ok_or_else(|| Diagnosis::ill_formed(NotACallError { span: span.clone() }))?;

        match op.kind() {
            SyntaxKind::Star => {
                let ty = self.type_of(&operand)?;
                // Dereferencing a function pointer yields the function,
                // which immediately decays back to the pointer.
                if ty.as_function_pointer().is_some() {
                    return Ok(ty);
                }
                match ty.kind() {
                    TyKind::Pointer(pointee) => Ok((**pointee).clone()),
                    _ => Err(Diagnosis::ill_formed(NotCallableError {
                        span: syntax::span_of(&operand),
                        ty: ty.display(self.program),
                    })),
                }
            }
            SyntaxKind::Amp => {
                let inner = syntax::skip_parens(operand.clone());
                if inner.kind() == SyntaxKind::ExprPath {
                    if let Some(ty) = self.address_of_path(&inner)? {
                        return Ok(ty);
                    }
                }
                let ty = self.type_of(&inner)?;
                Ok(Ty::pointer(ty, span))
            }
            SyntaxKind::Minus | SyntaxKind::Plus | SyntaxKind::Bang | SyntaxKind::Tilde => {
                match self.rewrite_unary(expr)? {
                    ResolvedCandidate::ImplicitObjectMemberFunction { function, .. } => {
                        Ok(self.program.function(function).signature().ret().clone())
                    }
                    _ => {
                        let ty = self.type_of(&operand)?;
                        Ok(match op.kind() {
                            SyntaxKind::Bang => Ty::bool(span),
                            SyntaxKind::Tilde => Ty::int(span),
                            _ => ty,
                        })
                    }
                }
            }
            _ => Err(Diagnosis::ill_formed(NotACallError { span })),
        }
    }

    /// The type of `&name`: a function name decays to its pointer type
    /// and a member name becomes a pointer-to-member. Returns `None`
    /// for operands that take the plain object-pointer route.
    fn address_of_path(&self, path: &SyntaxNode) -> ResolveResult<Option<Ty>> {
        let segments = syntax::path_segments(path);
        match segments.as_slice() {
            [(name, span)] => {
                if self.program.variable_by_name(name).is_some() {
                    return Ok(None);
                }
                let set = self.program.free_functions(name);
                match set.as_slice() {
                    [] => Ok(None),
                    [function] => {
                        let signature = self.program.function(*function).signature().clone();
                        Ok(Some(Ty::function_pointer(signature, span.clone())))
                    }
                    _ => Err(Diagnosis::ill_formed(AmbiguousOverloadError {
                        call_span: span.clone(),
                        name: name.clone(),
                        candidates: set.iter().map(|&f| self.describe(f)).collect(),
                    })),
                }
            }
            [(class_name, _), (name, name_span)] => {
                let class = match self.program.class_by_name(class_name) {
                    Some(class) => class,
                    None => return Ok(None),
                };
                let set = match self.program.member_lookup(class, name) {
                    Some((_, set)) => set,
                    None => return Ok(None),
                };
                match set.as_slice() {
                    [function] => {
                        let f = self.program.function(*function);
                        let ty = match f.kind() {
                            declcall_model::FunctionKind::ImplicitObjectMethod => {
                                let owner = f.owner().ok_or_else(|| {
                                    Diagnosis::ill_formed(NotACallError {
                                        span: name_span.clone(),
                                    })
                                })?;
                                Ty::member_function_pointer(
                                    owner,
                                    f.signature().clone(),
                                    name_span.clone(),
                                )
                            }
                            _ => Ty::function_pointer(f.signature().clone(), name_span.clone()),
                        };
                        Ok(Some(ty))
                    }
                    _ => Err(Diagnosis::ill_formed(AmbiguousOverloadError {
                        call_span: name_span.clone(),
                        name: format!("{}::{}", class_name, name),
                        candidates: set.iter().map(|&f| self.describe(f)).collect(),
                    })),
                }
            }
            _ => Ok(None),
        }
    }

    fn type_of_binary(&self, expr: &SyntaxNode) -> ResolveResult<Ty> {
        let span = syntax::span_of(expr);
        match self.rewrite_binary(expr)? {
            ResolvedCandidate::ImplicitObjectMemberFunction { function, .. } => {
                Ok(self.program.function(function).signature().ret().clone())
            }
            ResolvedCandidate::SynthesizedOperator { .. } => Ok(Ty::bool(span)),
            ResolvedCandidate::BuiltinOperator { spelling } => {
                let (lhs, rhs) = syntax::binary_operands(expr)
                    .ok_or_else(|| Diagnosis::ill_formed(NotACallError { span: span.clone() }))?;
                let lhs_ty = self.type_of(&lhs)?;
                let rhs_ty = self.type_of(&rhs)?;
                Ok(builtin_binary_ty(&spelling, &lhs_ty, &rhs_ty, span))
            }
            _ => Err(Diagnosis::ill_formed(NotACallError { span })),
        }
    }

    fn type_of_index(&self, expr: &SyntaxNode) -> ResolveResult<Ty> {
        let span = syntax::span_of(expr);
        match self.rewrite_index(expr)? {
            ResolvedCandidate::ImplicitObjectMemberFunction { function, .. } => {
                Ok(self.program.function(function).signature().ret().clone())
            }
            ResolvedCandidate::BuiltinOperator { .. } => {
                let (base, _) = syntax::binary_operands(expr)
                    .ok_or_else(|| Diagnosis::ill_formed(NotACallError { span: span.clone() }))?;
                let base_ty = self.type_of(&base)?;
                match base_ty.kind() {
                    TyKind::Pointer(pointee) => Ok((**pointee).clone()),
                    _ => Err(Diagnosis::ill_formed(NotCallableError {
                        span: syntax::span_of(&base),
                        ty: base_ty.display(self.program),
                    })),
                }
            }
            _ => Err(Diagnosis::ill_formed(NotACallError { span })),
        }
    }

    fn type_of_call(&self, call: &SyntaxNode) -> ResolveResult<Ty> {
        let span = syntax::span_of(call);
        if let Some(callee) = syntax::call_callee(call) {
            let callee = syntax::skip_parens(callee);
            if callee.kind() == SyntaxKind::ExprLambda {
                return match self.options.lambda_calls {
                    LambdaCallPolicy::Reject => Err(Diagnosis::ill_formed(LambdaCallError {
                        span: syntax::span_of(call),
                    })),
                    // The call evaluates to whatever the lambda returns
                    LambdaCallPolicy::ResolveResult => {
                        let result = syntax::lambda_result(&callee).ok_or_else(|| {
                            Diagnosis::ill_formed(NotACallError {
                                span: syntax::span_of(&callee),
                            })
                        })?;
                        self.type_of(&result)
                    }
                };
            }
        }

        let candidate = self.classify_call(call)?;
        Ok(match candidate {
            ResolvedCandidate::Constructor { class } => Ty::class(class, span),
            ResolvedCandidate::Destructor { .. } => Ty::void(span),
            ResolvedCandidate::ImplicitObjectMemberFunction { function, .. }
            | ResolvedCandidate::ExplicitObjectMemberFunction { function }
            | ResolvedCandidate::StaticMemberFunction { function }
            | ResolvedCandidate::FreeFunction { function } => {
                self.program.function(function).signature().ret().clone()
            }
            ResolvedCandidate::SurrogateCallFunction { signature, .. }
            | ResolvedCandidate::FunctionPointerValue { signature } => signature.ret().clone(),
            ResolvedCandidate::SynthesizedOperator { .. } => Ty::bool(span),
            ResolvedCandidate::BuiltinOperator { .. } => Ty::int(span),
        })
    }

    /// Resolve a type node against the built program. Unlike declaration
    /// building this has no error type to degrade to, so unknown names
    /// are hard errors.
    fn resolve_type_node(&self, node: &SyntaxNode) -> ResolveResult<Ty> {
        let span = syntax::span_of(node);
        match node.kind() {
            SyntaxKind::TyFunctionPointer => {
                let mut children = node
                    .children()
                    .filter(|c| matches!(c.kind(), SyntaxKind::Ty | SyntaxKind::TyFunctionPointer));
                let ret = match children.next() {
                    Some(ret) => self.resolve_type_node(&ret)?,
                    None => return Err(Diagnosis::ill_formed(NotACallError { span })),
                };
                let mut params = Vec::new();
                for child in children {
                    params.push(self.resolve_type_node(&child)?);
                }
                Ok(Ty::function_pointer(Signature::new(params, ret), span))
            }
            SyntaxKind::Ty => {
                let ident = node
                    .children_with_tokens()
                    .filter_map(|e| e.into_token())
                    .find(|t| t.kind() == SyntaxKind::Identifier)
                    .ok_or_else(|| Diagnosis::ill_formed(NotACallError { span: span.clone() }))?;

                let base = match ident.text() {
                    "void" => Ty::void(span.clone()),
                    "int" => Ty::int(span.clone()),
                    "bool" => Ty::bool(span.clone()),
                    "char" => Ty::char(span.clone()),
                    "float" => Ty::new(TyKind::Float, span.clone()),
                    "double" => Ty::double(span.clone()),
                    name => match self.program.class_by_name(name) {
                        Some(class) => Ty::class(class, span.clone()),
                        None => {
                            return Err(Diagnosis::ill_formed(UnknownTypeError {
                                span: syntax::span_of_token(&ident),
                                name: name.to_string(),
                            }))
                        }
                    },
                };

                let mut result = base;
                for token in node.children_with_tokens().filter_map(|e| e.into_token()) {
                    match token.kind() {
                        SyntaxKind::Star => result = Ty::pointer(result, span.clone()),
                        SyntaxKind::Amp => result = Ty::reference(result, span.clone()),
                        _ => {}
                    }
                }
                Ok(result)
            }
            _ => Err(Diagnosis::ill_formed(NotACallError { span })),
        }
    }
}

/// Result type of a builtin binary operator
fn builtin_binary_ty(spelling: &str, lhs: &Ty, rhs: &Ty, span: declcall_span::Span) -> Ty {
    match spelling {
        "==" | "!=" | "<" | ">" | "<=" | ">=" | "&&" | "||" => Ty::bool(span),
        "<=>" => Ty::int(span),
        _ => {
            // Pointer arithmetic keeps the pointer type, otherwise the
            // usual promotions apply.
            if matches!(lhs.kind(), TyKind::Pointer(_)) {
                return lhs.clone();
            }
            if matches!(rhs.kind(), TyKind::Pointer(_)) {
                return rhs.clone();
            }
            if matches!(lhs.kind(), TyKind::Double) || matches!(rhs.kind(), TyKind::Double) {
                Ty::double(span)
            } else if matches!(lhs.kind(), TyKind::Float) || matches!(rhs.kind(), TyKind::Float) {
                Ty::new(TyKind::Float, span)
            } else {
                Ty::int(span)
            }
        }
    }
}
