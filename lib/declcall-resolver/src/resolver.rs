//! The call-target resolver
//!
//! The decision procedure behind `declcall(expression)`: classify an
//! unevaluated call-form operand into a [`ResolvedCandidate`] (consulting
//! the overload oracle where an overload set is involved), then map the
//! candidate to a [`ResolvedTarget`] or a diagnosis.
//!
//! The procedure mirrors the call forms of the language:
//! - operator expressions are rewritten to member operator calls first;
//!   what cannot be rewritten to a user-declared operator is a builtin or
//!   synthesized candidate and therefore unaddressable
//! - calls through values (function pointers, surrogate conversions) are
//!   well-typed but their target needs evaluation: type-only legal
//! - member calls produce pointers-to-member, devirtualized when the
//!   access was base-qualified and the member is virtual

use declcall_model::{
    ClassId, Dispatch, FunctionId, FunctionKind, Program, Signature, TargetPointer, Ty,
};
use declcall_syntax_tree::{SyntaxKind, SyntaxNode};

use crate::diagnosis::{Diagnosis, ResolveResult};
use crate::diagnostics::{
    AmbiguousOverloadError, InvalidQualifierError, LambdaCallError, MissingObjectError,
    NoMatchingOverloadError, NoSuchMemberError, NotACallError, NotAddressableError,
    NotCallableError, NotConstantError, NotConstantReason, UnaddressableForm,
    UnknownIdentifierError,
};
use crate::oracle::{OverloadFailure, OverloadOracle};
use crate::syntax;

/// Where the result of resolution is demanded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationContext {
    /// A genuine constant is required
    ConstantExpression,
    /// Only the type is consumed (the operand of `decltype`)
    TypeOnly,
}

/// How calls through immediately invoked lambdas are treated.
/// The source material leaves this case unsettled; both behaviors are
/// supported and pinned by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LambdaCallPolicy {
    /// Reject the lambda call outright
    #[default]
    Reject,
    /// Type the lambda's returned expression and treat the outer call as
    /// a call through that value
    ResolveResult,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResolverOptions {
    pub lambda_calls: LambdaCallPolicy,
}

/// Whether the member access naming the callee was base-qualified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessForm {
    /// `obj.B::f(...)`
    Qualified,
    /// `obj.f(...)`
    Unqualified,
}

/// Whether the result is usable as a constant or only as a type source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstexprEligibility {
    Constant,
    TypeOnly,
}

/// What the oracle (or classification) selected for the call
#[derive(Debug, Clone)]
pub enum ResolvedCandidate {
    Constructor { class: ClassId },
    Destructor { class: ClassId },
    /// A comparison candidate that exists only by rewriting (`!=` from
    /// `==`, secondary relationals from `<=>`)
    SynthesizedOperator { spelling: String },
    /// A builtin operator on operands with no user-declared overload
    BuiltinOperator { spelling: String },
    /// A call through a conversion-to-function-pointer
    SurrogateCallFunction {
        class: ClassId,
        conversion: FunctionId,
        signature: Signature,
    },
    ImplicitObjectMemberFunction {
        function: FunctionId,
        access: AccessForm,
    },
    ExplicitObjectMemberFunction { function: FunctionId },
    StaticMemberFunction { function: FunctionId },
    FreeFunction { function: FunctionId },
    /// The callee is a function-pointer value, not a declaration
    FunctionPointerValue { signature: Signature },
}

/// The successful result: a typed target pointer, or just the type when
/// the value would demand evaluation
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    /// `None` exactly when `eligibility` is `TypeOnly`
    pub pointer: Option<TargetPointer>,
    pub ty: Ty,
    pub eligibility: ConstexprEligibility,
}

/// The decision procedure, parameterized over the overload oracle
pub struct CallTargetResolver<'a> {
    pub(crate) program: &'a Program,
    oracle: &'a dyn OverloadOracle,
    pub(crate) options: ResolverOptions,
}

impl<'a> CallTargetResolver<'a> {
    pub fn new(program: &'a Program, oracle: &'a dyn OverloadOracle) -> Self {
        Self {
            program,
            oracle,
            options: ResolverOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn program(&self) -> &Program {
        self.program
    }

    /// Resolve the operand of a `declcall` expression.
    ///
    /// In a [`EvaluationContext::ConstantExpression`] context a type-only
    /// result is rejected with the soft `NotConstant` kind; under
    /// [`EvaluationContext::TypeOnly`] it succeeds with no pointer value.
    pub fn resolve(
        &self,
        operand: &SyntaxNode,
        context: EvaluationContext,
    ) -> ResolveResult<ResolvedTarget> {
        let operand = syntax::skip_parens(operand.clone());
        let candidate = self.classify(&operand)?;
        self.target_for(candidate, &operand, context)
    }

    /// Classify the operand into a candidate, rewriting operator forms
    /// to calls first
    pub fn classify(&self, operand: &SyntaxNode) -> ResolveResult<ResolvedCandidate> {
        let operand = syntax::skip_parens(operand.clone());
        match operand.kind() {
            SyntaxKind::ExprCall => self.classify_call(&operand),
            SyntaxKind::ExprBinary => self.rewrite_binary(&operand),
            SyntaxKind::ExprUnary => self.rewrite_unary(&operand),
            SyntaxKind::ExprIndex => self.rewrite_index(&operand),
            SyntaxKind::ExprNew => Err(Diagnosis::ill_formed(NotAddressableError {
                span: syntax::span_of(&operand),
                form: UnaddressableForm::NewExpression,
                name: None,
            })),
            SyntaxKind::ExprDelete => Err(Diagnosis::ill_formed(NotAddressableError {
                span: syntax::span_of(&operand),
                form: UnaddressableForm::DeleteExpression,
                name: None,
            })),
            _ => Err(Diagnosis::ill_formed(NotACallError {
                span: syntax::span_of(&operand),
            })),
        }
    }

    pub(crate) fn classify_call(&self, call: &SyntaxNode) -> ResolveResult<ResolvedCandidate> {
        let callee = match syntax::call_callee(call) {
            Some(callee) => syntax::skip_parens(callee),
            None => {
                return Err(Diagnosis::ill_formed(NotACallError {
                    span: syntax::span_of(call),
                }))
            }
        };

        let mut args = Vec::new();
        for arg in syntax::call_arguments(call) {
            args.push(self.type_of(&arg)?);
        }

        match callee.kind() {
            SyntaxKind::ExprPath => self.classify_path_call(call, &callee, &args),
            SyntaxKind::ExprMember => self.classify_member_call(call, &callee, &args),
            SyntaxKind::ExprLambda => match self.options.lambda_calls {
                LambdaCallPolicy::Reject => Err(Diagnosis::ill_formed(LambdaCallError {
                    span: syntax::span_of(call),
                })),
                // The target is the closure's call operator; naming it
                // still requires evaluating the lambda expression.
                LambdaCallPolicy::ResolveResult => {
                    Err(Diagnosis::not_constant(NotConstantError {
                        span: syntax::span_of(call),
                        reason: NotConstantReason::LambdaResult,
                    }))
                }
            },
            _ => {
                let callee_ty = self.type_of(&callee)?;
                if let Some(signature) = callee_ty.as_function_pointer() {
                    Ok(ResolvedCandidate::FunctionPointerValue {
                        signature: signature.clone(),
                    })
                } else if let Some(class) = callee_ty.as_class() {
                    self.classify_object_call(call, class, &args)
                } else {
                    Err(Diagnosis::ill_formed(NotCallableError {
                        span: syntax::span_of(&callee),
                        ty: callee_ty.display(self.program),
                    }))
                }
            }
        }
    }

    fn classify_path_call(
        &self,
        call: &SyntaxNode,
        path: &SyntaxNode,
        args: &[Ty],
    ) -> ResolveResult<ResolvedCandidate> {
        let segments = syntax::path_segments(path);
        match segments.as_slice() {
            [(name, span)] => {
                if let Some(class) = self.program.class_by_name(name) {
                    return Ok(ResolvedCandidate::Constructor { class });
                }
                if let Some(var) = self.program.variable_by_name(name) {
                    let ty = self.program.variable(var).ty().clone();
                    if let Some(signature) = ty.as_function_pointer() {
                        return Ok(ResolvedCandidate::FunctionPointerValue {
                            signature: signature.clone(),
                        });
                    }
                    if let Some(class) = ty.as_class() {
                        return self.classify_object_call(call, class, args);
                    }
                    return Err(Diagnosis::ill_formed(NotCallableError {
                        span: span.clone(),
                        ty: ty.display(self.program),
                    }));
                }
                let set = self.program.free_functions(name);
                if set.is_empty() {
                    return Err(Diagnosis::ill_formed(UnknownIdentifierError {
                        span: span.clone(),
                        name: name.clone(),
                    }));
                }
                let function = self.select(call, name, &set, args)?;
                Ok(ResolvedCandidate::FreeFunction { function })
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
                let function = self.select(call, name, &set, args)?;
                match self.program.function(function).kind() {
                    FunctionKind::StaticMethod => {
                        Ok(ResolvedCandidate::StaticMemberFunction { function })
                    }
                    FunctionKind::ExplicitObjectMethod => {
                        Ok(ResolvedCandidate::ExplicitObjectMemberFunction { function })
                    }
                    _ => Err(Diagnosis::ill_formed(MissingObjectError {
                        span: syntax::span_of(call),
                        name: format!("{}::{}", class_name, name),
                    })),
                }
            }
            _ => Err(Diagnosis::ill_formed(NotACallError {
                span: syntax::span_of(path),
            })),
        }
    }

    fn classify_member_call(
        &self,
        call: &SyntaxNode,
        member: &SyntaxNode,
        args: &[Ty],
    ) -> ResolveResult<ResolvedCandidate> {
        let base = match syntax::member_base(member) {
            Some(base) => base,
            None => {
                return Err(Diagnosis::ill_formed(NotACallError {
                    span: syntax::span_of(member),
                }))
            }
        };
        let base_ty = self.type_of(&base)?;

        let object_class = if syntax::member_is_arrow(member) {
            match base_ty.kind() {
                declcall_model::TyKind::Pointer(pointee) => pointee.as_class(),
                _ => None,
            }
        } else {
            base_ty.as_class()
        };
        let object_class = object_class.ok_or_else(|| {
            Diagnosis::ill_formed(NotCallableError {
                span: syntax::span_of(&base),
                ty: base_ty.display(self.program),
            })
        })?;

        let name = match syntax::member_name(member) {
            Some(name) => name,
            None => {
                return Err(Diagnosis::ill_formed(NotACallError {
                    span: syntax::span_of(member),
                }))
            }
        };

        if name.is_destructor {
            return Ok(ResolvedCandidate::Destructor {
                class: object_class,
            });
        }

        let (access, lookup_class) = match &name.qualifier {
            Some((qualifier, qualifier_span)) => {
                let qualifying = self.program.class_by_name(qualifier).ok_or_else(|| {
                    Diagnosis::ill_formed(UnknownIdentifierError {
                        span: qualifier_span.clone(),
                        name: qualifier.clone(),
                    })
                })?;
                if !self.program.derives_from(object_class, qualifying) {
                    return Err(Diagnosis::ill_formed(InvalidQualifierError {
                        span: qualifier_span.clone(),
                        qualifier: qualifier.clone(),
                        class: self.program.class(object_class).name().to_string(),
                    }));
                }
                (AccessForm::Qualified, qualifying)
            }
            None => (AccessForm::Unqualified, object_class),
        };

        let set = match self.program.member_lookup(lookup_class, &name.name) {
            Some((_, set)) => set,
            None => {
                return Err(Diagnosis::ill_formed(NoSuchMemberError {
                    span: name.span.clone(),
                    class: self.program.class(lookup_class).name().to_string(),
                    name: name.name.clone(),
                }))
            }
        };

        let function = self.select_member(call, &name.name, &set, &base_ty, args)?;
        match self.program.function(function).kind() {
            FunctionKind::ImplicitObjectMethod => {
                Ok(ResolvedCandidate::ImplicitObjectMemberFunction { function, access })
            }
            FunctionKind::ExplicitObjectMethod => {
                Ok(ResolvedCandidate::ExplicitObjectMemberFunction { function })
            }
            FunctionKind::StaticMethod => Ok(ResolvedCandidate::StaticMemberFunction { function }),
            _ => Err(Diagnosis::ill_formed(NotACallError {
                span: syntax::span_of(call),
            })),
        }
    }

    /// An object used directly as a callee: `o(args)`. A declared call
    /// operator wins; otherwise conversions to function pointer act as
    /// surrogate call functions.
    fn classify_object_call(
        &self,
        call: &SyntaxNode,
        class: ClassId,
        args: &[Ty],
    ) -> ResolveResult<ResolvedCandidate> {
        if let Some((_, set)) = self.program.member_lookup(class, "operator()") {
            let object_ty = Ty::synthesized(declcall_model::TyKind::Class(class));
            let function = self.select_member(call, "operator()", &set, &object_ty, args)?;
            return Ok(ResolvedCandidate::ImplicitObjectMemberFunction {
                function,
                access: AccessForm::Unqualified,
            });
        }

        let surrogates: Vec<(FunctionId, Signature)> = self
            .program
            .conversions(class)
            .into_iter()
            .filter_map(|conversion| {
                self.program
                    .function(conversion)
                    .signature()
                    .ret()
                    .as_function_pointer()
                    .filter(|signature| signature.arity() == args.len())
                    .map(|signature| (conversion, signature.clone()))
            })
            .collect();

        match surrogates.as_slice() {
            [] => Err(Diagnosis::ill_formed(NotCallableError {
                span: syntax::span_of(call),
                ty: self.program.class(class).name().to_string(),
            })),
            [(conversion, signature)] => Ok(ResolvedCandidate::SurrogateCallFunction {
                class,
                conversion: *conversion,
                signature: signature.clone(),
            }),
            _ => Err(Diagnosis::ill_formed(AmbiguousOverloadError {
                call_span: syntax::span_of(call),
                name: format!("{}::operator()", self.program.class(class).name()),
                candidates: surrogates
                    .iter()
                    .map(|(c, _)| self.describe(*c))
                    .collect(),
            })),
        }
    }

    /// Run the oracle over an overload set, mapping failures to
    /// diagnostics
    pub(crate) fn select(
        &self,
        call: &SyntaxNode,
        name: &str,
        set: &[FunctionId],
        args: &[Ty],
    ) -> ResolveResult<FunctionId> {
        self.oracle
            .select(self.program, set, args)
            .map_err(|failure| self.selection_failure(call, name, set, args, failure))
    }

    /// Member selection: explicit-object members take the object as their
    /// leading parameter, so they are ranked against an extended argument
    /// list.
    pub(crate) fn select_member(
        &self,
        call: &SyntaxNode,
        name: &str,
        set: &[FunctionId],
        object_ty: &Ty,
        args: &[Ty],
    ) -> ResolveResult<FunctionId> {
        let (explicit, ordinary): (Vec<FunctionId>, Vec<FunctionId>) =
            set.iter().copied().partition(|&f| {
                self.program.function(f).kind() == FunctionKind::ExplicitObjectMethod
            });

        if !ordinary.is_empty() {
            match self.oracle.select(self.program, &ordinary, args) {
                Ok(function) => return Ok(function),
                Err(failure @ OverloadFailure::Ambiguous(_)) => {
                    return Err(self.selection_failure(call, name, set, args, failure))
                }
                Err(OverloadFailure::NoViable) => {}
            }
        }

        if !explicit.is_empty() {
            let mut extended = Vec::with_capacity(args.len() + 1);
            extended.push(object_ty.clone());
            extended.extend(args.iter().cloned());
            return self
                .oracle
                .select(self.program, &explicit, &extended)
                .map_err(|failure| self.selection_failure(call, name, set, args, failure));
        }

        Err(self.selection_failure(call, name, set, args, OverloadFailure::NoViable))
    }

    fn selection_failure(
        &self,
        call: &SyntaxNode,
        name: &str,
        set: &[FunctionId],
        args: &[Ty],
        failure: OverloadFailure,
    ) -> Diagnosis {
        let argument_types = args.iter().map(|a| a.display(self.program)).collect();
        match failure {
            OverloadFailure::NoViable => Diagnosis::ill_formed(NoMatchingOverloadError {
                call_span: syntax::span_of(call),
                name: name.to_string(),
                argument_types,
                candidates: set.iter().map(|&f| self.describe(f)).collect(),
            }),
            OverloadFailure::Ambiguous(candidates) => {
                Diagnosis::ill_formed(AmbiguousOverloadError {
                    call_span: syntax::span_of(call),
                    name: name.to_string(),
                    candidates: candidates.iter().map(|&f| self.describe(f)).collect(),
                })
            }
        }
    }

    /// Render a candidate signature for diagnostics, e.g. `B::f(int)`
    pub(crate) fn describe(&self, function: FunctionId) -> String {
        let f = self.program.function(function);
        format!(
            "{}({})",
            f.qualified_name(self.program),
            f.signature().display_params(self.program)
        )
    }

    /// Map a candidate to the final result, applying the rejection set
    /// and the constant-expression gate
    fn target_for(
        &self,
        candidate: ResolvedCandidate,
        operand: &SyntaxNode,
        context: EvaluationContext,
    ) -> ResolveResult<ResolvedTarget> {
        let span = syntax::span_of(operand);
        match candidate {
            ResolvedCandidate::Constructor { class } => {
                Err(Diagnosis::ill_formed(NotAddressableError {
                    span,
                    form: UnaddressableForm::Constructor,
                    name: Some(self.program.class(class).name().to_string()),
                }))
            }
            ResolvedCandidate::Destructor { class } => {
                Err(Diagnosis::ill_formed(NotAddressableError {
                    span,
                    form: UnaddressableForm::Destructor,
                    name: Some(format!("~{}", self.program.class(class).name())),
                }))
            }
            ResolvedCandidate::SynthesizedOperator { spelling } => {
                Err(Diagnosis::ill_formed(NotAddressableError {
                    span,
                    form: UnaddressableForm::SynthesizedOperator,
                    name: Some(format!("operator{}", spelling)),
                }))
            }
            ResolvedCandidate::BuiltinOperator { spelling } => {
                Err(Diagnosis::ill_formed(NotAddressableError {
                    span,
                    form: UnaddressableForm::BuiltinOperator,
                    name: Some(format!("operator{}", spelling)),
                }))
            }
            ResolvedCandidate::ImplicitObjectMemberFunction { function, access } => {
                let f = self.program.function(function);
                let class = match f.owner() {
                    Some(class) => class,
                    None => {
                        return Err(Diagnosis::ill_formed(NotACallError { span }));
                    }
                };
                let dispatch = if access == AccessForm::Qualified && f.is_virtual() {
                    Dispatch::Devirtualized
                } else {
                    Dispatch::Dynamic
                };
                let pointer = TargetPointer::Member {
                    class,
                    function,
                    dispatch,
                };
                Ok(ResolvedTarget {
                    ty: pointer.ty(self.program),
                    pointer: Some(pointer),
                    eligibility: ConstexprEligibility::Constant,
                })
            }
            ResolvedCandidate::ExplicitObjectMemberFunction { function }
            | ResolvedCandidate::StaticMemberFunction { function }
            | ResolvedCandidate::FreeFunction { function } => {
                let pointer = TargetPointer::Function { function };
                Ok(ResolvedTarget {
                    ty: pointer.ty(self.program),
                    pointer: Some(pointer),
                    eligibility: ConstexprEligibility::Constant,
                })
            }
            ResolvedCandidate::SurrogateCallFunction { signature, .. } => {
                self.type_only_target(signature, span, context, NotConstantReason::SurrogateCall)
            }
            ResolvedCandidate::FunctionPointerValue { signature } => {
                self.type_only_target(signature, span, context, NotConstantReason::PointerCall)
            }
        }
    }

    /// Step 2 of the procedure: the type is known statically but the
    /// value requires evaluation
    fn type_only_target(
        &self,
        signature: Signature,
        span: declcall_span::Span,
        context: EvaluationContext,
        reason: NotConstantReason,
    ) -> ResolveResult<ResolvedTarget> {
        match context {
            EvaluationContext::ConstantExpression => {
                Err(Diagnosis::not_constant(NotConstantError { span, reason }))
            }
            EvaluationContext::TypeOnly => Ok(ResolvedTarget {
                pointer: None,
                ty: Ty::function_pointer(signature, span),
                eligibility: ConstexprEligibility::TypeOnly,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnosis::DiagnosisKind;
    use crate::oracle::ScopeOracle;
    use crate::program_builder::build_program;
    use declcall_lexer::lex;
    use declcall_parser::{parse_expression, parse_translation_unit, Parser};

    fn program(source: &str) -> Program {
        let tokens: Vec<_> = lex(source)
            .filter_map(|t| t.ok())
            .map(|s| (s.value, s.span))
            .collect();
        let result = Parser::parse(source, tokens.into_iter(), parse_translation_unit);
        assert!(result.is_ok(), "parse errors: {:?}", result.errors);
        let built = build_program(&result.tree);
        assert!(!built.has_errors(), "declaration errors");
        built.program
    }

    fn expr(source: &str) -> SyntaxNode {
        let tokens: Vec<_> = lex(source)
            .filter_map(|t| t.ok())
            .map(|s| (s.value, s.span))
            .collect();
        let result = Parser::parse(source, tokens.into_iter(), parse_expression);
        assert!(result.is_ok(), "parse errors: {:?}", result.errors);
        result.tree
    }

    fn resolve(
        program: &Program,
        operand: &str,
        context: EvaluationContext,
    ) -> ResolveResult<ResolvedTarget> {
        let oracle = ScopeOracle::new();
        let resolver = CallTargetResolver::new(program, &oracle);
        resolver.resolve(&expr(operand), context)
    }

    fn resolve_constant(program: &Program, operand: &str) -> ResolveResult<ResolvedTarget> {
        resolve(program, operand, EvaluationContext::ConstantExpression)
    }

    #[test]
    fn test_free_function_call_resolves_to_its_pointer() {
        let program = program("int f(int);\nint f(double);");
        let target = resolve_constant(&program, "f(1)").unwrap();

        let pointer = target.pointer.unwrap();
        assert!(matches!(pointer, TargetPointer::Function { .. }));
        assert_eq!(target.ty.display(&program), "int (*)(int)");
        assert_eq!(target.eligibility, ConstexprEligibility::Constant);
    }

    #[test]
    fn test_overload_picked_by_argument_type() {
        let program = program("int f(int);\nint f(double);");
        let target = resolve_constant(&program, "f(1.5)").unwrap();
        assert_eq!(target.ty.display(&program), "int (*)(double)");
    }

    #[test]
    fn test_no_viable_overload_is_ill_formed() {
        let program = program("class C {};\nint f(C);");
        let err = resolve_constant(&program, "f(1)").unwrap_err();
        assert_eq!(err.kind(), DiagnosisKind::IllFormed);
    }

    #[test]
    fn test_ambiguous_call_is_ill_formed() {
        let program = program("int f(int, double);\nint f(double, int);");
        let err = resolve_constant(&program, "f(1, 2)").unwrap_err();
        assert_eq!(err.kind(), DiagnosisKind::IllFormed);
    }

    #[test]
    fn test_member_call_produces_dynamic_member_pointer() {
        let program = program("class B { virtual int f(int); };\nB b;");
        let target = resolve_constant(&program, "b.f(1)").unwrap();

        let pointer = target.pointer.unwrap();
        match &pointer {
            TargetPointer::Member { dispatch, .. } => {
                assert_eq!(*dispatch, Dispatch::Dynamic);
            }
            _ => panic!("expected a member pointer"),
        }
        assert_eq!(target.ty.display(&program), "int (B::*)(int)");
    }

    #[test]
    fn test_qualified_access_devirtualizes() {
        let program = program(
            "class B { virtual int f(int); };\nclass D : B { int f(int); };\nD d;",
        );
        let target = resolve_constant(&program, "d.B::f(1)").unwrap();

        let pointer = target.pointer.unwrap();
        match &pointer {
            TargetPointer::Member { class, dispatch, .. } => {
                assert_eq!(*dispatch, Dispatch::Devirtualized);
                assert_eq!(*class, program.class_by_name("B").unwrap());
            }
            _ => panic!("expected a member pointer"),
        }
    }

    #[test]
    fn test_qualified_access_to_non_virtual_stays_plain() {
        let program = program("class B { int f(int); };\nclass D : B {};\nD d;");
        let target = resolve_constant(&program, "d.B::f(1)").unwrap();

        let pointer = target.pointer.unwrap();
        assert!(!pointer.is_devirtualized());
    }

    #[test]
    fn test_qualifier_must_name_a_base() {
        let program = program("class A { int f(); };\nclass B { int f(); };\nB b;");
        let err = resolve_constant(&program, "b.A::f()").unwrap_err();
        assert_eq!(err.kind(), DiagnosisKind::IllFormed);
    }

    #[test]
    fn test_inherited_member_found_through_base() {
        let program = program("class B { int f(int); };\nclass D : B {};\nD d;");
        let target = resolve_constant(&program, "d.f(1)").unwrap();
        assert_eq!(target.ty.display(&program), "int (B::*)(int)");
    }

    #[test]
    fn test_static_member_call_produces_function_pointer() {
        let program = program("class C { static int s(int); };");
        let target = resolve_constant(&program, "C::s(1)").unwrap();

        assert!(matches!(
            target.pointer.unwrap(),
            TargetPointer::Function { .. }
        ));
        assert_eq!(target.ty.display(&program), "int (*)(int)");
    }

    #[test]
    fn test_explicit_object_member_produces_function_pointer() {
        let program = program("class C { int f(this C&, int); };\nC c;");
        let target = resolve_constant(&program, "c.f(1)").unwrap();

        assert!(matches!(
            target.pointer.unwrap(),
            TargetPointer::Function { .. }
        ));
    }

    #[test]
    fn test_arrow_access_through_pointer() {
        let program = program("class B { virtual int f(int); };\nB* p;");
        let target = resolve_constant(&program, "p->f(1)").unwrap();
        assert_eq!(target.ty.display(&program), "int (B::*)(int)");
    }

    #[test]
    fn test_constructor_call_is_ill_formed() {
        let program = program("class C { C(int); };");
        let err = resolve_constant(&program, "C(1)").unwrap_err();
        assert_eq!(err.kind(), DiagnosisKind::IllFormed);
    }

    #[test]
    fn test_destructor_call_is_ill_formed() {
        let program = program("class C { ~C(); };\nC* p;");
        let err = resolve_constant(&program, "p->~C()").unwrap_err();
        assert_eq!(err.kind(), DiagnosisKind::IllFormed);
    }

    #[test]
    fn test_builtin_operator_is_ill_formed() {
        let program = program("int x;");
        let err = resolve_constant(&program, "x + 1").unwrap_err();
        assert_eq!(err.kind(), DiagnosisKind::IllFormed);
    }

    #[test]
    fn test_synthesized_comparison_is_ill_formed() {
        let program = program("class C { bool operator==(C&); };\nC a;\nC b;");
        let err = resolve_constant(&program, "a != b").unwrap_err();
        assert_eq!(err.kind(), DiagnosisKind::IllFormed);
    }

    #[test]
    fn test_user_declared_operator_resolves_to_member() {
        let program = program("class C { int operator+(int); };\nC c;");
        let target = resolve_constant(&program, "c + 1").unwrap();
        assert_eq!(target.ty.display(&program), "int (C::*)(int)");
    }

    #[test]
    fn test_call_operator_resolves_to_member() {
        let program = program("class C { int operator()(int); };\nC c;");
        let target = resolve_constant(&program, "c(1)").unwrap();
        assert_eq!(target.ty.display(&program), "int (C::*)(int)");
    }

    #[test]
    fn test_new_and_delete_are_ill_formed() {
        let program = program("class C {};\nC* p;");
        assert_eq!(
            resolve_constant(&program, "new C()").unwrap_err().kind(),
            DiagnosisKind::IllFormed
        );
        assert_eq!(
            resolve_constant(&program, "delete p").unwrap_err().kind(),
            DiagnosisKind::IllFormed
        );
    }

    #[test]
    fn test_pointer_call_is_not_constant() {
        let program = program("int (*fp)(int);");
        let err = resolve_constant(&program, "fp(1)").unwrap_err();
        assert_eq!(err.kind(), DiagnosisKind::NotConstant);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_pointer_call_is_legal_type_only() {
        let program = program("int (*fp)(int);");
        let target = resolve(&program, "fp(1)", EvaluationContext::TypeOnly).unwrap();

        assert!(target.pointer.is_none());
        assert_eq!(target.eligibility, ConstexprEligibility::TypeOnly);
        assert_eq!(target.ty.display(&program), "int (*)(int)");
    }

    #[test]
    fn test_surrogate_call_is_not_constant() {
        let program = program("class C { operator int (*)(int)(); };\nC c;");
        let err = resolve_constant(&program, "c(1)").unwrap_err();
        assert_eq!(err.kind(), DiagnosisKind::NotConstant);
    }

    #[test]
    fn test_lambda_call_rejected_by_default() {
        let program = program("int (*fp)(int);");
        let err = resolve_constant(&program, "[]{ return fp; }()(1)").unwrap_err();
        assert_eq!(err.kind(), DiagnosisKind::IllFormed);
    }

    #[test]
    fn test_lambda_call_as_pointer_call_under_resolve_policy() {
        let program = program("int (*fp)(int);");
        let oracle = ScopeOracle::new();
        let resolver = CallTargetResolver::new(&program, &oracle).with_options(ResolverOptions {
            lambda_calls: LambdaCallPolicy::ResolveResult,
        });

        let operand = expr("[]{ return fp; }()(1)");
        let err = resolver
            .resolve(&operand, EvaluationContext::ConstantExpression)
            .unwrap_err();
        assert_eq!(err.kind(), DiagnosisKind::NotConstant);

        let target = resolver
            .resolve(&operand, EvaluationContext::TypeOnly)
            .unwrap();
        assert_eq!(target.ty.display(&program), "int (*)(int)");
    }

    #[test]
    fn test_nested_declcall_argument_is_typed_not_resolved() {
        let program = program("int f(int);\nint g(int (*)(int));");
        let target = resolve_constant(&program, "g(declcall(f(1)))").unwrap();
        assert_eq!(target.ty.display(&program), "int (*)(int (*)(int))");
    }

    #[test]
    fn test_unknown_identifier_is_ill_formed() {
        let program = program("int f(int);");
        let err = resolve_constant(&program, "g(1)").unwrap_err();
        assert_eq!(err.kind(), DiagnosisKind::IllFormed);
    }

    #[test]
    fn test_non_call_operand_is_ill_formed() {
        let program = program("int x;");
        let err = resolve_constant(&program, "x").unwrap_err();
        assert_eq!(err.kind(), DiagnosisKind::IllFormed);
    }

    #[test]
    fn test_parenthesized_operand_is_unwrapped() {
        let program = program("int f(int);");
        let target = resolve_constant(&program, "((f(1)))").unwrap();
        assert!(target.pointer.is_some());
    }

    #[test]
    fn test_variable_callee_with_call_operator() {
        let program = program(
            "class Less { bool operator()(int, int); };\nLess less;",
        );
        let target = resolve_constant(&program, "less(1, 2)").unwrap();
        assert_eq!(target.ty.display(&program), "bool (Less::*)(int, int)");
    }
}
