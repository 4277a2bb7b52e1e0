//! Declaration parsing
//!
//! Parses the declaration surface of the modeling language: class
//! declarations with members (methods, constructors, destructors,
//! operator overloads, conversion functions), free function declarations,
//! out-of-line member definitions, and variable declarations (including
//! function-pointer variables).
//!
//! Bodies carry no statements; an empty `{ }` body marks a function as
//! having a definition, which is what pure-virtual out-of-line
//! definitions need.

use chumsky::prelude::*;
use declcall_lexer::Token;
use declcall_span::Span;
use declcall_syntax_tree::SyntaxKind;

use crate::common::{identifier, one_of_tokens, skip_trivia, token};
use crate::event::EventSink;
use crate::ty::{emit_ty, ty_parser, TyData};

/// A single parameter: `int`, `B b`, or `this B self`
#[derive(Debug, Clone)]
pub struct ParamData {
    pub this_kw: Option<Span>,
    pub ty: TyData,
    pub name: Option<Span>,
}

/// A parenthesized parameter list
#[derive(Debug, Clone)]
pub struct ParamListData {
    pub lparen: Span,
    pub params: Vec<ParamData>,
    pub rparen: Span,
}

/// The name of a method: plain identifier or `operator` symbol
#[derive(Debug, Clone)]
pub enum MethodNameData {
    Ident(Span),
    Operator {
        kw: Span,
        symbol: Vec<(Token, Span)>,
        spelling: String,
    },
}

/// How a function declaration ends: `;` or an empty `{ }` body
#[derive(Debug, Clone)]
pub enum TerminatorData {
    Semicolon(Span),
    Body(Span, Span),
}

/// Raw parsed data for a class member
#[derive(Debug, Clone)]
pub enum MemberData {
    Method {
        virtual_kw: Option<Span>,
        static_kw: Option<Span>,
        ret: TyData,
        name: MethodNameData,
        params: ParamListData,
        const_kw: Option<Span>,
        /// `= 0` pure specifier: spans of `=` and the literal
        pure: Option<(Span, Span)>,
        terminator: TerminatorData,
    },
    Constructor {
        name: Span,
        params: ParamListData,
        semicolon: Span,
    },
    Destructor {
        virtual_kw: Option<Span>,
        tilde: Span,
        name: Span,
        semicolon: Span,
    },
    Conversion {
        kw: Span,
        ty: TyData,
        semicolon: Span,
    },
}

/// A base class in a base clause
#[derive(Debug, Clone)]
pub struct BaseData {
    pub access: Option<(Token, Span)>,
    pub name: Span,
}

/// Raw parsed data for a class declaration
#[derive(Debug, Clone)]
pub struct ClassData {
    pub kw: (Token, Span),
    pub name: Span,
    pub colon: Option<Span>,
    pub bases: Vec<BaseData>,
    pub lbrace: Span,
    pub members: Vec<MemberData>,
    pub rbrace: Span,
    pub semicolon: Span,
}

/// Raw parsed data for a free function or out-of-line definition
#[derive(Debug, Clone)]
pub struct FunctionData {
    pub ret: TyData,
    /// `B::` qualifier for out-of-line member definitions
    pub qualifier: Option<(Span, Span)>,
    pub name: Span,
    pub params: ParamListData,
    pub terminator: TerminatorData,
}

/// Raw parsed data for a top-level declaration
#[derive(Debug, Clone)]
pub enum DeclData {
    Class(ClassData),
    Function(FunctionData),
    Variable {
        ty: TyData,
        name: Span,
        semicolon: Span,
    },
    /// `int (*fp)(int);`
    PointerVariable {
        ret: TyData,
        star: Span,
        name: Span,
        params: Vec<TyData>,
        semicolon: Span,
    },
}

fn param_list_parser() -> impl Parser<Token, ParamListData, Error = Simple<Token>> + Clone {
    let param = token(Token::This)
        .or_not()
        .then(ty_parser())
        .then(identifier().or_not())
        .map(|((this_kw, ty), name)| ParamData { this_kw, ty, name });

    token(Token::LParen)
        .then(param.separated_by(token(Token::Comma)))
        .then(token(Token::RParen))
        .map(|((lparen, params), rparen)| ParamListData {
            lparen,
            params,
            rparen,
        })
}

fn operator_symbol_parser(
) -> impl Parser<Token, (Vec<(Token, Span)>, String), Error = Simple<Token>> + Clone {
    let call_op = token(Token::LParen)
        .then(token(Token::RParen))
        .map(|(l, r)| {
            (
                vec![(Token::LParen, l), (Token::RParen, r)],
                "()".to_string(),
            )
        });

    let index_op = token(Token::LBracket)
        .then(token(Token::RBracket))
        .map(|(l, r)| {
            (
                vec![(Token::LBracket, l), (Token::RBracket, r)],
                "[]".to_string(),
            )
        });

    let single = one_of_tokens(|t| {
        t.operator_spelling().is_some() && !matches!(t, Token::LParen | Token::LBracket)
    })
    .map(|(tok, span)| {
        let spelling = tok.operator_spelling().unwrap_or_default().to_string();
        (vec![(tok, span)], spelling)
    });

    call_op.or(index_op).or(single)
}

fn terminator_parser() -> impl Parser<Token, TerminatorData, Error = Simple<Token>> + Clone {
    token(Token::Semicolon)
        .map(TerminatorData::Semicolon)
        .or(token(Token::LBrace)
            .then(token(Token::RBrace))
            .map(|(l, r)| TerminatorData::Body(l, r)))
}

fn member_parser() -> impl Parser<Token, MemberData, Error = Simple<Token>> + Clone {
    let destructor = token(Token::Virtual)
        .or_not()
        .then(token(Token::Tilde))
        .then(identifier())
        .then_ignore(token(Token::LParen))
        .then_ignore(token(Token::RParen))
        .then(token(Token::Semicolon))
        .map(
            |(((virtual_kw, tilde), name), semicolon)| MemberData::Destructor {
                virtual_kw,
                tilde,
                name,
                semicolon,
            },
        );

    let conversion = token(Token::Operator)
        .then(ty_parser())
        .then_ignore(token(Token::LParen))
        .then_ignore(token(Token::RParen))
        .then(token(Token::Semicolon))
        .map(|((kw, ty), semicolon)| MemberData::Conversion { kw, ty, semicolon });

    let method_name = identifier().map(MethodNameData::Ident).or(token(
        Token::Operator,
    )
    .then(operator_symbol_parser())
    .map(|(kw, (symbol, spelling))| MethodNameData::Operator {
        kw,
        symbol,
        spelling,
    }));

    let pure = token(Token::Equals)
        .then(one_of_tokens(|t| matches!(t, Token::Integer)))
        .map(|(eq, (_tok, zero))| (eq, zero));

    let method = token(Token::Virtual)
        .or_not()
        .then(token(Token::Static).or_not())
        .then(ty_parser())
        .then(method_name)
        .then(param_list_parser())
        .then(token(Token::Const).or_not())
        .then(pure.or_not())
        .then(terminator_parser())
        .map(
            |(((((((virtual_kw, static_kw), ret), name), params), const_kw), pure), terminator)| {
                MemberData::Method {
                    virtual_kw,
                    static_kw,
                    ret,
                    name,
                    params,
                    const_kw,
                    pure,
                    terminator,
                }
            },
        );

    let constructor = identifier()
        .then(param_list_parser())
        .then(token(Token::Semicolon))
        .map(|((name, params), semicolon)| MemberData::Constructor {
            name,
            params,
            semicolon,
        });

    destructor.or(conversion).or(method).or(constructor)
}

fn class_parser() -> impl Parser<Token, ClassData, Error = Simple<Token>> + Clone {
    let base = one_of_tokens(|t| matches!(t, Token::Public | Token::Private | Token::Protected))
        .or_not()
        .then(identifier())
        .map(|(access, name)| BaseData { access, name });

    let base_clause = token(Token::Colon)
        .then(base.separated_by(token(Token::Comma)).at_least(1))
        .or_not();

    one_of_tokens(|t| matches!(t, Token::Class | Token::Struct))
        .then(identifier())
        .then(base_clause)
        .then(token(Token::LBrace))
        .then(member_parser().repeated())
        .then(token(Token::RBrace))
        .then(token(Token::Semicolon))
        .map(
            |((((((kw, name), bases), lbrace), members), rbrace), semicolon)| {
                let (colon, bases) = match bases {
                    Some((colon, bases)) => (Some(colon), bases),
                    None => (None, Vec::new()),
                };
                ClassData {
                    kw,
                    name,
                    colon,
                    bases,
                    lbrace,
                    members,
                    rbrace,
                    semicolon,
                }
            },
        )
}

fn function_parser() -> impl Parser<Token, FunctionData, Error = Simple<Token>> + Clone {
    let qualified_name = identifier().then(token(Token::ColonColon).then(identifier()).or_not());

    ty_parser()
        .then(qualified_name)
        .then(param_list_parser())
        .then(terminator_parser())
        .map(|(((ret, (first, rest)), params), terminator)| {
            let (qualifier, name) = match rest {
                Some((colon_colon, name)) => (Some((first, colon_colon)), name),
                None => (None, first),
            };
            FunctionData {
                ret,
                qualifier,
                name,
                params,
                terminator,
            }
        })
}

fn declaration_parser() -> impl Parser<Token, DeclData, Error = Simple<Token>> + Clone {
    let pointer_variable = ty_parser()
        .then_ignore(token(Token::LParen))
        .then(token(Token::Star))
        .then(identifier())
        .then_ignore(token(Token::RParen))
        .then_ignore(token(Token::LParen))
        .then(ty_parser().separated_by(token(Token::Comma)))
        .then_ignore(token(Token::RParen))
        .then(token(Token::Semicolon))
        .map(
            |((((ret, star), name), params), semicolon)| DeclData::PointerVariable {
                ret,
                star,
                name,
                params,
                semicolon,
            },
        );

    let variable = ty_parser()
        .then(identifier())
        .then(token(Token::Semicolon))
        .map(|((ty, name), semicolon)| DeclData::Variable {
            ty,
            name,
            semicolon,
        });

    class_parser()
        .map(DeclData::Class)
        .or(function_parser().map(DeclData::Function))
        .or(pointer_variable)
        .or(variable)
}

/// Parser for a whole translation unit
pub fn translation_unit_parser() -> impl Parser<Token, Vec<DeclData>, Error = Simple<Token>> {
    declaration_parser()
        .repeated()
        .then_ignore(skip_trivia())
        .then_ignore(end())
}

// ===== Emission =====

fn emit_name(sink: &mut EventSink, span: &Span) {
    sink.start_node(SyntaxKind::Name);
    sink.add_token(SyntaxKind::Identifier, span.clone());
    sink.finish_node();
}

fn emit_param_list(sink: &mut EventSink, params: &ParamListData) {
    sink.start_node(SyntaxKind::ParameterList);
    sink.add_token(SyntaxKind::LParen, params.lparen.clone());
    for param in &params.params {
        sink.start_node(SyntaxKind::Parameter);
        if let Some(this_kw) = &param.this_kw {
            sink.add_token(SyntaxKind::This, this_kw.clone());
        }
        emit_ty(sink, &param.ty);
        if let Some(name) = &param.name {
            emit_name(sink, name);
        }
        sink.finish_node();
    }
    sink.add_token(SyntaxKind::RParen, params.rparen.clone());
    sink.finish_node();
}

fn emit_terminator(sink: &mut EventSink, terminator: &TerminatorData) {
    match terminator {
        TerminatorData::Semicolon(span) => sink.add_token(SyntaxKind::Semicolon, span.clone()),
        TerminatorData::Body(lbrace, rbrace) => {
            sink.start_node(SyntaxKind::FunctionBody);
            sink.add_token(SyntaxKind::LBrace, lbrace.clone());
            sink.add_token(SyntaxKind::RBrace, rbrace.clone());
            sink.finish_node();
        }
    }
}

fn emit_member(sink: &mut EventSink, member: &MemberData) {
    match member {
        MemberData::Method {
            virtual_kw,
            static_kw,
            ret,
            name,
            params,
            const_kw,
            pure,
            terminator,
        } => {
            sink.start_node(SyntaxKind::MethodDeclaration);
            if let Some(span) = virtual_kw {
                sink.add_token(SyntaxKind::Virtual, span.clone());
            }
            if let Some(span) = static_kw {
                sink.add_token(SyntaxKind::Static, span.clone());
            }
            emit_ty(sink, ret);
            match name {
                MethodNameData::Ident(span) => emit_name(sink, span),
                MethodNameData::Operator { kw, symbol, .. } => {
                    sink.start_node(SyntaxKind::OperatorName);
                    sink.add_token(SyntaxKind::Operator, kw.clone());
                    for (tok, span) in symbol {
                        sink.add_token(SyntaxKind::from(tok.clone()), span.clone());
                    }
                    sink.finish_node();
                }
            }
            emit_param_list(sink, params);
            if let Some(span) = const_kw {
                sink.add_token(SyntaxKind::Const, span.clone());
            }
            if let Some((eq, zero)) = pure {
                sink.start_node(SyntaxKind::PureSpecifier);
                sink.add_token(SyntaxKind::Equals, eq.clone());
                sink.add_token(SyntaxKind::Integer, zero.clone());
                sink.finish_node();
            }
            emit_terminator(sink, terminator);
            sink.finish_node();
        }
        MemberData::Constructor {
            name,
            params,
            semicolon,
        } => {
            sink.start_node(SyntaxKind::ConstructorDeclaration);
            emit_name(sink, name);
            emit_param_list(sink, params);
            sink.add_token(SyntaxKind::Semicolon, semicolon.clone());
            sink.finish_node();
        }
        MemberData::Destructor {
            virtual_kw,
            tilde,
            name,
            semicolon,
        } => {
            sink.start_node(SyntaxKind::DestructorDeclaration);
            if let Some(span) = virtual_kw {
                sink.add_token(SyntaxKind::Virtual, span.clone());
            }
            sink.add_token(SyntaxKind::Tilde, tilde.clone());
            emit_name(sink, name);
            sink.add_token(SyntaxKind::Semicolon, semicolon.clone());
            sink.finish_node();
        }
        MemberData::Conversion { kw, ty, semicolon } => {
            sink.start_node(SyntaxKind::ConversionDeclaration);
            sink.add_token(SyntaxKind::Operator, kw.clone());
            emit_ty(sink, ty);
            sink.add_token(SyntaxKind::Semicolon, semicolon.clone());
            sink.finish_node();
        }
    }
}

fn emit_declaration(sink: &mut EventSink, decl: &DeclData) {
    match decl {
        DeclData::Class(class) => {
            sink.start_node(SyntaxKind::ClassDeclaration);
            sink.add_token(SyntaxKind::from(class.kw.0.clone()), class.kw.1.clone());
            emit_name(sink, &class.name);
            if let Some(colon) = &class.colon {
                sink.start_node(SyntaxKind::BaseClause);
                sink.add_token(SyntaxKind::Colon, colon.clone());
                for base in &class.bases {
                    sink.start_node(SyntaxKind::BaseSpecifier);
                    if let Some((tok, span)) = &base.access {
                        sink.add_token(SyntaxKind::from(tok.clone()), span.clone());
                    }
                    emit_name(sink, &base.name);
                    sink.finish_node();
                }
                sink.finish_node();
            }
            sink.start_node(SyntaxKind::ClassBody);
            sink.add_token(SyntaxKind::LBrace, class.lbrace.clone());
            for member in &class.members {
                emit_member(sink, member);
            }
            sink.add_token(SyntaxKind::RBrace, class.rbrace.clone());
            sink.finish_node();
            sink.add_token(SyntaxKind::Semicolon, class.semicolon.clone());
            sink.finish_node();
        }
        DeclData::Function(function) => {
            sink.start_node(SyntaxKind::FunctionDeclaration);
            emit_ty(sink, &function.ret);
            match &function.qualifier {
                Some((qualifier, colon_colon)) => {
                    sink.start_node(SyntaxKind::QualifiedName);
                    sink.add_token(SyntaxKind::Identifier, qualifier.clone());
                    sink.add_token(SyntaxKind::ColonColon, colon_colon.clone());
                    sink.add_token(SyntaxKind::Identifier, function.name.clone());
                    sink.finish_node();
                }
                None => emit_name(sink, &function.name),
            }
            emit_param_list(sink, &function.params);
            emit_terminator(sink, &function.terminator);
            sink.finish_node();
        }
        DeclData::Variable {
            ty,
            name,
            semicolon,
        } => {
            sink.start_node(SyntaxKind::VariableDeclaration);
            emit_ty(sink, ty);
            emit_name(sink, name);
            sink.add_token(SyntaxKind::Semicolon, semicolon.clone());
            sink.finish_node();
        }
        DeclData::PointerVariable {
            ret,
            star,
            name,
            params,
            semicolon,
        } => {
            // Emitted as a VariableDeclaration whose type is the
            // function-pointer type spelled by the declarator.
            sink.start_node(SyntaxKind::VariableDeclaration);
            sink.start_node(SyntaxKind::TyFunctionPointer);
            emit_ty(sink, ret);
            sink.add_token(SyntaxKind::Star, star.clone());
            for param in params {
                emit_ty(sink, param);
            }
            sink.finish_node();
            emit_name(sink, name);
            sink.add_token(SyntaxKind::Semicolon, semicolon.clone());
            sink.finish_node();
        }
    }
}

/// Parse a translation unit and emit events
pub fn parse_translation_unit<I>(source: &str, tokens: I, sink: &mut EventSink)
where
    I: Iterator<Item = (Token, Span)> + Clone,
{
    let end_pos = source.len();
    let stream = chumsky::Stream::from_iter(end_pos..end_pos, tokens);

    match translation_unit_parser().parse(stream) {
        Ok(decls) => {
            sink.start_node(SyntaxKind::TranslationUnit);
            for decl in &decls {
                emit_declaration(sink, decl);
            }
            sink.finish_node();
        }
        Err(errors) => {
            for error in errors {
                let span = error.span();
                sink.error_at(format!("Parse error: {:?}", error), span);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TreeBuilder;
    use declcall_lexer::lex;
    use declcall_syntax_tree::SyntaxNode;

    fn parse(source: &str) -> SyntaxNode {
        let tokens: Vec<_> = lex(source)
            .filter_map(|t| t.ok())
            .map(|s| (s.value, s.span))
            .collect();

        let mut sink = EventSink::new();
        parse_translation_unit(source, tokens.into_iter(), &mut sink);

        let errors: Vec<_> = sink
            .events()
            .iter()
            .filter(|e| matches!(e, crate::event::Event::Error { .. }))
            .collect();
        assert!(errors.is_empty(), "parse errors: {:?}", errors);

        TreeBuilder::new(source, sink.into_events()).build()
    }

    #[test]
    fn test_free_function() {
        let tree = parse("int add(int, int);");
        assert_eq!(tree.kind(), SyntaxKind::TranslationUnit);

        let decl = tree.children().next().unwrap();
        assert_eq!(decl.kind(), SyntaxKind::FunctionDeclaration);
    }

    #[test]
    fn test_class_with_virtual_method() {
        let tree = parse("class B { virtual int f(int); };");
        let class = tree.children().next().unwrap();
        assert_eq!(class.kind(), SyntaxKind::ClassDeclaration);

        let body = class
            .children()
            .find(|c| c.kind() == SyntaxKind::ClassBody)
            .unwrap();
        let method = body.children().next().unwrap();
        assert_eq!(method.kind(), SyntaxKind::MethodDeclaration);
        assert!(method
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .any(|t| t.kind() == SyntaxKind::Virtual));
    }

    #[test]
    fn test_base_clause() {
        let tree = parse("class B { }; class D : public B { };");
        let derived = tree.children().nth(1).unwrap();
        let base_clause = derived
            .children()
            .find(|c| c.kind() == SyntaxKind::BaseClause)
            .unwrap();
        assert_eq!(
            base_clause
                .children()
                .filter(|c| c.kind() == SyntaxKind::BaseSpecifier)
                .count(),
            1
        );
    }

    #[test]
    fn test_constructor_and_destructor() {
        let tree = parse("class B { B(int); virtual ~B(); };");
        let class = tree.children().next().unwrap();
        let body = class
            .children()
            .find(|c| c.kind() == SyntaxKind::ClassBody)
            .unwrap();
        let kinds: Vec<_> = body.children().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::ConstructorDeclaration,
                SyntaxKind::DestructorDeclaration
            ]
        );
    }

    #[test]
    fn test_pure_virtual_with_out_of_line_definition() {
        let tree = parse("class B { virtual int pv(int) = 0; };\nint B::pv(int) { }");
        let function = tree.children().nth(1).unwrap();
        assert_eq!(function.kind(), SyntaxKind::FunctionDeclaration);
        assert!(function
            .children()
            .any(|c| c.kind() == SyntaxKind::QualifiedName));
        assert!(function
            .children()
            .any(|c| c.kind() == SyntaxKind::FunctionBody));
    }

    #[test]
    fn test_operator_overload() {
        let tree = parse("class B { int operator+(int); bool operator==(B); };");
        let class = tree.children().next().unwrap();
        let body = class
            .children()
            .find(|c| c.kind() == SyntaxKind::ClassBody)
            .unwrap();
        for method in body.children() {
            assert_eq!(method.kind(), SyntaxKind::MethodDeclaration);
            assert!(method
                .children()
                .any(|c| c.kind() == SyntaxKind::OperatorName));
        }
    }

    #[test]
    fn test_call_operator() {
        let tree = parse("class F { int operator()(int); };");
        let class = tree.children().next().unwrap();
        let body = class
            .children()
            .find(|c| c.kind() == SyntaxKind::ClassBody)
            .unwrap();
        let method = body.children().next().unwrap();
        assert_eq!(method.kind(), SyntaxKind::MethodDeclaration);
    }

    #[test]
    fn test_conversion_to_function_pointer() {
        let tree = parse("class S { operator int(*)(int)(); };");
        let class = tree.children().next().unwrap();
        let body = class
            .children()
            .find(|c| c.kind() == SyntaxKind::ClassBody)
            .unwrap();
        let conversion = body.children().next().unwrap();
        assert_eq!(conversion.kind(), SyntaxKind::ConversionDeclaration);
        assert!(conversion
            .children()
            .any(|c| c.kind() == SyntaxKind::TyFunctionPointer));
    }

    #[test]
    fn test_explicit_object_parameter() {
        let tree = parse("class B { int ex(this B self, int); };");
        let class = tree.children().next().unwrap();
        let body = class
            .children()
            .find(|c| c.kind() == SyntaxKind::ClassBody)
            .unwrap();
        let method = body.children().next().unwrap();
        let param_list = method
            .children()
            .find(|c| c.kind() == SyntaxKind::ParameterList)
            .unwrap();
        let first_param = param_list.children().next().unwrap();
        assert!(first_param
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .any(|t| t.kind() == SyntaxKind::This));
    }

    #[test]
    fn test_function_pointer_variable() {
        let tree = parse("int (*fp)(int);");
        let decl = tree.children().next().unwrap();
        assert_eq!(decl.kind(), SyntaxKind::VariableDeclaration);
        assert!(decl
            .children()
            .any(|c| c.kind() == SyntaxKind::TyFunctionPointer));
    }

    #[test]
    fn test_object_variable() {
        let tree = parse("class B { }; B b;");
        let var = tree.children().nth(1).unwrap();
        assert_eq!(var.kind(), SyntaxKind::VariableDeclaration);
    }

    #[test]
    fn test_overload_set() {
        let tree = parse("int f(int); int f(double);");
        assert_eq!(tree.children().count(), 2);
    }
}
