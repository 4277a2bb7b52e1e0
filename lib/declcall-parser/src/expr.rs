//! Expression parsing
//!
//! Parses the operand language of `declcall`: call expressions, member
//! access (qualified and unqualified), operator expressions, new/delete,
//! immediately invoked lambdas, and nested `declcall` operands.
//!
//! Precedence, low to high: equality (`==` `!=`), relational
//! (`<` `>` `<=` `>=`), three-way (`<=>`), additive, multiplicative,
//! prefix unary / `delete`, postfix (call, member access, index).

use chumsky::prelude::*;
use declcall_lexer::Token;
use declcall_span::Span;
use declcall_syntax_tree::SyntaxKind;

use crate::common::{identifier, one_of_tokens, skip_trivia, token};
use crate::event::EventSink;
use crate::ty::{emit_ty, ty_parser, TyData};

/// The name part of a member access: `f`, `B::f`, or `~B`
#[derive(Debug, Clone)]
pub struct MemberNameData {
    /// Qualifier identifier and the `::` following it, for `obj.B::f`
    pub qualifier: Option<(Span, Span)>,
    /// Present for destructor names: `p->~B()`
    pub tilde: Option<Span>,
    pub name: Span,
}

/// Raw parsed data for an expression
#[derive(Debug, Clone)]
pub enum ExprData {
    Literal(Token, Span),
    /// Identifier path: `f` or `B::s`; `rest` holds `(::, ident)` pairs
    Path { first: Span, rest: Vec<(Span, Span)> },
    Paren {
        lparen: Span,
        inner: Box<ExprData>,
        rparen: Span,
    },
    Unary {
        op: Token,
        op_span: Span,
        operand: Box<ExprData>,
    },
    Binary {
        lhs: Box<ExprData>,
        op: Token,
        op_span: Span,
        rhs: Box<ExprData>,
    },
    Call {
        callee: Box<ExprData>,
        lparen: Span,
        args: Vec<ExprData>,
        rparen: Span,
    },
    Member {
        base: Box<ExprData>,
        op: Token,
        op_span: Span,
        name: MemberNameData,
    },
    Index {
        base: Box<ExprData>,
        lbracket: Span,
        index: Box<ExprData>,
        rbracket: Span,
    },
    New {
        kw: Span,
        ty: TyData,
        args: Option<(Span, Vec<ExprData>, Span)>,
    },
    Delete {
        kw: Span,
        operand: Box<ExprData>,
    },
    Declcall {
        kw: Span,
        lparen: Span,
        operand: Box<ExprData>,
        rparen: Span,
    },
    /// `[]{ return expr; }` - the minimal lambda form needed for the
    /// immediately-invoked-lambda operand case
    Lambda {
        lbracket: Span,
        rbracket: Span,
        lbrace: Span,
        return_kw: Span,
        result: Box<ExprData>,
        semicolon: Span,
        rbrace: Span,
    },
}

/// A single postfix operation applied to a primary expression
#[derive(Debug, Clone)]
enum PostfixData {
    Call(Span, Vec<ExprData>, Span),
    Member(Token, Span, MemberNameData),
    Index(Span, ExprData, Span),
}

fn apply_postfix(base: ExprData, postfix: PostfixData) -> ExprData {
    match postfix {
        PostfixData::Call(lparen, args, rparen) => ExprData::Call {
            callee: Box::new(base),
            lparen,
            args,
            rparen,
        },
        PostfixData::Member(op, op_span, name) => ExprData::Member {
            base: Box::new(base),
            op,
            op_span,
            name,
        },
        PostfixData::Index(lbracket, index, rbracket) => ExprData::Index {
            base: Box::new(base),
            lbracket,
            index: Box::new(index),
            rbracket,
        },
    }
}

fn fold_binary(lhs: ExprData, ((op, op_span), rhs): ((Token, Span), ExprData)) -> ExprData {
    ExprData::Binary {
        lhs: Box::new(lhs),
        op,
        op_span,
        rhs: Box::new(rhs),
    }
}

/// Parser for expressions
pub fn expr_parser() -> impl Parser<Token, ExprData, Error = Simple<Token>> + Clone {
    recursive(|expr| {
        let literal = one_of_tokens(|t| {
            matches!(
                t,
                Token::Integer | Token::Float | Token::String | Token::Boolean
            )
        })
        .map(|(tok, span)| ExprData::Literal(tok, span));

        let path = identifier()
            .then(token(Token::ColonColon).then(identifier()).repeated())
            .map(|(first, rest)| ExprData::Path { first, rest });

        let paren = token(Token::LParen)
            .then(expr.clone())
            .then(token(Token::RParen))
            .map(|((lparen, inner), rparen)| ExprData::Paren {
                lparen,
                inner: Box::new(inner),
                rparen,
            });

        let declcall = token(Token::Declcall)
            .then(token(Token::LParen))
            .then(expr.clone())
            .then(token(Token::RParen))
            .map(|(((kw, lparen), operand), rparen)| ExprData::Declcall {
                kw,
                lparen,
                operand: Box::new(operand),
                rparen,
            });

        let args = expr.clone().separated_by(token(Token::Comma));

        let new_expr = token(Token::New)
            .then(ty_parser())
            .then(
                token(Token::LParen)
                    .then(args.clone())
                    .then(token(Token::RParen))
                    .map(|((l, a), r)| (l, a, r))
                    .or_not(),
            )
            .map(|((kw, ty), args)| ExprData::New { kw, ty, args });

        let lambda = token(Token::LBracket)
            .then(token(Token::RBracket))
            .then(token(Token::LBrace))
            .then(token(Token::Return))
            .then(expr.clone())
            .then(token(Token::Semicolon))
            .then(token(Token::RBrace))
            .map(
                |((((((lbracket, rbracket), lbrace), return_kw), result), semicolon), rbrace)| {
                    ExprData::Lambda {
                        lbracket,
                        rbracket,
                        lbrace,
                        return_kw,
                        result: Box::new(result),
                        semicolon,
                        rbrace,
                    }
                },
            );

        let primary = declcall
            .or(new_expr)
            .or(lambda)
            .or(literal)
            .or(path)
            .or(paren);

        let member_name = token(Token::Tilde)
            .then(identifier())
            .map(|(tilde, name)| MemberNameData {
                qualifier: None,
                tilde: Some(tilde),
                name,
            })
            .or(identifier()
                .then(token(Token::ColonColon).then(identifier()).or_not())
                .map(|(first, rest)| match rest {
                    Some((colon_colon, name)) => MemberNameData {
                        qualifier: Some((first, colon_colon)),
                        tilde: None,
                        name,
                    },
                    None => MemberNameData {
                        qualifier: None,
                        tilde: None,
                        name: first,
                    },
                }));

        let call_postfix = token(Token::LParen)
            .then(args)
            .then(token(Token::RParen))
            .map(|((lparen, args), rparen)| PostfixData::Call(lparen, args, rparen));

        let member_postfix = one_of_tokens(|t| matches!(t, Token::Dot | Token::Arrow))
            .then(member_name)
            .map(|((op, op_span), name)| PostfixData::Member(op, op_span, name));

        let index_postfix = token(Token::LBracket)
            .then(expr.clone())
            .then(token(Token::RBracket))
            .map(|((lbracket, index), rbracket)| PostfixData::Index(lbracket, index, rbracket));

        let postfix = primary
            .then(call_postfix.or(member_postfix).or(index_postfix).repeated())
            .foldl(apply_postfix);

        let unary = recursive(|unary| {
            let prefix = one_of_tokens(|t| {
                matches!(
                    t,
                    Token::Minus
                        | Token::Plus
                        | Token::Bang
                        | Token::Tilde
                        | Token::Star
                        | Token::Amp
                )
            })
            .then(unary.clone())
            .map(|((op, op_span), operand)| ExprData::Unary {
                op,
                op_span,
                operand: Box::new(operand),
            });

            let delete = token(Token::Delete)
                .then(unary)
                .map(|(kw, operand)| ExprData::Delete {
                    kw,
                    operand: Box::new(operand),
                });

            prefix.or(delete).or(postfix)
        });

        let product = unary
            .clone()
            .then(
                one_of_tokens(|t| matches!(t, Token::Star | Token::Slash | Token::Percent))
                    .then(unary)
                    .repeated(),
            )
            .foldl(fold_binary);

        let sum = product
            .clone()
            .then(
                one_of_tokens(|t| matches!(t, Token::Plus | Token::Minus))
                    .then(product)
                    .repeated(),
            )
            .foldl(fold_binary);

        let three_way = sum
            .clone()
            .then(
                one_of_tokens(|t| matches!(t, Token::Spaceship))
                    .then(sum)
                    .repeated(),
            )
            .foldl(fold_binary);

        let relational = three_way
            .clone()
            .then(
                one_of_tokens(|t| {
                    matches!(
                        t,
                        Token::Less | Token::Greater | Token::LessEquals | Token::GreaterEquals
                    )
                })
                .then(three_way)
                .repeated(),
            )
            .foldl(fold_binary);

        relational
            .clone()
            .then(
                one_of_tokens(|t| matches!(t, Token::EqualsEquals | Token::BangEquals))
                    .then(relational)
                    .repeated(),
            )
            .foldl(fold_binary)
    })
}

/// Emit events for an expression
pub fn emit_expr(sink: &mut EventSink, expr: &ExprData) {
    match expr {
        ExprData::Literal(tok, span) => {
            sink.start_node(SyntaxKind::ExprLiteral);
            sink.add_token(SyntaxKind::from(tok.clone()), span.clone());
            sink.finish_node();
        }
        ExprData::Path { first, rest } => {
            sink.start_node(SyntaxKind::ExprPath);
            sink.add_token(SyntaxKind::Identifier, first.clone());
            for (colon_colon, name) in rest {
                sink.add_token(SyntaxKind::ColonColon, colon_colon.clone());
                sink.add_token(SyntaxKind::Identifier, name.clone());
            }
            sink.finish_node();
        }
        ExprData::Paren {
            lparen,
            inner,
            rparen,
        } => {
            sink.start_node(SyntaxKind::ExprParen);
            sink.add_token(SyntaxKind::LParen, lparen.clone());
            emit_expr(sink, inner);
            sink.add_token(SyntaxKind::RParen, rparen.clone());
            sink.finish_node();
        }
        ExprData::Unary {
            op,
            op_span,
            operand,
        } => {
            sink.start_node(SyntaxKind::ExprUnary);
            sink.add_token(SyntaxKind::from(op.clone()), op_span.clone());
            emit_expr(sink, operand);
            sink.finish_node();
        }
        ExprData::Binary {
            lhs,
            op,
            op_span,
            rhs,
        } => {
            sink.start_node(SyntaxKind::ExprBinary);
            emit_expr(sink, lhs);
            sink.add_token(SyntaxKind::from(op.clone()), op_span.clone());
            emit_expr(sink, rhs);
            sink.finish_node();
        }
        ExprData::Call {
            callee,
            lparen,
            args,
            rparen,
        } => {
            sink.start_node(SyntaxKind::ExprCall);
            emit_expr(sink, callee);
            emit_argument_list(sink, lparen, args, rparen);
            sink.finish_node();
        }
        ExprData::Member {
            base,
            op,
            op_span,
            name,
        } => {
            sink.start_node(SyntaxKind::ExprMember);
            emit_expr(sink, base);
            sink.add_token(SyntaxKind::from(op.clone()), op_span.clone());
            sink.start_node(SyntaxKind::MemberName);
            if let Some((qualifier, colon_colon)) = &name.qualifier {
                sink.add_token(SyntaxKind::Identifier, qualifier.clone());
                sink.add_token(SyntaxKind::ColonColon, colon_colon.clone());
            }
            if let Some(tilde) = &name.tilde {
                sink.add_token(SyntaxKind::Tilde, tilde.clone());
            }
            sink.add_token(SyntaxKind::Identifier, name.name.clone());
            sink.finish_node();
            sink.finish_node();
        }
        ExprData::Index {
            base,
            lbracket,
            index,
            rbracket,
        } => {
            sink.start_node(SyntaxKind::ExprIndex);
            emit_expr(sink, base);
            sink.add_token(SyntaxKind::LBracket, lbracket.clone());
            emit_expr(sink, index);
            sink.add_token(SyntaxKind::RBracket, rbracket.clone());
            sink.finish_node();
        }
        ExprData::New { kw, ty, args } => {
            sink.start_node(SyntaxKind::ExprNew);
            sink.add_token(SyntaxKind::New, kw.clone());
            emit_ty(sink, ty);
            if let Some((lparen, args, rparen)) = args {
                emit_argument_list(sink, lparen, args, rparen);
            }
            sink.finish_node();
        }
        ExprData::Delete { kw, operand } => {
            sink.start_node(SyntaxKind::ExprDelete);
            sink.add_token(SyntaxKind::Delete, kw.clone());
            emit_expr(sink, operand);
            sink.finish_node();
        }
        ExprData::Declcall {
            kw,
            lparen,
            operand,
            rparen,
        } => {
            sink.start_node(SyntaxKind::ExprDeclcall);
            sink.add_token(SyntaxKind::Declcall, kw.clone());
            sink.add_token(SyntaxKind::LParen, lparen.clone());
            emit_expr(sink, operand);
            sink.add_token(SyntaxKind::RParen, rparen.clone());
            sink.finish_node();
        }
        ExprData::Lambda {
            lbracket,
            rbracket,
            lbrace,
            return_kw,
            result,
            semicolon,
            rbrace,
        } => {
            sink.start_node(SyntaxKind::ExprLambda);
            sink.add_token(SyntaxKind::LBracket, lbracket.clone());
            sink.add_token(SyntaxKind::RBracket, rbracket.clone());
            sink.add_token(SyntaxKind::LBrace, lbrace.clone());
            sink.add_token(SyntaxKind::Return, return_kw.clone());
            emit_expr(sink, result);
            sink.add_token(SyntaxKind::Semicolon, semicolon.clone());
            sink.add_token(SyntaxKind::RBrace, rbrace.clone());
            sink.finish_node();
        }
    }
}

fn emit_argument_list(sink: &mut EventSink, lparen: &Span, args: &[ExprData], rparen: &Span) {
    sink.start_node(SyntaxKind::ArgumentList);
    sink.add_token(SyntaxKind::LParen, lparen.clone());
    for arg in args {
        sink.start_node(SyntaxKind::Argument);
        emit_expr(sink, arg);
        sink.finish_node();
    }
    sink.add_token(SyntaxKind::RParen, rparen.clone());
    sink.finish_node();
}

/// Parse an expression and emit events
pub fn parse_expression<I>(source: &str, tokens: I, sink: &mut EventSink)
where
    I: Iterator<Item = (Token, Span)> + Clone,
{
    let end_pos = source.len();
    let stream = chumsky::Stream::from_iter(end_pos..end_pos, tokens);

    let parser = expr_parser()
        .then_ignore(skip_trivia())
        .then_ignore(end());

    match parser.parse(stream) {
        Ok(data) => emit_expr(sink, &data),
        Err(errors) => {
            for error in errors {
                let span = error.span();
                sink.error_at(format!("Parse error: {:?}", error), span);
            }
        }
    }
}
