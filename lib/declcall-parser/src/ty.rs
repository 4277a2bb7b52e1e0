//! Type parsing
//!
//! Types in the modeling language are a restricted C++ subset:
//! - named types with pointer/reference suffixes: `int`, `const char*`, `B&`
//! - function-pointer types: `int(*)(int, double)`
//!
//! Builtin type names (`void`, `int`, `bool`, ...) lex as identifiers; the
//! program builder gives them meaning.

use chumsky::prelude::*;
use declcall_lexer::Token;
use declcall_span::Span;
use declcall_syntax_tree::SyntaxKind;

use crate::common::{identifier, one_of_tokens, token};
use crate::event::EventSink;

/// Raw parsed data for a type
#[derive(Debug, Clone)]
pub struct TyData {
    pub const_kw: Option<Span>,
    /// The base type name (identifier span)
    pub base: Span,
    /// Pointer (`*`) and reference (`&`) suffixes, in source order
    pub suffixes: Vec<(Token, Span)>,
    /// Present for function-pointer types; `base` is then the return type
    pub fnptr: Option<FnPtrData>,
}

/// The `(*)(params)` tail of a function-pointer type
#[derive(Debug, Clone)]
pub struct FnPtrData {
    pub star: Span,
    pub params: Vec<TyData>,
}

/// Parser for types
pub fn ty_parser() -> impl Parser<Token, TyData, Error = Simple<Token>> + Clone {
    recursive(|ty| {
        let suffix = one_of_tokens(|t| matches!(t, Token::Star | Token::Amp));

        let named = token(Token::Const)
            .or_not()
            .then(identifier())
            .then(suffix.repeated());

        let fnptr_tail = token(Token::LParen)
            .ignore_then(token(Token::Star))
            .then_ignore(token(Token::RParen))
            .then_ignore(token(Token::LParen))
            .then(ty.separated_by(token(Token::Comma)))
            .then_ignore(token(Token::RParen));

        named.then(fnptr_tail.or_not()).map(
            |(((const_kw, base), suffixes), fnptr)| TyData {
                const_kw,
                base,
                suffixes,
                fnptr: fnptr.map(|(star, params)| FnPtrData { star, params }),
            },
        )
    })
}

/// Emit events for a type
pub fn emit_ty(sink: &mut EventSink, ty: &TyData) {
    match &ty.fnptr {
        Some(fnptr) => {
            sink.start_node(SyntaxKind::TyFunctionPointer);
            emit_named(sink, ty);
            sink.add_token(SyntaxKind::Star, fnptr.star.clone());
            for param in &fnptr.params {
                emit_ty(sink, param);
            }
            sink.finish_node();
        }
        None => emit_named(sink, ty),
    }
}

/// Emit the named part of a type (base name plus suffixes) as a `Ty` node
fn emit_named(sink: &mut EventSink, ty: &TyData) {
    sink.start_node(SyntaxKind::Ty);
    if let Some(const_kw) = &ty.const_kw {
        sink.add_token(SyntaxKind::Const, const_kw.clone());
    }
    sink.add_token(SyntaxKind::Identifier, ty.base.clone());
    for (tok, span) in &ty.suffixes {
        sink.add_token(SyntaxKind::from(tok.clone()), span.clone());
    }
    sink.finish_node();
}

#[cfg(test)]
mod tests {
    use super::*;
    use declcall_lexer::lex;

    fn parse_ty(source: &str) -> TyData {
        let tokens: Vec<_> = lex(source)
            .filter_map(|t| t.ok())
            .map(|s| (s.value, s.span))
            .collect();
        let end = source.len();
        let stream = chumsky::Stream::from_iter(end..end, tokens.into_iter());
        ty_parser().parse(stream).expect("type should parse")
    }

    #[test]
    fn test_plain_type() {
        let ty = parse_ty("int");
        assert!(ty.const_kw.is_none());
        assert!(ty.suffixes.is_empty());
        assert!(ty.fnptr.is_none());
    }

    #[test]
    fn test_const_pointer_type() {
        let ty = parse_ty("const char*");
        assert!(ty.const_kw.is_some());
        assert_eq!(ty.suffixes.len(), 1);
        assert_eq!(ty.suffixes[0].0, Token::Star);
    }

    #[test]
    fn test_reference_type() {
        let ty = parse_ty("B&");
        assert_eq!(ty.suffixes.len(), 1);
        assert_eq!(ty.suffixes[0].0, Token::Amp);
    }

    #[test]
    fn test_function_pointer_type() {
        let ty = parse_ty("int(*)(int, double)");
        let fnptr = ty.fnptr.expect("should be a function pointer");
        assert_eq!(fnptr.params.len(), 2);
    }

    #[test]
    fn test_function_pointer_no_params() {
        let ty = parse_ty("void(*)()");
        let fnptr = ty.fnptr.expect("should be a function pointer");
        assert!(fnptr.params.is_empty());
    }
}
