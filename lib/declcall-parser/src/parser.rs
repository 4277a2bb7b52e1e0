//! High-level parser API
//!
//! Wraps the event-driven parse functions into a single entry point that
//! creates the event sink, runs the parse function, extracts errors from
//! the event stream, and builds the syntax tree.

use declcall_lexer::Token;
use declcall_span::Span;
use declcall_syntax_tree::SyntaxNode;

use crate::event::{Event, EventSink, TreeBuilder};

/// A parse error with a message and optional span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    /// The span where the error occurred (if available)
    pub span: Option<Span>,
}

/// The result of parsing, containing both the syntax tree and any errors
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub tree: SyntaxNode,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// High-level parser that provides a convenient API for parsing
pub struct Parser;

impl Parser {
    /// Parse source code using the provided parse function
    ///
    /// The parse function is one of the event-driven entry points, e.g.
    /// [`crate::parse_translation_unit`] or [`crate::parse_expression`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use declcall_parser::{Parser, parse_translation_unit};
    /// use declcall_lexer::lex;
    ///
    /// let source = "int f(int);";
    /// let tokens: Vec<_> = lex(source)
    ///     .filter_map(|t| t.ok())
    ///     .map(|spanned| (spanned.value, spanned.span))
    ///     .collect();
    ///
    /// let result = Parser::parse(source, tokens.into_iter(), parse_translation_unit);
    /// assert!(result.is_ok());
    /// ```
    pub fn parse<I, F>(source: &str, tokens: I, parse_fn: F) -> ParseResult
    where
        I: Iterator<Item = (Token, Span)> + Clone,
        F: FnOnce(&str, I, &mut EventSink),
    {
        let mut sink = EventSink::new();
        parse_fn(source, tokens, &mut sink);

        let errors: Vec<ParseError> = sink
            .events()
            .iter()
            .filter_map(|e| match e {
                Event::Error { message, span } => Some(ParseError {
                    message: message.clone(),
                    span: span.clone(),
                }),
                _ => None,
            })
            .collect();

        let tree = TreeBuilder::new(source, sink.into_events()).build();

        ParseResult { tree, errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_expression, parse_translation_unit};
    use declcall_lexer::lex;
    use declcall_syntax_tree::SyntaxKind;

    fn tokens(source: &str) -> Vec<(Token, Span)> {
        lex(source)
            .filter_map(|t| t.ok())
            .map(|spanned| (spanned.value, spanned.span))
            .collect()
    }

    #[test]
    fn test_parse_valid_translation_unit() {
        let source = "class B { virtual int f(int); };\nint g(double);";
        let result = Parser::parse(source, tokens(source).into_iter(), parse_translation_unit);

        assert!(result.is_ok(), "unexpected errors: {:?}", result.errors);
        assert_eq!(result.tree.kind(), SyntaxKind::TranslationUnit);
        assert_eq!(result.tree.children().count(), 2);
    }

    #[test]
    fn test_parse_valid_expression() {
        let source = "declcall(b.f(1))";
        let result = Parser::parse(source, tokens(source).into_iter(), parse_expression);

        assert!(result.is_ok(), "unexpected errors: {:?}", result.errors);
        assert_eq!(result.tree.kind(), SyntaxKind::ExprDeclcall);
    }

    #[test]
    fn test_parse_error_has_span() {
        let source = "class 123";
        let result = Parser::parse(source, tokens(source).into_iter(), parse_translation_unit);

        assert!(!result.errors.is_empty());
        assert!(result.errors.iter().any(|e| e.span.is_some()));
    }

    #[test]
    fn test_parse_error_still_builds_tree() {
        let source = "int f(";
        let result = Parser::parse(source, tokens(source).into_iter(), parse_translation_unit);

        assert!(!result.errors.is_empty());
        // A tree is always produced, even when the source does not parse.
        assert_eq!(result.tree.kind(), SyntaxKind::Error);
    }
}
