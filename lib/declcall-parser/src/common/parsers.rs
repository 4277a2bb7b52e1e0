//! Common parser combinators shared across the declaration and
//! expression parsers.

use chumsky::prelude::*;
use declcall_lexer::Token;
use declcall_span::Span;

/// Check if a token is trivia (whitespace or comment)
pub fn is_trivia(token: &Token) -> bool {
    matches!(
        token,
        Token::Whitespace | Token::LineComment | Token::BlockComment
    )
}

/// Parser that skips trivia tokens
pub fn skip_trivia() -> impl Parser<Token, (), Error = Simple<Token>> + Clone {
    filter(|token: &Token| is_trivia(token)).repeated().ignored()
}

/// Wrap a parser to skip leading trivia
pub fn trivia<P, O>(parser: P) -> impl Parser<Token, O, Error = Simple<Token>> + Clone
where
    P: Parser<Token, O, Error = Simple<Token>> + Clone,
{
    skip_trivia().ignore_then(parser)
}

/// Match a specific token, skipping leading trivia
pub fn token(t: Token) -> impl Parser<Token, Span, Error = Simple<Token>> + Clone {
    trivia(just(t).map_with_span(|_, span| span))
}

/// Parse an identifier, skipping leading trivia
pub fn identifier() -> impl Parser<Token, Span, Error = Simple<Token>> + Clone {
    trivia(filter_map(|span, token| match token {
        Token::Identifier => Ok(span),
        _ => Err(Simple::expected_input_found(span, vec![], Some(token))),
    }))
}

/// Parse one of a set of tokens, yielding the matched token and its span
pub fn one_of_tokens(
    accept: fn(&Token) -> bool,
) -> impl Parser<Token, (Token, Span), Error = Simple<Token>> + Clone {
    trivia(filter_map(move |span, token| {
        if accept(&token) {
            Ok((token, span))
        } else {
            Err(Simple::expected_input_found(span, vec![], Some(token)))
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use declcall_lexer::lex;

    fn tokens(source: &str) -> Vec<(Token, Span)> {
        lex(source)
            .filter_map(|t| t.ok())
            .map(|s| (s.value, s.span))
            .collect()
    }

    fn stream(
        source: &str,
    ) -> chumsky::Stream<'static, Token, Span, std::vec::IntoIter<(Token, Span)>> {
        let end = source.len();
        chumsky::Stream::from_iter(end..end, tokens(source).into_iter())
    }

    #[test]
    fn test_identifier_skips_trivia() {
        let result = identifier().parse(stream("  /* c */ foo"));
        assert_eq!(result.unwrap(), 10..13);
    }

    #[test]
    fn test_token_matches() {
        let result = token(Token::ColonColon).parse(stream("::"));
        assert_eq!(result.unwrap(), 0..2);
    }

    #[test]
    fn test_identifier_rejects_keyword() {
        assert!(identifier().parse(stream("declcall")).is_err());
    }
}
