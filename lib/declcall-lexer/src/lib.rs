use logos::Logos;
use unicode_xid::UnicodeXID;
pub use declcall_span::{Span, Spanned};

/// Check if a string is a valid Unicode identifier
fn is_valid_identifier(lex: &mut logos::Lexer<Token>) -> bool {
    let slice = lex.slice();
    let mut chars = slice.chars();

    // First character must be XID_Start or underscore
    if let Some(first) = chars.next() {
        if !first.is_xid_start() && first != '_' {
            return false;
        }
    } else {
        return false;
    }

    // Remaining characters must be XID_Continue
    chars.all(|c| c.is_xid_continue())
}

/// Consume a block comment, bumping the lexer past the terminator
fn parse_block_comment(lex: &mut logos::Lexer<Token>) -> bool {
    let remainder = lex.remainder();
    let mut chars = remainder.chars();
    let mut offset = 0;

    while let Some(c) = chars.next() {
        offset += c.len_utf8();

        if c == '*' {
            if let Some('/') = chars.clone().next() {
                chars.next();
                offset += 1;
                lex.bump(offset);
                return true;
            }
        }
    }

    // Unclosed comment - bump to end
    lex.bump(offset);
    true
}

#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    // ===== Trivia =====
    // Whitespace and comments are emitted as tokens so rowan can calculate
    // correct source positions. The parser treats these as trivia.
    #[regex(r"[ \t\n\r\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*", parse_block_comment)]
    BlockComment,

    // ===== Literals =====
    // Match potential Unicode identifiers and validate with XID rules.
    // Builtin type names (int, void, bool, ...) lex as identifiers; the
    // type parser gives them meaning.
    #[regex(r"[\p{L}_][\p{L}\p{N}_]*", is_valid_identifier)]
    Identifier,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    Float,

    #[token("true")]
    #[token("false")]
    Boolean,

    // ===== Keywords =====
    #[token("class")]
    Class,

    #[token("struct")]
    Struct,

    #[token("virtual")]
    Virtual,

    #[token("static")]
    Static,

    #[token("const")]
    Const,

    #[token("operator")]
    Operator,

    #[token("this")]
    This,

    #[token("new")]
    New,

    #[token("delete")]
    Delete,

    #[token("declcall")]
    Declcall,

    // Reserved for the type-only operand context; not used by the
    // expression grammar (type-only resolution goes through the API).
    #[token("decltype")]
    Decltype,

    #[token("return")]
    Return,

    #[token("public")]
    Public,

    #[token("private")]
    Private,

    #[token("protected")]
    Protected,

    // ===== Braces =====
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    // ===== Punctuation =====
    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("::")]
    ColonColon,

    #[token(":")]
    Colon,

    #[token("->")]
    Arrow,

    #[token("~")]
    Tilde,

    // ===== Operators =====
    #[token("<=>")]
    Spaceship,

    #[token("==")]
    EqualsEquals,

    #[token("!=")]
    BangEquals,

    #[token("<=")]
    LessEquals,

    #[token(">=")]
    GreaterEquals,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    #[token("=")]
    Equals,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("!")]
    Bang,

    #[token("&&")]
    AmpAmp,

    #[token("&")]
    Amp,

    #[token("||")]
    PipePipe,

    #[token("|")]
    Pipe,

    #[token("^")]
    Caret,
}

impl Token {
    /// The source spelling of an overloadable operator token, used to form
    /// operator-function names such as `operator+`.
    pub fn operator_spelling(&self) -> Option<&'static str> {
        Some(match self {
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Less => "<",
            Token::Greater => ">",
            Token::LessEquals => "<=",
            Token::GreaterEquals => ">=",
            Token::EqualsEquals => "==",
            Token::BangEquals => "!=",
            Token::Spaceship => "<=>",
            Token::Bang => "!",
            Token::Tilde => "~",
            Token::Amp => "&",
            Token::Pipe => "|",
            Token::Caret => "^",
            Token::LBracket => "[]",
            Token::LParen => "()",
            _ => return None,
        })
    }
}

pub type SpannedToken = Spanned<Token>;

/// Lex source code and return an iterator of tokens with their spans
pub fn lex(source: &str) -> impl Iterator<Item = Result<SpannedToken, Spanned<()>>> + '_ {
    Token::lexer(source).spanned().map(|(token, span)| {
        token
            .map(|t| Spanned::new(t, span.clone()))
            .map_err(|_| Spanned::new((), span))
    })
}
