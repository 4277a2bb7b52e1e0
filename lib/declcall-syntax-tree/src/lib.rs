//! Declcall Syntax Tree
//!
//! This crate defines the lossless syntax tree for the declcall modeling
//! language, built on the `rowan` library.
//!
//! The tree covers two surfaces:
//! - declarations (classes with members, free functions, variables), the
//!   scope against which `declcall` operands are resolved
//! - expressions, the operand language of the `declcall` operator
//!
//! # Example
//!
//! ```
//! use declcall_syntax_tree::{GreenNodeBuilder, SyntaxKind, SyntaxNode};
//!
//! let mut builder = GreenNodeBuilder::new();
//! builder.start_node(SyntaxKind::Name.into());
//! builder.token(SyntaxKind::Identifier.into(), "f");
//! builder.finish_node();
//!
//! let green = builder.finish();
//! let syntax = SyntaxNode::new_root(green);
//!
//! assert_eq!(syntax.kind(), SyntaxKind::Name);
//! ```

use declcall_lexer::Token;
use rowan::Language;

// Re-export for use by parsers
pub use rowan::GreenNodeBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // ===== Syntax Nodes (Non-terminals) =====
    Root,
    TranslationUnit,

    // Declarations
    ClassDeclaration,
    BaseClause,
    BaseSpecifier,
    ClassBody,
    MethodDeclaration,
    ConstructorDeclaration,
    DestructorDeclaration,
    ConversionDeclaration,
    FunctionDeclaration,
    VariableDeclaration,
    ParameterList,
    Parameter,
    Name,
    QualifiedName,
    OperatorName,
    PureSpecifier,
    FunctionBody,

    // Type nodes
    Ty,
    TyFunctionPointer,

    // Expression nodes
    Expression,
    ExprLiteral,
    ExprPath,
    ExprParen,
    ExprUnary,
    ExprBinary,
    ExprCall,
    ExprMember,
    MemberName,
    ExprIndex,
    ExprNew,
    ExprDelete,
    ExprDeclcall,
    ExprLambda,
    ArgumentList,
    Argument,

    // ===== Tokens (Terminals) =====
    // Literals
    Identifier,
    String,
    Integer,
    Float,
    Boolean,

    // Keywords
    Class,
    Struct,
    Virtual,
    Static,
    Const,
    Operator,
    This,
    New,
    Delete,
    Declcall,
    Decltype,
    Return,
    Public,
    Private,
    Protected,

    // Braces
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // Punctuation
    Semicolon,
    Comma,
    Dot,
    ColonColon,
    Colon,
    Arrow,
    Tilde,

    // Operators
    Spaceship,
    EqualsEquals,
    BangEquals,
    LessEquals,
    GreaterEquals,
    Less,
    Greater,
    Equals,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    AmpAmp,
    Amp,
    PipePipe,
    Pipe,
    Caret,

    // Trivia (whitespace and comments)
    Whitespace,
    LineComment,
    BlockComment,

    // Special
    Error,
}

impl SyntaxKind {
    /// True for node kinds that represent an expression.
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            SyntaxKind::Expression
                | SyntaxKind::ExprLiteral
                | SyntaxKind::ExprPath
                | SyntaxKind::ExprParen
                | SyntaxKind::ExprUnary
                | SyntaxKind::ExprBinary
                | SyntaxKind::ExprCall
                | SyntaxKind::ExprMember
                | SyntaxKind::ExprIndex
                | SyntaxKind::ExprNew
                | SyntaxKind::ExprDelete
                | SyntaxKind::ExprDeclcall
                | SyntaxKind::ExprLambda
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<Token> for SyntaxKind {
    fn from(token: Token) -> Self {
        match token {
            // Trivia
            Token::Whitespace => SyntaxKind::Whitespace,
            Token::LineComment => SyntaxKind::LineComment,
            Token::BlockComment => SyntaxKind::BlockComment,
            // Literals
            Token::Identifier => SyntaxKind::Identifier,
            Token::String => SyntaxKind::String,
            Token::Integer => SyntaxKind::Integer,
            Token::Float => SyntaxKind::Float,
            Token::Boolean => SyntaxKind::Boolean,
            // Keywords
            Token::Class => SyntaxKind::Class,
            Token::Struct => SyntaxKind::Struct,
            Token::Virtual => SyntaxKind::Virtual,
            Token::Static => SyntaxKind::Static,
            Token::Const => SyntaxKind::Const,
            Token::Operator => SyntaxKind::Operator,
            Token::This => SyntaxKind::This,
            Token::New => SyntaxKind::New,
            Token::Delete => SyntaxKind::Delete,
            Token::Declcall => SyntaxKind::Declcall,
            Token::Decltype => SyntaxKind::Decltype,
            Token::Return => SyntaxKind::Return,
            Token::Public => SyntaxKind::Public,
            Token::Private => SyntaxKind::Private,
            Token::Protected => SyntaxKind::Protected,
            // Braces
            Token::LParen => SyntaxKind::LParen,
            Token::RParen => SyntaxKind::RParen,
            Token::LBrace => SyntaxKind::LBrace,
            Token::RBrace => SyntaxKind::RBrace,
            Token::LBracket => SyntaxKind::LBracket,
            Token::RBracket => SyntaxKind::RBracket,
            // Punctuation
            Token::Semicolon => SyntaxKind::Semicolon,
            Token::Comma => SyntaxKind::Comma,
            Token::Dot => SyntaxKind::Dot,
            Token::ColonColon => SyntaxKind::ColonColon,
            Token::Colon => SyntaxKind::Colon,
            Token::Arrow => SyntaxKind::Arrow,
            Token::Tilde => SyntaxKind::Tilde,
            // Operators
            Token::Spaceship => SyntaxKind::Spaceship,
            Token::EqualsEquals => SyntaxKind::EqualsEquals,
            Token::BangEquals => SyntaxKind::BangEquals,
            Token::LessEquals => SyntaxKind::LessEquals,
            Token::GreaterEquals => SyntaxKind::GreaterEquals,
            Token::Less => SyntaxKind::Less,
            Token::Greater => SyntaxKind::Greater,
            Token::Equals => SyntaxKind::Equals,
            Token::Plus => SyntaxKind::Plus,
            Token::Minus => SyntaxKind::Minus,
            Token::Star => SyntaxKind::Star,
            Token::Slash => SyntaxKind::Slash,
            Token::Percent => SyntaxKind::Percent,
            Token::Bang => SyntaxKind::Bang,
            Token::AmpAmp => SyntaxKind::AmpAmp,
            Token::Amp => SyntaxKind::Amp,
            Token::PipePipe => SyntaxKind::PipePipe,
            Token::Pipe => SyntaxKind::Pipe,
            Token::Caret => SyntaxKind::Caret,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeclcallLanguage;

impl Language for DeclcallLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        // SyntaxKind is a plain contiguous enum; Error is the last variant.
        assert!(raw.0 <= SyntaxKind::Error as u16);
        // Safety: the enum is repr(u16) and the assertion keeps the
        // discriminant in range.
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<DeclcallLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<DeclcallLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<DeclcallLanguage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            SyntaxKind::Root,
            SyntaxKind::ExprDeclcall,
            SyntaxKind::MemberName,
            SyntaxKind::Spaceship,
            SyntaxKind::Error,
        ] {
            let raw: rowan::SyntaxKind = kind.into();
            assert_eq!(DeclcallLanguage::kind_from_raw(raw), kind);
        }
    }

    #[test]
    fn test_token_mapping() {
        assert_eq!(SyntaxKind::from(Token::Declcall), SyntaxKind::Declcall);
        assert_eq!(SyntaxKind::from(Token::ColonColon), SyntaxKind::ColonColon);
        assert_eq!(SyntaxKind::from(Token::Whitespace), SyntaxKind::Whitespace);
    }

    #[test]
    fn test_build_simple_tree() {
        let mut builder = GreenNodeBuilder::new();
        builder.start_node(SyntaxKind::ExprCall.into());
        builder.start_node(SyntaxKind::ExprPath.into());
        builder.token(SyntaxKind::Identifier.into(), "f");
        builder.finish_node();
        builder.start_node(SyntaxKind::ArgumentList.into());
        builder.token(SyntaxKind::LParen.into(), "(");
        builder.token(SyntaxKind::RParen.into(), ")");
        builder.finish_node();
        builder.finish_node();

        let node = SyntaxNode::new_root(builder.finish());
        assert_eq!(node.kind(), SyntaxKind::ExprCall);
        assert_eq!(node.children().count(), 2);
        assert!(node.children().next().unwrap().kind().is_expression());
    }
}
