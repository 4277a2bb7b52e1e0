//! Event-driven parser for the modeling language
//!
//! Parsers emit events (StartNode, AddToken, FinishNode, Error) into an
//! `EventSink`; a `TreeBuilder` converts the event stream into a lossless
//! `rowan` syntax tree via `declcall-syntax-tree`.
//!
//! Two entry points cover the two kinds of input:
//! - [`parse_translation_unit`] for declaration files
//! - [`parse_expression`] for standalone call-form expressions
//!
//! # Example
//!
//! ```no_run
//! use declcall_parser::{Parser, parse_translation_unit};
//! use declcall_lexer::lex;
//!
//! let source = "class B { virtual int f(int); };";
//! let tokens: Vec<_> = lex(source)
//!     .filter_map(|t| t.ok())
//!     .map(|spanned| (spanned.value, spanned.span))
//!     .collect();
//!
//! let result = Parser::parse(source, tokens.into_iter(), parse_translation_unit);
//! println!("Syntax tree: {:?}", result.tree);
//! for error in result.errors {
//!     println!("Error: {}", error.message);
//! }
//! ```

pub mod common;
pub mod decl;
pub mod event;
pub mod expr;
pub mod parser;
pub mod ty;

// Re-export the event-driven parse functions
pub use decl::parse_translation_unit;
pub use expr::parse_expression;

// Re-export the high-level Parser API
pub use parser::{ParseError, ParseResult, Parser};
