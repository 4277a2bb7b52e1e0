//! # Declcall Compiler
//!
//! A high-level compilation API over the declaration frontend and the
//! call-target resolver, inspired by Roslyn's `Compilation` API.
//!
//! ## Example
//!
//! ```no_run
//! use declcall_compiler::{Compilation, EvaluationContext};
//!
//! let compilation = Compilation::builder()
//!     .add_source("decls.cpp", "int f(int);\nint f(double);")
//!     .build();
//!
//! if compilation.has_errors() {
//!     compilation.diagnostics().emit().unwrap();
//!     std::process::exit(1);
//! }
//!
//! match compilation.resolve_operand("f(1)", EvaluationContext::ConstantExpression) {
//!     Ok(target) => println!("resolved: {}", target.ty.display(compilation.program())),
//!     Err(diagnosis) => println!("rejected: {:?}", diagnosis.kind()),
//! }
//! ```

mod builder;
mod compilation;
mod source_file;

pub use builder::CompilationBuilder;
pub use compilation::Compilation;
pub use source_file::SourceFile;

// Re-export commonly used types from dependencies
pub use declcall_reporting::{Diagnostic, DiagnosticContext, IntoDiagnostic, Label, Severity};
pub use declcall_resolver::{
    Diagnosis, DiagnosisKind, EvaluationContext, LambdaCallPolicy, ResolvedTarget, ResolverOptions,
};
pub use declcall_syntax_tree::SyntaxNode;
