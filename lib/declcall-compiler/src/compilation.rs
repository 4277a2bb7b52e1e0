use crate::source_file::SourceFile;
use declcall_lexer::lex;
use declcall_model::Program;
use declcall_parser::{parse_expression, parse_translation_unit, Parser};
use declcall_reporting::{Diagnostic, DiagnosticContext, IntoDiagnostic, Label};
use declcall_resolver::{
    CallTargetResolver, Diagnosis, EvaluationContext, ProgramBuilder, ResolveResult,
    ResolvedTarget, ResolverOptions, ScopeOracle,
};

/// A compiled set of declaration files.
///
/// Contains the parsed source files, the semantic program built from
/// them, and collected diagnostics. Created via `Compilation::builder()`.
pub struct Compilation {
    source_files: Vec<SourceFile>,
    program: Program,
    options: ResolverOptions,
    diagnostics: DiagnosticContext,
}

impl Compilation {
    /// Create a new compilation builder.
    ///
    /// # Example
    /// ```no_run
    /// # use declcall_compiler::Compilation;
    /// let compilation = Compilation::builder()
    ///     .add_source("decls.cpp", "int f(int);")
    ///     .build();
    /// ```
    pub fn builder() -> crate::CompilationBuilder {
        crate::CompilationBuilder::new()
    }

    pub(crate) fn from_sources(sources: Vec<(String, String)>, options: ResolverOptions) -> Self {
        let mut diagnostics = DiagnosticContext::new();
        let mut source_files = Vec::new();
        let mut builder = ProgramBuilder::new();
        let mut first_file_id = None;

        for (name, source) in sources {
            let file_id = diagnostics.add_file(name.clone(), source.clone());
            first_file_id.get_or_insert(file_id);

            let lex_results: Vec<_> = lex(&source).collect();
            for result in &lex_results {
                if let Err(error) = result {
                    diagnostics.throw(
                        &LexError {
                            span: error.span.clone(),
                        },
                        file_id,
                    );
                }
            }

            let tokens: Vec<_> = lex_results
                .into_iter()
                .filter_map(|r| r.ok())
                .map(|spanned| (spanned.value, spanned.span))
                .collect();

            let parse_result = Parser::parse(&source, tokens.into_iter(), parse_translation_unit);
            for error in &parse_result.errors {
                diagnostics.throw(
                    &ParseErrorDiagnostic {
                        message: error.message.clone(),
                        span: error.span.clone(),
                    },
                    file_id,
                );
            }

            builder.add_translation_unit(&parse_result.tree);
            source_files.push(SourceFile::new(name, source, parse_result.tree));
        }

        let built = builder.finish();
        let file_id = first_file_id.unwrap_or_default();
        for error in &built.diagnostics {
            diagnostics.throw(error.as_ref(), file_id);
        }

        Self {
            source_files,
            program: built.program,
            options,
            diagnostics,
        }
    }

    /// Resolve a `declcall` operand against the compiled declarations.
    ///
    /// The operand is given as expression source text, the way it would
    /// appear between the parentheses of `declcall(...)`.
    pub fn resolve_operand(
        &self,
        operand: &str,
        context: EvaluationContext,
    ) -> ResolveResult<ResolvedTarget> {
        let tokens: Vec<_> = lex(operand)
            .filter_map(|r| r.ok())
            .map(|spanned| (spanned.value, spanned.span))
            .collect();
        let result = Parser::parse(operand, tokens.into_iter(), parse_expression);
        if let Some(error) = result.errors.first() {
            return Err(Diagnosis::ill_formed(ParseErrorDiagnostic {
                message: error.message.clone(),
                span: error.span.clone(),
            }));
        }

        let oracle = ScopeOracle::new();
        let resolver =
            CallTargetResolver::new(&self.program, &oracle).with_options(self.options);
        resolver.resolve(&result.tree, context)
    }

    /// Get all compiled source files.
    pub fn source_files(&self) -> &[SourceFile] {
        &self.source_files
    }

    /// Get the semantic program for the entire compilation.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Get the diagnostic context.
    pub fn diagnostics(&self) -> &DiagnosticContext {
        &self.diagnostics
    }

    /// Check if there are any errors in the compilation.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Get a specific source file by name.
    pub fn get_source_file(&self, name: &str) -> Option<&SourceFile> {
        self.source_files.iter().find(|f| f.name() == name)
    }
}

/// Lex error diagnostic
struct LexError {
    span: std::ops::Range<usize>,
}

impl IntoDiagnostic for LexError {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message("invalid token")
            .with_labels(vec![
                Label::primary(file_id, self.span.clone()).with_message("unrecognized token")
            ])
    }
}

/// Parse error diagnostic
struct ParseErrorDiagnostic {
    message: String,
    span: Option<std::ops::Range<usize>>,
}

impl IntoDiagnostic for ParseErrorDiagnostic {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        let mut diagnostic = Diagnostic::error().with_message(&self.message);
        if let Some(span) = &self.span {
            diagnostic = diagnostic.with_labels(vec![
                Label::primary(file_id, span.clone()).with_message("error occurred here")
            ]);
        }
        diagnostic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declcall_resolver::ConstexprEligibility;

    #[test]
    fn test_compiles_and_resolves() {
        let compilation = Compilation::builder()
            .add_source("decls.cpp", "int f(int);\nint f(double);")
            .build();
        assert!(!compilation.has_errors());

        let target = compilation
            .resolve_operand("f(1)", EvaluationContext::ConstantExpression)
            .unwrap();
        assert_eq!(target.eligibility, ConstexprEligibility::Constant);
    }

    #[test]
    fn test_declarations_split_across_files() {
        let compilation = Compilation::builder()
            .add_source("base.cpp", "class B { virtual int f(int); };")
            .add_source("derived.cpp", "class D : B { int f(int); };\nD d;")
            .build();
        assert!(!compilation.has_errors());

        let target = compilation
            .resolve_operand("d.f(1)", EvaluationContext::ConstantExpression)
            .unwrap();
        assert!(target.pointer.is_some());
    }

    #[test]
    fn test_unparseable_operand_is_an_error() {
        let compilation = Compilation::builder()
            .add_source("decls.cpp", "int f(int);")
            .build();
        assert!(compilation
            .resolve_operand("f(", EvaluationContext::ConstantExpression)
            .is_err());
    }
}
