//! Diagnostic reporting
//!
//! Error types across the workspace implement [`IntoDiagnostic`] and are
//! collected into a [`DiagnosticContext`], which owns the source files and
//! renders the diagnostics through `codespan-reporting`.

use std::collections::HashMap;

use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

// Re-export commonly used types from codespan_reporting
pub use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

/// Trait for types that can be converted into a diagnostic.
/// Implement this for error types to integrate with the reporting system.
pub trait IntoDiagnostic {
    /// Convert this error into a codespan diagnostic against `file_id`.
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize>;
}

/// Collects diagnostics against a set of source files and emits them.
pub struct DiagnosticContext {
    files: SimpleFiles<String, String>,
    diagnostics: Vec<Diagnostic<usize>>,
    file_map: HashMap<String, usize>,
}

impl DiagnosticContext {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            diagnostics: Vec::new(),
            file_map: HashMap::new(),
        }
    }

    /// Add a source file, returning the file ID used when creating
    /// diagnostics. Adding the same name twice returns the original ID.
    pub fn add_file(&mut self, name: String, source: String) -> usize {
        if let Some(&id) = self.file_map.get(&name) {
            return id;
        }
        let id = self.files.add(name.clone(), source);
        self.file_map.insert(name, id);
        id
    }

    /// Throw (add) a diagnostic against a file.
    pub fn throw<D: IntoDiagnostic + ?Sized>(&mut self, diagnostic: &D, file_id: usize) {
        self.diagnostics.push(diagnostic.into_diagnostic(file_id));
    }

    /// Add an already-built diagnostic.
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic<usize>) {
        self.diagnostics.push(diagnostic);
    }

    /// Whether any collected diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error || d.severity == Severity::Bug)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic<usize>] {
        &self.diagnostics
    }

    pub fn get_file_id(&self, name: &str) -> Option<usize> {
        self.file_map.get(name).copied()
    }

    /// Emit all diagnostics to stderr with color support.
    pub fn emit(&self) -> Result<(), codespan_reporting::files::Error> {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let mut lock = writer.lock();
        self.emit_to(&mut lock)
    }

    /// Emit all diagnostics to a custom writer.
    pub fn emit_to<W: term::termcolor::WriteColor>(
        &self,
        writer: &mut W,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();
        for diagnostic in &self.diagnostics {
            term::emit(writer, &config, &self.files, diagnostic)?;
        }
        Ok(())
    }
}

impl Default for DiagnosticContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper macro to create a simple diagnostic.
#[macro_export]
macro_rules! diagnostic {
    (error, $($args:tt)*) => {
        $crate::Diagnostic::error().with_message(format!($($args)*))
    };
    (warning, $($args:tt)*) => {
        $crate::Diagnostic::warning().with_message(format!($($args)*))
    };
    (note, $($args:tt)*) => {
        $crate::Diagnostic::note().with_message(format!($($args)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestError {
        span: std::ops::Range<usize>,
    }

    impl IntoDiagnostic for TestError {
        fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
            Diagnostic::error()
                .with_message("something went wrong")
                .with_labels(vec![Label::primary(file_id, self.span.clone())])
        }
    }

    #[test]
    fn test_collects_and_classifies_errors() {
        let mut ctx = DiagnosticContext::new();
        let file_id = ctx.add_file("test.cpp".to_string(), "int f(int);".to_string());

        assert!(!ctx.has_errors());
        ctx.throw(&TestError { span: 0..3 }, file_id);
        assert!(ctx.has_errors());
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_duplicate_file_names_share_an_id() {
        let mut ctx = DiagnosticContext::new();
        let a = ctx.add_file("test.cpp".to_string(), "x".to_string());
        let b = ctx.add_file("test.cpp".to_string(), "x".to_string());
        assert_eq!(a, b);
    }

    #[test]
    fn test_emit_to_renders_collected_diagnostics() {
        let mut ctx = DiagnosticContext::new();
        let file_id = ctx.add_file("test.cpp".to_string(), "int f(int);".to_string());
        ctx.throw(&TestError { span: 4..5 }, file_id);

        let mut writer = term::termcolor::NoColor::new(Vec::new());
        ctx.emit_to(&mut writer).unwrap();

        let rendered = String::from_utf8(writer.into_inner()).unwrap();
        assert!(rendered.contains("something went wrong"));
        assert!(rendered.contains("test.cpp"));
    }

    #[test]
    fn test_diagnostic_macro() {
        let d: Diagnostic<usize> = diagnostic!(error, "no matching overload for `{}`", "f");
        assert_eq!(d.message, "no matching overload for `f`");
        assert_eq!(d.severity, Severity::Error);
    }
}
