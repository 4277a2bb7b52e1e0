use crate::compilation::Compilation;
use declcall_resolver::ResolverOptions;
use std::fs;
use std::io;

/// Builder for creating a `Compilation`.
///
/// Use this to add source files from strings or file paths,
/// then call `build()` to compile all sources.
#[derive(Default)]
pub struct CompilationBuilder {
    sources: Vec<(String, String)>, // (name, content) pairs
    options: ResolverOptions,
}

impl CompilationBuilder {
    /// Create a new compilation builder.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            options: ResolverOptions::default(),
        }
    }

    /// Add a source file from a string.
    ///
    /// # Example
    /// ```no_run
    /// # use declcall_compiler::CompilationBuilder;
    /// let builder = CompilationBuilder::new()
    ///     .add_source("decls.cpp", "int f(int);");
    /// ```
    pub fn add_source(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.sources.push((name.into(), source.into()));
        self
    }

    /// Add a source file from a file path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn add_file(mut self, path: impl AsRef<std::path::Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        self.sources.push((name, source));
        Ok(self)
    }

    /// Set the resolver options used for `declcall` operands.
    pub fn with_resolver_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the compilation.
    ///
    /// This lexes and parses every source file and builds the semantic
    /// program. Diagnostics are collected automatically along the way.
    ///
    /// # Example
    /// ```no_run
    /// # use declcall_compiler::CompilationBuilder;
    /// let compilation = CompilationBuilder::new()
    ///     .add_source("decls.cpp", "int f(int);")
    ///     .build();
    ///
    /// if compilation.has_errors() {
    ///     compilation.diagnostics().emit().unwrap();
    /// }
    /// ```
    pub fn build(self) -> Compilation {
        Compilation::from_sources(self.sources, self.options)
    }
}
