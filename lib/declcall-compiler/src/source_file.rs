use declcall_syntax_tree::SyntaxNode;

/// A parsed source file.
///
/// Holds the original source text and the parsed syntax tree. The
/// semantic program is stored at the compilation level, since it spans
/// every file.
pub struct SourceFile {
    name: String,
    source: String,
    syntax_tree: SyntaxNode,
}

impl SourceFile {
    pub(crate) fn new(name: String, source: String, syntax_tree: SyntaxNode) -> Self {
        Self {
            name,
            source,
            syntax_tree,
        }
    }

    /// Get the file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the source code.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Get the syntax tree.
    pub fn syntax_tree(&self) -> &SyntaxNode {
        &self.syntax_tree
    }
}
