//! Event-based parsing infrastructure
//!
//! Parsers do not build syntax trees directly. They emit events
//! (StartNode, AddToken, FinishNode) into an `EventSink`, and a
//! `TreeBuilder` later converts the event stream plus the source text into
//! a rowan tree. This is the rust-analyzer architecture: parsing logic
//! stays decoupled from tree construction, and errors can be extracted
//! from the event stream without touching the tree.

use declcall_span::Span;
use declcall_syntax_tree::{GreenNodeBuilder, SyntaxKind, SyntaxNode};

/// Events emitted during parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Start a new syntax node
    StartNode(SyntaxKind),
    /// Add a token to the current node
    AddToken(SyntaxKind, Span),
    /// Finish the current syntax node
    FinishNode,
    /// A parse error occurred
    Error { message: String, span: Option<Span> },
}

/// Collects events during parsing
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    events: Vec<Event>,
}

impl EventSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.events.push(Event::StartNode(kind));
    }

    pub fn add_token(&mut self, kind: SyntaxKind, span: Span) {
        self.events.push(Event::AddToken(kind, span));
    }

    pub fn finish_node(&mut self) {
        self.events.push(Event::FinishNode);
    }

    /// Record a parse error at a known location
    pub fn error_at(&mut self, message: String, span: Span) {
        self.events.push(Event::Error {
            message,
            span: Some(span),
        });
    }

    /// Record a parse error with no location
    pub fn error(&mut self, message: String) {
        self.events.push(Event::Error {
            message,
            span: None,
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

/// Builds a syntax tree from events and source text
pub struct TreeBuilder<'src> {
    source: &'src str,
    events: Vec<Event>,
}

impl<'src> TreeBuilder<'src> {
    pub fn new(source: &'src str, events: Vec<Event>) -> Self {
        Self { source, events }
    }

    /// Build the syntax tree from events
    pub fn build(self) -> SyntaxNode {
        let mut builder = GreenNodeBuilder::new();
        let mut depth = 0usize;

        // If the event stream is empty or all-error, still produce a root
        // so callers always get a tree.
        let has_node = self
            .events
            .iter()
            .any(|e| matches!(e, Event::StartNode(_)));
        if !has_node {
            builder.start_node(SyntaxKind::Error.into());
            builder.finish_node();
            return SyntaxNode::new_root(builder.finish());
        }

        for event in &self.events {
            match event {
                Event::StartNode(kind) => {
                    builder.start_node((*kind).into());
                    depth += 1;
                }
                Event::AddToken(kind, span) => {
                    let text = &self.source[span.clone()];
                    builder.token((*kind).into(), text);
                }
                Event::FinishNode => {
                    builder.finish_node();
                    depth = depth.saturating_sub(1);
                }
                // Errors are extracted from the event list separately
                Event::Error { .. } => {}
            }
        }

        // Close any nodes left open by error recovery
        for _ in 0..depth {
            builder.finish_node();
        }

        SyntaxNode::new_root(builder.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_sink() {
        let mut sink = EventSink::new();
        sink.start_node(SyntaxKind::ExprPath);
        sink.add_token(SyntaxKind::Identifier, 0..1);
        sink.finish_node();

        let events = sink.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], Event::StartNode(SyntaxKind::ExprPath));
        assert_eq!(events[1], Event::AddToken(SyntaxKind::Identifier, 0..1));
        assert_eq!(events[2], Event::FinishNode);
    }

    #[test]
    fn test_tree_builder_simple() {
        let source = "f";
        let mut sink = EventSink::new();

        sink.start_node(SyntaxKind::ExprPath);
        sink.add_token(SyntaxKind::Identifier, 0..1);
        sink.finish_node();

        let tree = TreeBuilder::new(source, sink.into_events()).build();

        assert_eq!(tree.kind(), SyntaxKind::ExprPath);
        assert_eq!(tree.text().to_string(), "f");
    }

    #[test]
    fn test_tree_builder_nested() {
        let source = "f()";
        let mut sink = EventSink::new();

        sink.start_node(SyntaxKind::ExprCall);
        sink.start_node(SyntaxKind::ExprPath);
        sink.add_token(SyntaxKind::Identifier, 0..1);
        sink.finish_node();
        sink.start_node(SyntaxKind::ArgumentList);
        sink.add_token(SyntaxKind::LParen, 1..2);
        sink.add_token(SyntaxKind::RParen, 2..3);
        sink.finish_node();
        sink.finish_node();

        let tree = TreeBuilder::new(source, sink.into_events()).build();

        assert_eq!(tree.kind(), SyntaxKind::ExprCall);
        assert_eq!(tree.children().count(), 2);
        let path = tree.children().next().unwrap();
        assert_eq!(path.kind(), SyntaxKind::ExprPath);
    }

    #[test]
    fn test_tree_builder_empty_events() {
        let tree = TreeBuilder::new("", Vec::new()).build();
        assert_eq!(tree.kind(), SyntaxKind::Error);
    }
}
