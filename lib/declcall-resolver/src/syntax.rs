//! Syntax tree navigation
//!
//! Thin readers over the rowan tree: each function extracts one piece of
//! a node (a callee, an argument list, the parts of a member name) and
//! returns `Option` so callers can treat malformed trees as lookup
//! failures instead of panicking.

use declcall_span::Span;
use declcall_syntax_tree::{SyntaxKind, SyntaxNode, SyntaxToken};

/// The source span covered by a node
pub fn span_of(node: &SyntaxNode) -> Span {
    let range = node.text_range();
    usize::from(range.start())..usize::from(range.end())
}

pub fn span_of_token(token: &SyntaxToken) -> Span {
    let range = token.text_range();
    usize::from(range.start())..usize::from(range.end())
}

/// The first child that is an expression node
pub fn first_expr(node: &SyntaxNode) -> Option<SyntaxNode> {
    node.children().find(|c| c.kind().is_expression())
}

/// Strip any number of grouping parentheses
pub fn skip_parens(node: SyntaxNode) -> SyntaxNode {
    let mut current = node;
    while current.kind() == SyntaxKind::ExprParen {
        match first_expr(&current) {
            Some(inner) => current = inner,
            None => break,
        }
    }
    current
}

/// The callee of a call expression
pub fn call_callee(call: &SyntaxNode) -> Option<SyntaxNode> {
    first_expr(call)
}

/// The argument expressions of a call (or new-expression)
pub fn call_arguments(call: &SyntaxNode) -> Vec<SyntaxNode> {
    call.children()
        .find(|c| c.kind() == SyntaxKind::ArgumentList)
        .map(|list| {
            list.children()
                .filter(|c| c.kind() == SyntaxKind::Argument)
                .filter_map(|arg| first_expr(&arg))
                .collect()
        })
        .unwrap_or_default()
}

/// The object expression of a member access
pub fn member_base(member: &SyntaxNode) -> Option<SyntaxNode> {
    first_expr(member)
}

/// Whether the member access uses `->` rather than `.`
pub fn member_is_arrow(member: &SyntaxNode) -> bool {
    member
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .any(|t| t.kind() == SyntaxKind::Arrow)
}

/// The name part of a member access: `f`, `B::f`, or `~B`
#[derive(Debug, Clone)]
pub struct MemberName {
    /// The qualifying class name for `obj.B::f`
    pub qualifier: Option<(String, Span)>,
    /// True for destructor names, `p->~B()`
    pub is_destructor: bool,
    pub name: String,
    pub span: Span,
}

pub fn member_name(member: &SyntaxNode) -> Option<MemberName> {
    let name_node = member
        .children()
        .find(|c| c.kind() == SyntaxKind::MemberName)?;

    let is_destructor = name_node
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .any(|t| t.kind() == SyntaxKind::Tilde);

    let identifiers: Vec<SyntaxToken> = name_node
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() == SyntaxKind::Identifier)
        .collect();

    match identifiers.as_slice() {
        [name] => Some(MemberName {
            qualifier: None,
            is_destructor,
            name: name.text().to_string(),
            span: span_of_token(name),
        }),
        [qualifier, name] => Some(MemberName {
            qualifier: Some((qualifier.text().to_string(), span_of_token(qualifier))),
            is_destructor,
            name: name.text().to_string(),
            span: span_of_token(name),
        }),
        _ => None,
    }
}

/// The identifier segments of a path expression, e.g. `B::s` -> [B, s]
pub fn path_segments(path: &SyntaxNode) -> Vec<(String, Span)> {
    path.children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() == SyntaxKind::Identifier)
        .map(|t| (t.text().to_string(), span_of_token(&t)))
        .collect()
}

/// The literal token of a literal expression
pub fn literal_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| {
            matches!(
                t.kind(),
                SyntaxKind::Integer | SyntaxKind::Float | SyntaxKind::String | SyntaxKind::Boolean
            )
        })
}

/// The operator token of a unary or binary expression
pub fn operator_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() != SyntaxKind::LParen && t.kind() != SyntaxKind::RParen)
}

/// The operand of a unary expression
pub fn unary_operand(node: &SyntaxNode) -> Option<SyntaxNode> {
    first_expr(node)
}

/// Both operands of a binary expression
pub fn binary_operands(node: &SyntaxNode) -> Option<(SyntaxNode, SyntaxNode)> {
    let mut exprs = node.children().filter(|c| c.kind().is_expression());
    let lhs = exprs.next()?;
    let rhs = exprs.next()?;
    Some((lhs, rhs))
}

/// The operand of a `declcall(...)` expression
pub fn declcall_operand(node: &SyntaxNode) -> Option<SyntaxNode> {
    first_expr(node)
}

/// The returned expression of a `[]{ return expr; }` lambda
pub fn lambda_result(node: &SyntaxNode) -> Option<SyntaxNode> {
    first_expr(node)
}

/// The type node of a new-expression
pub fn new_ty(node: &SyntaxNode) -> Option<SyntaxNode> {
    ty_child(node)
}

/// The first type child of a node (`Ty` or `TyFunctionPointer`)
pub fn ty_child(node: &SyntaxNode) -> Option<SyntaxNode> {
    node.children()
        .find(|c| matches!(c.kind(), SyntaxKind::Ty | SyntaxKind::TyFunctionPointer))
}

// ===== Declaration side =====

/// The text and span of a node's `Name` child
pub fn declared_name(node: &SyntaxNode) -> Option<(String, Span)> {
    let name_node = node.children().find(|c| c.kind() == SyntaxKind::Name)?;
    let ident = name_node
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == SyntaxKind::Identifier)?;
    Some((ident.text().to_string(), span_of_token(&ident)))
}

/// The `C::f` parts of a qualified function name
pub fn qualified_name(node: &SyntaxNode) -> Option<((String, Span), (String, Span))> {
    let qualified = node
        .children()
        .find(|c| c.kind() == SyntaxKind::QualifiedName)?;
    let idents: Vec<SyntaxToken> = qualified
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() == SyntaxKind::Identifier)
        .collect();
    match idents.as_slice() {
        [class, name] => Some((
            (class.text().to_string(), span_of_token(class)),
            (name.text().to_string(), span_of_token(name)),
        )),
        _ => None,
    }
}

/// The spelling of an operator-function name, e.g. `operator+`
pub fn operator_name(node: &SyntaxNode) -> Option<(String, Span)> {
    let op_node = node
        .children()
        .find(|c| c.kind() == SyntaxKind::OperatorName)?;
    let symbol: String = op_node
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() != SyntaxKind::Operator)
        .map(|t| t.text().to_string())
        .collect();
    Some((format!("operator{}", symbol), span_of(&op_node)))
}

/// Whether a node carries a direct child token of the given kind
pub fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .any(|t| t.kind() == kind)
}

/// The base-specifier names of a class's base clause
pub fn base_names(class: &SyntaxNode) -> Vec<(String, Span)> {
    class
        .children()
        .find(|c| c.kind() == SyntaxKind::BaseClause)
        .map(|clause| {
            clause
                .children()
                .filter(|c| c.kind() == SyntaxKind::BaseSpecifier)
                .filter_map(|spec| declared_name(&spec))
                .collect()
        })
        .unwrap_or_default()
}

/// The member declarations of a class body
pub fn class_members(class: &SyntaxNode) -> Vec<SyntaxNode> {
    class
        .children()
        .find(|c| c.kind() == SyntaxKind::ClassBody)
        .map(|body| body.children().collect())
        .unwrap_or_default()
}

/// A parameter's pieces: explicit-object marker, type node, name
pub struct ParameterSyntax {
    pub is_explicit_object: bool,
    pub ty: Option<SyntaxNode>,
}

/// The parameters of a declaration's parameter list
pub fn parameters(node: &SyntaxNode) -> Vec<ParameterSyntax> {
    node.children()
        .find(|c| c.kind() == SyntaxKind::ParameterList)
        .map(|list| {
            list.children()
                .filter(|c| c.kind() == SyntaxKind::Parameter)
                .map(|param| ParameterSyntax {
                    is_explicit_object: has_token(&param, SyntaxKind::This),
                    ty: ty_child(&param),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Whether a function declaration carries a body (`{ }`)
pub fn has_body(node: &SyntaxNode) -> bool {
    node.children()
        .any(|c| c.kind() == SyntaxKind::FunctionBody)
}

/// Whether a method declaration carries a pure specifier (`= 0`)
pub fn is_pure(node: &SyntaxNode) -> bool {
    node.children()
        .any(|c| c.kind() == SyntaxKind::PureSpecifier)
}
