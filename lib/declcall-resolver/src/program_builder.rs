//! Building the semantic program from a parsed translation unit
//!
//! Runs in phases over the syntax tree: register class names, resolve
//! base clauses, build members, then free functions, variables and
//! out-of-line definitions, and finally link overrides by name and
//! parameter-list match against virtual base members.

use declcall_model::{
    Class, ClassId, Function, FunctionId, FunctionKind, Program, Signature, Ty, Variable,
    Virtuality,
};
use declcall_reporting::IntoDiagnostic;
use declcall_syntax_tree::{SyntaxKind, SyntaxNode};

use crate::diagnostics::{UnknownBaseClassError, UnknownTypeError, UnmatchedDefinitionError};
use crate::syntax;

/// The built program plus any declaration errors
pub struct BuildResult {
    pub program: Program,
    pub diagnostics: Vec<Box<dyn IntoDiagnostic>>,
}

impl BuildResult {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Build a [`Program`] from a single `TranslationUnit` syntax tree
pub fn build_program(tree: &SyntaxNode) -> BuildResult {
    let mut builder = ProgramBuilder::new();
    builder.add_translation_unit(tree);
    builder.finish()
}

/// Incremental program builder over one or more translation units.
///
/// Declarations from every added unit are visible to every other unit,
/// so files can refer to classes declared later or elsewhere.
#[derive(Default)]
pub struct ProgramBuilder {
    program: Program,
    diagnostics: Vec<Box<dyn IntoDiagnostic>>,
    units: Vec<SyntaxNode>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self {
            program: Program::new(),
            diagnostics: Vec::new(),
            units: Vec::new(),
        }
    }

    pub fn add_translation_unit(&mut self, tree: &SyntaxNode) {
        self.units.push(tree.clone());
    }

    pub fn finish(mut self) -> BuildResult {
        let units = std::mem::take(&mut self.units);
        self.run(&units);
        BuildResult {
            program: self.program,
            diagnostics: self.diagnostics,
        }
    }

    fn error<E: IntoDiagnostic + 'static>(&mut self, error: E) {
        self.diagnostics.push(Box::new(error));
    }

    fn run(&mut self, units: &[SyntaxNode]) {
        let class_nodes: Vec<SyntaxNode> = units
            .iter()
            .flat_map(|tree| tree.children())
            .filter(|c| c.kind() == SyntaxKind::ClassDeclaration)
            .collect();

        // Phase 1: register every class name so member types can refer to
        // classes declared later in the file.
        let mut class_ids = Vec::new();
        for node in &class_nodes {
            let (name, _) = match syntax::declared_name(node) {
                Some(name) => name,
                None => continue,
            };
            class_ids.push(
                self.program
                    .add_class(Class::new(name, Vec::new(), syntax::span_of(node))),
            );
        }

        // Phase 2: base clauses
        for (node, &id) in class_nodes.iter().zip(class_ids.iter()) {
            let mut bases = Vec::new();
            for (base_name, base_span) in syntax::base_names(node) {
                match self.program.class_by_name(&base_name) {
                    Some(base) => bases.push(base),
                    None => {
                        let class = self.program.class(id).name().to_string();
                        self.error(UnknownBaseClassError {
                            span: base_span,
                            name: base_name,
                            class,
                        });
                    }
                }
            }
            self.program.set_class_bases(id, bases);
        }

        // Phase 3: members
        for (node, &id) in class_nodes.iter().zip(class_ids.iter()) {
            for member in syntax::class_members(node) {
                self.build_member(&member, id);
            }
        }

        // Phase 4: free functions, variables, out-of-line definitions
        for node in units.iter().flat_map(|tree| tree.children()) {
            match node.kind() {
                SyntaxKind::FunctionDeclaration => self.build_function(&node),
                SyntaxKind::VariableDeclaration => self.build_variable(&node),
                _ => {}
            }
        }

        // Phase 5: override linking
        self.link_overrides(&class_ids);
    }

    fn build_member(&mut self, node: &SyntaxNode, class: ClassId) {
        match node.kind() {
            SyntaxKind::MethodDeclaration => self.build_method(node, class),
            SyntaxKind::ConstructorDeclaration => {
                let name = self.program.class(class).name().to_string();
                let params = self.parameter_types(node);
                let signature = Signature::new(params, Ty::synthesized(declcall_model::TyKind::Void));
                self.program.add_function(
                    Function::new(
                        name,
                        Some(class),
                        FunctionKind::Constructor,
                        signature,
                        syntax::span_of(node),
                    )
                    .with_definition(true),
                );
            }
            SyntaxKind::DestructorDeclaration => {
                let class_name = self.program.class(class).name().to_string();
                let is_virtual = syntax::has_token(node, SyntaxKind::Virtual);
                let signature =
                    Signature::new(Vec::new(), Ty::synthesized(declcall_model::TyKind::Void));
                let mut function = Function::new(
                    format!("~{}", class_name),
                    Some(class),
                    FunctionKind::Destructor,
                    signature,
                    syntax::span_of(node),
                )
                .with_definition(true);
                if is_virtual {
                    function = function.with_virtuality(Virtuality::Virtual);
                }
                self.program.add_function(function);
            }
            SyntaxKind::ConversionDeclaration => {
                let target = match syntax::ty_child(node) {
                    Some(ty) => self.resolve_ty(&ty),
                    None => Ty::error(syntax::span_of(node)),
                };
                let name = format!("operator {}", target.display(&self.program));
                let signature = Signature::new(Vec::new(), target);
                self.program.add_function(
                    Function::new(
                        name,
                        Some(class),
                        FunctionKind::Conversion,
                        signature,
                        syntax::span_of(node),
                    )
                    .with_definition(true),
                );
            }
            _ => {}
        }
    }

    fn build_method(&mut self, node: &SyntaxNode, class: ClassId) {
        let name = syntax::declared_name(node)
            .map(|(name, _)| name)
            .or_else(|| syntax::operator_name(node).map(|(name, _)| name));
        let name = match name {
            Some(name) => name,
            None => return,
        };

        let ret = match syntax::ty_child(node) {
            Some(ty) => self.resolve_ty(&ty),
            None => Ty::error(syntax::span_of(node)),
        };

        let param_syntax = syntax::parameters(node);
        let explicit_object = param_syntax
            .first()
            .is_some_and(|p| p.is_explicit_object);
        let params = self.parameter_types(node);

        let kind = if syntax::has_token(node, SyntaxKind::Static) {
            FunctionKind::StaticMethod
        } else if explicit_object {
            FunctionKind::ExplicitObjectMethod
        } else {
            FunctionKind::ImplicitObjectMethod
        };

        let virtuality = if syntax::is_pure(node) {
            Virtuality::Pure
        } else if syntax::has_token(node, SyntaxKind::Virtual) {
            Virtuality::Virtual
        } else {
            Virtuality::NonVirtual
        };

        let signature =
            Signature::new(params, ret).with_const(syntax::has_token(node, SyntaxKind::Const));

        self.program.add_function(
            Function::new(name, Some(class), kind, signature, syntax::span_of(node))
                .with_virtuality(virtuality)
                .with_definition(syntax::has_body(node)),
        );
    }

    fn build_function(&mut self, node: &SyntaxNode) {
        if let Some(((class_name, class_span), (name, name_span))) = syntax::qualified_name(node) {
            // Out-of-line definition: mark the matching declaration
            let params = self.parameter_types(node);
            let class = match self.program.class_by_name(&class_name) {
                Some(class) => class,
                None => {
                    self.error(UnknownTypeError {
                        span: class_span,
                        name: class_name,
                    });
                    return;
                }
            };
            let matching = self
                .program
                .members_named(class, &name)
                .into_iter()
                .find(|&f| {
                    let declared = self.program.function(f).signature().params();
                    declared.len() == params.len()
                        && declared
                            .iter()
                            .zip(params.iter())
                            .all(|(a, b)| a.same_type(b))
                });
            match matching {
                Some(f) => self.program.mark_defined(f),
                None => self.error(UnmatchedDefinitionError {
                    span: name_span,
                    class: self.program.class(class).name().to_string(),
                    name,
                }),
            }
            return;
        }

        let (name, _) = match syntax::declared_name(node) {
            Some(name) => name,
            None => return,
        };
        let ret = match syntax::ty_child(node) {
            Some(ty) => self.resolve_ty(&ty),
            None => Ty::error(syntax::span_of(node)),
        };
        let params = self.parameter_types(node);
        self.program.add_function(
            Function::new(
                name,
                None,
                FunctionKind::Free,
                Signature::new(params, ret),
                syntax::span_of(node),
            )
            .with_definition(true),
        );
    }

    fn build_variable(&mut self, node: &SyntaxNode) {
        let (name, _) = match syntax::declared_name(node) {
            Some(name) => name,
            None => return,
        };
        let ty = match syntax::ty_child(node) {
            Some(ty) => self.resolve_ty(&ty),
            None => Ty::error(syntax::span_of(node)),
        };
        self.program
            .add_variable(Variable::new(name, ty, syntax::span_of(node)));
    }

    fn parameter_types(&mut self, node: &SyntaxNode) -> Vec<Ty> {
        syntax::parameters(node)
            .into_iter()
            .map(|p| match p.ty {
                Some(ty) => self.resolve_ty(&ty),
                None => Ty::error(syntax::span_of(node)),
            })
            .collect()
    }

    /// Resolve a `Ty` or `TyFunctionPointer` node to a semantic type
    fn resolve_ty(&mut self, node: &SyntaxNode) -> Ty {
        let span = syntax::span_of(node);
        match node.kind() {
            SyntaxKind::TyFunctionPointer => {
                let mut children = node
                    .children()
                    .filter(|c| matches!(c.kind(), SyntaxKind::Ty | SyntaxKind::TyFunctionPointer));
                let ret = match children.next() {
                    Some(ret) => self.resolve_ty(&ret),
                    None => Ty::error(span.clone()),
                };
                let params: Vec<Ty> = children.map(|c| self.resolve_ty(&c)).collect();
                Ty::function_pointer(Signature::new(params, ret), span)
            }
            SyntaxKind::Ty => {
                let ident = node
                    .children_with_tokens()
                    .filter_map(|e| e.into_token())
                    .find(|t| t.kind() == SyntaxKind::Identifier);
                let ident = match ident {
                    Some(ident) => ident,
                    None => return Ty::error(span),
                };

                let base = match ident.text() {
                    "void" => Ty::void(span.clone()),
                    "int" => Ty::int(span.clone()),
                    "bool" => Ty::bool(span.clone()),
                    "char" => Ty::char(span.clone()),
                    "float" => Ty::new(declcall_model::TyKind::Float, span.clone()),
                    "double" => Ty::double(span.clone()),
                    name => match self.program.class_by_name(name) {
                        Some(class) => Ty::class(class, span.clone()),
                        None => {
                            self.error(UnknownTypeError {
                                span: syntax::span_of_token(&ident),
                                name: name.to_string(),
                            });
                            Ty::error(span.clone())
                        }
                    },
                };

                let mut result = base;
                for token in node
                    .children_with_tokens()
                    .filter_map(|e| e.into_token())
                {
                    match token.kind() {
                        SyntaxKind::Star => result = Ty::pointer(result, span.clone()),
                        SyntaxKind::Amp => result = Ty::reference(result, span.clone()),
                        _ => {}
                    }
                }
                result
            }
            _ => Ty::error(span),
        }
    }

    /// Link overrides: a member of a derived class overrides a virtual
    /// base member with the same name and parameter list.
    fn link_overrides(&mut self, class_ids: &[ClassId]) {
        for &class in class_ids {
            let members: Vec<FunctionId> = self.program.class(class).members().to_vec();
            for member in members {
                let function = self.program.function(member);
                if function.kind() != FunctionKind::ImplicitObjectMethod {
                    continue;
                }
                let name = function.name().to_string();
                let bases: Vec<ClassId> = self.program.class(class).bases().to_vec();
                for base in bases {
                    let overridden = self.program.member_lookup(base, &name).and_then(
                        |(_, candidates)| {
                            candidates.into_iter().find(|&c| {
                                let candidate = self.program.function(c);
                                candidate.is_virtual()
                                    && candidate
                                        .signature()
                                        .same_params(self.program.function(member).signature())
                            })
                        },
                    );
                    if let Some(base_fn) = overridden {
                        self.program.link_override(member, base_fn);
                        break;
                    }
                }
            }
        }
    }
}
