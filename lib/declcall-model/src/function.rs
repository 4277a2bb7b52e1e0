//! Function declarations

use declcall_span::Span;

use crate::class::ClassId;
use crate::program::Program;
use crate::signature::Signature;

/// Handle to a function in a [`crate::program::Program`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(usize);

impl FunctionId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// What kind of callable a function declaration introduces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// A namespace-scope function
    Free,
    /// A non-static member function with an implicit object parameter
    ImplicitObjectMethod,
    /// A member function whose object parameter is declared explicitly
    ExplicitObjectMethod,
    /// A static member function
    StaticMethod,
    Constructor,
    Destructor,
    /// A conversion function, `operator T()`
    Conversion,
}

/// Virtual-ness of a member function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Virtuality {
    NonVirtual,
    Virtual,
    /// Declared `= 0`; may still have an out-of-line definition
    Pure,
}

/// A single function declaration
#[derive(Debug, Clone)]
pub struct Function {
    name: String,
    owner: Option<ClassId>,
    kind: FunctionKind,
    signature: Signature,
    virtuality: Virtuality,
    has_definition: bool,
    /// The base-class declaration this one overrides, if any
    overrides: Option<FunctionId>,
    span: Span,
}

impl Function {
    pub fn new(
        name: String,
        owner: Option<ClassId>,
        kind: FunctionKind,
        signature: Signature,
        span: Span,
    ) -> Self {
        Self {
            name,
            owner,
            kind,
            signature,
            virtuality: Virtuality::NonVirtual,
            has_definition: false,
            overrides: None,
            span,
        }
    }

    pub fn with_virtuality(mut self, virtuality: Virtuality) -> Self {
        self.virtuality = virtuality;
        self
    }

    pub fn with_definition(mut self, has_definition: bool) -> Self {
        self.has_definition = has_definition;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The class declaring this function, `None` for free functions
    pub fn owner(&self) -> Option<ClassId> {
        self.owner
    }

    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn virtuality(&self) -> Virtuality {
        self.virtuality
    }

    /// Whether the function participates in dynamic dispatch
    pub fn is_virtual(&self) -> bool {
        matches!(self.virtuality, Virtuality::Virtual | Virtuality::Pure)
    }

    pub fn is_pure(&self) -> bool {
        self.virtuality == Virtuality::Pure
    }

    pub fn has_definition(&self) -> bool {
        self.has_definition
    }

    pub fn overrides(&self) -> Option<FunctionId> {
        self.overrides
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Whether calls through this function dispatch on an object,
    /// i.e. resolution produces a pointer-to-member
    pub fn has_implicit_object_parameter(&self) -> bool {
        matches!(
            self.kind,
            FunctionKind::ImplicitObjectMethod | FunctionKind::Destructor | FunctionKind::Conversion
        )
    }

    /// The name as it would be diagnosed, e.g. `B::f` or `g`
    pub fn qualified_name(&self, program: &Program) -> String {
        match self.owner {
            Some(class) => format!("{}::{}", program.class(class).name(), self.name),
            None => self.name.clone(),
        }
    }

    pub(crate) fn set_definition(&mut self) {
        self.has_definition = true;
    }

    pub(crate) fn set_overrides(&mut self, overridden: FunctionId) {
        self.overrides = Some(overridden);
    }

    pub(crate) fn make_virtual(&mut self) {
        if self.virtuality == Virtuality::NonVirtual {
            self.virtuality = Virtuality::Virtual;
        }
    }
}
