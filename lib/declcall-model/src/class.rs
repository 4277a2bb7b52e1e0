//! Class declarations

use declcall_span::Span;

use crate::function::FunctionId;

/// Handle to a class in a [`crate::program::Program`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(usize);

impl ClassId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// A class declaration: name, direct bases, and declared members
#[derive(Debug, Clone)]
pub struct Class {
    name: String,
    bases: Vec<ClassId>,
    members: Vec<FunctionId>,
    span: Span,
}

impl Class {
    pub fn new(name: String, bases: Vec<ClassId>, span: Span) -> Self {
        Self {
            name,
            bases,
            members: Vec::new(),
            span,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct base classes, in declaration order
    pub fn bases(&self) -> &[ClassId] {
        &self.bases
    }

    /// Members declared directly in this class (not inherited)
    pub fn members(&self) -> &[FunctionId] {
        &self.members
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub(crate) fn add_member(&mut self, function: FunctionId) {
        self.members.push(function);
    }

    pub(crate) fn set_bases(&mut self, bases: Vec<ClassId>) {
        self.bases = bases;
    }
}
