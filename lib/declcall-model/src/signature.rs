//! Function signatures

use crate::program::Program;
use crate::ty::Ty;

/// The parameter and return types of a function, plus member constness.
///
/// For methods the parameter list covers only the declared parameters;
/// the implicit object parameter is represented by the owning class on
/// the `Function` itself.
#[derive(Debug, Clone)]
pub struct Signature {
    params: Vec<Ty>,
    ret: Box<Ty>,
    is_const: bool,
}

impl Signature {
    pub fn new(params: Vec<Ty>, ret: Ty) -> Self {
        Self {
            params,
            ret: Box::new(ret),
            is_const: false,
        }
    }

    pub fn with_const(mut self, is_const: bool) -> Self {
        self.is_const = is_const;
        self
    }

    pub fn params(&self) -> &[Ty] {
        &self.params
    }

    pub fn ret(&self) -> &Ty {
        &self.ret
    }

    /// Whether this is a const member function signature
    pub fn is_const(&self) -> bool {
        self.is_const
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Structural signature equality, ignoring source locations
    pub fn same_signature(&self, other: &Signature) -> bool {
        self.params.len() == other.params.len()
            && self.is_const == other.is_const
            && self.ret.same_type(&other.ret)
            && self
                .params
                .iter()
                .zip(other.params.iter())
                .all(|(a, b)| a.same_type(b))
    }

    /// Whether the parameter lists match exactly, ignoring return type.
    /// This is the test used for override matching.
    pub fn same_params(&self, other: &Signature) -> bool {
        self.params.len() == other.params.len()
            && self.is_const == other.is_const
            && self
                .params
                .iter()
                .zip(other.params.iter())
                .all(|(a, b)| a.same_type(b))
    }

    /// Render the parameter list, e.g. `int, double`
    pub fn display_params(&self, program: &Program) -> String {
        self.params
            .iter()
            .map(|p| p.display(program))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
