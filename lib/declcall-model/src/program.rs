//! The program arena
//!
//! A `Program` owns every class, function and variable of a translation
//! unit and answers the lookup queries resolution needs: overload sets of
//! free functions, member lookup with base-class shadowing, and the base
//! lattice walk behind qualified names.

use declcall_span::Span;

use crate::class::{Class, ClassId};
use crate::function::{Function, FunctionId, FunctionKind};
use crate::ty::Ty;

/// Handle to a variable in a [`Program`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableId(usize);

impl VariableId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A namespace-scope variable
#[derive(Debug, Clone)]
pub struct Variable {
    name: String,
    ty: Ty,
    span: Span,
}

impl Variable {
    pub fn new(name: String, ty: Ty, span: Span) -> Self {
        Self { name, ty, span }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &Ty {
        &self.ty
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

/// All declarations of a translation unit
#[derive(Debug, Clone, Default)]
pub struct Program {
    classes: Vec<Class>,
    functions: Vec<Function>,
    variables: Vec<Variable>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, class: Class) -> ClassId {
        let id = ClassId::new(self.classes.len());
        self.classes.push(class);
        id
    }

    /// Add a function; member functions are also recorded on their owner
    pub fn add_function(&mut self, function: Function) -> FunctionId {
        let id = FunctionId::new(self.functions.len());
        let owner = function.owner();
        self.functions.push(function);
        if let Some(class) = owner {
            self.classes[class.index()].add_member(id);
        }
        id
    }

    pub fn add_variable(&mut self, variable: Variable) -> VariableId {
        let id = VariableId(self.variables.len());
        self.variables.push(variable);
        id
    }

    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.index()]
    }

    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.index()]
    }

    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.index()]
    }

    pub fn classes(&self) -> impl Iterator<Item = ClassId> + '_ {
        (0..self.classes.len()).map(ClassId::new)
    }

    pub fn functions(&self) -> impl Iterator<Item = FunctionId> + '_ {
        (0..self.functions.len()).map(FunctionId::new)
    }

    /// Mark a declared function as having a definition
    pub fn mark_defined(&mut self, id: FunctionId) {
        self.functions[id.index()].set_definition();
    }

    /// Record that `derived_fn` overrides `base_fn`. Overriding a virtual
    /// function makes the override virtual as well.
    pub fn link_override(&mut self, derived_fn: FunctionId, base_fn: FunctionId) {
        self.functions[derived_fn.index()].set_overrides(base_fn);
        if self.functions[base_fn.index()].is_virtual() {
            self.functions[derived_fn.index()].make_virtual();
        }
    }

    /// Replace a class's base list (bases are resolved after all class
    /// names are known)
    pub fn set_class_bases(&mut self, id: ClassId, bases: Vec<ClassId>) {
        self.classes[id.index()].set_bases(bases);
    }

    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.classes
            .iter()
            .position(|c| c.name() == name)
            .map(ClassId::new)
    }

    pub fn variable_by_name(&self, name: &str) -> Option<VariableId> {
        self.variables
            .iter()
            .position(|v| v.name() == name)
            .map(VariableId)
    }

    /// The overload set of free functions with the given name
    pub fn free_functions(&self, name: &str) -> Vec<FunctionId> {
        self.functions
            .iter()
            .enumerate()
            .filter(|(_, f)| f.owner().is_none() && f.name() == name)
            .map(|(i, _)| FunctionId::new(i))
            .collect()
    }

    /// Members with the given name declared directly in `class`
    pub fn members_named(&self, class: ClassId, name: &str) -> Vec<FunctionId> {
        self.class(class)
            .members()
            .iter()
            .copied()
            .filter(|&f| self.function(f).name() == name)
            .collect()
    }

    /// Unqualified member lookup: walk from `class` toward its bases and
    /// return the first class that declares any member with the name,
    /// together with that class's whole overload set for the name.
    /// A declaration in a derived class shadows all base declarations.
    pub fn member_lookup(&self, class: ClassId, name: &str) -> Option<(ClassId, Vec<FunctionId>)> {
        let own = self.members_named(class, name);
        if !own.is_empty() {
            return Some((class, own));
        }

        let mut found: Option<(ClassId, Vec<FunctionId>)> = None;
        for &base in self.class(class).bases() {
            if let Some((declaring, set)) = self.member_lookup(base, name) {
                match &mut found {
                    None => found = Some((declaring, set)),
                    Some((existing, existing_set)) => {
                        // The same declaring class reached along two paths
                        // is still a single overload set.
                        if *existing != declaring {
                            existing_set.extend(set);
                        }
                    }
                }
            }
        }
        found
    }

    /// Whether `base` is `derived` or one of its (transitive) bases
    pub fn derives_from(&self, derived: ClassId, base: ClassId) -> bool {
        if derived == base {
            return true;
        }
        self.class(derived)
            .bases()
            .iter()
            .any(|&b| self.derives_from(b, base))
    }

    /// Conversion functions visible on `class`, including inherited ones
    pub fn conversions(&self, class: ClassId) -> Vec<FunctionId> {
        let mut result: Vec<FunctionId> = self
            .class(class)
            .members()
            .iter()
            .copied()
            .filter(|&f| self.function(f).kind() == FunctionKind::Conversion)
            .collect();
        for &base in self.class(class).bases() {
            for f in self.conversions(base) {
                if !result.contains(&f) {
                    result.push(f);
                }
            }
        }
        result
    }

    /// The destructor of `class`, if declared (directly)
    pub fn destructor(&self, class: ClassId) -> Option<FunctionId> {
        self.class(class)
            .members()
            .iter()
            .copied()
            .find(|&f| self.function(f).kind() == FunctionKind::Destructor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Signature;

    fn method(program: &mut Program, class: ClassId, name: &str) -> FunctionId {
        program.add_function(Function::new(
            name.to_string(),
            Some(class),
            FunctionKind::ImplicitObjectMethod,
            Signature::new(vec![Ty::int(0..0)], Ty::int(0..0)),
            0..0,
        ))
    }

    #[test]
    fn test_free_function_overload_set() {
        let mut program = Program::new();
        let f1 = program.add_function(Function::new(
            "f".to_string(),
            None,
            FunctionKind::Free,
            Signature::new(vec![Ty::int(0..0)], Ty::int(0..0)),
            0..0,
        ));
        let f2 = program.add_function(Function::new(
            "f".to_string(),
            None,
            FunctionKind::Free,
            Signature::new(vec![Ty::double(0..0)], Ty::int(0..0)),
            0..0,
        ));
        program.add_function(Function::new(
            "g".to_string(),
            None,
            FunctionKind::Free,
            Signature::new(vec![], Ty::void(0..0)),
            0..0,
        ));

        assert_eq!(program.free_functions("f"), vec![f1, f2]);
    }

    #[test]
    fn test_member_lookup_finds_inherited() {
        let mut program = Program::new();
        let base = program.add_class(Class::new("B".to_string(), vec![], 0..0));
        let derived = program.add_class(Class::new("D".to_string(), vec![base], 0..0));
        let f = method(&mut program, base, "f");

        let (declaring, set) = program.member_lookup(derived, "f").unwrap();
        assert_eq!(declaring, base);
        assert_eq!(set, vec![f]);
    }

    #[test]
    fn test_member_lookup_derived_shadows_base() {
        let mut program = Program::new();
        let base = program.add_class(Class::new("B".to_string(), vec![], 0..0));
        let derived = program.add_class(Class::new("D".to_string(), vec![base], 0..0));
        method(&mut program, base, "f");
        let derived_f = method(&mut program, derived, "f");

        let (declaring, set) = program.member_lookup(derived, "f").unwrap();
        assert_eq!(declaring, derived);
        assert_eq!(set, vec![derived_f]);
    }

    #[test]
    fn test_member_lookup_pools_distinct_bases() {
        // Same-named members found in two different bases become one
        // candidate set; ranking (not lookup) arbitrates between them.
        let mut program = Program::new();
        let a = program.add_class(Class::new("A".to_string(), vec![], 0..0));
        let b = program.add_class(Class::new("B".to_string(), vec![], 0..0));
        let derived = program.add_class(Class::new("D".to_string(), vec![a, b], 0..0));
        let fa = method(&mut program, a, "f");
        let fb = method(&mut program, b, "f");

        let (_, set) = program.member_lookup(derived, "f").unwrap();
        assert!(set.contains(&fa) && set.contains(&fb));
    }

    #[test]
    fn test_derives_from() {
        let mut program = Program::new();
        let a = program.add_class(Class::new("A".to_string(), vec![], 0..0));
        let b = program.add_class(Class::new("B".to_string(), vec![a], 0..0));
        let c = program.add_class(Class::new("C".to_string(), vec![b], 0..0));
        let other = program.add_class(Class::new("X".to_string(), vec![], 0..0));

        assert!(program.derives_from(c, a));
        assert!(program.derives_from(c, c));
        assert!(!program.derives_from(a, c));
        assert!(!program.derives_from(other, a));
    }
}
