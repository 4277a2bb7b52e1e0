//! Tests for the constant-expression gate.
//!
//! Calls through values — function-pointer variables and surrogate
//! conversions — are well-typed, but naming their target requires
//! evaluating the value. In a constant-expression context that is a
//! soft error; the operand of `decltype` tolerates it.

use declcall_test_suite::*;

mod pointer_calls {
    use super::*;

    #[test]
    fn call_through_pointer_variable_is_not_constant() {
        Test::new("int (*fp)(int);")
            .expect(Compiles)
            .expect(NotConstant("fp(1)"));
    }

    #[test]
    fn call_through_pointer_is_legal_type_only() {
        Test::new("int (*fp)(int);").expect(TypeOnly::new("fp(1)").to_type("int (*)(int)"));
    }

    #[test]
    fn call_through_dereferenced_pointer() {
        // `(*fp)(1)` is still a call through a value.
        Test::new("int (*fp)(int);").expect(NotConstant("(*fp)(1)"));
    }

    #[test]
    fn function_names_are_not_pointer_calls() {
        // A call naming a declared function stays constant even though
        // the name decays to a pointer in other positions.
        Test::new("int f(int);").expect(Resolves::new("f(1)"));
    }
}

mod type_only_operands {
    use super::*;

    #[test]
    fn declared_targets_resolve_in_both_contexts() {
        Test::new("int f(int);")
            .expect(Resolves::new("f(1)").to_type("int (*)(int)"))
            .expect(TypeOnly::new("f(1)").to_type("int (*)(int)"));
    }

    #[test]
    fn ill_formed_operands_stay_hard_errors_type_only() {
        // The rejection set does not soften under decltype.
        Test::new("class C { C(int); };\nint x;")
            .expect(IllFormed("C(1)"))
            .expect(IllFormed("x + 1"));
    }
}

mod nested_declcall {
    use super::*;

    #[test]
    fn nested_operand_contributes_its_type() {
        // The inner declcall is typed, not evaluated, and its pointer
        // type drives the outer overload choice.
        Test::new("int f(int);\nint g(int (*)(int));\nint g(int);")
            .expect(Resolves::new("g(declcall(f(1)))").to_type("int (*)(int (*)(int))"));
    }
}
