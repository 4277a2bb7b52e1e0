//! Tests for declcall over free function calls.
//!
//! A call naming a free function resolves to a plain function pointer,
//! with the overload picked by the argument types.

use declcall_test_suite::*;

mod single_functions {
    use super::*;

    #[test]
    fn resolves_to_function_pointer() {
        Test::new("int f(int);")
            .expect(Compiles)
            .expect(Resolves::new("f(1)").to_type("int (*)(int)").to_function("f"));
    }

    #[test]
    fn no_argument_call() {
        Test::new("void g();")
            .expect(Compiles)
            .expect(Resolves::new("g()").to_type("void (*)()"));
    }

    #[test]
    fn unknown_name_is_ill_formed() {
        Test::new("int f(int);").expect(IllFormed("g(1)"));
    }

    #[test]
    fn arity_mismatch_is_ill_formed() {
        Test::new("int f(int);").expect(IllFormed("f(1, 2)"));
    }
}

mod overload_sets {
    use super::*;

    #[test]
    fn exact_match_wins() {
        Test::new("int f(int);\nint f(double);")
            .expect(Resolves::new("f(1)").to_type("int (*)(int)"))
            .expect(Resolves::new("f(1.5)").to_type("int (*)(double)"));
    }

    #[test]
    fn overloads_differ_by_arity() {
        Test::new("int f(int);\nint f(int, int);")
            .expect(Resolves::new("f(1)").to_type("int (*)(int)"))
            .expect(Resolves::new("f(1, 2)").to_type("int (*)(int, int)"));
    }

    #[test]
    fn conversion_viable_when_no_exact_match() {
        Test::new("int f(double);")
            .expect(Resolves::new("f(1)").to_type("int (*)(double)"));
    }

    #[test]
    fn ambiguous_call_is_ill_formed() {
        Test::new("int f(int, double);\nint f(double, int);").expect(IllFormed("f(1, 2)"));
    }

    #[test]
    fn no_viable_candidate_is_ill_formed() {
        Test::new("class C {};\nint f(C);").expect(IllFormed("f(1)"));
    }
}

mod derived_to_base_arguments {
    use super::*;

    #[test]
    fn derived_argument_converts_to_base_parameter() {
        Test::new("class B {};\nclass D : B {};\nint f(B&);\nD d;")
            .expect(Resolves::new("f(d)").to_type("int (*)(B&)"));
    }

    #[test]
    fn pointer_argument_converts_to_base_pointer() {
        Test::new("class B {};\nclass D : B {};\nint f(B*);\nD* p;")
            .expect(Resolves::new("f(p)").to_type("int (*)(B*)"));
    }
}

mod nested_operands {
    use super::*;

    #[test]
    fn parenthesized_operand_is_unwrapped() {
        Test::new("int f(int);")
            .expect(Resolves::new("((f(1)))").to_type("int (*)(int)"));
    }

    #[test]
    fn nested_declcall_argument_is_typed_not_evaluated() {
        Test::new("int f(int);\nint g(int (*)(int));")
            .expect(Resolves::new("g(declcall(f(1)))").to_type("int (*)(int (*)(int))"));
    }

    #[test]
    fn call_result_feeds_outer_overload_choice() {
        Test::new("double h();\nint f(int);\nint f(double);")
            .expect(Resolves::new("f(h())").to_type("int (*)(double)"));
    }
}
