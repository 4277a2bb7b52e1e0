//! Tests for declcall over user-declared operator functions.
//!
//! Operator expressions are rewritten to member operator calls; the
//! selected operator function is as addressable as any other member.

use declcall_test_suite::*;

mod binary_operators {
    use super::*;

    #[test]
    fn declared_operator_resolves_to_member_pointer() {
        Test::new("class C { int operator+(int); };\nC c;")
            .expect(Compiles)
            .expect(
                Resolves::new("c + 1")
                    .to_type("int (C::*)(int)")
                    .to_function("C::operator+"),
            );
    }

    #[test]
    fn operator_overloads_are_ranked() {
        Test::new("class C { int operator+(int); int operator+(double); };\nC c;")
            .expect(Resolves::new("c + 1.5").to_type("int (C::*)(double)"));
    }

    #[test]
    fn operator_taking_class_operand() {
        Test::new("class C { bool operator==(C&); };\nC a;\nC b;")
            .expect(Resolves::new("a == b").to_type("bool (C::*)(C&)"));
    }

    #[test]
    fn no_viable_operator_is_ill_formed() {
        Test::new("class C { int operator+(int); };\nclass D {};\nC c;\nD d;")
            .expect(IllFormed("c + d"));
    }
}

mod unary_operators {
    use super::*;

    #[test]
    fn declared_negation_resolves() {
        Test::new("class C { C operator-(); };\nC c;")
            .expect(Resolves::new("-c").to_function("C::operator-"));
    }

    #[test]
    fn declared_logical_not_resolves() {
        Test::new("class C { bool operator!(); };\nC c;")
            .expect(Resolves::new("!c").to_type("bool (C::*)()"));
    }
}

mod call_operators {
    use super::*;

    #[test]
    fn call_operator_resolves_through_object() {
        Test::new("class Less { bool operator()(int, int); };\nLess less;")
            .expect(
                Resolves::new("less(1, 2)")
                    .to_type("bool (Less::*)(int, int)")
                    .to_function("Less::operator()"),
            );
    }

    #[test]
    fn call_operator_overloads_are_ranked() {
        Test::new("class F { int operator()(int); int operator()(double); };\nF f;")
            .expect(Resolves::new("f(1)").to_type("int (F::*)(int)"));
    }

    #[test]
    fn object_without_call_operator_is_ill_formed() {
        Test::new("class C {};\nC c;").expect(IllFormed("c(1)"));
    }
}

mod index_operators {
    use super::*;

    #[test]
    fn declared_subscript_resolves() {
        Test::new("class V { int operator[](int); };\nV v;")
            .expect(
                Resolves::new("v[0]")
                    .to_type("int (V::*)(int)")
                    .to_function("V::operator[]"),
            );
    }

    #[test]
    fn missing_subscript_is_ill_formed() {
        Test::new("class V {};\nV v;").expect(IllFormed("v[0]"));
    }
}

mod surrogate_calls {
    use super::*;

    #[test]
    fn conversion_to_function_pointer_acts_as_surrogate() {
        // Calling through the converted pointer is well-typed, but the
        // pointer value itself is not a constant.
        Test::new("class C { operator int(*)(int)(); };\nC c;")
            .expect(NotConstant("c(1)"))
            .expect(TypeOnly::new("c(1)").to_type("int (*)(int)"));
    }

    #[test]
    fn declared_call_operator_beats_surrogates() {
        Test::new(
            "class C { int operator()(int); operator int(*)(int)(); };\nC c;",
        )
        .expect(Resolves::new("c(1)").to_function("C::operator()"));
    }
}
