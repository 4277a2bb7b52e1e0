//! Tests for the rejection set.
//!
//! Call forms whose target is not an addressable function — constructors,
//! destructors, builtin and synthesized operators, allocation
//! expressions — are hard errors regardless of context.

use declcall_test_suite::*;

mod special_members {
    use super::*;

    #[test]
    fn constructor_call_is_ill_formed() {
        Test::new("class C { C(int); };").expect(IllFormed("C(1)"));
    }

    #[test]
    fn implicit_constructor_call_is_ill_formed() {
        Test::new("class C {};").expect(IllFormed("C()"));
    }

    #[test]
    fn destructor_call_is_ill_formed() {
        Test::new("class C { ~C(); };\nC* p;").expect(IllFormed("p->~C()"));
    }

    #[test]
    fn virtual_destructor_call_is_ill_formed_too() {
        Test::new("class C { virtual ~C(); };\nC c;").expect(IllFormed("c.~C()"));
    }
}

mod allocation_expressions {
    use super::*;

    #[test]
    fn new_expression_is_ill_formed() {
        Test::new("class C {};").expect(IllFormed("new C()"));
    }

    #[test]
    fn delete_expression_is_ill_formed() {
        Test::new("class C {};\nC* p;").expect(IllFormed("delete p"));
    }
}

mod builtin_operators {
    use super::*;

    #[test]
    fn arithmetic_on_builtins_is_ill_formed() {
        Test::new("int x;")
            .expect(IllFormed("x + 1"))
            .expect(IllFormed("x * 2"));
    }

    #[test]
    fn comparison_on_builtins_is_ill_formed() {
        Test::new("int x;").expect(IllFormed("x == 1"));
    }

    #[test]
    fn unary_on_builtins_is_ill_formed() {
        Test::new("int x;").expect(IllFormed("-x"));
    }

    #[test]
    fn subscript_on_pointer_is_ill_formed() {
        Test::new("int* p;").expect(IllFormed("p[0]"));
    }
}

mod synthesized_operators {
    use super::*;

    #[test]
    fn inequality_from_equality_is_ill_formed() {
        // `a != b` resolves through the rewritten `!(a == b)`, which is
        // not an addressable declaration.
        Test::new("class C { bool operator==(C&); };\nC a;\nC b;")
            .expect(Resolves::new("a == b").to_function("C::operator=="))
            .expect(IllFormed("a != b"));
    }

    #[test]
    fn relationals_from_spaceship_are_ill_formed() {
        Test::new("class C { int operator<=>(C&); };\nC a;\nC b;")
            .expect(Resolves::new("a <=> b").to_function("C::operator<=>"))
            .expect(IllFormed("a < b"))
            .expect(IllFormed("a >= b"));
    }

    #[test]
    fn declared_relational_still_resolves() {
        Test::new("class C { bool operator<(C&); };\nC a;\nC b;")
            .expect(Resolves::new("a < b").to_function("C::operator<"));
    }
}
