//! Tests for comparing resolved target pointers.
//!
//! Pointers to the same non-virtual target compare equal. When a
//! devirtualized pointer meets a dynamic one for the same declaration,
//! the comparison has no single right answer; the outcome is
//! unspecified unless the forced-unequal policy is selected.

use declcall_test_suite::*;

mod function_pointers {
    use super::*;

    #[test]
    fn same_function_compares_equal() {
        Test::new("int f(int);")
            .expect(Compiles)
            .expect(Compare::new("f(1)", "f(2)").equal());
    }

    #[test]
    fn different_overloads_compare_unequal() {
        Test::new("int f(int);\nint f(double);")
            .expect(Compare::new("f(1)", "f(1.5)").unequal());
    }

    #[test]
    fn different_functions_compare_unequal() {
        Test::new("int f(int);\nint g(int);")
            .expect(Compare::new("f(1)", "g(1)").unequal());
    }
}

mod member_pointers {
    use super::*;

    const HIERARCHY: &str = r#"
class B { virtual int f(int); int g(int); };
class D : B { int f(int); };
B b;
D d;
"#;

    #[test]
    fn same_non_virtual_member_compares_equal() {
        Test::new(HIERARCHY).expect(Compare::new("b.g(1)", "d.g(1)").equal());
    }

    #[test]
    fn dynamic_and_devirtualized_same_member_is_unspecified() {
        Test::new(HIERARCHY).expect(Compare::new("b.f(1)", "b.B::f(1)").unspecified());
    }

    #[test]
    fn forced_unequal_policy_pins_the_mixed_case() {
        Test::new(HIERARCHY)
            .expect(Compare::new("b.f(1)", "b.B::f(1)").forced_unequal().unequal());
    }

    #[test]
    fn different_virtual_members_are_unspecified() {
        // One of them may be overridden anywhere else in the program.
        Test::new(HIERARCHY).expect(Compare::new("d.f(1)", "d.B::f(1)").unspecified());
    }

    #[test]
    fn member_and_free_function_compare_unequal() {
        Test::new("class C { int f(int); };\nint f(int);\nC c;")
            .expect(Compare::new("c.f(1)", "f(1)").unequal());
    }
}
