//! Tests for virtual dispatch and qualified-access devirtualization.
//!
//! An unqualified access to a virtual member yields a pointer that
//! dispatches dynamically. A base-qualified access `d.B::f(...)` yields
//! a devirtualized pointer that calls `B::f` exactly, bypassing the
//! final overrider.

use declcall_test_suite::*;

const HIERARCHY: &str = r#"
class B { virtual int f(int); };
class D : B { int f(int); };
B b;
D d;
B* p;
B& rb;
"#;

mod dispatch_tags {
    use super::*;

    #[test]
    fn unqualified_virtual_access_is_dynamic() {
        Test::new(HIERARCHY).expect(Compiles).expect(
            Resolves::new("p->f(1)")
                .to_type("int (B::*)(int)")
                .to_function("B::f")
                .dynamic(),
        );
    }

    #[test]
    fn qualified_access_is_devirtualized() {
        Test::new(HIERARCHY).expect(
            Resolves::new("d.B::f(1)")
                .to_type("int (B::*)(int)")
                .to_function("B::f")
                .devirtualized(),
        );
    }

    #[test]
    fn qualified_access_to_non_virtual_is_plain() {
        Test::new("class B { int f(int); };\nclass D : B {};\nD d;")
            .expect(Resolves::new("d.B::f(1)").dynamic());
    }

    #[test]
    fn self_qualification_devirtualizes_too() {
        Test::new(HIERARCHY).expect(
            Resolves::new("d.D::f(1)")
                .to_function("D::f")
                .devirtualized(),
        );
    }

    #[test]
    fn qualifier_not_a_base_is_ill_formed() {
        Test::new("class A { int f(); };\nclass B { int f(); };\nB b;")
            .expect(IllFormed("b.A::f()"));
    }
}

mod invocation {
    use super::*;

    #[test]
    fn dynamic_pointer_reaches_the_final_overrider() {
        Test::new(HIERARCHY)
            .expect(Invokes::new("p->f(1)").on("D").calls("D::f"))
            .expect(Invokes::new("p->f(1)").on("B").calls("B::f"));
    }

    #[test]
    fn dynamic_dispatch_through_a_base_reference() {
        // A B& bound to a D still reaches the final overrider.
        Test::new(HIERARCHY)
            .expect(Resolves::new("rb.f(1)").to_function("B::f").dynamic())
            .expect(Invokes::new("rb.f(1)").on("D").calls("D::f"));
    }

    #[test]
    fn devirtualized_pointer_bypasses_the_overrider() {
        Test::new(HIERARCHY).expect(Invokes::new("d.B::f(1)").on("D").calls("B::f"));
    }

    #[test]
    fn overrider_found_across_a_middle_class() {
        Test::new(
            r#"
class A { virtual int f(int); };
class B : A {};
class C : B { int f(int); };
A* p;
"#,
        )
        .expect(Invokes::new("p->f(1)").on("C").calls("C::f"));
    }
}

mod pure_virtual_members {
    use super::*;

    #[test]
    fn pure_virtual_with_definition_is_callable_devirtualized() {
        Test::new(
            r#"
class B { virtual int f(int) = 0; };
class D : B { int f(int); };
int B::f(int) { }
D d;
"#,
        )
        .expect(Compiles)
        .expect(Invokes::new("d.B::f(1)").on("D").calls("B::f"));
    }

    #[test]
    fn pure_virtual_resolves_even_without_definition() {
        // Resolution is a static question; only invoking the pointer
        // demands a definition.
        Test::new("class B { virtual int f(int) = 0; };\nclass D : B { int f(int); };\nD d;")
            .expect(Resolves::new("d.B::f(1)").devirtualized());
    }
}
