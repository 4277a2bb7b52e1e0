//! Tests for calls through immediately invoked lambdas.
//!
//! `[]{ return fp; }()(1)` calls through the pointer the lambda returns.
//! Whether the lambda invocation itself is tolerated is a policy choice;
//! both behaviors are pinned here.

use declcall_test_suite::*;

const DECLS: &str = "int (*fp)(int);";

mod reject_policy {
    use super::*;

    #[test]
    fn lambda_call_is_ill_formed_by_default() {
        Test::new(DECLS)
            .expect(Compiles)
            .expect(IllFormed("[]{ return fp; }()(1)"));
    }

    #[test]
    fn direct_lambda_invocation_is_ill_formed_too() {
        Test::new(DECLS).expect(IllFormed("[]{ return fp; }()"));
    }
}

mod resolve_result_policy {
    use super::*;

    #[test]
    fn outer_call_behaves_like_a_pointer_call() {
        Test::new(DECLS)
            .with_lambda_policy(LambdaCallPolicy::ResolveResult)
            .expect(NotConstant("[]{ return fp; }()(1)"))
            .expect(TypeOnly::new("[]{ return fp; }()(1)").to_type("int (*)(int)"));
    }

    #[test]
    fn direct_lambda_invocation_is_still_not_constant() {
        // The target is the closure's call operator; naming it requires
        // evaluating the lambda expression.
        Test::new(DECLS)
            .with_lambda_policy(LambdaCallPolicy::ResolveResult)
            .expect(NotConstant("[]{ return fp; }()"));
    }
}
