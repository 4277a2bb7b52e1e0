//! Declcall Test Suite
//!
//! A fluent test API for the call-target resolver.
//!
//! # Example
//!
//! ```
//! use declcall_test_suite::*;
//!
//! Test::new("int f(int);\nint f(double);")
//!     .expect(Compiles)
//!     .expect(Resolves::new("f(1)").to_type("int (*)(int)"));
//! ```
//!
//! # Available Expectations
//!
//! ```
//! use declcall_test_suite::*;
//!
//! // Declarations compile (or fail)
//! Compiles;
//! Fails;
//! HasError("no matching overload");
//!
//! // An operand resolves to a target pointer
//! Resolves::new("d.B::f(1)")
//!     .to_type("int (B::*)(int)")
//!     .devirtualized();
//!
//! // An operand is rejected, by kind
//! IllFormed("C(1)");
//! NotConstant("fp(1)");
//!
//! // A type-only context tolerates value-dependent targets
//! TypeOnly::new("fp(1)").to_type("int (*)(int)");
//! ```

use declcall_compiler::{Compilation, EvaluationContext, ResolverOptions};
use declcall_model::invoke;
use declcall_resolver::{Diagnosis, DiagnosisKind, ResolvedTarget};

// Re-export the types tests configure expectations with
pub use declcall_compiler::LambdaCallPolicy;
pub use declcall_model::ComparisonPolicy;

/// Test context containing the compiled declarations
pub struct TestContext {
    pub compilation: Compilation,
}

impl TestContext {
    fn resolve(&self, operand: &str, context: EvaluationContext) -> Result<ResolvedTarget, Diagnosis> {
        self.compilation.resolve_operand(operand, context)
    }
}

/// A test case over a set of declarations
pub struct Test {
    files: Vec<(String, String)>,
    options: ResolverOptions,
    context: Option<TestContext>,
}

impl Test {
    /// Create a new test from a single declaration source
    pub fn new(source: &str) -> Self {
        Test {
            files: vec![("test.cpp".to_string(), source.to_string())],
            options: ResolverOptions::default(),
            context: None,
        }
    }

    /// Create a test from multiple source files
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        Test {
            files: files
                .iter()
                .map(|(name, content)| (name.to_string(), content.to_string()))
                .collect(),
            options: ResolverOptions::default(),
            context: None,
        }
    }

    /// Set the policy for calls through immediately invoked lambdas
    pub fn with_lambda_policy(mut self, policy: LambdaCallPolicy) -> Self {
        self.options.lambda_calls = policy;
        self
    }

    /// Compile the declarations and store the result
    fn compile(&mut self) {
        if self.context.is_some() {
            return; // Already compiled
        }

        let mut builder = Compilation::builder().with_resolver_options(self.options);
        for (name, content) in &self.files {
            builder = builder.add_source(name.clone(), content.clone());
        }

        self.context = Some(TestContext {
            compilation: builder.build(),
        });
    }

    /// Apply an expectation to this test
    pub fn expect<E: Expectable>(mut self, expectation: E) -> Self {
        self.compile();
        let ctx = self.context.as_ref().unwrap();
        if let Err(e) = expectation.check(ctx) {
            if ctx.compilation.diagnostics().len() > 0 {
                eprintln!("\n--- Compiler Diagnostics ---");
                ctx.compilation.diagnostics().emit().ok();
            }
            panic!("Expectation failed: {}", e);
        }
        self
    }
}

/// Trait for test expectations
pub trait Expectable {
    fn check(&self, ctx: &TestContext) -> Result<(), String>;
}

/// Expects the declarations to compile with no errors
pub struct Compiles;

impl Expectable for Compiles {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        if ctx.compilation.has_errors() {
            Err(format!(
                "Expected compilation to succeed, but got {} error(s)",
                ctx.compilation.diagnostics().len()
            ))
        } else {
            Ok(())
        }
    }
}

/// Expects compilation of the declarations to fail
pub struct Fails;

impl Expectable for Fails {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        if ctx.compilation.has_errors() {
            Ok(())
        } else {
            Err("Expected compilation to fail, but it succeeded".to_string())
        }
    }
}

/// Expects a compilation error containing a specific message
pub struct HasError(pub &'static str);

impl Expectable for HasError {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        if !ctx.compilation.has_errors() {
            return Err("Expected compilation to fail with an error, but it succeeded".to_string());
        }

        let has_matching_error = ctx
            .compilation
            .diagnostics()
            .diagnostics()
            .iter()
            .any(|diag| diag.message.contains(self.0));

        if has_matching_error {
            Ok(())
        } else {
            let actual_errors: Vec<_> = ctx
                .compilation
                .diagnostics()
                .diagnostics()
                .iter()
                .map(|d| d.message.as_str())
                .collect();
            Err(format!(
                "Expected an error containing '{}', but got: {:?}",
                self.0, actual_errors
            ))
        }
    }
}

/// Expects an operand to resolve to a target pointer in a
/// constant-expression context, with chainable checks on the result
pub struct Resolves {
    operand: String,
    ty: Option<String>,
    function: Option<String>,
    devirtualized: Option<bool>,
}

impl Resolves {
    pub fn new(operand: &str) -> Self {
        Resolves {
            operand: operand.to_string(),
            ty: None,
            function: None,
            devirtualized: None,
        }
    }

    /// Assert the rendered type of the target pointer
    pub fn to_type(mut self, ty: &str) -> Self {
        self.ty = Some(ty.to_string());
        self
    }

    /// Assert the qualified name of the selected function
    pub fn to_function(mut self, name: &str) -> Self {
        self.function = Some(name.to_string());
        self
    }

    /// Assert the pointer carries the devirtualized dispatch tag
    pub fn devirtualized(mut self) -> Self {
        self.devirtualized = Some(true);
        self
    }

    /// Assert the pointer dispatches dynamically
    pub fn dynamic(mut self) -> Self {
        self.devirtualized = Some(false);
        self
    }
}

impl Expectable for Resolves {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        let target = ctx
            .resolve(&self.operand, EvaluationContext::ConstantExpression)
            .map_err(|d| format!("'{}' did not resolve: {:?}", self.operand, d))?;
        let program = ctx.compilation.program();

        let pointer = target
            .pointer
            .as_ref()
            .ok_or_else(|| format!("'{}' resolved without a pointer value", self.operand))?;

        if let Some(expected) = &self.ty {
            let actual = target.ty.display(program);
            if &actual != expected {
                return Err(format!(
                    "'{}' resolved to type '{}', expected '{}'",
                    self.operand, actual, expected
                ));
            }
        }

        if let Some(expected) = &self.function {
            let actual = program.function(pointer.function()).qualified_name(program);
            if &actual != expected {
                return Err(format!(
                    "'{}' selected '{}', expected '{}'",
                    self.operand, actual, expected
                ));
            }
        }

        if let Some(expected) = self.devirtualized {
            if pointer.is_devirtualized() != expected {
                return Err(format!(
                    "'{}' has devirtualized = {}, expected {}",
                    self.operand,
                    pointer.is_devirtualized(),
                    expected
                ));
            }
        }

        Ok(())
    }
}

/// Expects an operand to be rejected as ill-formed
pub struct IllFormed(pub &'static str);

impl Expectable for IllFormed {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        match ctx.resolve(self.0, EvaluationContext::ConstantExpression) {
            Err(d) if d.kind() == DiagnosisKind::IllFormed => Ok(()),
            Err(d) => Err(format!(
                "'{}' was rejected, but softly: {:?}",
                self.0, d
            )),
            Ok(_) => Err(format!("'{}' resolved, expected ill-formed", self.0)),
        }
    }
}

/// Expects an operand to be rejected as non-constant in a
/// constant-expression context
pub struct NotConstant(pub &'static str);

impl Expectable for NotConstant {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        match ctx.resolve(self.0, EvaluationContext::ConstantExpression) {
            Err(d) if d.kind() == DiagnosisKind::NotConstant => Ok(()),
            Err(d) => Err(format!(
                "'{}' was rejected, but as a hard error: {:?}",
                self.0, d
            )),
            Ok(_) => Err(format!("'{}' resolved, expected not-constant", self.0)),
        }
    }
}

/// Expects an operand to resolve in a type-only context, with an
/// optional check on the resulting type
pub struct TypeOnly {
    operand: String,
    ty: Option<String>,
}

impl TypeOnly {
    pub fn new(operand: &str) -> Self {
        TypeOnly {
            operand: operand.to_string(),
            ty: None,
        }
    }

    pub fn to_type(mut self, ty: &str) -> Self {
        self.ty = Some(ty.to_string());
        self
    }
}

impl Expectable for TypeOnly {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        let target = ctx
            .resolve(&self.operand, EvaluationContext::TypeOnly)
            .map_err(|d| format!("'{}' did not resolve type-only: {:?}", self.operand, d))?;

        if let Some(expected) = &self.ty {
            let actual = target.ty.display(ctx.compilation.program());
            if &actual != expected {
                return Err(format!(
                    "'{}' has type '{}', expected '{}'",
                    self.operand, actual, expected
                ));
            }
        }

        Ok(())
    }
}

/// Expects following a resolved pointer on an object of a given dynamic
/// class to reach a specific function
pub struct Invokes {
    operand: String,
    dynamic_class: Option<String>,
    calls: String,
}

impl Invokes {
    pub fn new(operand: &str) -> Self {
        Invokes {
            operand: operand.to_string(),
            dynamic_class: None,
            calls: String::new(),
        }
    }

    /// The dynamic class of the object the pointer is applied to
    pub fn on(mut self, class: &str) -> Self {
        self.dynamic_class = Some(class.to_string());
        self
    }

    /// The qualified name of the function that must run
    pub fn calls(mut self, name: &str) -> Self {
        self.calls = name.to_string();
        self
    }
}

impl Expectable for Invokes {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        let target = ctx
            .resolve(&self.operand, EvaluationContext::ConstantExpression)
            .map_err(|d| format!("'{}' did not resolve: {:?}", self.operand, d))?;
        let program = ctx.compilation.program();

        let pointer = target
            .pointer
            .as_ref()
            .ok_or_else(|| format!("'{}' resolved without a pointer value", self.operand))?;

        let object_class = match &self.dynamic_class {
            Some(name) => Some(program.class_by_name(name).ok_or_else(|| {
                format!("no class named '{}' in the test declarations", name)
            })?),
            None => None,
        };

        let reached = invoke(program, pointer, object_class)
            .map_err(|e| format!("invoking '{}' failed: {:?}", self.operand, e))?;
        let actual = program.function(reached).qualified_name(program);

        if actual != self.calls {
            return Err(format!(
                "'{}' invoked '{}', expected '{}'",
                self.operand, actual, self.calls
            ));
        }

        Ok(())
    }
}

/// Expects a comparison between two resolved pointers to produce a
/// given outcome under a given policy
pub struct Compare {
    left: String,
    right: String,
    policy: ComparisonPolicy,
    outcome: Option<bool>,
}

impl Compare {
    pub fn new(left: &str, right: &str) -> Self {
        Compare {
            left: left.to_string(),
            right: right.to_string(),
            policy: ComparisonPolicy::Unspecified,
            outcome: None,
        }
    }

    /// Compare under the forced-unequal policy
    pub fn forced_unequal(mut self) -> Self {
        self.policy = ComparisonPolicy::ForcedUnequal;
        self
    }

    pub fn equal(mut self) -> Self {
        self.outcome = Some(true);
        self
    }

    pub fn unequal(mut self) -> Self {
        self.outcome = Some(false);
        self
    }

    /// The comparison has no specified result
    pub fn unspecified(mut self) -> Self {
        self.outcome = None;
        self
    }
}

impl Expectable for Compare {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        let program = ctx.compilation.program();
        let resolve = |operand: &str| {
            ctx.resolve(operand, EvaluationContext::ConstantExpression)
                .map_err(|d| format!("'{}' did not resolve: {:?}", operand, d))?
                .pointer
                .ok_or_else(|| format!("'{}' resolved without a pointer value", operand))
        };

        let left = resolve(&self.left)?;
        let right = resolve(&self.right)?;
        let actual = left.compare(&right, self.policy, program);

        if actual != self.outcome {
            return Err(format!(
                "comparing '{}' and '{}' gave {:?}, expected {:?}",
                self.left, self.right, actual, self.outcome
            ));
        }

        Ok(())
    }
}
