//! Call-target resolution
//!
//! Builds a semantic program from a parsed translation unit and resolves
//! `declcall(expression)` operands against it: the operand is classified
//! into a call-form candidate, an overload oracle picks the target where
//! an overload set is involved, and the candidate is mapped to a typed
//! target pointer or a diagnosis.
//!
//! Diagnoses come in two kinds: `IllFormed` for operands that can never
//! be resolved, and `NotConstant` for operands whose target is well-typed
//! but requires evaluation, which only a type-only context tolerates.

pub mod diagnosis;
pub mod diagnostics;
pub mod oracle;
pub mod program_builder;
pub mod resolver;
pub mod syntax;

mod rewrite;
mod typing;

pub use diagnosis::{Diagnosis, DiagnosisKind, ResolveResult};
pub use oracle::{OverloadFailure, OverloadOracle, ScopeOracle};
pub use program_builder::{build_program, BuildResult, ProgramBuilder};
pub use resolver::{
    AccessForm, CallTargetResolver, ConstexprEligibility, EvaluationContext, LambdaCallPolicy,
    ResolvedCandidate, ResolvedTarget, ResolverOptions,
};
