//! The overload resolution oracle
//!
//! Resolution proper is delegated to an injected capability: the
//! [`OverloadOracle`] trait picks the best candidate from an overload set
//! for a list of argument types. The call-target resolver is a thin
//! decision layer over the oracle and never ranks candidates itself.
//!
//! [`ScopeOracle`] is the default implementation. It models just enough
//! of overload ranking to exercise the resolver: viability by arity and
//! per-argument convertibility, exact matches preferred over conversions,
//! and elementwise comparison for the tie-break.

use declcall_model::{FunctionId, Program, Ty, TyKind};

/// Why the oracle could not pick a single candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverloadFailure {
    /// No candidate accepts the argument list
    NoViable,
    /// More than one candidate is equally good
    Ambiguous(Vec<FunctionId>),
}

/// The injected overload resolution capability
pub trait OverloadOracle {
    /// Select the best candidate for the given argument types, or report
    /// why none can be chosen.
    fn select(
        &self,
        program: &Program,
        candidates: &[FunctionId],
        arguments: &[Ty],
    ) -> Result<FunctionId, OverloadFailure>;
}

/// How well one argument matches one parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Exact,
    Conversion,
}

/// The default oracle: ranks candidates over the program's scope rules
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeOracle;

impl ScopeOracle {
    pub fn new() -> Self {
        Self
    }

    /// How `argument` converts to `parameter`, if at all
    fn rank(program: &Program, argument: &Ty, parameter: &Ty) -> Option<Rank> {
        if argument.same_type(parameter) {
            return Some(Rank::Exact);
        }

        // Reference binding: D -> B& and B -> const B& style bindings
        // reduce to the referent.
        if let TyKind::Reference(referent) = parameter.kind() {
            return match Self::rank(program, argument, referent) {
                Some(Rank::Exact) => Some(Rank::Exact),
                other => other,
            };
        }

        if argument.is_arithmetic() && parameter.is_arithmetic() {
            return Some(Rank::Conversion);
        }

        // Derived-to-base conversions, by value/reference and by pointer
        if let (Some(from), Some(to)) = (argument.as_class(), parameter.as_class()) {
            if program.derives_from(from, to) {
                return Some(Rank::Conversion);
            }
        }
        if let (TyKind::Pointer(from), TyKind::Pointer(to)) = (argument.kind(), parameter.kind()) {
            if let (Some(from), Some(to)) = (from.as_class(), to.as_class()) {
                if from != to && program.derives_from(from, to) {
                    return Some(Rank::Conversion);
                }
            }
        }

        None
    }

    /// Rank a whole candidate, `None` if not viable
    fn rank_candidate(
        program: &Program,
        candidate: FunctionId,
        arguments: &[Ty],
    ) -> Option<Vec<Rank>> {
        let signature = program.function(candidate).signature();
        if signature.arity() != arguments.len() {
            return None;
        }
        arguments
            .iter()
            .zip(signature.params().iter())
            .map(|(arg, param)| Self::rank(program, arg, param))
            .collect()
    }

    /// Elementwise comparison: better iff no rank is worse and at least
    /// one is strictly better
    fn better(a: &[Rank], b: &[Rank]) -> bool {
        let none_worse = a.iter().zip(b.iter()).all(|(x, y)| x <= y);
        let some_better = a.iter().zip(b.iter()).any(|(x, y)| x < y);
        none_worse && some_better
    }
}

impl OverloadOracle for ScopeOracle {
    fn select(
        &self,
        program: &Program,
        candidates: &[FunctionId],
        arguments: &[Ty],
    ) -> Result<FunctionId, OverloadFailure> {
        let viable: Vec<(FunctionId, Vec<Rank>)> = candidates
            .iter()
            .filter_map(|&c| Self::rank_candidate(program, c, arguments).map(|ranks| (c, ranks)))
            .collect();

        if viable.is_empty() {
            return Err(OverloadFailure::NoViable);
        }
        if viable.len() == 1 {
            return Ok(viable[0].0);
        }

        // A candidate wins only if it is better than every other viable one
        for (candidate, ranks) in &viable {
            if viable
                .iter()
                .filter(|(other, _)| other != candidate)
                .all(|(_, other_ranks)| Self::better(ranks, other_ranks))
            {
                return Ok(*candidate);
            }
        }

        Err(OverloadFailure::Ambiguous(
            viable.into_iter().map(|(c, _)| c).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declcall_model::{Class, Function, FunctionKind, Signature};

    fn free_fn(program: &mut Program, name: &str, params: Vec<Ty>) -> FunctionId {
        program.add_function(Function::new(
            name.to_string(),
            None,
            FunctionKind::Free,
            Signature::new(params, Ty::int(0..0)),
            0..0,
        ))
    }

    #[test]
    fn test_exact_match_beats_conversion() {
        let mut program = Program::new();
        let int_overload = free_fn(&mut program, "f", vec![Ty::int(0..0)]);
        let double_overload = free_fn(&mut program, "f", vec![Ty::double(0..0)]);
        let oracle = ScopeOracle::new();

        let selected = oracle
            .select(
                &program,
                &[int_overload, double_overload],
                &[Ty::int(0..0)],
            )
            .unwrap();
        assert_eq!(selected, int_overload);

        let selected = oracle
            .select(
                &program,
                &[int_overload, double_overload],
                &[Ty::double(0..0)],
            )
            .unwrap();
        assert_eq!(selected, double_overload);
    }

    #[test]
    fn test_arity_filters_candidates() {
        let mut program = Program::new();
        let unary = free_fn(&mut program, "f", vec![Ty::int(0..0)]);
        let binary = free_fn(&mut program, "f", vec![Ty::int(0..0), Ty::int(0..0)]);
        let oracle = ScopeOracle::new();

        let selected = oracle
            .select(&program, &[unary, binary], &[Ty::int(0..0), Ty::int(0..0)])
            .unwrap();
        assert_eq!(selected, binary);
    }

    #[test]
    fn test_no_viable_candidate() {
        let mut program = Program::new();
        let class = program.add_class(Class::new("B".to_string(), vec![], 0..0));
        let f = free_fn(&mut program, "f", vec![Ty::class(class, 0..0)]);
        let oracle = ScopeOracle::new();

        assert_eq!(
            oracle.select(&program, &[f], &[Ty::int(0..0)]),
            Err(OverloadFailure::NoViable)
        );
    }

    #[test]
    fn test_ambiguous_conversions() {
        let mut program = Program::new();
        // char argument converts equally well to int or double
        let int_overload = free_fn(&mut program, "f", vec![Ty::int(0..0)]);
        let double_overload = free_fn(&mut program, "f", vec![Ty::double(0..0)]);
        let oracle = ScopeOracle::new();

        let result = oracle.select(&program, &[int_overload, double_overload], &[Ty::char(0..0)]);
        assert!(matches!(result, Err(OverloadFailure::Ambiguous(_))));
    }

    #[test]
    fn test_derived_to_base_conversion() {
        let mut program = Program::new();
        let base = program.add_class(Class::new("B".to_string(), vec![], 0..0));
        let derived = program.add_class(Class::new("D".to_string(), vec![base], 0..0));
        let takes_base = free_fn(
            &mut program,
            "f",
            vec![Ty::pointer(Ty::class(base, 0..0), 0..0)],
        );
        let oracle = ScopeOracle::new();

        let selected = oracle
            .select(
                &program,
                &[takes_base],
                &[Ty::pointer(Ty::class(derived, 0..0), 0..0)],
            )
            .unwrap();
        assert_eq!(selected, takes_base);
    }
}
