use crate::{Effects, Implementation, SignatureAnalyzer, SpecificityAnalyzer, SpecificityResult};
use dispatch_common::{FunctionId, ModuleId, SourceLocation, TypeId};
use dispatch_types::{TypeKind, TypeRegistry};
use proptest::prelude::*;

fn make_impl(
    name: &str,
    params: &[TypeId],
    specificity_rank: u32,
) -> Implementation {
    SignatureAnalyzer::new().analyze(
        FunctionId(0),
        ModuleId(0),
        name,
        params.to_vec(),
        TypeId::UNIT,
        Effects::empty(),
        Some(specificity_rank),
        SourceLocation::synthetic(),
    )
}

#[test]
fn unrelated_overloads_resolve_uniquely() {
    let types = TypeRegistry::new();
    let analyzer = SpecificityAnalyzer::new();
    let add_ints = make_impl("add", &[TypeId::I32, TypeId::I32], 2);
    let add_floats = make_impl("add", &[TypeId::F64, TypeId::F64], 2);
    let all = vec![add_ints, add_floats];

    let matching = analyzer.structurally_matching(&all, &[TypeId::I32, TypeId::I32], &types);
    let result = analyzer.resolve(&matching, &types);
    match result {
        SpecificityResult::Unique(chosen) => assert_eq!(chosen.param_type_ids[0], TypeId::I32),
        other => panic!("expected unique match, got {other:?}"),
    }
}

#[test]
fn more_specific_subtype_overload_dominates() {
    let mut types = TypeRegistry::new();
    let base = types.register_type("Base", TypeKind::TableOpen, []).unwrap();
    let derived = types
        .register_type("Derived", TypeKind::TableOpen, [base])
        .unwrap();

    let analyzer = SpecificityAnalyzer::new();
    let show_base = make_impl("show", &[base], 0);
    let show_derived = make_impl("show", &[derived], 0);
    let all = vec![show_base, show_derived];

    let matching = analyzer.structurally_matching(&all, &[derived], &types);
    let result = analyzer.resolve(&matching, &types);
    match result {
        SpecificityResult::Unique(chosen) => assert_eq!(chosen.param_type_ids[0], derived),
        other => panic!("expected unique match, got {other:?}"),
    }
}

#[test]
fn equal_specificity_is_ambiguous() {
    let types = TypeRegistry::new();
    let analyzer = SpecificityAnalyzer::new();
    let a = make_impl("f", &[TypeId::I32], 1);
    let b = make_impl("f", &[TypeId::I32], 1);
    let all = vec![a, b];

    let matching = analyzer.structurally_matching(&all, &[TypeId::I32], &types);
    let result = analyzer.resolve(&matching, &types);
    assert!(matches!(result, SpecificityResult::Ambiguous(_)));
}

#[test]
fn specificity_rank_breaks_ties_between_incomparable_candidates() {
    let types = TypeRegistry::new();
    let analyzer = SpecificityAnalyzer::new();
    let low = make_impl("f", &[TypeId::I32], 1);
    let high = make_impl("f", &[TypeId::I32], 5);
    let all = vec![low, high];

    let matching = analyzer.structurally_matching(&all, &[TypeId::I32], &types);
    let result = analyzer.resolve(&matching, &types);
    match result {
        SpecificityResult::Unique(chosen) => assert_eq!(chosen.specificity_rank, 5),
        other => panic!("expected unique match, got {other:?}"),
    }
}

#[test]
fn no_structural_match_is_no_match() {
    let types = TypeRegistry::new();
    let analyzer = SpecificityAnalyzer::new();
    let only = make_impl("f", &[TypeId::STRING], 0);
    let matching = analyzer.structurally_matching(&[only], &[TypeId::I32], &types);
    assert!(matching.is_empty());
    assert!(matches!(analyzer.resolve(&matching, &types), SpecificityResult::NoMatch));
}

proptest::proptest! {
    /// Invariant 2 (§8): build a random chain of `len` types, each a
    /// direct subtype of the previous, register one single-parameter
    /// implementation per link, and resolve against the most-derived
    /// type. The chosen implementation must always be the one declared
    /// on the most-derived link: "A more specific than B, B more
    /// specific than C" must carry through transitively to a three (or
    /// more) link chain, not just a single dominance check.
    #[test]
    fn specificity_is_transitive_over_a_subtype_chain(len in 2usize..12) {
        let mut types = TypeRegistry::new();
        let mut chain = Vec::with_capacity(len);
        for i in 0..len {
            let supers: Vec<_> = chain.last().copied().into_iter().collect();
            let id = types
                .register_type(format!("SpecChain{i}"), TypeKind::TableOpen, supers)
                .unwrap();
            chain.push(id);
        }

        let implementations: Vec<_> = chain
            .iter()
            .enumerate()
            .map(|(i, &ty)| make_impl("f", &[ty], i as u32))
            .collect();

        let analyzer = SpecificityAnalyzer::new();
        let most_derived = *chain.last().unwrap();
        let matching = analyzer.structurally_matching(&implementations, &[most_derived], &types);
        let result = analyzer.resolve(&matching, &types);
        match result {
            SpecificityResult::Unique(chosen) => {
                prop_assert_eq!(chosen.param_type_ids[0], most_derived);
            }
            other => prop_assert!(false, "expected unique resolution to the leaf type, got {other:?}"),
        }
    }

    /// Invariant 3 (§8): adding an implementation whose parameter type is
    /// unrelated to (does not dominate) any existing implementation never
    /// changes which implementation a prior, already-successful
    /// resolution picks.
    #[test]
    fn adding_a_non_dominating_overload_preserves_prior_resolution(extra_count in 0usize..8) {
        let mut types = TypeRegistry::new();
        let base = types.register_type("MonoBase", TypeKind::TableOpen, []).unwrap();
        let derived = types.register_type("MonoDerived", TypeKind::TableOpen, [base]).unwrap();

        let base_impl = make_impl("f", &[base], 0);
        let derived_impl = make_impl("f", &[derived], 0);
        let analyzer = SpecificityAnalyzer::new();

        let baseline = vec![base_impl.clone(), derived_impl.clone()];
        let matching = analyzer.structurally_matching(&baseline, &[derived], &types);
        let before = analyzer.resolve(&matching, &types);
        let SpecificityResult::Unique(before_chosen) = before else {
            panic!("baseline resolution must be unique before adding noise");
        };
        prop_assert_eq!(before_chosen.param_type_ids[0], derived);

        // Add `extra_count` implementations over freshly registered,
        // mutually unrelated types: none of them is a supertype of
        // `derived`, so none can structurally match the call and none
        // can dominate `derived_impl`.
        let mut with_noise = baseline.clone();
        for i in 0..extra_count {
            let unrelated = types
                .register_type(format!("MonoNoise{i}"), TypeKind::TableOpen, [])
                .unwrap();
            with_noise.push(make_impl("f", &[unrelated], 0));
        }

        let matching_after = analyzer.structurally_matching(&with_noise, &[derived], &types);
        let after = analyzer.resolve(&matching_after, &types);
        match after {
            SpecificityResult::Unique(after_chosen) => {
                prop_assert_eq!(after_chosen.param_type_ids[0], derived);
            }
            other => prop_assert!(false, "adding non-dominating overloads must not break resolution, got {other:?}"),
        }
    }
}
