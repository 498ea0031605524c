//! Component D: orders implementations that all structurally match a
//! call's argument types by how precisely they match.

use crate::implementation::Implementation;
use dispatch_common::TypeId;
use dispatch_types::TypeRegistry;

#[derive(Debug, Clone)]
pub enum SpecificityResult<'a> {
    Unique(&'a Implementation),
    Ambiguous(Vec<&'a Implementation>),
    NoMatch,
}

#[derive(Debug, Default)]
pub struct SpecificityAnalyzer;

impl SpecificityAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Implementations whose arity matches `arg_types` and whose
    /// parameter types are each a supertype of (or equal to) the
    /// corresponding argument type.
    #[must_use]
    pub fn structurally_matching<'a>(
        &self,
        implementations: &'a [Implementation],
        arg_types: &[TypeId],
        types: &TypeRegistry,
    ) -> Vec<&'a Implementation> {
        implementations
            .iter()
            .filter(|imp| {
                imp.arity() == arg_types.len()
                    && imp
                        .param_type_ids
                        .iter()
                        .zip(arg_types)
                        .all(|(&param, &arg)| types.is_subtype(arg, param))
            })
            .collect()
    }

    /// `a` dominates `b` (is strictly more specific) when every
    /// parameter of `a` is a subtype of the corresponding parameter of
    /// `b`, and at least one is a strict subtype.
    #[must_use]
    pub fn dominates(&self, a: &Implementation, b: &Implementation, types: &TypeRegistry) -> bool {
        if a.arity() != b.arity() {
            return false;
        }
        let mut strictly_more_specific_somewhere = false;
        for (&pa, &pb) in a.param_type_ids.iter().zip(b.param_type_ids.iter()) {
            if !types.is_subtype(pa, pb) {
                return false;
            }
            if pa != pb {
                strictly_more_specific_somewhere = true;
            }
        }
        strictly_more_specific_somewhere
    }

    /// Resolve a structurally-matching candidate set down to one winner,
    /// applying dominance and then `specificity_rank` as a tie-break.
    #[must_use]
    pub fn resolve<'a>(
        &self,
        candidates: &[&'a Implementation],
        types: &TypeRegistry,
    ) -> SpecificityResult<'a> {
        if candidates.is_empty() {
            return SpecificityResult::NoMatch;
        }
        if candidates.len() == 1 {
            return SpecificityResult::Unique(candidates[0]);
        }

        // Keep only candidates not dominated by some other candidate.
        let maxima: Vec<&Implementation> = candidates
            .iter()
            .filter(|&&candidate| {
                !candidates
                    .iter()
                    .any(|&other| !std::ptr::eq(other, candidate) && self.dominates(other, candidate, types))
            })
            .copied()
            .collect();

        if maxima.len() == 1 {
            return SpecificityResult::Unique(maxima[0]);
        }

        let top_rank = maxima.iter().map(|i| i.specificity_rank).max().unwrap_or(0);
        let top_ranked: Vec<&Implementation> = maxima
            .into_iter()
            .filter(|i| i.specificity_rank == top_rank)
            .collect();

        if top_ranked.len() == 1 {
            SpecificityResult::Unique(top_ranked[0])
        } else {
            SpecificityResult::Ambiguous(top_ranked)
        }
    }
}
