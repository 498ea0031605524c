//! Disambiguation Engine (component H): picks one winner from a scored
//! candidate list, or reports precisely why it could not.

use crate::compatibility::{CompatibleCandidate, MatchQuality, QUALITY_BASE_EXACT};
use dispatch_common::TypeId;
use dispatch_sig::{Implementation, SpecificityAnalyzer, SpecificityResult};
use dispatch_types::TypeRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbiguityReason {
    MultipleExactMatches,
    EqualConversionCost,
    EqualSpecificity,
}

#[derive(Debug, Clone)]
pub enum DisambiguationResult {
    Success(CompatibleCandidate),
    Ambiguous {
        reason: AmbiguityReason,
        candidates: Vec<CompatibleCandidate>,
    },
    NoMatches,
}

#[derive(Debug, Default)]
pub struct DisambiguationEngine {
    specificity: SpecificityAnalyzer,
}

impl DisambiguationEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            specificity: SpecificityAnalyzer::new(),
        }
    }

    /// `candidates` should be every `CompatibleCandidate` the compatibility
    /// analyzer produced for one call site, including `incompatible` ones
    /// — they are dropped here (Open Question #1), not upstream, so that
    /// earlier stages can still hand them to the diagnostic system.
    #[must_use]
    pub fn disambiguate(
        &self,
        candidates: Vec<CompatibleCandidate>,
        _arg_types: &[TypeId],
        types: &TypeRegistry,
    ) -> DisambiguationResult {
        let mut candidates: Vec<CompatibleCandidate> = candidates
            .into_iter()
            .filter(|c| c.quality != MatchQuality::Incompatible)
            .collect();
        if candidates.is_empty() {
            return DisambiguationResult::NoMatches;
        }

        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        let top_score = candidates[0].score;
        let tied: Vec<CompatibleCandidate> = candidates
            .into_iter()
            .take_while(|c| c.score == top_score)
            .collect();

        if tied.len() == 1 {
            return DisambiguationResult::Success(tied.into_iter().next().unwrap());
        }

        let impls: Vec<&Implementation> = tied.iter().map(|c| &c.implementation).collect();
        match self.specificity.resolve(&impls, types) {
            SpecificityResult::Unique(winner) => {
                let idx = impls
                    .iter()
                    .position(|&imp| std::ptr::eq(imp, winner))
                    .expect("specificity winner must come from the tied slice");
                DisambiguationResult::Success(tied[idx].clone())
            }
            SpecificityResult::Ambiguous(_) | SpecificityResult::NoMatch => {
                let reason = Self::classify_ambiguity(top_score, &tied);
                DisambiguationResult::Ambiguous {
                    reason,
                    candidates: tied,
                }
            }
        }
    }

    fn classify_ambiguity(top_score: u32, tied: &[CompatibleCandidate]) -> AmbiguityReason {
        if top_score == QUALITY_BASE_EXACT && tied.iter().all(|c| c.quality == MatchQuality::Exact) {
            AmbiguityReason::MultipleExactMatches
        } else if tied.iter().all(|c| c.quality == MatchQuality::Convertible) {
            AmbiguityReason::EqualConversionCost
        } else {
            AmbiguityReason::EqualSpecificity
        }
    }
}
