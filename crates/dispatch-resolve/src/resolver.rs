//! Semantic Resolver (component I): Collector -> Compatibility ->
//! Disambiguation, with timing recorded in [`ResolutionMetadata`].

use crate::collector::{CandidateCollector, RejectedCandidate};
use crate::compatibility::{CompatibleCandidate, CompatibilityAnalyzer};
use crate::disambiguation::{AmbiguityReason, DisambiguationEngine, DisambiguationResult};
use dispatch_common::{ResolutionMetadata, ResolverConfig, TypeId};
use dispatch_convert::ConversionRegistry;
use dispatch_scope::{ScopeId, ScopeManager};
use dispatch_sig::Effects;
use dispatch_types::TypeRegistry;

/// A single call site to resolve: the callee name, its argument types, and
/// the effects the calling context permits.
#[derive(Debug, Clone)]
pub struct ResolutionRequest<'a> {
    pub name: &'a str,
    pub arg_types: &'a [TypeId],
    pub permitted_effects: Effects,
}

#[derive(Debug, Clone)]
pub enum ResolutionOutcome {
    Resolved {
        candidate: CompatibleCandidate,
        metadata: ResolutionMetadata,
    },
    Ambiguous {
        reason: AmbiguityReason,
        candidates: Vec<CompatibleCandidate>,
        metadata: ResolutionMetadata,
    },
    NoMatches {
        rejected: Vec<RejectedCandidate>,
        metadata: ResolutionMetadata,
    },
}

impl ResolutionOutcome {
    #[must_use]
    pub fn metadata(&self) -> &ResolutionMetadata {
        match self {
            ResolutionOutcome::Resolved { metadata, .. }
            | ResolutionOutcome::Ambiguous { metadata, .. }
            | ResolutionOutcome::NoMatches { metadata, .. } => metadata,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolutionOutcome::Resolved { .. })
    }
}

#[derive(Debug, Default)]
pub struct SemanticResolver {
    collector: CandidateCollector,
    compatibility: CompatibilityAnalyzer,
    disambiguation: DisambiguationEngine,
}

impl SemanticResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Side-effect-free except for the timing captured in the returned
    /// metadata: repeated calls with the same scope/registry state and
    /// request always produce the same outcome (invariant 1, §8).
    #[must_use]
    pub fn resolve(
        &self,
        scopes: &ScopeManager,
        scope: ScopeId,
        request: &ResolutionRequest<'_>,
        types: &TypeRegistry,
        conversions: &ConversionRegistry,
        config: &ResolverConfig,
    ) -> ResolutionOutcome {
        let start = std::time::Instant::now();

        let set = self
            .collector
            .collect(scopes, scope, request.name, request.arg_types.len());
        let scored = self.compatibility.analyze(
            &set.viable,
            request.arg_types,
            request.permitted_effects,
            config.strict_effect_filtering,
            types,
            conversions,
        );
        let candidates_considered = scored.len() as u32;
        let result = self
            .disambiguation
            .disambiguate(scored, request.arg_types, types);

        let metadata = ResolutionMetadata::new(
            start.elapsed().as_nanos() as u64,
            candidates_considered,
            false,
        );

        match result {
            DisambiguationResult::Success(candidate) => {
                ResolutionOutcome::Resolved { candidate, metadata }
            }
            DisambiguationResult::Ambiguous { reason, candidates } => {
                ResolutionOutcome::Ambiguous {
                    reason,
                    candidates,
                    metadata,
                }
            }
            DisambiguationResult::NoMatches => ResolutionOutcome::NoMatches {
                rejected: set.rejected,
                metadata,
            },
        }
    }
}
