//! [`OwnershipDispatcher`]: wraps the Semantic Resolver (component I) and
//! gates its winner on ownership/capability validity before returning it.

use crate::registry::OwnershipRegistry;
use crate::state::{validate_parameter, MoveSemanticsCache, OwnershipState, OwnershipViolation};
use dispatch_common::{ResolutionMetadata, ResolverConfig};
use dispatch_convert::ConversionRegistry;
use dispatch_resolve::{
    CompatibleCandidate, ResolutionOutcome, ResolutionRequest, RejectedCandidate, SemanticResolver,
};
use dispatch_resolve::AmbiguityReason;
use dispatch_scope::{ScopeId, ScopeManager};
use dispatch_types::TypeRegistry;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone)]
pub enum OwnershipOutcome {
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
    /// The resolver chose a candidate, but it fails an ownership or
    /// capability gate: no implementation is selected (scenario 6, §8).
    OwnershipViolation {
        violation: OwnershipViolation,
        candidate: CompatibleCandidate,
        metadata: ResolutionMetadata,
    },
}

impl OwnershipOutcome {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, OwnershipOutcome::Resolved { .. })
    }
}

#[derive(Debug, Default)]
pub struct OwnershipDispatcher {
    resolver: SemanticResolver,
    move_semantics: MoveSemanticsCache,
}

impl OwnershipDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `request`, then — if a candidate was chosen — validate it
    /// against `argument_states` (one per argument, in call order) and
    /// `capabilities` (the set of capability tokens present in the calling
    /// environment) using whatever ownership signature `ownership` has on
    /// file for that candidate's `FunctionId`. A candidate with no
    /// registered signature passes through unchecked.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn resolve(
        &self,
        scopes: &ScopeManager,
        scope: ScopeId,
        request: &ResolutionRequest<'_>,
        types: &TypeRegistry,
        conversions: &ConversionRegistry,
        config: &ResolverConfig,
        ownership: &OwnershipRegistry,
        argument_states: &[OwnershipState],
        capabilities: &FxHashSet<String>,
    ) -> OwnershipOutcome {
        let outcome = self
            .resolver
            .resolve(scopes, scope, request, types, conversions, config);

        match outcome {
            ResolutionOutcome::Resolved { candidate, metadata } => {
                match self.check_candidate(&candidate, types, ownership, argument_states, capabilities) {
                    Ok(()) => OwnershipOutcome::Resolved { candidate, metadata },
                    Err(violation) => OwnershipOutcome::OwnershipViolation {
                        violation,
                        candidate,
                        metadata,
                    },
                }
            }
            ResolutionOutcome::Ambiguous {
                reason,
                candidates,
                metadata,
            } => OwnershipOutcome::Ambiguous {
                reason,
                candidates,
                metadata,
            },
            ResolutionOutcome::NoMatches { rejected, metadata } => {
                OwnershipOutcome::NoMatches { rejected, metadata }
            }
        }
    }

    fn check_candidate(
        &self,
        candidate: &CompatibleCandidate,
        types: &TypeRegistry,
        ownership: &OwnershipRegistry,
        argument_states: &[OwnershipState],
        capabilities: &FxHashSet<String>,
    ) -> Result<(), OwnershipViolation> {
        let Some(signature) = ownership.get(candidate.implementation.function_id) else {
            return Ok(());
        };

        for required in &signature.required_capabilities {
            if !capabilities.contains(required.as_str()) {
                return Err(OwnershipViolation::CapabilityMissing {
                    capability: required.clone(),
                });
            }
        }

        for (index, requirement) in signature.param_ownership.iter().enumerate() {
            let Some(&state) = argument_states.get(index) else {
                continue;
            };
            let param_type = candidate.implementation.param_type_ids[index];
            let move_semantics = self.move_semantics.get(param_type, types);
            validate_parameter(index, requirement, state, move_semantics)?;
        }

        Ok(())
    }
}
