//! Semantic Resolver (component I), pipelining the Candidate Collector
//! (F), Compatibility Analyzer (G), and Disambiguation Engine (H).

mod collector;
mod compatibility;
mod disambiguation;
mod resolver;

pub use collector::{CandidateCollector, CandidateSet, RejectedCandidate, RejectionReason};
pub use compatibility::{
    CompatibilityAnalyzer, CompatibleCandidate, MatchQuality, QUALITY_BASE_CONVERTIBLE,
    QUALITY_BASE_EXACT, QUALITY_BASE_INCOMPATIBLE,
};
pub use disambiguation::{AmbiguityReason, DisambiguationEngine, DisambiguationResult};
pub use resolver::{ResolutionOutcome, ResolutionRequest, SemanticResolver};

#[cfg(test)]
#[path = "../tests/resolve_tests.rs"]
mod tests;
