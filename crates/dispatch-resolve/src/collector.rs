//! Candidate Collector (component F): pre-filters by name and arity.

use dispatch_scope::{ScopeId, ScopeManager};
use dispatch_sig::Implementation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    ArityMismatch { expected: usize, found: usize },
}

#[derive(Debug, Clone)]
pub struct RejectedCandidate {
    pub implementation: Implementation,
    pub reason: RejectionReason,
}

/// The collector's output: implementations whose arity matches the call
/// site (`viable`) and implementations that shared the name but not the
/// arity (`rejected`, kept so the diagnostic system can list them as
/// alternatives rather than silently drop them).
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    pub viable: Vec<Implementation>,
    pub rejected: Vec<RejectedCandidate>,
}

impl CandidateSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.viable.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct CandidateCollector;

impl CandidateCollector {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// All implementations named `name` visible from `scope`, arity-split
    /// into viable and rejected.
    #[must_use]
    pub fn collect(
        &self,
        scopes: &ScopeManager,
        scope: ScopeId,
        name: &str,
        call_arity: usize,
    ) -> CandidateSet {
        let mut set = CandidateSet::default();
        for decl in scopes.lookup_any_arity(scope, name) {
            let implementation = decl.implementation.clone();
            if implementation.arity() == call_arity {
                set.viable.push(implementation);
            } else {
                set.rejected.push(RejectedCandidate {
                    reason: RejectionReason::ArityMismatch {
                        expected: call_arity,
                        found: implementation.arity(),
                    },
                    implementation,
                });
            }
        }
        set
    }
}
