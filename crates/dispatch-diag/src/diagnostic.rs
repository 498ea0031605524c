//! [`NextGenDiagnostic`]: the structured, multi-hypothesis diagnostic
//! every user-visible failure path produces (§4.N).

use crate::hypothesis::{normalize_confidences, Hypothesis};
use dispatch_common::{SourceLocation, TypeId};
use dispatch_sig::Effects;
use smallvec::SmallVec;

pub use dispatch_common::DiagnosticCategory as Severity;

/// 32-byte content identity of a canonicalized AST subgraph, stable
/// across incidental id renumbering (§3, "AST node CID").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cid(pub [u8; 32]);

impl Cid {
    #[must_use]
    pub fn of(canonical_bytes: &[u8]) -> Self {
        Self(*blake3::hash(canonical_bytes).as_bytes())
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// One step in a type-flow chain: where a type came from or was narrowed,
/// and what it was at that point.
#[derive(Debug, Clone)]
pub struct TypeFlowStep {
    pub description: String,
    pub type_id: Option<TypeId>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Default)]
pub struct TypeFlowChain {
    pub steps: Vec<TypeFlowStep>,
}

impl TypeFlowChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: TypeFlowStep) {
        self.steps.push(step);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// CID-correlated semantic context: what else changed, what else is
/// related, and the scope chain the failure occurred in.
#[derive(Debug, Clone, Default)]
pub struct SemanticContext {
    pub correlated_changes: Vec<Cid>,
    pub related_cids: Vec<Cid>,
    pub scope_chain: Vec<String>,
}

/// An implementation's declared effects versus what the call site
/// actually permitted — the payload behind `missing_capability`/
/// `effect_leak`/`unhandled_effect` diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct EffectViolation {
    pub declared: Effects,
    pub permitted: Effects,
}

impl EffectViolation {
    #[must_use]
    pub fn offending(self) -> Effects {
        self.declared.difference(self.permitted)
    }
}

/// One ranked, actionable fix suggestion.
#[derive(Debug, Clone)]
pub struct FixSuggestion {
    pub description: String,
    pub rank: u32,
    pub replacement: Option<String>,
}

impl FixSuggestion {
    #[must_use]
    pub fn new(description: impl Into<String>, rank: u32) -> Self {
        Self {
            description: description.into(),
            rank,
            replacement: None,
        }
    }

    #[must_use]
    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }
}

/// The richer diagnostic every user-visible resolution/type/effect/
/// module/ownership failure produces. Built incrementally (`building`
/// state in §4.O's diagnostic lifecycle), then [`NextGenDiagnostic::finalize`]d
/// once, after which its hypothesis distribution is frozen and
/// normalized.
#[derive(Debug, Clone)]
pub struct NextGenDiagnostic {
    pub id: u64,
    pub code: String,
    pub severity: Severity,
    pub primary_location: SourceLocation,
    pub summary: String,
    pub explanation: Option<String>,
    pub suggestions: Vec<String>,
    pub educational_note: Option<String>,
    hypotheses: Vec<Hypothesis>,
    pub type_flow: Option<TypeFlowChain>,
    pub semantic_context: Option<SemanticContext>,
    pub correlated_errors: Vec<u64>,
    pub effect_violations: SmallVec<[EffectViolation; 2]>,
    pub fix_suggestions: Vec<FixSuggestion>,
    /// When set, this diagnostic is a downstream effect of the
    /// diagnostic with this id; the collector must not double-report
    /// that root (§4.N, "cascade prevention").
    pub cascade_root: Option<u64>,
    finalized: bool,
}

pub const DIAGNOSTIC_SCHEMA_VERSION: u32 = 1;

impl NextGenDiagnostic {
    #[must_use]
    pub fn new(
        id: u64,
        code: impl Into<String>,
        severity: Severity,
        primary_location: SourceLocation,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            id,
            code: code.into(),
            severity,
            primary_location,
            summary: summary.into(),
            explanation: None,
            suggestions: Vec::new(),
            educational_note: None,
            hypotheses: Vec::new(),
            type_flow: None,
            semantic_context: None,
            correlated_errors: Vec::new(),
            effect_violations: SmallVec::new(),
            fix_suggestions: Vec::new(),
            cascade_root: None,
            finalized: false,
        }
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    #[must_use]
    pub fn with_cascade_root(mut self, root_id: u64) -> Self {
        self.cascade_root = Some(root_id);
        self
    }

    pub fn add_hypothesis(&mut self, hypothesis: Hypothesis) {
        assert!(!self.finalized, "cannot add a hypothesis to a finalized diagnostic");
        self.hypotheses.push(hypothesis);
    }

    pub fn add_fix_suggestion(&mut self, suggestion: FixSuggestion) {
        self.fix_suggestions.push(suggestion);
        self.fix_suggestions.sort_by_key(|s| s.rank);
    }

    /// Freezes the hypothesis distribution, renormalizing it to sum to
    /// 1.0 (§8 invariant 8). Idempotent: calling this twice is a no-op
    /// the second time.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        let hypotheses = std::mem::take(&mut self.hypotheses);
        self.hypotheses = normalize_confidences(hypotheses);
        self.finalized = true;
    }

    #[must_use]
    pub fn hypotheses(&self) -> &[Hypothesis] {
        &self.hypotheses
    }

    #[must_use]
    pub fn primary_hypothesis(&self) -> Option<&Hypothesis> {
        self.hypotheses.first()
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    #[must_use]
    pub fn is_warning(&self) -> bool {
        matches!(self.severity, Severity::Warning)
    }
}
