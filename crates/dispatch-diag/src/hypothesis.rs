//! Multi-hypothesis confidence distributions (§4.N, §8 invariant 8).
//!
//! A diagnostic may carry several competing explanations ("most likely
//! causes") rather than a single guess; each carries a category, a
//! human-readable description, and a probability. The distribution over
//! all of a diagnostic's hypotheses always sums to 1.0 within 1e-6.

use dispatch_common::limits::MAX_DIAGNOSTIC_HYPOTHESES;

/// One piece of supporting or refuting evidence considered when
/// recomputing a hypothesis's confidence. `strength` is in `[0.0, 1.0]`;
/// each piece of evidence shifts confidence by `±0.3 * strength` per §4.N.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evidence {
    pub supports: bool,
    pub strength: f64,
}

impl Evidence {
    #[must_use]
    pub fn supporting(strength: f64) -> Self {
        Self {
            supports: true,
            strength: strength.clamp(0.0, 1.0),
        }
    }

    #[must_use]
    pub fn refuting(strength: f64) -> Self {
        Self {
            supports: false,
            strength: strength.clamp(0.0, 1.0),
        }
    }

    fn signed_delta(self) -> f64 {
        let delta = 0.3 * self.strength;
        if self.supports {
            delta
        } else {
            -delta
        }
    }
}

/// One candidate explanation for why a diagnostic fired, with a
/// confidence derived from accumulated [`Evidence`].
#[derive(Debug, Clone, PartialEq)]
pub struct Hypothesis {
    pub category: String,
    pub description: String,
    confidence: f64,
}

impl Hypothesis {
    /// Starting confidence before any evidence is folded in. `0.5` is a
    /// neutral prior: neither preferred nor ruled out.
    const BASE_CONFIDENCE: f64 = 0.5;

    #[must_use]
    pub fn new(category: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            description: description.into(),
            confidence: Self::BASE_CONFIDENCE,
        }
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.01, 0.99);
        self
    }

    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Fold one piece of evidence into this hypothesis's confidence:
    /// `±0.3 * strength`, clamped to `[0.01, 0.99]`. Clamping here keeps a
    /// single hypothesis from collapsing to exactly 0 or 1 before the
    /// whole-distribution renormalization in
    /// [`normalize_confidences`] runs.
    pub fn apply_evidence(&mut self, evidence: Evidence) {
        self.confidence = (self.confidence + evidence.signed_delta()).clamp(0.01, 0.99);
    }
}

/// Renormalizes a set of hypotheses' confidences so they sum to 1.0,
/// truncating to at most [`MAX_DIAGNOSTIC_HYPOTHESES`] (the lowest-
/// confidence entries are dropped first, since a diagnostic's tail
/// hypotheses are the least informative). A caller with zero
/// hypotheses gets an empty (already-normalized, vacuously summing to
/// 0) vector back unchanged.
pub fn normalize_confidences(mut hypotheses: Vec<Hypothesis>) -> Vec<Hypothesis> {
    if hypotheses.is_empty() {
        return hypotheses;
    }
    hypotheses.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap());
    hypotheses.truncate(MAX_DIAGNOSTIC_HYPOTHESES);

    let total: f64 = hypotheses.iter().map(Hypothesis::confidence).sum();
    if total <= 0.0 {
        let even = 1.0 / hypotheses.len() as f64;
        for h in &mut hypotheses {
            h.confidence = even;
        }
        return hypotheses;
    }
    for h in &mut hypotheses {
        h.confidence /= total;
    }
    hypotheses
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn evidence_shifts_confidence_by_expected_magnitude() {
        let mut h = Hypothesis::new("dispatch", "ambiguous overload set").with_confidence(0.5);
        h.apply_evidence(Evidence::supporting(1.0));
        assert!((h.confidence() - 0.8).abs() < 1e-9);
        h.apply_evidence(Evidence::refuting(1.0));
        assert!((h.confidence() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn normalize_sums_to_one() {
        let hs = vec![
            Hypothesis::new("a", "first").with_confidence(0.9),
            Hypothesis::new("b", "second").with_confidence(0.9),
            Hypothesis::new("c", "third").with_confidence(0.2),
        ];
        let normalized = normalize_confidences(hs);
        let total: f64 = normalized.iter().map(Hypothesis::confidence).sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    proptest::proptest! {
        /// Invariant 8 (§8): for any non-empty set of hypotheses, however
        /// their raw confidences were derived, the renormalized
        /// distribution always sums to 1.0 within 1e-6.
        #[test]
        fn normalize_always_sums_to_one(raw_confidences in proptest::collection::vec(0.01f64..0.99, 1..20)) {
            let hs: Vec<Hypothesis> = raw_confidences
                .into_iter()
                .enumerate()
                .map(|(i, c)| Hypothesis::new(format!("cat{i}"), format!("hyp{i}")).with_confidence(c))
                .collect();
            let normalized = normalize_confidences(hs);
            let total: f64 = normalized.iter().map(Hypothesis::confidence).sum();
            prop_assert!((total - 1.0).abs() < 1e-6, "total was {total}");
        }

        /// Folding any sequence of evidence never pushes a hypothesis's
        /// confidence outside the `[0.01, 0.99]` clamp §4.N requires
        /// before renormalization runs.
        #[test]
        fn evidence_never_escapes_the_clamp(
            deltas in proptest::collection::vec((proptest::bool::ANY, 0.0f64..1.0), 0..30)
        ) {
            let mut h = Hypothesis::new("cat", "hyp");
            for (supports, strength) in deltas {
                let evidence = if supports { Evidence::supporting(strength) } else { Evidence::refuting(strength) };
                h.apply_evidence(evidence);
                prop_assert!(h.confidence() >= 0.01 && h.confidence() <= 0.99);
            }
        }
    }
}
