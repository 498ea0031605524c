//! Compatibility Analyzer (component G): scores each candidate against
//! the call site's argument types.

use dispatch_common::TypeId;
use dispatch_convert::{ArgumentConversion, ConversionPath, ConversionRegistry};
use dispatch_sig::{Effects, Implementation};
use dispatch_types::TypeRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchQuality {
    Exact,
    Convertible,
    Incompatible,
}

pub const QUALITY_BASE_EXACT: u32 = 1000;
pub const QUALITY_BASE_CONVERTIBLE: u32 = 500;
pub const QUALITY_BASE_INCOMPATIBLE: u32 = 0;

#[derive(Debug, Clone)]
pub struct CompatibleCandidate {
    pub implementation: Implementation,
    pub conversion_path: ConversionPath,
    pub quality: MatchQuality,
    pub score: u32,
}

impl CompatibleCandidate {
    fn incompatible(implementation: Implementation) -> Self {
        Self {
            implementation,
            conversion_path: ConversionPath::default(),
            quality: MatchQuality::Incompatible,
            score: QUALITY_BASE_INCOMPATIBLE,
        }
    }
}

#[derive(Debug, Default)]
pub struct CompatibilityAnalyzer;

impl CompatibilityAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Score every candidate. A candidate whose declared effects are not a
    /// subset of `permitted_effects` is dropped outright when
    /// `strict_effect_filtering` is set (Open Question #2) — it never even
    /// reaches an `incompatible` score, since effect mismatches are a hard
    /// filter rather than something the diagnostic system enumerates as a
    /// "nearly matched" alternative.
    #[must_use]
    pub fn analyze(
        &self,
        candidates: &[Implementation],
        arg_types: &[TypeId],
        permitted_effects: Effects,
        strict_effect_filtering: bool,
        types: &TypeRegistry,
        conversions: &ConversionRegistry,
    ) -> Vec<CompatibleCandidate> {
        candidates
            .iter()
            .filter(|imp| !strict_effect_filtering || imp.effects.is_subset_of(permitted_effects))
            .map(|imp| Self::score_one(imp, arg_types, types, conversions))
            .collect()
    }

    fn score_one(
        implementation: &Implementation,
        arg_types: &[TypeId],
        types: &TypeRegistry,
        conversions: &ConversionRegistry,
    ) -> CompatibleCandidate {
        if implementation.arity() != arg_types.len() {
            return CompatibleCandidate::incompatible(implementation.clone());
        }

        let mut per_argument: Vec<ArgumentConversion> = Vec::with_capacity(arg_types.len());
        let mut all_exact = true;
        for (&param, &arg) in implementation.param_type_ids.iter().zip(arg_types) {
            if param == arg {
                per_argument.push(ArgumentConversion::identity());
                continue;
            }
            all_exact = false;
            // Subtyping covers ordinary upcasting (passing a Derived where
            // a Base is expected) at zero cost; it is not a registered
            // "conversion" — conversions are reserved for genuine
            // representation changes (numeric widening/narrowing etc).
            if types.is_subtype(arg, param) {
                per_argument.push(ArgumentConversion::identity());
                continue;
            }
            match conversions.find_single_argument_path(arg, param) {
                Some(step) => per_argument.push(step),
                None => return CompatibleCandidate::incompatible(implementation.clone()),
            }
        }

        let conversion_path = ConversionPath { per_argument };
        let quality = if all_exact {
            MatchQuality::Exact
        } else {
            MatchQuality::Convertible
        };
        let base = match quality {
            MatchQuality::Exact => QUALITY_BASE_EXACT,
            MatchQuality::Convertible => QUALITY_BASE_CONVERTIBLE,
            MatchQuality::Incompatible => QUALITY_BASE_INCOMPATIBLE,
        };
        let score = base.saturating_sub(conversion_path.total_cost());
        CompatibleCandidate {
            implementation: implementation.clone(),
            conversion_path,
            quality,
            score,
        }
    }
}
