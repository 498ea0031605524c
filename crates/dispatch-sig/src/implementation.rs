//! Component C: the Signature Analyzer turns a declared function body's
//! parameter/return/effect information into an [`Implementation`] record
//! with an initial specificity rank.

use crate::effects::Effects;
use dispatch_common::{FunctionId, ModuleId, SourceLocation, TypeId};
use smallvec::SmallVec;

/// A single concrete implementation registered for a signature (a given
/// `(name, parameter arity, effect set)` tuple may have many of these,
/// one per parameter-type tuple).
#[derive(Debug, Clone)]
pub struct Implementation {
    pub function_id: FunctionId,
    pub module_id: ModuleId,
    pub name: String,
    pub param_type_ids: SmallVec<[TypeId; 4]>,
    pub return_type_id: TypeId,
    pub effects: Effects,
    pub specificity_rank: u32,
    pub source_location: SourceLocation,
}

impl Implementation {
    #[must_use]
    pub fn arity(&self) -> usize {
        self.param_type_ids.len()
    }
}

/// Builds [`Implementation`] records from declaration data. Pure and
/// deterministic: given the same inputs it always produces the same
/// record, including the same derived `specificity_rank` when the caller
/// does not override it.
#[derive(Debug, Default)]
pub struct SignatureAnalyzer;

impl SignatureAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Derive a default specificity rank from parameter arity when the
    /// declaration did not provide one explicitly: more parameters is a
    /// weak proxy for "more specific" among otherwise-incomparable
    /// implementations, used only as the final tie-break in component D.
    #[must_use]
    pub fn derive_specificity_rank(param_count: usize) -> u32 {
        param_count as u32
    }

    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn analyze(
        &self,
        function_id: FunctionId,
        module_id: ModuleId,
        name: impl Into<String>,
        param_type_ids: impl IntoIterator<Item = TypeId>,
        return_type_id: TypeId,
        effects: Effects,
        specificity_rank: Option<u32>,
        source_location: SourceLocation,
    ) -> Implementation {
        let param_type_ids: SmallVec<[TypeId; 4]> = param_type_ids.into_iter().collect();
        let specificity_rank =
            specificity_rank.unwrap_or_else(|| Self::derive_specificity_rank(param_type_ids.len()));
        Implementation {
            function_id,
            module_id,
            name: name.into(),
            param_type_ids,
            return_type_id,
            effects,
            specificity_rank,
            source_location,
        }
    }
}
