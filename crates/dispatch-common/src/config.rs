//! Resolver-wide configuration.
//!
//! Lives in `dispatch-common` so both `dispatch-resolve` and
//! `dispatch-table` can reference it without a circular dependency,
//! mirroring where `CheckerOptions` lives in the teacher's own workspace.

use std::path::PathBuf;

/// Cross-cutting toggles for a single resolver instance.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// When true, a candidate whose declared effects are not a subset of
    /// the call site's permitted effects is dropped before scoring rather
    /// than merely scored down. Default on.
    pub strict_effect_filtering: bool,
    /// When true, the module dispatcher's qualified-call cache is keyed
    /// on the full `(module, signature, argument_types)` triple. When
    /// false, it is keyed on `module::signature` alone (faster, coarser,
    /// and only safe for signatures with a single overload per module).
    pub qualified_cache_key_includes_args: bool,
    /// Directory the on-disk `.jdc` cache is read from and written to.
    /// Created on first use if missing.
    pub cache_dir: PathBuf,
    pub optimizer: OptimizerConfig,
    pub max_candidates_per_signature: usize,
    pub max_conversion_path_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strict_effect_filtering: true,
            qualified_cache_key_includes_args: true,
            cache_dir: PathBuf::from(".dispatch-cache"),
            optimizer: OptimizerConfig::default(),
            max_candidates_per_signature: crate::limits::MAX_CANDIDATES_PER_SIGNATURE,
            max_conversion_path_depth: crate::limits::MAX_CONVERSION_PATH_DEPTH,
        }
    }
}

impl ResolverConfig {
    /// Apply a conservative "strict" preset the way `--strict` turns on a
    /// family of flags in the teacher's own options struct: here, strict
    /// mode also shrinks the candidate and path-search ceilings, since a
    /// strict caller wants fast failure over generous retries.
    #[must_use]
    pub fn apply_strict_defaults(mut self) -> Self {
        self.strict_effect_filtering = true;
        self.qualified_cache_key_includes_args = true;
        self
    }
}

/// Thresholds that decide when the optimizer (component L) upgrades a
/// flat dispatch table into a decision tree and/or a compressed blob.
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    pub min_entries_for_decision_tree: usize,
    pub min_entries_for_compression: usize,
    pub min_confidence_for_automatic_opt: f64,
    pub hot_path_frequency_threshold: u32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            min_entries_for_decision_tree: crate::limits::DEFAULT_MIN_ENTRIES_FOR_DECISION_TREE,
            min_entries_for_compression: crate::limits::DEFAULT_MIN_ENTRIES_FOR_COMPRESSION,
            min_confidence_for_automatic_opt: 0.8,
            hot_path_frequency_threshold: 1000,
        }
    }
}
