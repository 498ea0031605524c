//! Decides, per table, whether to build a decision tree and/or a
//! compressed blob, governed by [`dispatch_common::OptimizerConfig`].

use crate::compression::CompressedBlob;
use crate::entries::OptimizedDispatchTable;
use crate::tree::DecisionTreeNode;
use dispatch_common::OptimizerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationApplied {
    None,
    DecisionTreeOnly,
    CompressionOnly,
    Both,
}

/// What the optimizer actually did to a table, and the estimated payoff.
#[derive(Debug, Clone, Copy)]
pub struct OptimizationResult {
    pub optimization_applied: OptimizationApplied,
    /// Estimated bytes saved by the compressed blob versus the flat
    /// `Implementation` array it indexes alongside (0 when compression
    /// wasn't applied).
    pub memory_saved: i64,
    /// Estimated fractional lookup speedup from the decision tree versus
    /// a linear scan over the same entries (0.0 when no tree was built).
    pub performance_improvement: f64,
}

/// A rough per-`Implementation` footprint, used only to estimate
/// `memory_saved`; not a precise `size_of` measurement since
/// `Implementation` owns a heap-allocated name and source text.
const ESTIMATED_IMPLEMENTATION_BYTES: usize = 128;

#[derive(Debug, Clone, Default)]
pub struct Optimizer {
    config: OptimizerConfig,
}

impl Optimizer {
    #[must_use]
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Builds a decision tree and/or compressed blob for `table` when
    /// its entry count clears the configured thresholds, and reports
    /// what it did.
    pub fn optimize(&self, table: &mut OptimizedDispatchTable) -> OptimizationResult {
        let entry_count = table.entries.len();
        let mut built_tree = false;
        let mut built_compression = false;

        if entry_count >= self.config.min_entries_for_decision_tree {
            let entry_param_types: Vec<Vec<_>> = table
                .entries
                .iter()
                .map(|e| e.implementation.param_type_ids.to_vec())
                .collect();
            let tree = DecisionTreeNode::build(&entry_param_types);
            table.decision_tree = Some(tree);
            built_tree = true;
        }

        let mut memory_saved: i64 = 0;
        if entry_count >= self.config.min_entries_for_compression {
            let entry_param_types: Vec<Vec<_>> = table
                .entries
                .iter()
                .map(|e| e.implementation.param_type_ids.to_vec())
                .collect();
            let function_ids: Vec<u32> = table
                .entries
                .iter()
                .map(|e| e.implementation.function_id.0)
                .collect();
            let blob = CompressedBlob::compress(&entry_param_types, &function_ids);
            let uncompressed_estimate = entry_count * ESTIMATED_IMPLEMENTATION_BYTES;
            memory_saved = uncompressed_estimate as i64 - blob.byte_len() as i64;
            table.compressed = Some(blob);
            built_compression = true;
        }

        let performance_improvement = if built_tree {
            // A balanced tree over `entry_count` leaves visits roughly
            // log2(entry_count) branches versus entry_count/2 expected
            // comparisons for a linear scan.
            let linear = entry_count as f64 / 2.0;
            let tree_cost = (entry_count as f64).log2().max(1.0);
            ((linear - tree_cost) / linear).max(0.0)
        } else {
            0.0
        };

        let optimization_applied = match (built_tree, built_compression) {
            (true, true) => OptimizationApplied::Both,
            (true, false) => OptimizationApplied::DecisionTreeOnly,
            (false, true) => OptimizationApplied::CompressionOnly,
            (false, false) => OptimizationApplied::None,
        };

        OptimizationResult {
            optimization_applied,
            memory_saved,
            performance_improvement,
        }
    }
}
