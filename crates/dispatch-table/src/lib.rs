//! Optimized Dispatch Table and Optimizer (component L): a flat,
//! frequency-sorted runtime table per signature, with optional decision
//! tree and compressed-blob upgrades.

mod compression;
mod entries;
mod optimizer;
mod tree;

pub use compression::CompressedBlob;
pub use entries::{DispatchEntry, OptimizedDispatchTable};
pub use optimizer::{OptimizationApplied, OptimizationResult, Optimizer};
pub use tree::DecisionTreeNode;

#[cfg(test)]
#[path = "../tests/table_tests.rs"]
mod tests;
