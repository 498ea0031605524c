//! Serializer and Cache (component M): content-addressed, on-disk
//! persistence for [`dispatch_table::OptimizedDispatchTable`]s, matching
//! the `.jdc` binary format and `cache_index.json` sidecar in SPEC_FULL.md §6.

mod cache;
mod format;
mod index;
mod key;
mod wyhash;

pub use cache::DispatchCache;
pub use format::{JdcEntry, JdcFile, JdcError, OptimizationApplied, FORMAT_VERSION, MAGIC};
pub use index::{CacheIndex, CacheIndexEntry, CacheKeyJson};
pub use key::CacheKey;
pub use wyhash::wyhash64;

#[cfg(test)]
#[path = "../tests/cache_tests.rs"]
mod tests;
