//! Centralized resource limits for the resolution core.
//!
//! Every recursive walk, search, or unbounded collection in this workspace
//! should bottom out in one of the constants here rather than a magic
//! number inlined at the call site. Keeping them in one place means a
//! single review can judge whether a limit is generous enough for real
//! programs without auditing every call site that uses it.

/// Maximum number of candidate implementations considered for a single
/// call site before the collector gives up and reports
/// `dispatch_no_match` with a truncated candidate list.
///
/// Real overload sets rarely exceed a few dozen implementations; a
/// signature registering more than this is almost certainly generated
/// code that should be deduplicated rather than dispatched over directly.
///
/// ```text
/// // 4000 implementations of `serialize` spread across a module graph
/// // still only contribute at most MAX_CANDIDATES_PER_SIGNATURE of them
/// // to any single resolution attempt.
/// ```
pub const MAX_CANDIDATES_PER_SIGNATURE: usize = 4096;

/// Maximum depth of a single per-argument conversion path search.
///
/// The conversion registry never chains conversions across arguments, but
/// a single argument's path can still in principle traverse multiple
/// registered conversions (e.g. `u8 -> u32 -> f64`). This bounds that
/// per-argument chain so a misconfigured conversion graph with a long or
/// cyclic-looking chain cannot make a single resolution attempt run away.
pub const MAX_CONVERSION_PATH_DEPTH: usize = 8;

/// Maximum depth of a built decision tree (component L).
///
/// A tree this deep would require more boolean discriminators than any
/// real signature declares parameters for in practice; past this depth
/// the optimizer falls back to the flat sorted-entries table instead of
/// building a tree.
pub const MAX_DECISION_TREE_DEPTH: usize = 32;

/// Guard counter ceiling for recursive AST/scope walks (e.g. scope lookup
/// walking outward through parent scopes, or a type's supertype closure
/// walk). Matches the guard-counter idiom used throughout this workspace:
/// increment a counter each iteration and bail rather than trust
/// termination of a structure that in principle could be malformed.
pub const RECURSION_GUARD_LIMIT: u32 = 4096;

/// Below this many entries, a dispatch table's optimizer does not attempt
/// to build a [`crate::span`]-adjacent decision tree at all: the flat
/// sorted array is already fast enough that a tree would only add
/// construction cost for no measurable lookup win. See
/// `OptimizerConfig::min_entries_for_decision_tree` for the
/// runtime-configurable version of this default.
pub const DEFAULT_MIN_ENTRIES_FOR_DECISION_TREE: usize = 8;

/// Below this many entries, compression is skipped outright: the blob
/// framing overhead would exceed any savings. See
/// `OptimizerConfig::min_entries_for_compression`.
pub const DEFAULT_MIN_ENTRIES_FOR_COMPRESSION: usize = 32;

/// Upper bound, in bytes, on a single cache index file before `cleanup`
/// is strongly encouraged (not enforced automatically) by the CLI's
/// `cache stats` subcommand.
pub const CACHE_INDEX_WARN_BYTES: u64 = 64 * 1024 * 1024;

/// Maximum number of hypotheses a single diagnostic may carry. Past this,
/// the confidence distribution becomes noise rather than signal, and a
/// human reading the diagnostic gains nothing from the tail entries.
pub const MAX_DIAGNOSTIC_HYPOTHESES: usize = 8;
