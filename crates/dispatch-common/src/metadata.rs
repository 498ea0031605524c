//! Per-resolution telemetry, attached to every resolution outcome whether
//! it succeeded or failed. Read-only from the caller's perspective: nothing
//! in the resolver reads `ResolutionMetadata` back to make a decision.

/// Timing and bookkeeping for a single `resolve()` call. Never required
/// for correctness — only for tooling, telemetry, and deciding when the
/// optimizer (component L) should consider a signature hot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolutionMetadata {
    pub duration_ns: u64,
    pub candidates_considered: u32,
    pub cache_hit: bool,
}

impl ResolutionMetadata {
    #[must_use]
    pub const fn new(duration_ns: u64, candidates_considered: u32, cache_hit: bool) -> Self {
        Self {
            duration_ns,
            candidates_considered,
            cache_hit,
        }
    }
}
