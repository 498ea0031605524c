//! Closed effect bitset declared by implementations and required by call
//! sites.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Effects: u32 {
        const IO       = 1 << 0;
        const ALLOC    = 1 << 1;
        const MUTATION = 1 << 2;
        const PANIC    = 1 << 3;
        const ASYNC    = 1 << 4;
    }
}

impl Effects {
    /// True if every bit set in `self` is also set in `permitted` — i.e.
    /// this implementation's effects fit within what a call site allows.
    #[must_use]
    pub fn is_subset_of(self, permitted: Effects) -> bool {
        permitted.contains(self)
    }
}
