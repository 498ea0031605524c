//! Visibility shared by scope-level declarations (component E) and
//! module-level exports (component K), so the two components agree on one
//! notion of "who can see this" instead of keeping parallel enums.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// Visible to any importer.
    Public,
    /// Visible within the declaring module and its descendants.
    Protected,
    /// Visible only within the declaring module.
    Internal,
}

impl Visibility {
    /// True if a looker-upper outside the declaring module may see this
    /// declaration at all (protected still requires a descendant-module
    /// check the caller performs separately; this only rules out the
    /// always-false case).
    #[must_use]
    pub const fn is_externally_visible(self) -> bool {
        !matches!(self, Visibility::Internal)
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::Public
    }
}
