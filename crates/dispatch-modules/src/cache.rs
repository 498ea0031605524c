//! Qualified-call cache key (Open Question #3): the full
//! `(module, signature, argument_types)` triple, not `module::signature`
//! alone, so two qualified calls that share a module and name but differ
//! in argument types don't collide.

use dispatch_common::{ModuleId, TypeId};
use smallvec::SmallVec;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedCacheKey {
    pub module_id: ModuleId,
    pub signature_name: String,
    /// Empty when `ResolverConfig::qualified_cache_key_includes_args` is
    /// off, matching the coarser `module::signature` keying that config
    /// falls back to.
    pub arg_types: SmallVec<[TypeId; 4]>,
}

impl QualifiedCacheKey {
    #[must_use]
    pub fn new(
        module_id: ModuleId,
        signature_name: impl Into<String>,
        arg_types: &[TypeId],
        include_args: bool,
    ) -> Self {
        Self {
            module_id,
            signature_name: signature_name.into(),
            arg_types: if include_args {
                arg_types.iter().copied().collect()
            } else {
                SmallVec::new()
            },
        }
    }
}
