//! Content-addressed cache key: `{signature_hash, type_signature_hash,
//! dependencies_hash}` (§4.M), resolved per Open Question #3 to cover
//! the full `(module, signature, argument_types)` triple rather than
//! `module::signature` alone.

use dispatch_common::TypeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub signature_hash: u64,
    pub type_signature_hash: u64,
    pub dependencies_hash: u64,
}

impl CacheKey {
    #[must_use]
    pub fn compute(
        module_and_signature: &str,
        arg_types: &[TypeId],
        dependency_fingerprints: &[&str],
    ) -> Self {
        let signature_hash = blake3::hash(module_and_signature.as_bytes()).as_bytes()[..8]
            .try_into()
            .map(u64::from_le_bytes)
            .unwrap_or(0);

        let mut type_bytes = Vec::with_capacity(arg_types.len() * 4);
        for ty in arg_types {
            type_bytes.extend_from_slice(&ty.0.to_le_bytes());
        }
        let type_signature_hash = blake3::hash(&type_bytes).as_bytes()[..8]
            .try_into()
            .map(u64::from_le_bytes)
            .unwrap_or(0);

        let joined = dependency_fingerprints.join("\u{1}");
        let dependencies_hash = blake3::hash(joined.as_bytes()).as_bytes()[..8]
            .try_into()
            .map(u64::from_le_bytes)
            .unwrap_or(0);

        Self {
            signature_hash,
            type_signature_hash,
            dependencies_hash,
        }
    }

    /// A filesystem-safe, content-addressed filename stem for this key.
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!(
            "{:016x}-{:016x}-{:016x}",
            self.signature_hash, self.type_signature_hash, self.dependencies_hash
        )
    }
}
