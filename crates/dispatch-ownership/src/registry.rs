//! Per-implementation ownership declarations: what each parameter
//! requires, and what capabilities the implementation as a whole needs
//! present in the caller's environment.

use crate::state::ParameterOwnership;
use dispatch_common::FunctionId;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

#[derive(Debug, Clone, Default)]
pub struct OwnershipSignature {
    pub param_ownership: SmallVec<[ParameterOwnership; 4]>,
    pub required_capabilities: SmallVec<[String; 2]>,
}

impl OwnershipSignature {
    #[must_use]
    pub fn new(
        param_ownership: impl IntoIterator<Item = ParameterOwnership>,
        required_capabilities: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            param_ownership: param_ownership.into_iter().collect(),
            required_capabilities: required_capabilities.into_iter().collect(),
        }
    }
}

/// Maps an implementation's [`FunctionId`] to its declared ownership
/// signature. An implementation absent from this registry is treated as
/// imposing no ownership or capability requirements at all (e.g. a pure
/// value-semantics function that never appears in the spec's ownership
/// examples still dispatches normally).
#[derive(Debug, Default)]
pub struct OwnershipRegistry {
    signatures: FxHashMap<FunctionId, OwnershipSignature>,
}

impl OwnershipRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, function_id: FunctionId, signature: OwnershipSignature) {
        self.signatures.insert(function_id, signature);
    }

    #[must_use]
    pub fn get(&self, function_id: FunctionId) -> Option<&OwnershipSignature> {
        self.signatures.get(&function_id)
    }
}
