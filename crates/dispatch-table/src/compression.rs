//! Compact blob form of a table's lookup key material.
//!
//! The blob never replaces [`crate::entries::OptimizedDispatchTable`]'s
//! flat `entries` vector — that remains the single source of truth for
//! an entry's full `Implementation` (name, source location, and so on).
//! Compression only shrinks the *lookup key* representation (function id
//! and parameter type ids packed as fixed-width little-endian integers)
//! so a compressed lookup touches far fewer bytes than scanning the full
//! entries, while still resolving to the same entry index.

use dispatch_common::TypeId;

#[derive(Debug, Clone)]
pub struct CompressedBlob {
    /// `[function_id:u32][arity:u8][param_type_ids:u32 * arity]`, one
    /// record per entry, in the same order as the source entries.
    bytes: Vec<u8>,
    offsets: Vec<usize>,
}

impl CompressedBlob {
    #[must_use]
    pub fn compress(entry_param_types: &[Vec<TypeId>], function_ids: &[u32]) -> Self {
        let mut bytes = Vec::new();
        let mut offsets = Vec::with_capacity(entry_param_types.len());
        for (params, &function_id) in entry_param_types.iter().zip(function_ids) {
            offsets.push(bytes.len());
            bytes.extend_from_slice(&function_id.to_le_bytes());
            bytes.push(params.len() as u8);
            for ty in params {
                bytes.extend_from_slice(&ty.0.to_le_bytes());
            }
        }
        Self { bytes, offsets }
    }

    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns the index (into the original entry order) of the first
    /// record whose parameter types exactly equal `arg_types`, or
    /// `None`. This is the "compressed" lookup path: a linear scan over
    /// packed bytes rather than over `Implementation` structs.
    #[must_use]
    pub fn find_exact(&self, arg_types: &[TypeId]) -> Option<usize> {
        for (entry_index, &offset) in self.offsets.iter().enumerate() {
            let mut cursor = offset + 4;
            let arity = self.bytes[cursor] as usize;
            cursor += 1;
            if arity != arg_types.len() {
                continue;
            }
            let matches = (0..arity).all(|i| {
                let start = cursor + i * 4;
                let raw = u32::from_le_bytes(self.bytes[start..start + 4].try_into().unwrap());
                raw == arg_types[i].0
            });
            if matches {
                return Some(entry_index);
            }
        }
        None
    }
}
