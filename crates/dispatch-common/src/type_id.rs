//! The opaque type identity shared by every component that reasons about
//! types without owning the type registry itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An interned type's identity. Equality is by identity, not structure;
/// two `TypeId`s compare equal iff the registry interned them from the
/// same registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const ERROR: TypeId = TypeId(0);
    pub const NEVER: TypeId = TypeId(1);
    pub const UNKNOWN: TypeId = TypeId(2);
    pub const UNIT: TypeId = TypeId(3);
    pub const BOOL: TypeId = TypeId(4);
    pub const I32: TypeId = TypeId(5);
    pub const I64: TypeId = TypeId(6);
    pub const F32: TypeId = TypeId(7);
    pub const F64: TypeId = TypeId(8);
    pub const STRING: TypeId = TypeId(9);

    /// First id available for user-registered types; ids below this are
    /// the well-known primitives above.
    pub const FIRST_USER_TYPE: u32 = 16;

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T#{}", self.0)
    }
}

/// A function/signature identity: name interned alongside the owning
/// module so two modules may each declare a `parse` without collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionId(pub u32);

/// A module identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(pub u32);
