//! Per-value [`OwnershipState`], per-parameter [`ParameterOwnership`], and
//! the memoized [`MoveSemantics`] a type exposes to the dispatcher.

use dispatch_common::TypeId;
use dispatch_types::{TypeKind, TypeRegistry};
use rustc_hash::FxHashMap;
use std::cell::RefCell;

/// Caller-tracked state of a single value at a call site. `Moved` is
/// absorbing until the value is re-initialized by the caller (outside
/// this crate's concern — a fresh `OwnershipState::Owned` replaces it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnershipState {
    Owned,
    Borrowed,
    MutBorrowed,
    Moved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterOwnershipKind {
    TakeOwnership,
    BorrowImmutable,
    BorrowMutable,
    CopyValue,
}

/// What an implementation declares it needs for one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterOwnership {
    pub kind: ParameterOwnershipKind,
    /// Optional lifetime constraint tag (e.g. a region name); opaque to
    /// this crate, which only threads it through for the caller's own
    /// lifetime checker (out of scope here — see `S6001 lifetime_exceeded`
    /// in the diagnostic taxonomy, raised by that external checker).
    pub lifetime: Option<String>,
}

impl ParameterOwnership {
    #[must_use]
    pub fn new(kind: ParameterOwnershipKind) -> Self {
        Self { kind, lifetime: None }
    }

    #[must_use]
    pub fn with_lifetime(kind: ParameterOwnershipKind, lifetime: impl Into<String>) -> Self {
        Self {
            kind,
            lifetime: Some(lifetime.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnershipViolation {
    UseAfterMove { param_index: usize },
    DoubleMove { param_index: usize },
    BorrowAfterMove { param_index: usize },
    MutBorrowConflict { param_index: usize },
    NotCopyable { param_index: usize },
    CapabilityMissing { capability: String },
}

/// What a type allows a value of it to do when passed by value: copied,
/// moved, and whether dropping it requires running a destructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSemantics {
    pub is_copyable: bool,
    pub is_movable: bool,
    pub requires_destructor: bool,
}

impl MoveSemantics {
    /// `unique` kinds are non-copyable, movable, and destructor-required.
    /// Sealed table types require a destructor even though they remain
    /// copyable. Everything else (primitives, open tables, unions) is
    /// copyable, movable, and destructor-free.
    #[must_use]
    pub fn for_kind(kind: TypeKind) -> Self {
        match kind {
            TypeKind::Unique => Self {
                is_copyable: false,
                is_movable: true,
                requires_destructor: true,
            },
            TypeKind::TableSealed => Self {
                is_copyable: true,
                is_movable: true,
                requires_destructor: true,
            },
            TypeKind::Primitive | TypeKind::TableOpen | TypeKind::Union => Self {
                is_copyable: true,
                is_movable: true,
                requires_destructor: false,
            },
        }
    }
}

/// Memoizes `MoveSemantics` per `TypeId` so repeated ownership checks over
/// the same type don't re-derive it from the type registry each time.
#[derive(Debug, Default)]
pub struct MoveSemanticsCache {
    cache: RefCell<FxHashMap<TypeId, MoveSemantics>>,
}

impl MoveSemanticsCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: TypeId, types: &TypeRegistry) -> MoveSemantics {
        if let Some(&cached) = self.cache.borrow().get(&id) {
            return cached;
        }
        let kind = types.get_type(id).map(|record| record.kind).unwrap_or(TypeKind::Primitive);
        let semantics = MoveSemantics::for_kind(kind);
        self.cache.borrow_mut().insert(id, semantics);
        semantics
    }
}

/// Validate one parameter's declared ownership requirement against the
/// caller-tracked state of the argument bound to it.
pub fn validate_parameter(
    param_index: usize,
    requirement: &ParameterOwnership,
    state: OwnershipState,
    move_semantics: MoveSemantics,
) -> Result<(), OwnershipViolation> {
    match requirement.kind {
        ParameterOwnershipKind::TakeOwnership => match state {
            OwnershipState::Owned => Ok(()),
            OwnershipState::Moved => Err(OwnershipViolation::UseAfterMove { param_index }),
            OwnershipState::Borrowed | OwnershipState::MutBorrowed => {
                Err(OwnershipViolation::DoubleMove { param_index })
            }
        },
        ParameterOwnershipKind::BorrowImmutable => match state {
            OwnershipState::Owned | OwnershipState::Borrowed => Ok(()),
            OwnershipState::Moved | OwnershipState::MutBorrowed => {
                Err(OwnershipViolation::BorrowAfterMove { param_index })
            }
        },
        ParameterOwnershipKind::BorrowMutable => match state {
            OwnershipState::Owned => Ok(()),
            _ => Err(OwnershipViolation::MutBorrowConflict { param_index }),
        },
        ParameterOwnershipKind::CopyValue => {
            if move_semantics.is_copyable {
                Ok(())
            } else {
                Err(OwnershipViolation::NotCopyable { param_index })
            }
        }
    }
}
