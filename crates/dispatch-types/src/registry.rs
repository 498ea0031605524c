//! The type registry: an arena of interned [`TypeRecord`]s plus a
//! memoized subtype-closure check.

use dispatch_common::TypeId;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cell::RefCell;
use thiserror::Error;

/// How a type admits (or refuses) new implementations/members after
/// registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Primitive,
    /// Extensible: new implementations may still target it.
    TableOpen,
    /// Sealed: the set of implementations is fixed at registration time.
    TableSealed,
    /// Non-copyable, requires a destructor; see `dispatch-ownership`.
    Unique,
    /// A union of other registered types.
    Union,
}

/// A single interned type.
#[derive(Debug, Clone)]
pub struct TypeRecord {
    pub id: TypeId,
    pub name: String,
    pub kind: TypeKind,
    /// Declared (direct) supertypes, in registration order. The
    /// transitive closure is computed on demand, not stored here.
    pub supertypes: SmallVec<[TypeId; 4]>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeRegistryError {
    #[error("a type named `{0}` is already registered")]
    DuplicateName(String),
    #[error("registering `{0}` with the given supertypes would introduce a cycle")]
    TypeCycle(String),
    #[error("unknown supertype id {0}")]
    UnknownSupertype(TypeId),
}

pub struct TypeRegistry {
    records: Vec<TypeRecord>,
    by_name: FxHashMap<String, TypeId>,
    /// Memoized `is_subtype(sub, sup)` results. Keyed on the pair rather
    /// than precomputing full closures up front, since most programs only
    /// ever query a small fraction of the possible pairs.
    subtype_cache: RefCell<FxHashMap<(TypeId, TypeId), bool>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            records: Vec::new(),
            by_name: FxHashMap::default(),
            subtype_cache: RefCell::new(FxHashMap::default()),
        };
        registry.register_builtins();
        registry
    }

    fn register_builtins(&mut self) {
        let builtins: &[(TypeId, &str, TypeKind)] = &[
            (TypeId::ERROR, "<error>", TypeKind::Primitive),
            (TypeId::NEVER, "never", TypeKind::Primitive),
            (TypeId::UNKNOWN, "unknown", TypeKind::Primitive),
            (TypeId::UNIT, "unit", TypeKind::Primitive),
            (TypeId::BOOL, "bool", TypeKind::Primitive),
            (TypeId::I32, "i32", TypeKind::Primitive),
            (TypeId::I64, "i64", TypeKind::Primitive),
            (TypeId::F32, "f32", TypeKind::Primitive),
            (TypeId::F64, "f64", TypeKind::Primitive),
            (TypeId::STRING, "string", TypeKind::Primitive),
        ];
        for &(id, name, kind) in builtins {
            let idx = id.index();
            if self.records.len() <= idx {
                self.records.resize_with(idx + 1, || TypeRecord {
                    id: TypeId::ERROR,
                    name: String::new(),
                    kind: TypeKind::Primitive,
                    supertypes: SmallVec::new(),
                });
            }
            self.records[idx] = TypeRecord {
                id,
                name: name.to_string(),
                kind,
                supertypes: SmallVec::new(),
            };
            self.by_name.insert(name.to_string(), id);
        }
    }

    /// Register a new type. Fails if the name is already taken or if any
    /// declared supertype is unknown, or if the new edges would close a
    /// cycle back to the new type itself.
    pub fn register_type(
        &mut self,
        name: impl Into<String>,
        kind: TypeKind,
        supertypes: impl IntoIterator<Item = TypeId>,
    ) -> Result<TypeId, TypeRegistryError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TypeRegistryError::DuplicateName(name));
        }
        let supertypes: SmallVec<[TypeId; 4]> = supertypes.into_iter().collect();
        for &sup in &supertypes {
            if self.get_type(sup).is_none() {
                return Err(TypeRegistryError::UnknownSupertype(sup));
            }
        }

        let new_id = TypeId(self.records.len() as u32);
        // A cycle would require one of the declared supertypes to already
        // be a subtype of `new_id` — impossible before `new_id` exists,
        // so the only way a cycle can appear is via a self-reference.
        if supertypes.contains(&new_id) {
            return Err(TypeRegistryError::TypeCycle(name));
        }

        self.records.push(TypeRecord {
            id: new_id,
            name: name.clone(),
            kind,
            supertypes,
        });
        self.by_name.insert(name, new_id);
        self.subtype_cache.borrow_mut().clear();
        Ok(new_id)
    }

    #[must_use]
    pub fn get_type(&self, id: TypeId) -> Option<&TypeRecord> {
        self.records.get(id.index())
    }

    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Reflexive, transitive subtype check: `is_subtype(t, t)` is always
    /// true, and the relation is closed under the declared supertype
    /// edges. Memoized per `(sub, sup)` pair.
    #[must_use]
    pub fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        if sub == sup {
            return true;
        }
        if let Some(&cached) = self.subtype_cache.borrow().get(&(sub, sup)) {
            return cached;
        }

        let mut visited: FxHashMap<TypeId, ()> = FxHashMap::default();
        let mut stack = vec![sub];
        let mut found = false;
        let mut guard = 0u32;
        while let Some(current) = stack.pop() {
            guard += 1;
            if guard > dispatch_common::limits::RECURSION_GUARD_LIMIT {
                tracing::warn!(sub = sub.0, sup = sup.0, "is_subtype: guard limit hit");
                break;
            }
            if current == sup {
                found = true;
                break;
            }
            if visited.insert(current, ()).is_some() {
                continue;
            }
            if let Some(record) = self.get_type(current) {
                stack.extend(record.supertypes.iter().copied());
            }
        }

        self.subtype_cache.borrow_mut().insert((sub, sup), found);
        found
    }
}
