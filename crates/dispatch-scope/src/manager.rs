//! Arena of lexical [`Scope`]s plus outward-walking `lookup`.

use dispatch_common::{Diagnostic, Visibility};
use dispatch_sig::Implementation;
use rustc_hash::FxHashMap;

/// Index into the `ScopeManager`'s scope arena. The root scope is always
/// `ScopeId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

/// One named implementation visible in a scope, with the visibility it was
/// declared under.
#[derive(Debug, Clone)]
pub struct ScopedDeclaration {
    pub implementation: Implementation,
    pub visibility: Visibility,
}

struct Scope {
    parent: Option<ScopeId>,
    declarations: FxHashMap<String, Vec<ScopedDeclaration>>,
}

/// Diagnostic code for the shadowing warning category (§4.N's "W" phase
/// letter); not a dispatch/type/effect/module/ownership failure, so it
/// never flows through `dispatch-diag`'s richer `NextGenDiagnostic` — a
/// plain [`Diagnostic`] is enough for a warning nobody needs hypotheses
/// about.
pub const SHADOWED_DECLARATION: &str = "W0001";

impl ScopedDeclaration {
    #[must_use]
    pub fn new(implementation: Implementation, visibility: Visibility) -> Self {
        Self {
            implementation,
            visibility,
        }
    }
}

/// Owns every [`Scope`] created for one compilation unit. Scopes are never
/// removed once created — a module's scope tree is rebuilt wholesale on
/// hot-reload rather than mutated in place, so `ScopeManager` itself has no
/// `remove_scope`.
pub struct ScopeManager {
    scopes: Vec<Scope>,
}

impl Default for ScopeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                parent: None,
                declarations: FxHashMap::default(),
            }],
        }
    }

    #[must_use]
    pub const fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Create a new child scope nested under `parent`.
    #[must_use]
    pub fn create_child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent: Some(parent),
            declarations: FxHashMap::default(),
        });
        id
    }

    /// Declare `name` in `scope`. If an ancestor scope already declares the
    /// same name, this is legal shadowing, and a warning [`Diagnostic`] is
    /// returned for the caller's diagnostic collector.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: impl Into<String>,
        declaration: ScopedDeclaration,
    ) -> Option<Diagnostic> {
        let name = name.into();
        let shadow_warning = self
            .find_in_ancestors(scope, &name)
            .map(|_| self.shadow_diagnostic(&name, &declaration));

        self.scopes[scope.0 as usize]
            .declarations
            .entry(name)
            .or_default()
            .push(declaration);

        shadow_warning
    }

    fn shadow_diagnostic(&self, name: &str, declaration: &ScopedDeclaration) -> Diagnostic {
        Diagnostic::warning(
            SHADOWED_DECLARATION,
            format!("declaration of `{name}` shadows an outer scope's declaration"),
            declaration.implementation.source_location.clone(),
        )
    }

    /// Search strictly-outer scopes (not `scope` itself) for `name`.
    fn find_in_ancestors(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = self.scopes[scope.0 as usize].parent;
        let mut guard = 0u32;
        while let Some(id) = current {
            guard += 1;
            if guard > dispatch_common::limits::RECURSION_GUARD_LIMIT {
                tracing::warn!(name, "find_in_ancestors: guard limit hit");
                break;
            }
            let s = &self.scopes[id.0 as usize];
            if s.declarations.contains_key(name) {
                return Some(id);
            }
            current = s.parent;
        }
        None
    }

    /// All declarations named `name` visible from `scope`, walking outward
    /// through parent links. When `expected_arity` is `Some`, only
    /// declarations with matching arity are returned — but this is a
    /// convenience filter, not the authoritative arity check (component F
    /// owns that, so it can report arity-mismatched candidates too).
    #[must_use]
    pub fn lookup(
        &self,
        scope: ScopeId,
        name: &str,
        expected_arity: Option<usize>,
    ) -> Vec<&ScopedDeclaration> {
        let mut results = Vec::new();
        let mut current = Some(scope);
        let mut guard = 0u32;
        while let Some(id) = current {
            guard += 1;
            if guard > dispatch_common::limits::RECURSION_GUARD_LIMIT {
                tracing::warn!(name, "lookup: guard limit hit");
                break;
            }
            let s = &self.scopes[id.0 as usize];
            if let Some(decls) = s.declarations.get(name) {
                results.extend(decls.iter().filter(|d| {
                    expected_arity.is_none_or(|arity| d.implementation.arity() == arity)
                }));
            }
            current = s.parent;
        }
        results
    }

    /// All declarations named `name` visible from `scope`, regardless of
    /// arity — used by the collector when it wants to report
    /// arity-mismatched alternatives itself.
    #[must_use]
    pub fn lookup_any_arity(&self, scope: ScopeId, name: &str) -> Vec<&ScopedDeclaration> {
        self.lookup(scope, name, None)
    }
}
