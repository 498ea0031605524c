//! Module, export/import declarations, and the merged cross-module view.

use dispatch_common::{ModuleId, Visibility};
use dispatch_sig::Implementation;
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ModuleVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ModuleVersion {
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionConstraint {
    Exact(ModuleVersion),
    Minimum(ModuleVersion),
    Range(ModuleVersion, ModuleVersion),
    Any,
}

impl VersionConstraint {
    #[must_use]
    pub fn is_satisfied_by(&self, version: ModuleVersion) -> bool {
        match self {
            VersionConstraint::Exact(v) => version == *v,
            VersionConstraint::Minimum(v) => version >= *v,
            VersionConstraint::Range(lo, hi) => version >= *lo && version <= *hi,
            VersionConstraint::Any => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dependency {
    pub name: String,
    pub constraint: VersionConstraint,
    pub optional: bool,
}

#[derive(Debug, Clone)]
pub struct ExportedSignature {
    pub signature_name: String,
    pub module_id: ModuleId,
    pub implementations: Vec<Implementation>,
    pub visibility: Visibility,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    Qualified,
    Unqualified,
    Selective,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResolution {
    Fail,
    PreferLocal,
    PreferImported,
    Merge,
    /// Prefer the export from the module with the lower `priority`.
    PriorityBased,
}

#[derive(Debug, Clone)]
pub struct ImportedSignature {
    pub signature_name: String,
    pub source_module_id: ModuleId,
    pub local_alias: Option<String>,
    pub mode: ImportMode,
    pub conflict_resolution: ConflictResolution,
}

/// The union, over every loaded module, of the implementations exported
/// under one global name.
#[derive(Debug, Clone, Default)]
pub struct CrossModuleSignature {
    pub participating_modules: SmallVec<[ModuleId; 4]>,
    pub merged_implementations: Vec<Implementation>,
    pub resolution_order: SmallVec<[ModuleId; 4]>,
    pub is_ambiguous: bool,
}

#[derive(Debug, Clone)]
pub struct Module {
    pub id: ModuleId,
    pub name: String,
    pub version: ModuleVersion,
    pub dependencies: Vec<Dependency>,
    pub exports: Vec<ExportedSignature>,
    pub imports: Vec<ImportedSignature>,
    pub is_loaded: bool,
    /// Nanoseconds since epoch at the most recent `load`/hot-reload.
    /// `None` before the module has ever been loaded.
    pub load_timestamp: Option<u64>,
    /// Lower value loads/merges first; used as the primary
    /// `merge_dispatch_tables` sort key (component K, §4.K).
    pub priority: u32,
}

impl Module {
    #[must_use]
    pub fn new(id: ModuleId, name: impl Into<String>, version: ModuleVersion) -> Self {
        Self {
            id,
            name: name.into(),
            version,
            dependencies: Vec::new(),
            exports: Vec::new(),
            imports: Vec::new(),
            is_loaded: false,
            load_timestamp: None,
            priority: id.0,
        }
    }
}
