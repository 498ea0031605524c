//! Module Dispatcher (component K): cross-module merge, conflict
//! tracking, and hot-reload.

mod cache;
mod dispatcher;
mod model;

pub use cache::QualifiedCacheKey;
pub use dispatcher::{Conflict, ConflictKind, ModuleDispatcher};
pub use model::{
    ConflictResolution, CrossModuleSignature, Dependency, ExportedSignature, ImportMode,
    ImportedSignature, Module, ModuleVersion, VersionConstraint,
};

#[cfg(test)]
#[path = "../tests/modules_tests.rs"]
mod tests;
