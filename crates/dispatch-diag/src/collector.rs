//! Per-compilation [`DiagnosticCollector`]: owns every emitted diagnostic
//! until the compilation phase completes, tracks error/warning counts, and
//! suppresses cascade effects of an already-reported root cause (§4.N, §7).

use crate::diagnostic::{NextGenDiagnostic, Severity};
use rustc_hash::FxHashSet;

/// Owns diagnostics for one compilation unit. Per §3's lifecycle
/// ("Diagnostics are owned by a collector that holds them until the
/// compilation phase completes"), nothing here is dropped until the
/// collector itself is — there is no rolling eviction.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<NextGenDiagnostic>,
    next_id: u64,
    error_count: u32,
    warning_count: u32,
    reported_roots: FxHashSet<u64>,
}

impl DiagnosticCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next stable diagnostic id. Callers build a
    /// [`NextGenDiagnostic`] with this id, then hand it to [`Self::emit`].
    pub fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Finalizes `diagnostic`'s hypothesis distribution and records it,
    /// unless it is a cascade effect of a root cause already reported —
    /// in which case it is dropped so the root counts exactly once
    /// (§4.N, §7 "cascade prevention").
    pub fn emit(&mut self, mut diagnostic: NextGenDiagnostic) {
        diagnostic.finalize();

        if let Some(root_id) = diagnostic.cascade_root {
            if self.reported_roots.contains(&root_id) {
                return;
            }
        }

        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
            Severity::Info | Severity::Hint => {}
        }

        self.reported_roots.insert(diagnostic.id);
        self.diagnostics.push(diagnostic);
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    #[must_use]
    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    #[must_use]
    pub fn warning_count(&self) -> u32 {
        self.warning_count
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[NextGenDiagnostic] {
        &self.diagnostics
    }

    /// True when a diagnostic with the given id has already been
    /// recorded — used by callers deciding whether a follow-on failure
    /// should be raised with `cascade_root` set to that id.
    #[must_use]
    pub fn is_reported(&self, id: u64) -> bool {
        self.reported_roots.contains(&id)
    }
}
