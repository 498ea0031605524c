//! Minimal diagnostic primitives shared by every crate that needs to
//! report *something* without depending on the full `dispatch-diag`
//! hypothesis/correlation machinery (component N builds on these).

use crate::span::SourceLocation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Info,
    Hint,
}

/// A plain, single-cause diagnostic. Used internally (e.g. a registry
/// rejecting a malformed registration) and as the payload the richer
/// `NextGenDiagnostic` wraps for its primary message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub category: DiagnosticCategory,
    pub message: String,
    pub location: SourceLocation,
}

impl Diagnostic {
    #[must_use]
    pub fn error(code: impl Into<String>, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            code: code.into(),
            category: DiagnosticCategory::Error,
            message: message.into(),
            location,
        }
    }

    #[must_use]
    pub fn warning(code: impl Into<String>, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            code: code.into(),
            category: DiagnosticCategory::Warning,
            message: message.into(),
            location,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self.category, DiagnosticCategory::Error)
    }
}
