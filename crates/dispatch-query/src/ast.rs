//! The minimal declaration shape the query language evaluates against.
//!
//! The real AST database lives in the external parser (§1); this crate
//! only needs whatever subset of it a predicate can ask about: a kind, a
//! name, a location, and a handful of named properties. A host embedding
//! this crate projects its own richer AST nodes into an [`AstDecl`] before
//! querying.

use dispatch_common::SourceLocation;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Func,
    Var,
    Const,
    Struct,
    Enum,
}

impl DeclKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Func => "func",
            DeclKind::Var => "var",
            DeclKind::Const => "const",
            DeclKind::Struct => "struct",
            DeclKind::Enum => "enum",
        }
    }

    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "func" => Some(DeclKind::Func),
            "var" => Some(DeclKind::Var),
            "const" => Some(DeclKind::Const),
            "struct" => Some(DeclKind::Struct),
            "enum" => Some(DeclKind::Enum),
            _ => None,
        }
    }
}

/// One declaration visible to the query language: enough for `kind`,
/// `ident`, `ident.method(str)`, and `ident op number` primaries to
/// evaluate against (§4.O grammar).
#[derive(Debug, Clone)]
pub struct AstDecl {
    pub kind: DeclKind,
    pub name: String,
    pub location: SourceLocation,
    /// Named numeric properties (e.g. `arity`, `specificity_rank`),
    /// queried with `ident op number`.
    pub numeric_fields: FxHashMap<String, f64>,
    /// Named string properties (e.g. `module`), queried with
    /// `ident.method("literal")`.
    pub string_fields: FxHashMap<String, String>,
    /// Bare boolean flags (e.g. `exported`, `pure`), queried with a bare
    /// `ident` primary.
    pub flags: FxHashSet<String>,
}

impl AstDecl {
    #[must_use]
    pub fn new(kind: DeclKind, name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            name: name.into(),
            location,
            numeric_fields: FxHashMap::default(),
            string_fields: FxHashMap::default(),
            flags: FxHashSet::default(),
        }
    }

    #[must_use]
    pub fn with_numeric(mut self, field: impl Into<String>, value: f64) -> Self {
        self.numeric_fields.insert(field.into(), value);
        self
    }

    #[must_use]
    pub fn with_string(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.string_fields.insert(field.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.insert(flag.into());
        self
    }

    /// `kind\tname\tfile:line:col` per §6's CLI query surface.
    #[must_use]
    pub fn to_query_line(&self) -> String {
        format!(
            "{}\t{}\t{}:{}:{}",
            self.kind.as_str(),
            self.name,
            self.location.file,
            self.location.line,
            self.location.column
        )
    }
}

/// A read-only collection of [`AstDecl`]s to filter. Independent of
/// resolution: nothing here participates in dispatch.
#[derive(Debug, Clone, Default)]
pub struct AstStore {
    decls: Vec<AstDecl>,
}

impl AstStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, decl: AstDecl) {
        self.decls.push(decl);
    }

    #[must_use]
    pub fn decls(&self) -> &[AstDecl] {
        &self.decls
    }

    /// Every declaration for which `predicate` evaluates true.
    #[must_use]
    pub fn filter<'a>(&'a self, predicate: &crate::parser::Predicate) -> Vec<&'a AstDecl> {
        self.decls
            .iter()
            .filter(|decl| crate::eval::evaluate(predicate, decl))
            .collect()
    }
}
