//! Scope Manager (component E): lexical scopes with parent links, holding
//! the implementations visible at each point in a module so the candidate
//! collector (component F) has something to pre-filter.

mod manager;

pub use manager::{ScopeId, ScopeManager, ScopedDeclaration};

#[cfg(test)]
#[path = "../tests/scope_tests.rs"]
mod tests;
