use crate::{ScopeManager, ScopedDeclaration};
use dispatch_common::{FunctionId, ModuleId, SourceLocation, TypeId, Visibility};
use dispatch_sig::{Effects, SignatureAnalyzer};

fn decl(name: &str, arity: usize) -> ScopedDeclaration {
    let params: Vec<TypeId> = (0..arity).map(|_| TypeId::I32).collect();
    let implementation = SignatureAnalyzer::new().analyze(
        FunctionId(0),
        ModuleId(0),
        name,
        params,
        TypeId::UNIT,
        Effects::empty(),
        None,
        SourceLocation::synthetic(),
    );
    ScopedDeclaration::new(implementation, Visibility::Public)
}

#[test]
fn lookup_finds_declaration_in_current_scope() {
    let mut mgr = ScopeManager::new();
    let root = mgr.root();
    assert!(mgr.declare(root, "add", decl("add", 2)).is_none());

    let found = mgr.lookup(root, "add", Some(2));
    assert_eq!(found.len(), 1);
}

#[test]
fn lookup_walks_outward_through_parent_scopes() {
    let mut mgr = ScopeManager::new();
    let root = mgr.root();
    mgr.declare(root, "add", decl("add", 2));
    let child = mgr.create_child(root);

    let found = mgr.lookup(child, "add", Some(2));
    assert_eq!(found.len(), 1);
}

#[test]
fn shadowing_is_legal_but_reported() {
    let mut mgr = ScopeManager::new();
    let root = mgr.root();
    assert!(mgr.declare(root, "add", decl("add", 2)).is_none());

    let child = mgr.create_child(root);
    let warning = mgr.declare(child, "add", decl("add", 2));
    assert!(warning.is_some());
    assert_eq!(warning.unwrap().code, "W0001");

    // Both declarations remain visible from the child scope.
    assert_eq!(mgr.lookup(child, "add", Some(2)).len(), 2);
}

#[test]
fn arity_filter_excludes_non_matching_declarations() {
    let mut mgr = ScopeManager::new();
    let root = mgr.root();
    mgr.declare(root, "add", decl("add", 2));
    mgr.declare(root, "add", decl("add", 3));

    assert_eq!(mgr.lookup(root, "add", Some(2)).len(), 1);
    assert_eq!(mgr.lookup_any_arity(root, "add").len(), 2);
}

#[test]
fn unknown_name_returns_empty() {
    let mgr = ScopeManager::new();
    assert!(mgr.lookup(mgr.root(), "missing", None).is_empty());
}
