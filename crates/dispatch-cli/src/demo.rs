//! The in-memory demo registry `resolve` and `query` run against.
//!
//! There is no lexer/parser wired into this binary (both are out of
//! scope, §1), so the CLI ships a small fixed set of declarations
//! instead of loading a real source file. Two modules, `math` and `io`,
//! each export a couple of overloaded names spanning the scenarios
//! worth demonstrating from the command line: an exact match, an
//! overload set resolved by conversion cost, and an effectful
//! implementation that a strict call site cannot see.

use dispatch_core::common::{FunctionId, ModuleId, ResolverConfig, SourceLocation, Span, TypeId, Visibility};
use dispatch_core::modules::{ExportedSignature, Module, ModuleDispatcher, ModuleVersion};
use dispatch_core::query::{AstDecl, AstStore, DeclKind};
use dispatch_core::scope::{ScopeId, ScopeManager, ScopedDeclaration};
use dispatch_core::sig::{Effects, SignatureAnalyzer};
use dispatch_core::types::TypeRegistry;

pub struct Demo {
    pub scopes: ScopeManager,
    pub root: ScopeId,
    pub types: TypeRegistry,
    pub dispatcher: ModuleDispatcher,
}

/// Builds the fixed demo dataset, registering every implementation both
/// into a [`ScopeManager`] (what the resolver actually consults) and a
/// [`ModuleDispatcher`] (component K, so `resolve` genuinely exercises
/// the module-merge step named in its pipeline) to back the `resolve`
/// subcommand.
#[must_use]
pub fn build() -> Demo {
    let types = TypeRegistry::new();
    let mut scopes = ScopeManager::new();
    let root = scopes.root();
    let analyzer = SignatureAnalyzer::new();

    let math = ModuleId(1);
    let io = ModuleId(2);

    let add_i32 = analyzer.analyze(
        FunctionId(1),
        math,
        "add",
        [TypeId::I32, TypeId::I32],
        TypeId::I32,
        Effects::empty(),
        None,
        SourceLocation::new("demo/math.dp", 1, 1, Span::DUMMY),
    );
    let add_f64 = analyzer.analyze(
        FunctionId(2),
        math,
        "add",
        [TypeId::F64, TypeId::F64],
        TypeId::F64,
        Effects::empty(),
        None,
        SourceLocation::new("demo/math.dp", 6, 1, Span::DUMMY),
    );
    let log_string = analyzer.analyze(
        FunctionId(3),
        io,
        "log",
        [TypeId::STRING],
        TypeId::UNIT,
        Effects::IO,
        None,
        SourceLocation::new("demo/io.dp", 1, 1, Span::DUMMY),
    );

    for implementation in [add_i32.clone(), add_f64.clone(), log_string.clone()] {
        scopes.declare(
            root,
            implementation.name.clone(),
            ScopedDeclaration::new(implementation, Visibility::Public),
        );
    }

    let mut dispatcher = ModuleDispatcher::new();
    let mut math_module = Module::new(math, "math", ModuleVersion::new(1, 0, 0));
    math_module.exports.push(ExportedSignature {
        signature_name: "add".to_string(),
        module_id: math,
        implementations: vec![add_i32, add_f64],
        visibility: Visibility::Public,
        alias: None,
    });
    dispatcher.register_module(math_module);
    dispatcher.load_module(math, 0);

    let mut io_module = Module::new(io, "io", ModuleVersion::new(1, 0, 0));
    io_module.exports.push(ExportedSignature {
        signature_name: "log".to_string(),
        module_id: io,
        implementations: vec![log_string],
        visibility: Visibility::Public,
        alias: None,
    });
    dispatcher.register_module(io_module);
    dispatcher.load_module(io, 0);

    Demo {
        scopes,
        root,
        types,
        dispatcher,
    }
}

#[must_use]
pub fn config() -> ResolverConfig {
    ResolverConfig::default()
}

/// The declarations the `query` subcommand filters, mirroring the same
/// fixture `resolve` uses so both subcommands describe one consistent
/// demo program.
#[must_use]
pub fn ast_store() -> AstStore {
    let mut store = AstStore::new();
    store.insert(
        AstDecl::new(
            DeclKind::Func,
            "add",
            SourceLocation::new("demo/math.dp", 1, 1, Span::DUMMY),
        )
        .with_numeric("arity", 2.0)
        .with_string("module", "math")
        .with_flag("exported")
        .with_flag("pure"),
    );
    store.insert(
        AstDecl::new(
            DeclKind::Func,
            "log",
            SourceLocation::new("demo/io.dp", 1, 1, Span::DUMMY),
        )
        .with_numeric("arity", 1.0)
        .with_string("module", "io")
        .with_flag("exported"),
    );
    store
}
