use crate::{
    ConflictKind, ConflictResolution, ExportedSignature, ImportMode, ImportedSignature, Module,
    ModuleDispatcher, ModuleVersion, QualifiedCacheKey,
};
use dispatch_common::{FunctionId, ModuleId, SourceLocation, TypeId, Visibility};
use dispatch_sig::{Effects, SignatureAnalyzer};

fn implementation(function_id: u32, module_id: u32, specificity: u32) -> dispatch_sig::Implementation {
    SignatureAnalyzer::new().analyze(
        FunctionId(function_id),
        ModuleId(module_id),
        "g",
        vec![TypeId::I32],
        TypeId::UNIT,
        Effects::empty(),
        Some(specificity),
        SourceLocation::synthetic(),
    )
}

#[test]
fn loading_a_module_folds_its_exports_into_the_cross_module_signature() {
    let mut dispatcher = ModuleDispatcher::new();
    let mut module = Module::new(ModuleId(1), "x", ModuleVersion::new(1, 0, 0));
    module.exports.push(ExportedSignature {
        signature_name: "g".to_string(),
        module_id: ModuleId(1),
        implementations: vec![implementation(1, 1, 0)],
        visibility: Visibility::Public,
        alias: None,
    });
    dispatcher.register_module(module);
    dispatcher.load_module(ModuleId(1), 0);

    let merged = dispatcher.merge_dispatch_tables("g").unwrap();
    assert!(merged.participating_modules.contains(&ModuleId(1)));
    assert_eq!(merged.merged_implementations.len(), 1);
}

#[test]
fn unloading_removes_the_module_from_participating_and_merged() {
    let mut dispatcher = ModuleDispatcher::new();
    let mut module = Module::new(ModuleId(1), "x", ModuleVersion::new(1, 0, 0));
    module.exports.push(ExportedSignature {
        signature_name: "g".to_string(),
        module_id: ModuleId(1),
        implementations: vec![implementation(1, 1, 0)],
        visibility: Visibility::Public,
        alias: None,
    });
    dispatcher.register_module(module);
    dispatcher.load_module(ModuleId(1), 0);
    dispatcher.unload_module(ModuleId(1));

    let merged = dispatcher.merge_dispatch_tables("g").unwrap();
    assert!(!merged.participating_modules.contains(&ModuleId(1)));
    assert!(merged.merged_implementations.is_empty());
}

#[test]
fn hot_reload_invalidates_the_qualified_call_cache_for_the_module() {
    let mut dispatcher = ModuleDispatcher::new();
    let module = Module::new(ModuleId(1), "x", ModuleVersion::new(1, 0, 0));
    dispatcher.register_module(module);
    dispatcher.load_module(ModuleId(1), 0);

    let key = QualifiedCacheKey::new(ModuleId(1), "g", &[TypeId::I32], true);
    dispatcher.cache_qualified_call(key.clone(), ModuleId(1));
    assert!(dispatcher.cached_qualified_call(&key).is_some());

    let mut reloaded = Module::new(ModuleId(1), "x", ModuleVersion::new(1, 0, 1));
    reloaded.exports.push(ExportedSignature {
        signature_name: "g".to_string(),
        module_id: ModuleId(1),
        implementations: vec![implementation(2, 1, 1)],
        visibility: Visibility::Public,
        alias: None,
    });
    dispatcher.hot_reload(ModuleId(1), reloaded, 1);

    assert!(dispatcher.cached_qualified_call(&key).is_none());
    let merged = dispatcher.merge_dispatch_tables("g").unwrap();
    assert_eq!(merged.merged_implementations.len(), 1);
}

/// End-to-end scenario 5: two modules export the same signature name,
/// a third imports both unqualified with `fail_on_conflict`, producing
/// an ambiguous merge until `resolve_conflict` clears it.
#[test]
fn scenario_5_cross_module_conflict_then_resolution() {
    let mut dispatcher = ModuleDispatcher::new();

    let mut module_x = Module::new(ModuleId(1), "X", ModuleVersion::new(1, 0, 0));
    module_x.priority = 10;
    module_x.exports.push(ExportedSignature {
        signature_name: "g".to_string(),
        module_id: ModuleId(1),
        implementations: vec![implementation(1, 1, 5)],
        visibility: Visibility::Public,
        alias: None,
    });

    let mut module_y = Module::new(ModuleId(2), "Y", ModuleVersion::new(1, 0, 0));
    module_y.priority = 20;
    module_y.exports.push(ExportedSignature {
        signature_name: "g".to_string(),
        module_id: ModuleId(2),
        implementations: vec![implementation(2, 2, 5)],
        visibility: Visibility::Public,
        alias: None,
    });

    let module_z = Module::new(ModuleId(3), "Z", ModuleVersion::new(1, 0, 0));

    dispatcher.register_module(module_x);
    dispatcher.register_module(module_y);
    dispatcher.register_module(module_z);
    dispatcher.load_module(ModuleId(1), 0);
    dispatcher.load_module(ModuleId(2), 0);
    dispatcher.load_module(ModuleId(3), 0);

    let conflict = dispatcher.add_import(
        ModuleId(3),
        ImportedSignature {
            signature_name: "g".to_string(),
            source_module_id: ModuleId(1),
            local_alias: None,
            mode: ImportMode::Unqualified,
            conflict_resolution: ConflictResolution::Fail,
        },
    );
    assert!(conflict.is_none(), "first import of a name never conflicts");

    let conflict = dispatcher.add_import(
        ModuleId(3),
        ImportedSignature {
            signature_name: "g".to_string(),
            source_module_id: ModuleId(2),
            local_alias: None,
            mode: ImportMode::Unqualified,
            conflict_resolution: ConflictResolution::Fail,
        },
    );
    let conflict = conflict.expect("second unqualified import of the same name conflicts");
    assert_eq!(conflict.kind, ConflictKind::SignatureNameCollision);

    let merged = dispatcher.merge_dispatch_tables("g").unwrap();
    assert!(merged.is_ambiguous, "equal specificity from two modules with no resolution is ambiguous");

    assert!(dispatcher.resolve_conflict("g", ConflictResolution::PriorityBased));
    assert_eq!(dispatcher.active_conflicts().count(), 0);

    let merged = dispatcher.merge_dispatch_tables("g").unwrap();
    assert!(!merged.is_ambiguous, "a recorded resolution clears the ambiguity flag");
    assert_eq!(merged.merged_implementations[0].module_id, ModuleId(1), "lower priority module sorts first");
}
