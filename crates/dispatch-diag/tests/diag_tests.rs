use crate::{
    error_codes, Cid, DiagnosticCollector, EffectViolation, Evidence, FixSuggestion, Hypothesis,
    NextGenDiagnostic, Severity, TypeFlowChain, TypeFlowStep,
};
use dispatch_common::{SourceLocation, Span, TypeId};
use dispatch_sig::Effects;

fn loc() -> SourceLocation {
    SourceLocation::new("call_site.dp", 10, 4, Span::new(100, 104))
}

/// Scenario 5 (§8): ambiguous dispatch with two competing hypotheses
/// whose confidence sums to 1.0 once finalized.
#[test]
fn dispatch_ambiguous_hypotheses_sum_to_one() {
    let mut diag = NextGenDiagnostic::new(
        1,
        error_codes::DISPATCH_AMBIGUOUS,
        Severity::Error,
        loc(),
        "ambiguous call to `g`: module `x` and module `y` both export a matching overload",
    );
    let mut exact_from_x = Hypothesis::new("dispatch", "x::g(i32) is an exact match").with_confidence(0.5);
    exact_from_x.apply_evidence(Evidence::supporting(0.6));
    diag.add_hypothesis(exact_from_x);

    let mut exact_from_y = Hypothesis::new("dispatch", "y::g(i32) is an exact match").with_confidence(0.5);
    exact_from_y.apply_evidence(Evidence::supporting(0.6));
    diag.add_hypothesis(exact_from_y);

    diag.finalize();

    let total: f64 = diag.hypotheses().iter().map(Hypothesis::confidence).sum();
    assert!((total - 1.0).abs() < 1e-6);
    assert_eq!(diag.hypotheses().len(), 2);
}

/// Scenario 6 (§8): ownership violation diagnostic, no hypotheses needed
/// (it is not ambiguous, just disallowed) but still a valid diagnostic.
#[test]
fn use_after_move_diagnostic_has_no_ambiguity() {
    let mut diag = NextGenDiagnostic::new(
        2,
        error_codes::USE_AFTER_MOVE,
        Severity::Error,
        loc(),
        "`v` was already moved into a prior call to `consume`",
    );
    diag.add_fix_suggestion(FixSuggestion::new("clone `v` before this call", 1));
    diag.finalize();

    assert!(diag.hypotheses().is_empty());
    assert_eq!(diag.code, "S6003");
    assert!(diag.to_terminal().contains("Suggested fixes"));
}

#[test]
fn effect_violation_reports_offending_bits() {
    let violation = EffectViolation {
        declared: Effects::IO | Effects::ALLOC,
        permitted: Effects::ALLOC,
    };
    assert_eq!(violation.offending(), Effects::IO);
}

#[test]
fn type_flow_chain_renders_in_terminal_output() {
    let mut diag = NextGenDiagnostic::new(
        3,
        error_codes::TYPE_MISMATCH,
        Severity::Error,
        loc(),
        "argument type does not narrow to the expected parameter",
    );
    let mut flow = TypeFlowChain::new();
    flow.push(TypeFlowStep {
        description: "inferred as `f64` at declaration".to_string(),
        type_id: Some(TypeId::F64),
        location: loc(),
    });
    diag.type_flow = Some(flow);
    diag.finalize();

    assert!(diag.to_terminal().contains("Type flow chain"));
}

#[test]
fn cid_is_stable_for_identical_bytes() {
    let a = Cid::of(b"canonical-subgraph");
    let b = Cid::of(b"canonical-subgraph");
    assert_eq!(a, b);
    assert_eq!(a.to_hex().len(), 64);
}

#[test]
fn collector_tracks_error_and_warning_counts_separately() {
    let mut collector = DiagnosticCollector::new();

    let error_id = collector.next_id();
    collector.emit(NextGenDiagnostic::new(
        error_id,
        error_codes::DISPATCH_NO_MATCH,
        Severity::Error,
        loc(),
        "no implementation matches this call",
    ));

    let warning_id = collector.next_id();
    collector.emit(NextGenDiagnostic::new(
        warning_id,
        "W0001",
        Severity::Warning,
        loc(),
        "this declaration shadows an outer one",
    ));

    assert!(collector.has_errors());
    assert_eq!(collector.error_count(), 1);
    assert_eq!(collector.warning_count(), 1);
    assert_eq!(collector.diagnostics().len(), 2);
}

#[test]
fn cascading_diagnostic_does_not_double_count_its_root() {
    let mut collector = DiagnosticCollector::new();
    let root_id = collector.next_id();
    collector.emit(NextGenDiagnostic::new(
        root_id,
        error_codes::IMPORT_NOT_FOUND,
        Severity::Error,
        loc(),
        "module `missing` could not be found",
    ));

    let cascaded_id = collector.next_id();
    let cascaded = NextGenDiagnostic::new(
        cascaded_id,
        error_codes::DISPATCH_NO_MATCH,
        Severity::Error,
        loc(),
        "cannot resolve call because its module failed to import",
    )
    .with_cascade_root(root_id);
    collector.emit(cascaded);

    assert_eq!(collector.error_count(), 1);
    assert_eq!(collector.diagnostics().len(), 1);
}

#[test]
fn json_emission_includes_schema_version_and_cascade_flag() {
    let diag = NextGenDiagnostic::new(
        5,
        error_codes::DISPATCH_AMBIGUOUS,
        Severity::Error,
        loc(),
        "ambiguous",
    );
    let json = diag.to_json();
    assert!(json.contains(r#""schema_version":1"#));
    assert!(json.contains(r#""is_cascade_effect":false"#));
}
