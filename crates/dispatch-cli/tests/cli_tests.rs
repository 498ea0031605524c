use clap::Parser;

use crate::{run_cache_gc, run_cache_stats, run_query, run_resolve, Cli, Commands};

#[test]
fn parses_query_subcommand() {
    let cli = Cli::try_parse_from(["dispatch", "query", "func and arity > 1"]).unwrap();
    assert!(matches!(cli.command, Commands::Query { expr } if expr == "func and arity > 1"));
}

#[test]
fn parses_resolve_subcommand_with_multiple_arg_types() {
    let cli = Cli::try_parse_from(["dispatch", "resolve", "math", "add", "i32", "i32"]).unwrap();
    match cli.command {
        Commands::Resolve {
            module,
            signature,
            arg_types,
        } => {
            assert_eq!(module, "math");
            assert_eq!(signature, "add");
            assert_eq!(arg_types, vec!["i32".to_string(), "i32".to_string()]);
        }
        _ => panic!("expected Resolve"),
    }
}

#[test]
fn parses_cache_stats_subcommand() {
    let cli = Cli::try_parse_from(["dispatch", "cache", "stats", "/tmp/dispatch-cache"]).unwrap();
    assert!(matches!(cli.command, Commands::Cache(_)));
}

#[test]
fn parses_global_verbose_flag_before_subcommand() {
    let cli = Cli::try_parse_from(["dispatch", "-vv", "query", "func"]).unwrap();
    assert_eq!(cli.verbose, 2);
}

#[test]
fn query_resolves_the_one_exported_pure_function() {
    let exit_code = run_query("pure");
    assert_eq!(exit_code, 0);
}

#[test]
fn query_reports_parse_error_with_exit_code_one() {
    let exit_code = run_query("func and (arity > 1");
    assert_eq!(exit_code, 1);
}

#[test]
fn resolve_exact_match_succeeds() {
    let exit_code = run_resolve("math", "add", &["i32".to_string(), "i32".to_string()]);
    assert_eq!(exit_code, 0);
}

#[test]
fn resolve_unknown_module_fails_with_exit_code_one() {
    let exit_code = run_resolve("nonexistent", "add", &["i32".to_string(), "i32".to_string()]);
    assert_eq!(exit_code, 1);
}

#[test]
fn resolve_unknown_type_fails_with_exit_code_one() {
    let exit_code = run_resolve("math", "add", &["not_a_type".to_string()]);
    assert_eq!(exit_code, 1);
}

#[test]
fn cache_stats_on_fresh_directory_reports_zero_entries() {
    let dir = tempfile::tempdir().unwrap();
    let exit_code = run_cache_stats(dir.path());
    assert_eq!(exit_code, 0);
}

#[test]
fn cache_gc_on_empty_cache_evicts_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let exit_code = run_cache_gc(dir.path(), 3600, 1024 * 1024);
    assert_eq!(exit_code, 0);
}
