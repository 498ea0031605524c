//! Argument parsing and subcommand drivers for the `dispatch` binary,
//! split out from `main.rs` the way the teacher keeps `tsz-cli`'s
//! argument parsing and driver logic testable as a library behind its
//! bin targets.

pub mod demo;

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use colored::Colorize;
use dispatch_core::cache::DispatchCache;
use dispatch_core::common::TypeId;
use dispatch_core::diag::{error_codes, NextGenDiagnostic, Severity};
use dispatch_core::ownership::{OwnershipDispatcher, OwnershipOutcome, OwnershipRegistry};
use dispatch_core::query::{evaluate, parse};
use dispatch_core::sig::Effects;
use rustc_hash::FxHashSet;

#[derive(Parser, Debug)]
#[command(name = "dispatch")]
#[command(version, about = "Multiple-dispatch resolution core driver", long_about = None)]
pub struct Cli {
    /// Increase log verbosity; repeat for more (-v, -vv).
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter the demo AST against a query predicate expression.
    Query {
        /// A predicate expression, e.g. `func and arity > 1`.
        expr: String,
    },
    /// Resolve one call site through the full module -> ownership ->
    /// resolver pipeline against the in-memory demo registry.
    Resolve {
        /// Which demo module to resolve against (`math` or `io`).
        module: String,
        /// The signature name to call.
        signature: String,
        /// Argument type names, e.g. `i32 i32`.
        arg_types: Vec<String>,
    },
    /// Inspect the on-disk dispatch table cache.
    #[command(subcommand)]
    Cache(CacheCommands),
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Print cache hit/miss counters and entry count.
    Stats {
        /// Cache directory containing `cache_index.json`.
        dir: PathBuf,
    },
    /// Evict entries older than `--max-age` or past `--max-size` total.
    Gc {
        dir: PathBuf,
        #[arg(long, default_value_t = 30 * 24 * 60 * 60)]
        max_age: u64,
        #[arg(long, default_value_t = 256 * 1024 * 1024)]
        max_size: u64,
    },
}

pub fn init_tracing(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "dispatch_cli=warn,dispatch_core=warn",
        1 => "dispatch_cli=info,dispatch_core=info",
        _ => "dispatch_cli=debug,dispatch_core=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string()))
        .init();
}

pub fn dispatch(command: Commands) -> i32 {
    match command {
        Commands::Query { expr } => run_query(&expr),
        Commands::Resolve {
            module,
            signature,
            arg_types,
        } => run_resolve(&module, &signature, &arg_types),
        Commands::Cache(CacheCommands::Stats { dir }) => run_cache_stats(&dir),
        Commands::Cache(CacheCommands::Gc {
            dir,
            max_age,
            max_size,
        }) => run_cache_gc(&dir, max_age, max_size),
    }
}

/// `query <expr>`: prints `kind\tname\tfile:line:col` per matching
/// declaration. Exit codes: 0 normal, 1 parse error, 2 I/O error.
pub fn run_query(expr: &str) -> i32 {
    let predicate = match parse(expr) {
        Ok(predicate) => predicate,
        Err(err) => {
            eprintln!("{}: {err}", "parse error".red().bold());
            return 1;
        }
    };

    let store = demo::ast_store();
    for decl in store.decls() {
        if evaluate(&predicate, decl) {
            println!("{}", decl.to_query_line());
        }
    }
    0
}

pub fn run_resolve(module: &str, signature: &str, arg_types: &[String]) -> i32 {
    let demo = demo::build();
    let config = demo::config();

    let Some(module_view) = demo.dispatcher.merge_dispatch_tables(signature) else {
        eprintln!(
            "{}: no signature named `{signature}` is exported by any loaded module",
            "error".red().bold()
        );
        return 1;
    };
    if !module_view
        .participating_modules
        .iter()
        .any(|id| demo.dispatcher.module(*id).is_some_and(|m| m.name == module))
    {
        eprintln!(
            "{}: module `{module}` does not export `{signature}`",
            "error".red().bold()
        );
        return 1;
    }

    let mut resolved_arg_types = Vec::with_capacity(arg_types.len());
    for name in arg_types {
        match demo.types.find_by_name(name) {
            Some(id) => resolved_arg_types.push(id),
            None => {
                eprintln!("{}: unknown type `{name}`", "error".red().bold());
                return 1;
            }
        }
    }

    let request = dispatch_core::resolve::ResolutionRequest {
        name: signature,
        arg_types: &resolved_arg_types,
        permitted_effects: Effects::all(),
    };

    let ownership = OwnershipRegistry::new();
    let dispatcher = OwnershipDispatcher::new();
    let outcome = dispatcher.resolve(
        &demo.scopes,
        demo.root,
        &request,
        &demo.types,
        &dispatch_core::convert::ConversionRegistry::default(),
        &config,
        &ownership,
        &[],
        &FxHashSet::default(),
    );

    match outcome {
        OwnershipOutcome::Resolved { candidate, .. } => {
            println!(
                "{} {}::{}({}) -> {}",
                "resolved".green().bold(),
                module,
                candidate.implementation.name,
                render_types(&candidate.implementation.param_type_ids, &demo.types),
                render_type(candidate.implementation.return_type_id, &demo.types),
            );
            0
        }
        OwnershipOutcome::Ambiguous { reason, .. } => {
            let diagnostic = NextGenDiagnostic::new(
                1,
                error_codes::DISPATCH_AMBIGUOUS,
                Severity::Error,
                dispatch_core::common::SourceLocation::synthetic(),
                format!("ambiguous call to `{signature}`: {reason:?}"),
            );
            print!("{}", diagnostic.to_terminal());
            1
        }
        OwnershipOutcome::NoMatches { .. } => {
            let diagnostic = NextGenDiagnostic::new(
                2,
                error_codes::DISPATCH_NO_MATCH,
                Severity::Error,
                dispatch_core::common::SourceLocation::synthetic(),
                format!("no implementation of `{signature}` matches the given argument types"),
            );
            print!("{}", diagnostic.to_terminal());
            1
        }
        OwnershipOutcome::OwnershipViolation { violation, .. } => {
            let diagnostic = NextGenDiagnostic::new(
                3,
                error_codes::MISSING_CAPABILITY,
                Severity::Error,
                dispatch_core::common::SourceLocation::synthetic(),
                format!("`{signature}` is not callable here: {violation:?}"),
            );
            print!("{}", diagnostic.to_terminal());
            1
        }
    }
}

fn render_types(ids: &[TypeId], types: &dispatch_core::types::TypeRegistry) -> String {
    ids.iter()
        .map(|id| render_type(*id, types))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_type(id: TypeId, types: &dispatch_core::types::TypeRegistry) -> String {
    types
        .get_type(id)
        .map(|record| record.name.clone())
        .unwrap_or_else(|| id.to_string())
}

pub fn run_cache_stats(dir: &Path) -> i32 {
    match DispatchCache::open(dir) {
        Ok(cache) => {
            println!("cache dir:   {}", dir.display());
            println!("entries:     {}", cache.entry_count());
            println!("hits:        {}", cache.cache_hits());
            println!("misses:      {}", cache.cache_misses());
            0
        }
        Err(err) => {
            eprintln!("{}: {err}", "error".red().bold());
            2
        }
    }
}

pub fn run_cache_gc(dir: &Path, max_age_secs: u64, max_size_bytes: u64) -> i32 {
    let mut cache = match DispatchCache::open(dir) {
        Ok(cache) => cache,
        Err(err) => {
            eprintln!("{}: {err}", "error".red().bold());
            return 2;
        }
    };

    let now_ns = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let max_age_ns = max_age_secs.saturating_mul(1_000_000_000);

    match cache.cleanup(max_age_ns, max_size_bytes, now_ns, &[]) {
        Ok(evicted) => {
            println!("evicted {evicted} entries from {}", dir.display());
            0
        }
        Err(err) => {
            eprintln!("{}: {err}", "error".red().bold());
            2
        }
    }
}

#[cfg(test)]
#[path = "../tests/cli_tests.rs"]
mod tests;
