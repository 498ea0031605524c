//! `dispatch`: a small driver binary over the resolution core, grounded
//! on the teacher's own CLI shape (`clap` derive args, `tracing-subscriber`
//! env-filter init) but scoped to what this workspace actually does:
//! evaluate a query predicate, run one resolution, or inspect the
//! on-disk dispatch table cache.

use clap::Parser;
use dispatch_cli::Cli;

fn main() {
    let cli = Cli::parse();
    dispatch_cli::init_tracing(cli.verbose);
    std::process::exit(dispatch_cli::dispatch(cli.command));
}
