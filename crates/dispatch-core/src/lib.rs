//! Aggregates every component of the multiple-dispatch resolution core
//! behind one crate, the way `tsz-core` gathers the scanner, parser,
//! binder, solver, and checker behind a single library target for its
//! embedders. `dispatch-cli` and any future embedder depend on this
//! crate alone rather than on the thirteen member crates individually.

pub mod common {
    pub use dispatch_common::*;
}

pub mod types {
    pub use dispatch_types::*;
}

pub mod convert {
    pub use dispatch_convert::*;
}

pub mod sig {
    pub use dispatch_sig::*;
}

pub mod scope {
    pub use dispatch_scope::*;
}

pub mod ownership {
    pub use dispatch_ownership::*;
}

pub mod resolve {
    pub use dispatch_resolve::*;
}

pub mod modules {
    pub use dispatch_modules::*;
}

pub mod table {
    pub use dispatch_table::*;
}

pub mod cache {
    pub use dispatch_cache::*;
}

pub mod diag {
    pub use dispatch_diag::*;
}

pub mod query {
    pub use dispatch_query::*;
}
