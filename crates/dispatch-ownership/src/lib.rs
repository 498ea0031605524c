//! Ownership Dispatcher (component J): wraps the Semantic Resolver with
//! move/borrow/capability gates evaluated against the caller-tracked state
//! of each argument.

mod dispatcher;
mod registry;
mod state;

pub use dispatcher::{OwnershipDispatcher, OwnershipOutcome};
pub use registry::{OwnershipRegistry, OwnershipSignature};
pub use state::{
    MoveSemantics, MoveSemanticsCache, OwnershipState, OwnershipViolation, ParameterOwnership,
    ParameterOwnershipKind,
};

#[cfg(test)]
#[path = "../tests/ownership_tests.rs"]
mod tests;
