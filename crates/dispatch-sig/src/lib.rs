//! Signature Analyzer (component C) and Specificity Analyzer
//! (component D).

mod effects;
mod implementation;
mod specificity;

pub use effects::Effects;
pub use implementation::{Implementation, SignatureAnalyzer};
pub use specificity::{SpecificityAnalyzer, SpecificityResult};

#[cfg(test)]
#[path = "../tests/sig_tests.rs"]
mod tests;
