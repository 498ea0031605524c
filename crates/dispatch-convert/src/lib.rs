//! Conversion Registry (component B): the catalog of explicit
//! conversions between types, and per-argument conversion path search.

mod registry;

pub use registry::{ArgumentConversion, Conversion, ConversionMethod, ConversionPath, ConversionRegistry};

#[cfg(test)]
#[path = "../tests/convert_tests.rs"]
mod tests;
