//! Ambient error types for failures that are *not* user-facing compilation
//! diagnostics: cache I/O, malformed on-disk state, configuration
//! problems. Per `SPEC_FULL.md` §7.1 these are allowed to be ordinary
//! `Result::Err` values propagated to the caller, unlike resolution/type/
//! effect/module/ownership failures which always flow through the
//! diagnostic collector instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache directory {0} could not be created")]
    DirectoryUnavailable(PathBuf, #[source] std::io::Error),
    #[error("failed to read cache entry at {0}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("failed to write cache entry at {0}")]
    Write(PathBuf, #[source] std::io::Error),
    #[error("cache entry at {0} is corrupt: {1}")]
    Corrupt(PathBuf, String),
    #[error("cache index at {0} could not be parsed")]
    IndexMalformed(PathBuf, #[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid resolver configuration: {0}")]
    Invalid(String),
}
