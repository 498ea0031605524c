//! `cache_index.json`: the sidecar the cache consults before touching a
//! `.jdc` file, so a miss never requires opening a file that turned out
//! to be gone or superseded.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::key::CacheKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheIndexEntry {
    pub key: CacheKeyJson,
    pub file: PathBuf,
    pub size: u64,
    pub created_ns: u64,
    pub last_access_ns: u64,
    pub accesses: u64,
    pub format_version: u32,
    pub table_hash: u64,
    pub opt_hash: u64,
}

/// `CacheKey` reshaped for JSON field names matching §6's index schema.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CacheKeyJson {
    pub sig_hash: u64,
    pub type_sig_hash: u64,
    pub deps_hash: u64,
}

impl From<CacheKey> for CacheKeyJson {
    fn from(key: CacheKey) -> Self {
        Self {
            sig_hash: key.signature_hash,
            type_sig_hash: key.type_signature_hash,
            deps_hash: key.dependencies_hash,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheIndex {
    entries: HashMap<String, CacheIndexEntry>,
}

impl CacheIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let values: Vec<&CacheIndexEntry> = self.entries.values().collect();
        let json = serde_json::to_string_pretty(&values)?;
        std::fs::write(path, json)
    }

    pub fn insert(&mut self, key: CacheKey, entry: CacheIndexEntry) {
        self.entries.insert(key.file_stem(), entry);
    }

    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<&CacheIndexEntry> {
        self.entries.get(&key.file_stem())
    }

    pub fn get_mut(&mut self, key: &CacheKey) -> Option<&mut CacheIndexEntry> {
        self.entries.get_mut(&key.file_stem())
    }

    pub fn remove(&mut self, key: &CacheKey) -> Option<CacheIndexEntry> {
        self.entries.remove(&key.file_stem())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CacheIndexEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&CacheIndexEntry) -> bool) {
        self.entries.retain(|_, entry| keep(entry));
    }
}
