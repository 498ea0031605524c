//! Component M: content-addressed, on-disk persistence for optimized
//! dispatch tables, with a `cache_index.json` sidecar and LRU-by-size
//! eviction.

use crate::format::JdcFile;
use crate::index::{CacheIndex, CacheIndexEntry};
use crate::key::CacheKey;
use dispatch_common::CacheError;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Instant;

const INDEX_FILE_NAME: &str = "cache_index.json";

/// Decoded `.jdc` files kept hot in memory so a repeat qualified call
/// doesn't pay a disk read; the on-disk `.jdc` files and
/// `cache_index.json` remain the source of truth this is a read-through
/// accelerator for, not a replacement for them.
const MEMORY_HOT_CACHE_CAPACITY: usize = 256;

#[derive(Debug, Default, Clone, Copy)]
struct Timings {
    serialize_total_ns: u64,
    serialize_count: u64,
    deserialize_total_ns: u64,
    deserialize_count: u64,
}

pub struct DispatchCache {
    cache_dir: PathBuf,
    index: CacheIndex,
    hits: u64,
    misses: u64,
    timings: Timings,
    hot: LruCache<String, JdcFile>,
}

impl DispatchCache {
    /// Opens (creating if necessary) a cache rooted at `cache_dir`,
    /// loading its `cache_index.json` sidecar if present.
    pub fn open(cache_dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let cache_dir = cache_dir.into();
        std::fs::create_dir_all(&cache_dir)
            .map_err(|e| CacheError::DirectoryUnavailable(cache_dir.clone(), e))?;
        let index = CacheIndex::load(&cache_dir.join(INDEX_FILE_NAME));
        Ok(Self {
            cache_dir,
            index,
            hits: 0,
            misses: 0,
            timings: Timings::default(),
            hot: LruCache::new(NonZeroUsize::new(MEMORY_HOT_CACHE_CAPACITY).unwrap()),
        })
    }

    fn jdc_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(format!("{}.jdc", key.file_stem()))
    }

    fn index_path(&self) -> PathBuf {
        self.cache_dir.join(INDEX_FILE_NAME)
    }

    pub fn serialize(&mut self, key: CacheKey, file: &JdcFile, now_ns: u64) -> Result<PathBuf, CacheError> {
        let start = Instant::now();
        let bytes = file.encode();
        let path = self.jdc_path(&key);
        std::fs::write(&path, &bytes).map_err(|e| CacheError::Write(path.clone(), e))?;

        self.index.insert(
            key,
            CacheIndexEntry {
                key: key.into(),
                file: path.clone(),
                size: bytes.len() as u64,
                created_ns: now_ns,
                last_access_ns: now_ns,
                accesses: 0,
                format_version: crate::format::FORMAT_VERSION,
                table_hash: file.table_hash,
                opt_hash: file.compute_table_hash(),
            },
        );
        self.index
            .save(&self.index_path())
            .map_err(|e| CacheError::Write(self.index_path(), e))?;

        self.hot.put(key.file_stem(), file.clone());
        self.timings.serialize_total_ns += start.elapsed().as_nanos() as u64;
        self.timings.serialize_count += 1;
        Ok(path)
    }

    /// Returns `Ok(None)` on any miss, including an incompatible
    /// `format_version` or a stale index entry whose file is gone — both
    /// are misses, not errors, per §6. A CRC mismatch additionally
    /// evicts the file from the index.
    pub fn deserialize(&mut self, key: &CacheKey, now_ns: u64) -> Result<Option<JdcFile>, CacheError> {
        let start = Instant::now();
        if let Some(file) = self.hot.get(&key.file_stem()).cloned() {
            self.hits += 1;
            if let Some(entry) = self.index.get_mut(key) {
                entry.last_access_ns = now_ns;
                entry.accesses += 1;
            }
            self.timings.deserialize_total_ns += start.elapsed().as_nanos() as u64;
            self.timings.deserialize_count += 1;
            return Ok(Some(file));
        }

        let Some(entry) = self.index.get(key).cloned() else {
            self.misses += 1;
            return Ok(None);
        };

        let bytes = match std::fs::read(&entry.file) {
            Ok(bytes) => bytes,
            Err(_) => {
                // Stale index entry referencing a file absent on disk:
                // silently evict and report a miss.
                self.index.remove(key);
                let _ = self.index.save(&self.index_path());
                self.misses += 1;
                return Ok(None);
            }
        };

        match JdcFile::decode(&bytes) {
            Ok(file) => {
                self.hits += 1;
                if let Some(entry) = self.index.get_mut(key) {
                    entry.last_access_ns = now_ns;
                    entry.accesses += 1;
                }
                let _ = self.index.save(&self.index_path());
                self.hot.put(key.file_stem(), file.clone());
                self.timings.deserialize_total_ns += start.elapsed().as_nanos() as u64;
                self.timings.deserialize_count += 1;
                Ok(Some(file))
            }
            Err(crate::format::JdcError::IncompatibleVersion(_)) => {
                self.misses += 1;
                Ok(None)
            }
            Err(crate::format::JdcError::CrcMismatch) => {
                let _ = std::fs::remove_file(&entry.file);
                self.index.remove(key);
                let _ = self.index.save(&self.index_path());
                self.misses += 1;
                Ok(None)
            }
            Err(_) => {
                self.misses += 1;
                Ok(None)
            }
        }
    }

    #[must_use]
    pub fn is_cached(&self, key: &CacheKey) -> bool {
        self.index.get(key).is_some_and(|entry| entry.file.exists())
    }

    pub fn invalidate(&mut self, key: &CacheKey) -> Result<(), CacheError> {
        if let Some(entry) = self.index.remove(key) {
            let _ = std::fs::remove_file(&entry.file);
        }
        self.index
            .save(&self.index_path())
            .map_err(|e| CacheError::Write(self.index_path(), e))
    }

    /// Applies an age filter (evicting entries older than `max_age_ns`),
    /// then LRU-evicts by `last_access_ns` until the total cached size
    /// is at or under `max_size_bytes`. Entries renewed within the
    /// current process instance (`protected_stems`) are never evicted,
    /// per §5's shared-resource guarantee.
    pub fn cleanup(&mut self, max_age_ns: u64, max_size_bytes: u64, now_ns: u64, protected_stems: &[String]) -> Result<u64, CacheError> {
        let mut evicted = 0u64;
        let stems_to_drop: Vec<String> = self
            .index
            .iter()
            .filter(|(stem, entry)| {
                !protected_stems.iter().any(|p| p == stem)
                    && now_ns.saturating_sub(entry.created_ns) > max_age_ns
            })
            .map(|(stem, _)| stem.to_string())
            .collect();
        for stem in &stems_to_drop {
            self.evict_stem(stem)?;
            evicted += 1;
        }

        let mut total_size: u64 = self.index.iter().map(|(_, e)| e.size).sum();
        if total_size > max_size_bytes {
            let mut by_access: Vec<(String, u64, u64)> = self
                .index
                .iter()
                .filter(|(stem, _)| !protected_stems.iter().any(|p| p == *stem))
                .map(|(stem, entry)| (stem.to_string(), entry.last_access_ns, entry.size))
                .collect();
            by_access.sort_by_key(|&(_, last_access_ns, _)| last_access_ns);

            for (stem, _, size) in by_access {
                if total_size <= max_size_bytes {
                    break;
                }
                self.evict_stem(&stem)?;
                total_size = total_size.saturating_sub(size);
                evicted += 1;
            }
        }

        self.index
            .save(&self.index_path())
            .map_err(|e| CacheError::Write(self.index_path(), e))?;
        Ok(evicted)
    }

    fn evict_stem(&mut self, stem: &str) -> Result<(), CacheError> {
        let path = self.cache_dir.join(format!("{stem}.jdc"));
        let _ = std::fs::remove_file(&path);
        self.index.retain(|entry| entry.file != path);
        Ok(())
    }

    #[must_use]
    pub fn cache_hits(&self) -> u64 {
        self.hits
    }

    #[must_use]
    pub fn cache_misses(&self) -> u64 {
        self.misses
    }

    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn avg_serialize_ns(&self) -> f64 {
        if self.timings.serialize_count == 0 {
            0.0
        } else {
            self.timings.serialize_total_ns as f64 / self.timings.serialize_count as f64
        }
    }

    #[must_use]
    pub fn avg_deserialize_ns(&self) -> f64 {
        if self.timings.deserialize_count == 0 {
            0.0
        } else {
            self.timings.deserialize_total_ns as f64 / self.timings.deserialize_count as f64
        }
    }
}
