use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{
        Mutex,
        atomic::{AtomicU64, Ordering},
    },
    time::SystemTime,
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    foundation::error::{StrokeError, StrokeResult},
    foundation::math::fingerprint_raster,
    raster::image::RasterImage,
    segment::boundary::{BoundaryLoop, extract_boundaries},
    segment::cells::{Cell, segment},
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Identity of a source image for cache lookups.
pub struct ImageStamp {
    /// Stable name of the source; entries are stored under it.
    pub key: String,
    /// Last time the source changed. Entries written at or before it are stale.
    pub modified: SystemTime,
}

impl ImageStamp {
    /// Stamp a file by its stem and modification time.
    pub fn from_path(path: &Path) -> StrokeResult<Self> {
        let key = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| StrokeError::invalid_input(format!("no file stem in '{}'", path.display())))?
            .to_string();
        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .with_context(|| format!("stat source image '{}'", path.display()))?;
        Ok(Self { key, modified })
    }

    /// Stamp an in-memory raster by a fingerprint of its pixels.
    pub fn from_image<I: RasterImage + ?Sized>(image: &I, modified: SystemTime) -> Self {
        Self {
            key: format!("img-{:016x}", fingerprint_raster(image)),
            modified,
        }
    }
}

/// Time source for cache writes.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> SystemTime;
}

#[derive(Clone, Copy, Debug, Default)]
/// Wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

#[derive(Clone, Copy, Debug)]
/// Clock frozen at one instant.
pub struct FixedClock(pub SystemTime);

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Serialized value plus the time it was written.
pub struct CacheEntry {
    /// Write time.
    pub written: SystemTime,
    /// JSON payload.
    pub payload: String,
}

/// Durable key/kind addressed storage behind [`SilhouetteCache`].
///
/// Implementations must keep a single writer per `(key, kind)`: a concurrent
/// reader sees either the previous entry or the new one, never a torn write.
pub trait CacheStore: Send + Sync {
    /// Fetch an entry, `None` when absent.
    fn load(&self, key: &str, kind: &str) -> StrokeResult<Option<CacheEntry>>;

    /// Replace an entry.
    fn store(&self, key: &str, kind: &str, entry: CacheEntry) -> StrokeResult<()>;
}

#[derive(Debug, Default)]
/// In-process store guarded by a mutex.
pub struct MemoryStore {
    entries: Mutex<HashMap<(String, String), CacheEntry>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// Return `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryStore {
    fn load(&self, key: &str, kind: &str) -> StrokeResult<Option<CacheEntry>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StrokeError::cache("memory store lock poisoned"))?;
        Ok(entries.get(&(key.to_string(), kind.to_string())).cloned())
    }

    fn store(&self, key: &str, kind: &str, entry: CacheEntry) -> StrokeResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StrokeError::cache("memory store lock poisoned"))?;
        entries.insert((key.to_string(), kind.to_string()), entry);
        Ok(())
    }
}

#[derive(Clone, Debug)]
/// Directory of `<key>_<kind>.json` files.
///
/// Write times come from file modification times; [`CacheEntry::written`] is
/// ignored on store. Files are written to a temporary name and renamed into
/// place.
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    /// Use `dir`, creating it when missing.
    pub fn open(dir: impl Into<PathBuf>) -> StrokeResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create cache dir '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `(key, kind)`.
    pub fn entry_path(&self, key: &str, kind: &str) -> PathBuf {
        self.dir.join(format!("{key}_{kind}.json"))
    }
}

impl CacheStore for JsonDirStore {
    fn load(&self, key: &str, kind: &str) -> StrokeResult<Option<CacheEntry>> {
        let path = self.entry_path(key, kind);
        let meta = match std::fs::metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StrokeError::cache(format!("stat '{}': {e}", path.display())));
            }
        };
        let written = meta
            .modified()
            .map_err(|e| StrokeError::cache(format!("mtime of '{}': {e}", path.display())))?;
        let payload = std::fs::read_to_string(&path)
            .map_err(|e| StrokeError::cache(format!("read '{}': {e}", path.display())))?;
        Ok(Some(CacheEntry { written, payload }))
    }

    fn store(&self, key: &str, kind: &str, entry: CacheEntry) -> StrokeResult<()> {
        let path = self.entry_path(key, kind);
        let tmp = self
            .dir
            .join(format!(".{key}_{kind}.json.{}.tmp", std::process::id()));
        std::fs::write(&tmp, entry.payload.as_bytes())
            .map_err(|e| StrokeError::cache(format!("write '{}': {e}", tmp.display())))?;
        std::fs::rename(&tmp, &path).map_err(|e| {
            std::fs::remove_file(&tmp).ok();
            StrokeError::cache(format!("rename into '{}': {e}", path.display()))
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Lookup counters of a [`SilhouetteCache`].
pub struct CacheStats {
    /// Lookups answered from the store.
    pub hits: u64,
    /// Lookups that recomputed and wrote back.
    pub misses: u64,
}

/// Read-through, write-through memoization of segmentation results.
///
/// An entry is fresh iff it was written strictly after the stamp's
/// modification time. Stale, missing, or unreadable entries are recomputed
/// and overwritten.
pub struct SilhouetteCache<S, C = SystemClock> {
    store: S,
    clock: C,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S: CacheStore> SilhouetteCache<S> {
    /// Cache over `store` using the wall clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: CacheStore, C: Clock> SilhouetteCache<S, C> {
    /// Cache over `store` with an explicit time source.
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Counters since construction.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Cells of `image`, from the store when fresh.
    pub fn cells<I: RasterImage + ?Sized>(&self, stamp: &ImageStamp, image: &I) -> StrokeResult<Vec<Cell>> {
        self.read_through(stamp, "cells", || segment(image))
    }

    /// Boundary loops of `cells`, from the store when fresh.
    pub fn boundaries<I: RasterImage + ?Sized>(
        &self,
        stamp: &ImageStamp,
        image: &I,
        cells: &[Cell],
    ) -> StrokeResult<Vec<Vec<BoundaryLoop>>> {
        self.read_through(stamp, "boundaries", || extract_boundaries(image, cells))
    }

    fn read_through<T, F>(&self, stamp: &ImageStamp, kind: &str, compute: F) -> StrokeResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        if let Some(entry) = self.store.load(&stamp.key, kind)?
            && entry.written > stamp.modified
        {
            match serde_json::from_str(&entry.payload) {
                Ok(value) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(key = %stamp.key, kind, "cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(key = %stamp.key, kind, error = %e, "discarding unreadable cache entry");
                }
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = compute();
        let payload = serde_json::to_string(&value).map_err(|e| StrokeError::serde(e.to_string()))?;
        self.store.store(
            &stamp.key,
            kind,
            CacheEntry {
                written: self.clock.now(),
                payload,
            },
        )?;
        tracing::debug!(key = %stamp.key, kind, "cache refreshed");
        Ok(value)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/store.rs"]
mod tests;
