//! Key extractors used to partition files.
//!
//! A [`KeyExtractor`] maps a [`FileRef`] to a key, or to `None` when the file
//! must not take part in grouping (unreadable, out of bounds, vanished).
//!
//! - [`SizeKey`]: stat-based, cheap. Applied to every walked file.
//! - [`HashKey`]: full-content digest, expensive. Applied only within
//!   size-classes.
//! - [`Tracked`]: wraps another extractor and reports each evaluation to a
//!   [`ProgressCallback`].

use std::hash::Hash as StdHash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::progress::ProgressCallback;
use crate::scanner::{FileRef, Hash, HashAlgorithm, Hasher};

/// Default lower size bound in bytes.
pub const DEFAULT_MIN_SIZE: u64 = 0;

/// Default upper size bound in bytes.
pub const DEFAULT_MAX_SIZE: u64 = 1_000_000_000;

/// Computes the grouping key of a file.
///
/// Implementations must be `Sync`: the concurrent grouping mode shares one
/// extractor between all workers.
pub trait KeyExtractor: Sync {
    /// Key type; compared by value.
    type Key: Eq + StdHash + Send;

    /// Compute the key, or `None` to exclude the file from grouping.
    fn key(&self, file: &FileRef) -> Option<Self::Key>;
}

/// File size within inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeKey {
    min_size: u64,
    max_size: u64,
}

impl SizeKey {
    #[must_use]
    pub fn new(min_size: u64, max_size: u64) -> Self {
        Self { min_size, max_size }
    }
}

impl Default for SizeKey {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SIZE, DEFAULT_MAX_SIZE)
    }
}

impl KeyExtractor for SizeKey {
    type Key = u64;

    fn key(&self, file: &FileRef) -> Option<u64> {
        let size = match file.size() {
            Ok(size) => size,
            Err(e) => {
                log::warn!("Skipping file (could not stat): {}", e);
                return None;
            }
        };

        if (self.min_size..=self.max_size).contains(&size) {
            Some(size)
        } else {
            log::trace!(
                "Skipping file due to size filter ({}): {}",
                size,
                file.path().display()
            );
            None
        }
    }
}

/// Full-content digest.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashKey {
    hasher: Hasher,
}

impl HashKey {
    #[must_use]
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            hasher: Hasher::new(algorithm),
        }
    }
}

impl KeyExtractor for HashKey {
    type Key = Hash;

    fn key(&self, file: &FileRef) -> Option<Hash> {
        match self.hasher.hash_file(file.path()) {
            Ok(hash) => Some(hash),
            Err(e) => {
                log::warn!("Skipping file (could not read): {}", e);
                None
            }
        }
    }
}

/// Extractor decorator that reports progress after every key computation.
///
/// The counter is atomic, so a `Tracked` extractor can be shared by the
/// workers of a concurrent grouping call.
pub struct Tracked<'a, E> {
    inner: E,
    callback: &'a Arc<dyn ProgressCallback>,
    done: AtomicUsize,
}

impl<'a, E: KeyExtractor> Tracked<'a, E> {
    /// Wrap `inner`, numbering progress from `offset + 1`.
    pub fn new(inner: E, callback: &'a Arc<dyn ProgressCallback>, offset: usize) -> Self {
        Self {
            inner,
            callback,
            done: AtomicUsize::new(offset),
        }
    }

    /// Number of evaluations seen so far, including the offset.
    pub fn completed(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }
}

impl<E: KeyExtractor> KeyExtractor for Tracked<'_, E> {
    type Key = E::Key;

    fn key(&self, file: &FileRef) -> Option<Self::Key> {
        let key = self.inner.key(file);
        let current = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        self.callback
            .on_progress(current, file.path().to_string_lossy().as_ref());
        key
    }
}
