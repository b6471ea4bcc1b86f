//! Grouping engine: partition files by a key and drop undersized groups.
//!
//! # Overview
//!
//! [`group_by_key`] evaluates a [`KeyExtractor`] for every file, buckets the
//! files by key value, discards files whose key is absent, and keeps only
//! buckets with at least `min_group_size` members. The pipeline uses it once
//! with the size key and once per size-class with the hash key.
//!
//! [`group_by_key_concurrent`] computes the keys on a bounded rayon pool and
//! then runs the same single-threaded bucketing over the collected pairs.
//!
//! # Ordering
//!
//! Groups are returned in the order their key was first seen, and members
//! keep input order. The concurrent variant collects results through an
//! indexed parallel iterator, which reassembles them in input order, so both
//! variants return identical output.
//!
//! # Example
//!
//! ```
//! use finddupes::duplicates::{group_by_key, SizeKey};
//! use finddupes::scanner::FileRef;
//!
//! let files = vec![
//!     FileRef::with_size("/a.txt", 100),
//!     FileRef::with_size("/b.txt", 100),
//!     FileRef::with_size("/c.txt", 200),
//! ];
//!
//! let groups = group_by_key(files, &SizeKey::default(), 2);
//!
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].key, 100);
//! assert_eq!(groups[0].len(), 2);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use rayon::prelude::*;

use super::keys::KeyExtractor;
use crate::scanner::{hash_to_hex, FileRef, Hash};

/// Files sharing one key value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<K> {
    /// Key shared by every member
    pub key: K,
    /// Members in input order
    pub files: Vec<FileRef>,
}

impl<K> Group<K> {
    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Confirmed group of files with identical content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Content digest shared by all files
    pub hash: Hash,
    /// File size in bytes (shared by all files)
    pub size: u64,
    /// Files with this content, in discovery order
    pub files: Vec<FileRef>,
}

impl DuplicateGroup {
    #[must_use]
    pub fn new(hash: Hash, size: u64, files: Vec<FileRef>) -> Self {
        Self { hash, size, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Space taken by all copies but one.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Hash as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path().to_path_buf()).collect()
    }
}

/// Bucket already-keyed files, keeping first-seen key order.
fn bucket<K>(
    keyed: impl IntoIterator<Item = (FileRef, Option<K>)>,
    min_group_size: usize,
) -> Vec<Group<K>>
where
    K: Eq + std::hash::Hash + Clone,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Group<K>> = Vec::new();
    let mut absent = 0usize;

    for (file, key) in keyed {
        let Some(key) = key else {
            absent += 1;
            continue;
        };
        match index.get(&key) {
            Some(&slot) => groups[slot].files.push(file),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    files: vec![file],
                });
            }
        }
    }

    let distinct = groups.len();
    groups.retain(|g| g.len() >= min_group_size);

    log::debug!(
        "Grouped into {} distinct keys, {} kept (min group size {}), {} files without key",
        distinct,
        groups.len(),
        min_group_size,
        absent
    );

    groups
}

/// Group files by key, evaluating keys on the calling thread.
///
/// Files whose key is `None` are dropped. Groups with fewer than
/// `min_group_size` members are not returned.
///
/// # Example
///
/// ```
/// use finddupes::duplicates::{group_by_key, SizeKey};
/// use finddupes::scanner::FileRef;
///
/// let files = vec![FileRef::with_size("/only.txt", 10)];
///
/// assert!(group_by_key(files.clone(), &SizeKey::default(), 2).is_empty());
/// assert_eq!(group_by_key(files, &SizeKey::default(), 1).len(), 1);
/// ```
#[must_use]
pub fn group_by_key<E>(
    files: impl IntoIterator<Item = FileRef>,
    extractor: &E,
    min_group_size: usize,
) -> Vec<Group<E::Key>>
where
    E: KeyExtractor,
    E::Key: Clone,
{
    let keyed = files.into_iter().map(|file| {
        let key = extractor.key(&file);
        (file, key)
    });
    bucket(keyed, min_group_size)
}

/// Threads worth spawning for `files` keys: at most one per file.
fn pool_size(workers: usize, files: usize) -> usize {
    workers.min(files).max(1)
}

/// Group files by key, evaluating keys on a pool of up to `workers` threads.
///
/// The pool lives for the duration of this call and never has more threads
/// than there are files. Fewer than two files are keyed on the calling
/// thread. All keys are computed before grouping starts; the result is the
/// same as [`group_by_key`] on the same input. If the pool cannot be created
/// the keys are computed on the calling thread instead.
#[must_use]
pub fn group_by_key_concurrent<E>(
    files: Vec<FileRef>,
    extractor: &E,
    min_group_size: usize,
    workers: usize,
) -> Vec<Group<E::Key>>
where
    E: KeyExtractor,
    E::Key: Clone,
{
    if files.len() < 2 {
        return group_by_key(files, extractor, min_group_size);
    }

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(pool_size(workers, files.len()))
        .thread_name(|i| format!("finddupes-worker-{i}"))
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            log::warn!(
                "Failed to create worker pool ({}), computing keys sequentially",
                e
            );
            return group_by_key(files, extractor, min_group_size);
        }
    };

    log::debug!(
        "Computing {} keys on {} workers",
        files.len(),
        pool.current_num_threads()
    );

    let keyed: Vec<(FileRef, Option<E::Key>)> = pool.install(|| {
        files
            .into_par_iter()
            .map(|file| {
                let key = extractor.key(&file);
                (file, key)
            })
            .collect()
    });

    bucket(keyed, min_group_size)
}
