//! Duplicate finder implementation with two-stage grouping.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Walk**: lazily enumerate candidate files
//! 2. **Size grouping**: partition by size within the configured bounds
//! 3. **Hash grouping**: partition each size-class by content digest,
//!    optionally on a bounded worker pool
//!
//! Files with a unique size are never opened.
//!
//! # Example
//!
//! ```no_run
//! use finddupes::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let config = FinderConfig::default().with_workers(16);
//! let finder = DuplicateFinder::new(config).unwrap();
//!
//! let (groups, summary) = finder.find_duplicates(Path::new("."));
//! for group in &groups {
//!     println!("{} copies of {} bytes", group.len(), group.size);
//! }
//! println!("Reclaimable: {}", summary.reclaimable_display());
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::groups::{group_by_key, group_by_key_concurrent, DuplicateGroup, Group};
use super::keys::{HashKey, KeyExtractor, SizeKey, Tracked, DEFAULT_MAX_SIZE, DEFAULT_MIN_SIZE};
use crate::progress::ProgressCallback;
use crate::scanner::{FileRef, Hash, HashAlgorithm, ScanError, Walker, WalkerConfig};

/// Default minimum number of members for a group to be reported.
pub const DEFAULT_MIN_GROUP_SIZE: usize = 2;

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Smallest file size considered, inclusive.
    pub min_size: u64,
    /// Largest file size considered, inclusive.
    pub max_size: u64,
    /// Groups with fewer members are dropped at both stages.
    pub min_group_size: usize,
    /// Digest used for the content stage.
    pub algorithm: HashAlgorithm,
    /// Worker threads for hashing; 0 hashes on the calling thread.
    pub workers: usize,
    /// Optional progress callback for the hashing stage.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("min_size", &self.min_size)
            .field("max_size", &self.max_size)
            .field("min_group_size", &self.min_group_size)
            .field("algorithm", &self.algorithm)
            .field("workers", &self.workers)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            walker_config: WalkerConfig::default(),
            min_size: DEFAULT_MIN_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
            algorithm: HashAlgorithm::default(),
            workers: 0,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the inclusive size bounds.
    #[must_use]
    pub fn with_size_bounds(mut self, min_size: u64, max_size: u64) -> Self {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    /// Set the minimum group size (at least 1).
    #[must_use]
    pub fn with_min_group_size(mut self, size: usize) -> Self {
        self.min_group_size = size.max(1);
        self
    }

    /// Set the content digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the number of hashing workers (0 = sequential).
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Number of files produced by the walker
    pub total_files: usize,
    /// Files sharing a size with at least one other file (hash candidates)
    pub size_candidates: usize,
    /// Number of size-classes handed to the hash stage
    pub size_groups: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding one original per group)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }
}

impl std::fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} files scanned, {} hash candidates in {} size groups, \
             {} duplicate groups ({} duplicate files, {} reclaimable) in {:.2?}",
            self.total_files,
            self.size_candidates,
            self.size_groups,
            self.duplicate_groups,
            self.duplicate_files,
            self.reclaimable_display(),
            self.scan_duration
        )
    }
}

/// Errors that can occur while setting up a duplicate scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// A scan error occurred.
    #[error(transparent)]
    ScanError(#[from] ScanError),
}

/// Duplicate finder that orchestrates the two-stage pipeline.
///
/// Construction compiles the name globs, so a finder can be reused for
/// several roots.
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if a name glob is invalid.
    pub fn new(config: FinderConfig) -> Result<Self, FinderError> {
        // Validate globs up front; the walker itself is built per root
        Walker::new(Path::new("."), config.walker_config.clone())?;
        Ok(Self { config })
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            config: FinderConfig::default(),
        }
    }

    /// Find all duplicate files below `path`.
    ///
    /// Never fails: unreadable directories and files are logged and left
    /// out. A missing root or a root that is not a directory simply yields
    /// no groups.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use finddupes::duplicates::DuplicateFinder;
    /// use std::path::Path;
    ///
    /// let finder = DuplicateFinder::with_defaults();
    /// let (groups, summary) = finder.find_duplicates(Path::new("."));
    /// println!("Found {} duplicate groups", groups.len());
    /// println!("{}", summary);
    /// ```
    pub fn find_duplicates(&self, path: &Path) -> (Vec<DuplicateGroup>, ScanSummary) {
        let start_time = Instant::now();
        let mut summary = ScanSummary::default();

        log::info!("Starting duplicate scan of {}", path.display());

        let walker = match Walker::new(path, self.config.walker_config.clone()) {
            Ok(walker) => walker,
            Err(e) => {
                // Unreachable after `new` validated the globs
                log::error!("Cannot walk {}: {}", path.display(), e);
                summary.scan_duration = start_time.elapsed();
                return (Vec::new(), summary);
            }
        };

        let mut total_files = 0usize;
        let walked = walker.walk().inspect(|_| total_files += 1);

        // Stage 1: size
        let size_key = SizeKey::new(self.config.min_size, self.config.max_size);
        let size_groups = group_by_key(walked, &size_key, self.config.min_group_size);

        summary.total_files = total_files;
        summary.size_groups = size_groups.len();
        summary.size_candidates = size_groups.iter().map(Group::len).sum();

        log::info!(
            "Size grouping complete: {} files → {} candidates in {} size groups",
            summary.total_files,
            summary.size_candidates,
            summary.size_groups
        );

        // Stage 2: content
        let groups = self.group_by_content(size_groups, summary.size_candidates);

        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        summary.reclaimable_space = groups.iter().map(DuplicateGroup::wasted_space).sum();
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} duplicate groups, {} duplicate files, {} reclaimable",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display()
        );

        (groups, summary)
    }

    /// Split every size-class by content digest and flatten the result.
    fn group_by_content(
        &self,
        size_groups: Vec<Group<u64>>,
        candidates: usize,
    ) -> Vec<DuplicateGroup> {
        let hash_key = HashKey::new(self.config.algorithm);
        let mut duplicates = Vec::new();

        match &self.config.progress_callback {
            Some(callback) => {
                callback.on_phase_start("hashing", candidates);
                let mut done = 0usize;
                for size_group in size_groups {
                    let tracked = Tracked::new(hash_key, callback, done);
                    let size = size_group.key;
                    duplicates.extend(self.split(size, size_group.files, &tracked));
                    done = tracked.completed();
                }
                callback.on_phase_end("hashing");
            }
            None => {
                for size_group in size_groups {
                    let size = size_group.key;
                    duplicates.extend(self.split(size, size_group.files, &hash_key));
                }
            }
        }

        duplicates
    }

    /// Hash-group one size-class.
    fn split<E>(&self, size: u64, files: Vec<FileRef>, extractor: &E) -> Vec<DuplicateGroup>
    where
        E: KeyExtractor<Key = Hash>,
    {
        log::debug!("Hashing size group of {} bytes ({} files)", size, files.len());

        let groups = if self.config.workers > 0 {
            group_by_key_concurrent(
                files,
                extractor,
                self.config.min_group_size,
                self.config.workers,
            )
        } else {
            group_by_key(files, extractor, self.config.min_group_size)
        };

        groups
            .into_iter()
            .map(|g| {
                let group = DuplicateGroup::new(g.key, size, g.files);
                log::trace!(
                    "Duplicate group {} ({} files of {} bytes)",
                    group.hash_hex(),
                    group.len(),
                    size
                );
                group
            })
            .collect()
    }
}
