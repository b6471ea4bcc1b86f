//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Lazy, depth-first directory walking using walkdir
//! - Name-based include/exclude filtering with shell globs
//! - Streaming content hashing (BLAKE3 or SHA-256)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: Streaming file hashing in fixed-size chunks
//!
//! # Example
//!
//! ```no_run
//! use finddupes::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     exclude: vec!["*.tmp".to_string()],
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("."), config).unwrap();
//! for file in walker.walk() {
//!     println!("{}", file.path().display());
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::fs;
use std::hash::{Hash as StdHash, Hasher as StdHasher};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// Re-export main types
pub use hasher::{hash_to_hex, Hash, HashAlgorithm, Hasher, CHUNK_SIZE};
pub use walker::Walker;

/// Handle to one filesystem entry discovered during traversal.
///
/// The size is fetched lazily on first access and cached for the lifetime
/// of the handle. Two handles are equal when their paths are equal.
#[derive(Debug, Clone)]
pub struct FileRef {
    path: PathBuf,
    name: String,
    is_dir: bool,
    is_symlink: bool,
    size: OnceLock<u64>,
}

impl FileRef {
    /// Create a handle for a regular file that is not a symlink.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_kind(path.into(), false, false)
    }

    pub(crate) fn with_kind(path: PathBuf, is_dir: bool, is_symlink: bool) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            name,
            is_dir,
            is_symlink,
            size: OnceLock::new(),
        }
    }

    /// Create a handle whose size is already known.
    ///
    /// Useful when the caller has metadata at hand (and in tests, where
    /// the path does not need to exist).
    #[must_use]
    pub fn with_size(path: impl Into<PathBuf>, size: u64) -> Self {
        let file = Self::new(path);
        let _ = file.size.set(size);
        file
    }

    /// Path of the entry as discovered (relative if the root was relative).
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name of the entry.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    #[must_use]
    pub fn is_symlink(&self) -> bool {
        self.is_symlink
    }

    /// Size in bytes, following symlinks.
    ///
    /// The first successful stat is cached; failures are not cached so a
    /// later call may retry.
    ///
    /// # Errors
    ///
    /// Returns a [`ScanError`] if the entry cannot be stat'ed.
    pub fn size(&self) -> Result<u64, ScanError> {
        if let Some(size) = self.size.get() {
            return Ok(*size);
        }
        let metadata =
            fs::metadata(&self.path).map_err(|e| ScanError::from_io(&self.path, e))?;
        Ok(*self.size.get_or_init(|| metadata.len()))
    }
}

impl PartialEq for FileRef {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for FileRef {}

impl StdHash for FileRef {
    fn hash<H: StdHasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

/// Configuration for directory walking.
///
/// Controls symlink handling and name filtering.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Descend into symbolically linked directories.
    /// Symlink cycles are detected and skipped.
    pub follow_symlinks: bool,

    /// Shell globs matched against file base names.
    /// When non-empty, files matching none of them are dropped.
    pub include: Vec<String>,

    /// Shell globs matched against the base name of every entry.
    /// Matching files are dropped and matching directories are not descended.
    pub exclude: Vec<String>,
}

impl WalkerConfig {
    #[must_use]
    pub fn new(follow_symlinks: bool, include: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            follow_symlinks,
            include,
            exclude,
        }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// A name glob could not be compiled.
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        /// The pattern as given by the user
        pattern: String,
        /// The underlying parse error
        #[source]
        source: globset::Error,
    },

    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    pub(crate) fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    pub(crate) fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
