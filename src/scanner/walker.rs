//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct, which lazily enumerates the
//! regular files below a root directory as [`FileRef`] handles.
//!
//! # Traversal order
//!
//! Depth-first. Within each directory the files are yielded first (in the
//! order the directory listing returned them), then every subdirectory of
//! that level is descended into, again in listing order.
//!
//! # Filtering
//!
//! - Exclude globs are checked first against the base name of every entry;
//!   excluded directories are pruned without being read.
//! - Include globs only apply to files.
//! - Symlinked directories are descended only when `follow_symlinks` is set.
//!   Symlinks to files are always yielded.
//!
//! Unreadable directories, vanished entries and symlink loops are logged at
//! warn level and skipped. The walk itself never fails.
//!
//! # Example
//!
//! ```no_run
//! use finddupes::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     include: vec!["*.jpg".to_string(), "*.png".to_string()],
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("/home/user/Pictures"), config).unwrap();
//! let files: Vec<_> = walker.walk().collect();
//! println!("Found {} images", files.len());
//! ```

use std::cmp::Ordering;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::{DirEntry, WalkDir};

use super::{FileRef, ScanError, WalkerConfig};

/// Compile a list of shell globs into a single matcher.
///
/// Returns `None` for an empty list so "no filter" stays distinguishable
/// from "a filter nothing matches".
fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, ScanError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ScanError::InvalidGlob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }

    builder
        .build()
        .map(Some)
        .map_err(|source| ScanError::InvalidGlob {
            pattern: patterns.join(", "),
            source,
        })
}

/// Lazy directory walker.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Follow symlinked directories
    follow_symlinks: bool,
    /// Compiled include globs (files only)
    include: Option<GlobSet>,
    /// Compiled exclude globs (files and directories)
    exclude: Option<GlobSet>,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidGlob`] if an include or exclude pattern
    /// is not a valid glob.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use finddupes::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default()).unwrap();
    /// ```
    pub fn new(path: &Path, config: WalkerConfig) -> Result<Self, ScanError> {
        Ok(Self {
            root: path.to_path_buf(),
            follow_symlinks: config.follow_symlinks,
            include: build_globset(&config.include)?,
            exclude: build_globset(&config.exclude)?,
        })
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        // The root is never filtered by name
        if entry.depth() == 0 {
            return false;
        }
        self.exclude
            .as_ref()
            .is_some_and(|set| set.is_match(entry.file_name()))
    }

    fn is_included(&self, entry: &DirEntry) -> bool {
        self.include
            .as_ref()
            .map_or(true, |set| set.is_match(entry.file_name()))
    }

    /// Walk the directory tree, yielding file handles.
    ///
    /// Each call starts a fresh traversal. A root that does not exist or is
    /// not a directory yields nothing.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use finddupes::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default()).unwrap();
    /// let first_ten: Vec<_> = walker.walk().take(10).collect();
    /// ```
    pub fn walk(&self) -> impl Iterator<Item = FileRef> + '_ {
        let walk_dir = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(self.follow_symlinks)
            // Stable sort: files keep listing order and come before directories
            .sort_by(|a, b| match (a.file_type().is_dir(), b.file_type().is_dir()) {
                (false, true) => Ordering::Less,
                (true, false) => Ordering::Greater,
                _ => Ordering::Equal,
            });

        walk_dir
            .into_iter()
            .filter_entry(move |entry| {
                if self.is_excluded(entry) {
                    log::trace!("Excluding by name: {}", entry.path().display());
                    false
                } else {
                    true
                }
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(entry),
                Err(e) => {
                    self.handle_walk_error(&e);
                    None
                }
            })
    }

    /// Turn a walkdir entry into a file handle, or drop it.
    fn process_entry(&self, entry: DirEntry) -> Option<FileRef> {
        let file_type = entry.file_type();

        if file_type.is_dir() {
            return None;
        }

        let is_symlink = entry.path_is_symlink();

        if file_type.is_symlink() {
            // Only reachable when not following links: resolve the target
            // to decide whether this is a file we should report.
            match fs::metadata(entry.path()) {
                Ok(target) if target.is_file() => {}
                Ok(target) if target.is_dir() => {
                    log::trace!(
                        "Not following directory symlink: {}",
                        entry.path().display()
                    );
                    return None;
                }
                Ok(_) => return None,
                Err(e) => {
                    log::debug!(
                        "Skipping dangling symlink {}: {}",
                        entry.path().display(),
                        e
                    );
                    return None;
                }
            }
        } else if !file_type.is_file() {
            // Sockets, FIFOs, devices
            log::trace!("Skipping special file: {}", entry.path().display());
            return None;
        }

        if !self.is_included(&entry) {
            log::trace!("Not matched by include globs: {}", entry.path().display());
            return None;
        }

        Some(FileRef::with_kind(entry.into_path(), false, is_symlink))
    }

    /// Log a traversal error; the walk continues with the next entry.
    fn handle_walk_error(&self, error: &walkdir::Error) {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if let Some(ancestor) = error.loop_ancestor() {
            log::warn!(
                "Skipping symlink loop: {} points to {}",
                path.display(),
                ancestor.display()
            );
            return;
        }

        match error.io_error().map(std::io::Error::kind) {
            Some(ErrorKind::PermissionDenied) => {
                log::warn!("Skipping (permission denied): {}", path.display());
            }
            Some(ErrorKind::NotFound) => {
                log::warn!("Skipping (vanished or missing): {}", path.display());
            }
            _ => log::warn!("Skipping {}: {}", path.display(), error),
        }
    }
}
