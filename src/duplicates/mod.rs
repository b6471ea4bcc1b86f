//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Key extraction (size and content digest)
//! - Generic grouping by key, sequential or on a bounded worker pool
//! - The two-stage size-then-content pipeline

pub mod finder;
pub mod groups;
pub mod keys;

pub use finder::{
    DuplicateFinder, FinderConfig, FinderError, ScanSummary, DEFAULT_MIN_GROUP_SIZE,
};
pub use groups::{group_by_key, group_by_key_concurrent, DuplicateGroup, Group};
pub use keys::{HashKey, KeyExtractor, SizeKey, Tracked, DEFAULT_MAX_SIZE, DEFAULT_MIN_SIZE};
