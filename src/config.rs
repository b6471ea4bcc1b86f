//! Layered application configuration.
//!
//! Values are merged with figment, lowest priority first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. `FINDDUPES_*` environment variables (e.g. `FINDDUPES_WORKERS=4`,
//!    `FINDDUPES_EXCLUDE=[".git","target"]`)
//! 3. Flags given on the command line ([`Config::apply_cli`])

use std::sync::Arc;

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::duplicates::{FinderConfig, DEFAULT_MAX_SIZE, DEFAULT_MIN_GROUP_SIZE, DEFAULT_MIN_SIZE};
use crate::progress::ProgressCallback;
use crate::scanner::{HashAlgorithm, WalkerConfig};

/// Prefix of the environment variables read by [`Config::load`].
pub const ENV_PREFIX: &str = "FINDDUPES_";

/// Worker count used by the command line tool when nothing else is set.
pub const DEFAULT_WORKERS: usize = 16;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Smallest file size considered, in bytes.
    pub min_size: u64,
    /// Largest file size considered, in bytes.
    pub max_size: u64,
    /// Include globs matched against file names.
    pub include: Vec<String>,
    /// Exclude globs matched against file and directory names.
    pub exclude: Vec<String>,
    /// Descend into symlinked directories.
    pub follow_symlinks: bool,
    /// Hashing threads; 0 is sequential.
    pub workers: usize,
    /// Smallest reported group size.
    pub min_group_size: usize,
    /// Content digest algorithm.
    pub algorithm: HashAlgorithm,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            include: Vec::new(),
            exclude: Vec::new(),
            follow_symlinks: false,
            workers: DEFAULT_WORKERS,
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
            algorithm: HashAlgorithm::default(),
        }
    }
}

impl Config {
    /// Load defaults overlaid with `FINDDUPES_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] when a variable cannot be converted to
    /// the type of its field.
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_with_prefix(ENV_PREFIX)
    }

    /// Same as [`Config::load`] with a custom environment prefix.
    pub fn load_with_prefix(prefix: &str) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(prefix).extract()?;
        log::debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    fn figment(prefix: &str) -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(prefix))
    }

    /// Override values with the flags present on the command line.
    #[must_use]
    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if let Some(min_size) = cli.min_size {
            self.min_size = min_size;
        }
        if let Some(max_size) = cli.max_size {
            self.max_size = max_size;
        }
        if !cli.include.is_empty() {
            self.include.clone_from(&cli.include);
        }
        if !cli.exclude.is_empty() {
            self.exclude.clone_from(&cli.exclude);
        }
        if cli.follow_symlinks {
            self.follow_symlinks = true;
        }
        if let Some(workers) = cli.workers {
            self.workers = workers;
        }
        if let Some(size) = cli.min_group_size {
            self.min_group_size = usize::try_from(size).unwrap_or(usize::MAX);
        }
        if let Some(algorithm) = cli.algorithm {
            self.algorithm = algorithm;
        }
        self
    }

    /// Build the finder configuration.
    #[must_use]
    pub fn into_finder_config(self, progress: Option<Arc<dyn ProgressCallback>>) -> FinderConfig {
        if self.min_size > self.max_size {
            log::warn!(
                "Minimum size {} exceeds maximum size {}; no file can match",
                self.min_size,
                self.max_size
            );
        }

        let mut config = FinderConfig::default()
            .with_walker_config(WalkerConfig::new(
                self.follow_symlinks,
                self.include,
                self.exclude,
            ))
            .with_size_bounds(self.min_size, self.max_size)
            .with_min_group_size(self.min_group_size)
            .with_algorithm(self.algorithm)
            .with_workers(self.workers);

        if let Some(callback) = progress {
            config = config.with_progress_callback(callback);
        }
        config
    }
}
