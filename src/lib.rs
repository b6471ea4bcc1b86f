//! finddupes - duplicate file finder
//!
//! Walks a directory tree, groups files by size and then by content digest,
//! and reports every group of files with identical content.
//!
//! # Example
//!
//! ```no_run
//! use finddupes::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_workers(8)).unwrap();
//! let (groups, _summary) = finder.find_duplicates(Path::new("."));
//! for group in groups {
//!     println!("{:?}", group.paths());
//! }
//! ```

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::DuplicateFinder;
use crate::error::ExitCode;
use crate::output::{write_text, JsonOutput};
use crate::progress::{Progress, ProgressCallback};

/// Run the command line application.
///
/// Logging must already be initialized.
///
/// # Errors
///
/// Returns an error for invalid configuration or globs, or when the report
/// cannot be written. Use [`ExitCode::for_error`] to map it to an exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let config = Config::load()
        .context("Invalid FINDDUPES_* environment configuration")?
        .apply_cli(&cli);

    let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(cli.quiet));
    let finder = DuplicateFinder::new(config.into_finder_config(Some(progress)))?;

    let (groups, summary) = finder.find_duplicates(&cli.path);

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    if cli.json {
        JsonOutput::new(&groups)
            .write_to(&mut out)
            .context("Failed to write JSON report")?;
    } else {
        write_text(&mut out, &groups).context("Failed to write report")?;
    }
    out.flush().context("Failed to write report")?;

    if cli.summary {
        eprintln!("{summary}");
    }

    Ok(ExitCode::Success)
}
