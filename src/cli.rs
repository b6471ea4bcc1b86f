//! Command-line interface definitions.
//!
//! Every tuning flag is optional so that an absent flag falls back to the
//! `FINDDUPES_*` environment and then to the built-in default (see
//! [`crate::config`]).
//!
//! # Example
//!
//! ```bash
//! # Report duplicates below the current directory
//! finddupes .
//!
//! # Only text files between 1 KB and 1 GiB, as JSON
//! finddupes ~/notes --name '*.txt' --min-size 1KB --max-size 1GiB --json
//!
//! # Skip VCS metadata, hash on the calling thread
//! finddupes . -x .git -j 0
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::scanner::HashAlgorithm;

/// Find duplicate files.
///
/// Files are first grouped by size; only files sharing a size are hashed.
/// Every group of files with identical content is printed.
#[derive(Debug, Parser)]
#[command(name = "finddupes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to search for duplicates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Minimum file size to consider, inclusive (e.g., 10, 1KB, 2MiB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Maximum file size to consider, inclusive [default: 1000000000]
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_size: Option<u64>,

    /// Only consider files whose name matches this glob (repeatable)
    #[arg(short = 'n', long = "name", value_name = "GLOB")]
    pub include: Vec<String>,

    /// Skip files and directories whose name matches this glob (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Follow symbolic links to directories
    ///
    /// Symlink cycles are detected and skipped.
    #[arg(short = 'L', long)]
    pub follow_symlinks: bool,

    /// Number of hashing threads; 0 hashes on the main thread [default: 16]
    #[arg(short = 'j', long, value_name = "N")]
    pub workers: Option<usize>,

    /// Smallest group size to report [default: 2]
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub min_group_size: Option<u64>,

    /// Content digest algorithm [default: blake3]
    #[arg(long, value_enum)]
    pub algorithm: Option<HashAlgorithm>,

    /// Print groups as a JSON list of lists of paths
    #[arg(long)]
    pub json: bool,

    /// Print a scan summary to stderr
    #[arg(long)]
    pub summary: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and the report
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Parse a human-readable size string into bytes.
///
/// Supports decimal (KB, MB, GB, TB) and binary (KiB, MiB, GiB, TiB)
/// suffixes, case-insensitively. Fractions are truncated to whole bytes.
///
/// # Examples
///
/// ```
/// use finddupes::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1_000);
/// assert_eq!(parse_size("2MiB").unwrap(), 2 * 1_048_576);
/// ```
///
/// # Errors
///
/// Returns an error message for empty input, a malformed number or an
/// unknown suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_ascii_uppercase()),
        None => (s, String::new()),
    };

    if num_str.is_empty() {
        return Err(format!("Invalid size: '{s}'"));
    }

    // Plain integers are taken exactly; f64 would round above 2^53
    if suffix.is_empty() || suffix == "B" {
        if let Ok(bytes) = num_str.parse::<u64>() {
            return Ok(bytes);
        }
    }

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
