//! Output formatters for duplicate scan results.
//!
//! - [`text`]: one path per line, a blank line after each group
//! - [`json`]: a list of lists of paths, for scripting
//!
//! # Example
//!
//! ```no_run
//! use finddupes::duplicates::DuplicateFinder;
//! use finddupes::output::json::JsonOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, _summary) = finder.find_duplicates(Path::new("."));
//!
//! let output = JsonOutput::new(&groups);
//! println!("{}", output.to_json().unwrap());
//! ```

pub mod json;
pub mod text;

pub use json::{JsonOutput, JsonOutputError};
pub use text::write_text;
