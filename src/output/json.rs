//! JSON output formatter for duplicate scan results.
//!
//! # Output Schema
//!
//! One array per duplicate group, each holding the member paths in
//! discovery order:
//!
//! ```json
//! [
//!   ["/data/a/12bytes.txt", "/data/b/12bytes.txt"],
//!   ["/data/x.bin", "/data/y.bin"]
//! ]
//! ```
//!
//! Paths are reported as found by the walk, not canonicalized.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::duplicates::DuplicateGroup;

/// Serializable list of duplicate groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonOutput {
    pub groups: Vec<Vec<String>>,
}

impl JsonOutput {
    /// Build the JSON view of `groups`.
    ///
    /// # Example
    ///
    /// ```
    /// use finddupes::duplicates::DuplicateGroup;
    /// use finddupes::output::json::JsonOutput;
    /// use finddupes::scanner::FileRef;
    ///
    /// let groups = vec![DuplicateGroup::new(
    ///     [0u8; 32],
    ///     4,
    ///     vec![FileRef::with_size("/a", 4), FileRef::with_size("/b", 4)],
    /// )];
    ///
    /// let output = JsonOutput::new(&groups);
    /// assert_eq!(output.to_json().unwrap(), r#"[["/a","/b"]]"#);
    /// ```
    #[must_use]
    pub fn new(groups: &[DuplicateGroup]) -> Self {
        Self {
            groups: groups
                .iter()
                .map(|g| {
                    g.files
                        .iter()
                        .map(|f| f.path().to_string_lossy().into_owned())
                        .collect()
                })
                .collect(),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Write JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), JsonOutputError> {
        let json = self.to_json()?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error while writing JSON: {0}")]
    Io(#[from] std::io::Error),
}
