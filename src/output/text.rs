//! Plain-text report.

use std::io::{self, Write};

use crate::duplicates::DuplicateGroup;

/// Write every group as one path per line, followed by a blank line.
///
/// Nothing is written when there are no groups.
///
/// # Errors
///
/// Returns any error reported by `writer`.
pub fn write_text<W: Write>(writer: &mut W, groups: &[DuplicateGroup]) -> io::Result<()> {
    for group in groups {
        for file in &group.files {
            writeln!(writer, "{}", file.path().display())?;
        }
        writeln!(writer)?;
    }
    writer.flush()
}
