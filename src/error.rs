//! Process exit codes.

use std::fmt;

/// Exit codes for the finddupes binary.
///
/// - 0: Success (scan completed, with or without duplicates)
/// - 1: General error (the report could not be written)
/// - 2: Usage error (bad arguments, invalid glob, bad environment config)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Scan completed and the report was written.
    Success = 0,
    /// An unexpected error occurred.
    GeneralError = 1,
    /// The invocation or its configuration was invalid.
    UsageError = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Classify an application error.
    ///
    /// Configuration and glob problems are usage errors; everything else is
    /// a general error.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        if err.downcast_ref::<crate::duplicates::FinderError>().is_some()
            || err.downcast_ref::<figment::Error>().is_some()
        {
            Self::UsageError
        } else {
            Self::GeneralError
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::GeneralError => "error",
            Self::UsageError => "usage error",
        };
        write!(f, "{} ({})", name, self.as_i32())
    }
}
