//! Process exit codes.

/// Exit codes for the dupesweep binary.
///
/// - 0: Completed normally, duplicates found
/// - 1: General error (unexpected failure)
/// - 2: Completed normally, no duplicates found
/// - 3: Completed with some non-fatal scan errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: scan completed and duplicates were found.
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
    /// No duplicates: scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Partial success: scan completed but some files or roots failed.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
