//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the Polaris binary.
///
/// - 0: Success
/// - 1: General error (unexpected failure)
/// - 2: Access denied (export credentials were rejected)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// The command completed normally.
    Success = 0,
    /// An unexpected error occurred.
    GeneralError = 1,
    /// The supplied credentials were rejected.
    AccessDenied = 2,
    /// Interrupted by a shutdown signal.
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "PL000",
            Self::GeneralError => "PL001",
            Self::AccessDenied => "PL002",
            Self::Interrupted => "PL130",
        }
    }
}

/// Structured error information for `--json-errors`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "PL001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the run was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
