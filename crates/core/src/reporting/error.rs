//! Reporting error types.

use shepherd_shared::AppError;
use thiserror::Error;

/// Errors that can occur while preparing a report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    /// Timezone name is not a known IANA zone.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        Self::Internal(err.to_string())
    }
}
