//! Funnel error types.

use shepherd_shared::AppError;
use thiserror::Error;

use super::form_id::FormId;

/// Errors raised while handling funnel input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FunnelError {
    /// The form id was missing or blank.
    #[error("Form id is required")]
    EmptyFormId,

    /// The form id does not fit the correlation column.
    #[error("Form id is longer than {max} characters", max = FormId::MAX_LEN)]
    FormIdTooLong,

    /// A stored action is not part of the funnel vocabulary.
    #[error("Unknown funnel action: {0}")]
    UnknownAction(String),
}

impl From<FunnelError> for AppError {
    fn from(err: FunnelError) -> Self {
        match err {
            FunnelError::EmptyFormId | FunnelError::FormIdTooLong => {
                Self::BadRequest(err.to_string())
            }
            FunnelError::UnknownAction(_) => Self::Internal(err.to_string()),
        }
    }
}
