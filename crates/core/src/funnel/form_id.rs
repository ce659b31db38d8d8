//! Opaque per-submission correlation key.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::FunnelError;

/// Correlation key linking every event and response of one questionnaire
/// session. Independent of any entity's primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(String);

impl FormId {
    /// Maximum stored length.
    pub const MAX_LEN: usize = 100;

    /// Issues a fresh 128-bit random identifier as 32 uppercase hex chars.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string().to_uppercase())
    }

    /// Accepts a caller-supplied identifier.
    ///
    /// Surrounding whitespace is ignored. Identifiers issued elsewhere (for
    /// example seeded sample data) are accepted as-is.
    ///
    /// # Errors
    ///
    /// Returns `FunnelError::EmptyFormId` for blank input and
    /// `FunnelError::FormIdTooLong` when the identifier exceeds `MAX_LEN`.
    pub fn parse(raw: &str) -> Result<Self, FunnelError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FunnelError::EmptyFormId);
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(FunnelError::FormIdTooLong);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Parses an optional identifier, treating absence as empty.
    ///
    /// # Errors
    ///
    /// Same as [`FormId::parse`].
    pub fn parse_opt(raw: Option<&str>) -> Result<Self, FunnelError> {
        Self::parse(raw.unwrap_or_default())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identifier.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FormId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
