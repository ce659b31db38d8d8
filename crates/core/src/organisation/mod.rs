//! Organisation scoping for reports.
//!
//! Reports are always scoped to one organisation. The caller's identity is
//! carried in an [`IdentityContext`]; when it does not lead to an
//! organisation the configured [`FallbackPolicy`] decides what happens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shepherd_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Identity of the caller, as far as organisation scoping is concerned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityContext {
    /// Application user the caller authenticated as, if any.
    pub app_user_id: Option<Uuid>,
}

impl IdentityContext {
    /// An unauthenticated caller.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { app_user_id: None }
    }

    /// A caller authenticated as the given application user.
    #[must_use]
    pub const fn for_user(app_user_id: Uuid) -> Self {
        Self {
            app_user_id: Some(app_user_id),
        }
    }
}

/// What to do when the identity does not resolve to an organisation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Use the oldest organisation.
    #[default]
    FirstOrganisation,
    /// Resolve to nothing; reports degrade to empty.
    Deny,
}

impl FallbackPolicy {
    /// Returns the configuration name of the policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstOrganisation => "first_organisation",
            Self::Deny => "deny",
        }
    }
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown fallback policy name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown organisation fallback policy: {0}")]
pub struct UnknownFallbackPolicy(pub String);

impl From<UnknownFallbackPolicy> for AppError {
    fn from(err: UnknownFallbackPolicy) -> Self {
        Self::Internal(err.to_string())
    }
}

impl FromStr for FallbackPolicy {
    type Err = UnknownFallbackPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "first_organisation" => Ok(Self::FirstOrganisation),
            "deny" => Ok(Self::Deny),
            other => Err(UnknownFallbackPolicy(other.to_string())),
        }
    }
}
