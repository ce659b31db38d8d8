//! Funnel actions recorded in the questionnaire log.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::FunnelError;

/// A single step a respondent took, as stored in the `action` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelAction {
    /// The questionnaire was opened and a form id issued.
    FormViewed,
    /// Answers were recorded.
    FormSubmitted,
    /// The join form was shown.
    ProspectSigningUp,
    /// The join form was posted and a prospect created.
    ProspectSignedUp,
    /// The respondent chose not to join.
    ProspectDeclined,
    /// The respondent chose self-study.
    ProspectSelfStudySignup,
    /// The respondent reached the final success page.
    ProspectFinalSuccess,
}

impl FunnelAction {
    /// Every action, in conceptual funnel order.
    pub const ALL: [Self; 7] = [
        Self::FormViewed,
        Self::FormSubmitted,
        Self::ProspectSigningUp,
        Self::ProspectSignedUp,
        Self::ProspectDeclined,
        Self::ProspectSelfStudySignup,
        Self::ProspectFinalSuccess,
    ];

    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FormViewed => "form_viewed",
            Self::FormSubmitted => "form_submitted",
            Self::ProspectSigningUp => "prospect_signing_up",
            Self::ProspectSignedUp => "prospect_signed_up",
            Self::ProspectDeclined => "prospect_declined",
            Self::ProspectSelfStudySignup => "prospect_self_study_signup",
            Self::ProspectFinalSuccess => "prospect_final_success",
        }
    }

    /// Whether this action is one of the mutually non-exclusive outcomes
    /// offered after submission.
    #[must_use]
    pub const fn is_outcome(self) -> bool {
        matches!(
            self,
            Self::ProspectSignedUp | Self::ProspectDeclined | Self::ProspectSelfStudySignup
        )
    }
}

impl fmt::Display for FunnelAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FunnelAction {
    type Err = FunnelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| FunnelError::UnknownAction(s.to_string()))
    }
}
