//! Pure derivation of a form's funnel state from its logged events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::action::FunnelAction;

/// One logged funnel step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelEvent {
    /// Action recorded.
    pub action: FunnelAction,
    /// When the row was appended.
    pub timestamp: DateTime<Utc>,
}

impl FunnelEvent {
    /// Creates a new event.
    #[must_use]
    pub const fn new(action: FunnelAction, timestamp: DateTime<Utc>) -> Self {
        Self { action, timestamp }
    }
}

/// Furthest point a form has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    /// No events logged.
    #[default]
    Unknown,
    /// Form opened.
    Viewed,
    /// Answers recorded.
    Submitted,
    /// Join form shown.
    SigningUp,
    /// Prospect created.
    SignedUp,
    /// Declined to join.
    Declined,
    /// Chose self-study.
    SelfStudy,
    /// Reached the final success page.
    FinalSuccess,
}

/// Derived view over every event logged for one form id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FunnelState {
    /// Furthest stage reached.
    pub stage: FunnelStage,
    /// A `form_viewed` row exists.
    pub viewed: bool,
    /// A `form_submitted` row exists.
    pub submitted: bool,
    /// A `prospect_signing_up` row exists.
    pub signing_up: bool,
    /// A `prospect_signed_up` row exists.
    pub signed_up: bool,
    /// A `prospect_declined` row exists.
    pub declined: bool,
    /// A `prospect_self_study_signup` row exists.
    pub self_study: bool,
    /// A `prospect_final_success` row exists.
    pub final_success: bool,
    /// Most recently recorded action.
    pub last_action: Option<FunnelAction>,
    /// Timestamp of the most recent action.
    pub last_at: Option<DateTime<Utc>>,
    /// Number of events considered.
    pub event_count: usize,
}

/// Derives the current state for one form id.
///
/// Events may be in any order and may repeat. Flags record whether an action
/// ever happened. Among the outcomes (signed up, declined, self-study) the
/// latest one wins; ties on timestamp go to the later element of the slice.
#[must_use]
pub fn derive_funnel_state(events: &[FunnelEvent]) -> FunnelState {
    let mut state = FunnelState {
        event_count: events.len(),
        ..FunnelState::default()
    };
    let mut latest_outcome: Option<&FunnelEvent> = None;

    for event in events {
        match event.action {
            FunnelAction::FormViewed => state.viewed = true,
            FunnelAction::FormSubmitted => state.submitted = true,
            FunnelAction::ProspectSigningUp => state.signing_up = true,
            FunnelAction::ProspectSignedUp => state.signed_up = true,
            FunnelAction::ProspectDeclined => state.declined = true,
            FunnelAction::ProspectSelfStudySignup => state.self_study = true,
            FunnelAction::ProspectFinalSuccess => state.final_success = true,
        }

        if state.last_at.is_none_or(|last| event.timestamp >= last) {
            state.last_action = Some(event.action);
            state.last_at = Some(event.timestamp);
        }

        if event.action.is_outcome()
            && latest_outcome.is_none_or(|latest| event.timestamp >= latest.timestamp)
        {
            latest_outcome = Some(event);
        }
    }

    state.stage = if state.final_success {
        FunnelStage::FinalSuccess
    } else if let Some(outcome) = latest_outcome {
        match outcome.action {
            FunnelAction::ProspectDeclined => FunnelStage::Declined,
            FunnelAction::ProspectSelfStudySignup => FunnelStage::SelfStudy,
            _ => FunnelStage::SignedUp,
        }
    } else if state.signing_up {
        FunnelStage::SigningUp
    } else if state.submitted {
        FunnelStage::Submitted
    } else if state.viewed {
        FunnelStage::Viewed
    } else {
        FunnelStage::Unknown
    };

    state
}
