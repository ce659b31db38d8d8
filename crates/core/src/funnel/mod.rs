//! Questionnaire funnel: form identifiers, logged actions and state derivation.
//!
//! The funnel is permissive. Every action is appended to the log as it
//! happens and nothing is validated against earlier events, so the state of a
//! form is always derived from whatever rows exist for its identifier.

pub mod action;
pub mod error;
pub mod form_id;
pub mod state;


pub use action::FunnelAction;
pub use error::FunnelError;
pub use form_id::FormId;
pub use state::{FunnelEvent, FunnelStage, FunnelState, derive_funnel_state};
