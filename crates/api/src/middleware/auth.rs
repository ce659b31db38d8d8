//! Optional bearer-token identity.
//!
//! Report routes work without a token; a token, when sent, must be valid and
//! names the application user whose organisation is reported on.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
};
use serde_json::json;
use shepherd_core::organisation::IdentityContext;
use shepherd_shared::JwtError;
use tracing::debug;

use crate::AppState;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Identity of the caller.
///
/// Anonymous when no Authorization header is sent.
#[derive(Debug, Clone, Copy)]
pub struct Identity(pub IdentityContext);

impl Identity {
    /// Returns the inner context.
    #[must_use]
    pub const fn context(&self) -> &IdentityContext {
        &self.0
    }
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Self(IdentityContext::anonymous()));
        };

        let token = header
            .to_str()
            .ok()
            .and_then(extract_bearer_token)
            .ok_or_else(|| {
                rejection(
                    "invalid_token",
                    "Authorization header must carry a Bearer token",
                )
            })?;

        match state.jwt_service.validate_token(token) {
            Ok(claims) => {
                debug!(app_user_id = %claims.app_user_id(), "Identity token accepted");
                Ok(Self(IdentityContext::for_user(claims.app_user_id())))
            }
            Err(JwtError::Expired) => Err(rejection("token_expired", "Token has expired")),
            Err(_) => Err(rejection("invalid_token", "Invalid or malformed token")),
        }
    }
}

fn rejection(error: &str, message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": error, "message": message })),
    )
}
