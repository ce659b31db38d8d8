//! HTTP API layer with Axum routes and extractors.
//!
//! This crate provides:
//! - Questionnaire and funnel routes for visitors
//! - Assignment endpoints
//! - Report and list view routes scoped to one organisation
//! - Identity extraction and error responses

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use chrono_tz::Tz;
use sea_orm::DatabaseConnection;
use shepherd_core::organisation::FallbackPolicy;
use shepherd_db::OrganisationResolver;
use shepherd_shared::JwtService;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for identity tokens.
    pub jwt_service: Arc<JwtService>,
    /// Reporting settings.
    pub reporting: ReportingSettings,
}

/// Reporting settings resolved at startup.
#[derive(Debug, Clone, Copy)]
pub struct ReportingSettings {
    /// Timezone for calendar-day boundaries.
    pub timezone: Tz,
    /// Look-back window when no watermark cookie is present.
    pub lookback_days: i64,
    /// Organisation fallback policy.
    pub fallback: FallbackPolicy,
}

impl Default for ReportingSettings {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::UTC,
            lookback_days: 30,
            fallback: FallbackPolicy::FirstOrganisation,
        }
    }
}

impl AppState {
    /// Organisation resolver using the configured fallback policy.
    #[must_use]
    pub fn resolver(&self) -> OrganisationResolver {
        OrganisationResolver::new((*self.db).clone(), self.reporting.fallback)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
