//! Shepherd API Server
//!
//! Main entry point for the Shepherd backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shepherd_api::{AppState, ReportingSettings, create_router};
use shepherd_core::organisation::FallbackPolicy;
use shepherd_core::reporting::ReportingService;
use shepherd_db::connect_with_pool;
use shepherd_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shepherd=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: i64::try_from(config.jwt.access_token_expiry_secs / 60)
            .unwrap_or(i64::MAX),
    });

    let reporting = ReportingSettings {
        timezone: ReportingService::parse_timezone(&config.reporting.timezone)?,
        lookback_days: config.reporting.default_lookback_days,
        fallback: config.reporting.fallback.parse::<FallbackPolicy>()?,
    };
    info!(
        timezone = %reporting.timezone,
        lookback_days = reporting.lookback_days,
        fallback = %reporting.fallback,
        "Reporting configured"
    );

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        reporting,
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
