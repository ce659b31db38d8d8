//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod assignments;
pub mod forms;
pub mod health;
pub mod listings;
pub mod reports;

/// Creates the router with every route.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(forms::routes())
        .merge(assignments::routes())
        .merge(reports::routes())
        .merge(listings::routes())
}
