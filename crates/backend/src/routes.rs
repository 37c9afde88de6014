use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers;
use crate::shared::app_state::SharedState;

/// All API routes of the application
pub fn configure_routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D400 OPPORTUNITY ANALYSIS
        // ========================================
        .route(
            "/api/d400/connection/test",
            post(handlers::d400_opportunity_analysis::test_connection),
        )
        .route(
            "/api/d400/opportunity_analysis",
            get(handlers::d400_opportunity_analysis::get_opportunity_analysis),
        )
        .route(
            "/api/d400/opportunity_analysis/export",
            get(handlers::d400_opportunity_analysis::export_csv),
        )
        .with_state(state)
}
