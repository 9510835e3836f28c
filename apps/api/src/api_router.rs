mod cors;

use axum::Router;
use axum::routing::{get, post};
use cartera_core::AppError;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let dashboard_routes = Router::new()
        .route("/api/dashboard", post(handlers::dashboard::dashboard_handler))
        .route(
            "/api/dashboard/summary",
            post(handlers::dashboard::dashboard_summary_handler),
        )
        .route(
            "/api/identity-report",
            post(handlers::dashboard::identity_report_handler),
        );

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(dashboard_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
