//! Cartera API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod state;

use std::sync::Arc;

use cartera_application::{DashboardService, ScopeFilter};
use cartera_core::AppError;
use cartera_infrastructure::{SpreadsheetLedgerSource, TomlCredentialSource};
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let address = config.socket_address()?;

    info!(
        credentials = %config.credentials_path.display(),
        ledger = %config.ledger.path.display(),
        matching = config.identity_matching.as_str(),
        "dashboard sources configured"
    );

    let app_state = AppState {
        dashboard_service: DashboardService::new(
            Arc::new(TomlCredentialSource::new(config.credentials_path.clone())),
            Arc::new(SpreadsheetLedgerSource::new(config.ledger.clone())),
            ScopeFilter::new(config.identity_matching),
        ),
    };

    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "cartera-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
