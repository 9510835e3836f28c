use axum::Json;
use axum::extract::State;
use cartera_application::DashboardSession;
use cartera_core::AppError;

use crate::dto::{
    AccessScopeResponse, DashboardRequest, DashboardResponse, DashboardSummaryResponse,
    IdentityReportRequest, IdentityReportResponse, LedgerRowResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

const DEFAULT_TOP_DEBTORS: usize = 10;
const MAX_TOP_DEBTORS: usize = 100;

pub async fn dashboard_handler(
    State(state): State<AppState>,
    Json(payload): Json<DashboardRequest>,
) -> ApiResult<Json<DashboardResponse>> {
    let top_debtors = top_debtors(payload.top_debtors)?;
    let session = open_session(&state, payload.password.as_str()).await?;

    Ok(Json(DashboardResponse {
        scope: AccessScopeResponse::from(session.scope()),
        summary: session.summary(top_debtors).into(),
        rows: session
            .scoped_ledger()
            .rows()
            .map(LedgerRowResponse::from)
            .collect(),
    }))
}

pub async fn dashboard_summary_handler(
    State(state): State<AppState>,
    Json(payload): Json<DashboardRequest>,
) -> ApiResult<Json<DashboardSummaryResponse>> {
    let top_debtors = top_debtors(payload.top_debtors)?;
    let session = open_session(&state, payload.password.as_str()).await?;

    Ok(Json(DashboardSummaryResponse {
        scope: AccessScopeResponse::from(session.scope()),
        summary: session.summary(top_debtors).into(),
    }))
}

pub async fn identity_report_handler(
    State(state): State<AppState>,
    Json(payload): Json<IdentityReportRequest>,
) -> ApiResult<Json<IdentityReportResponse>> {
    let report = state
        .dashboard_service
        .identity_report(payload.password.as_str())
        .await?;

    Ok(Json(report.into()))
}

async fn open_session(state: &AppState, password: &str) -> ApiResult<DashboardSession> {
    Ok(state.dashboard_service.open_session(password).await?)
}

fn top_debtors(requested: Option<usize>) -> Result<usize, AppError> {
    match requested {
        None => Ok(DEFAULT_TOP_DEBTORS),
        Some(value) if value <= MAX_TOP_DEBTORS => Ok(value),
        Some(value) => Err(AppError::Validation(format!(
            "top_debtors must be at most {MAX_TOP_DEBTORS}, got {value}"
        ))),
    }
}
