use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Incoming payload for dashboard requests.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/dashboard-request.ts"
)]
pub struct DashboardRequest {
    pub password: String,
    /// Number of debtors in the call list. Defaults to 10.
    #[ts(optional)]
    pub top_debtors: Option<usize>,
}

/// Incoming payload for the identity reconciliation report.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/identity-report-request.ts"
)]
pub struct IdentityReportRequest {
    pub password: String,
}

/// API representation of the viewer's access scope.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/access-scope-response.ts"
)]
pub struct AccessScopeResponse {
    /// `general` or `salesperson`.
    pub kind: &'static str,
    pub identity: Option<String>,
}

/// API representation of one ledger row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/ledger-row-response.ts"
)]
pub struct LedgerRowResponse {
    pub salesperson: Option<String>,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub document: Option<String>,
    pub balance: f64,
    /// ISO `YYYY-MM-DD` date.
    pub due_date: Option<String>,
    #[ts(type = "number | null")]
    pub days_overdue: Option<i64>,
    pub aging_bucket: Option<&'static str>,
    pub phone: Option<String>,
    pub extra: BTreeMap<String, String>,
}

/// Balance and count for one aging bucket.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/aging-bucket-response.ts"
)]
pub struct AgingBucketResponse {
    pub bucket: &'static str,
    pub balance: f64,
    pub documents: usize,
}

/// Totals for one salesperson.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/salesperson-total-response.ts"
)]
pub struct SalespersonTotalResponse {
    pub salesperson: Option<String>,
    pub balance: f64,
    pub overdue_balance: f64,
    pub documents: usize,
}

/// Totals for one debtor.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/debtor-response.ts"
)]
pub struct DebtorResponse {
    pub client_key: String,
    pub client_name: Option<String>,
    pub phone: Option<String>,
    pub balance: f64,
    pub overdue_balance: f64,
    #[ts(type = "number | null")]
    pub max_days_overdue: Option<i64>,
    pub documents: usize,
}

/// Dashboard KPIs.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/portfolio-summary-response.ts"
)]
pub struct PortfolioSummaryResponse {
    pub document_count: usize,
    pub client_count: usize,
    pub total_balance: f64,
    pub overdue_balance: f64,
    pub overdue_ratio: f64,
    pub aging: Vec<AgingBucketResponse>,
    pub unclassified_balance: f64,
    pub by_salesperson: Vec<SalespersonTotalResponse>,
    pub top_debtors: Vec<DebtorResponse>,
}

/// Full dashboard payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/dashboard-response.ts"
)]
pub struct DashboardResponse {
    pub scope: AccessScopeResponse,
    pub summary: PortfolioSummaryResponse,
    pub rows: Vec<LedgerRowResponse>,
}

/// Dashboard payload without rows.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/dashboard-summary-response.ts"
)]
pub struct DashboardSummaryResponse {
    pub scope: AccessScopeResponse,
    pub summary: PortfolioSummaryResponse,
}

/// Identity drift between the credentials file and the ledger.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/identity-report-response.ts"
)]
pub struct IdentityReportResponse {
    pub missing_in_ledger: Vec<String>,
    pub without_credentials: Vec<String>,
}
