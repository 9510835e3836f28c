mod conversions;
mod types;

pub use types::{
    AccessScopeResponse, AgingBucketResponse, DashboardRequest, DashboardResponse,
    DashboardSummaryResponse, DebtorResponse, HealthResponse, IdentityReportRequest,
    IdentityReportResponse, LedgerRowResponse, PortfolioSummaryResponse,
    SalespersonTotalResponse,
};
