//! Application services and ports.

#![forbid(unsafe_code)]

mod credential_resolver;
mod dashboard_service;
mod portfolio_summary;
mod scope_filter;
mod source_ports;

pub use credential_resolver::resolve_access_scope;
pub use dashboard_service::{DashboardService, DashboardSession, IdentityReport};
pub use portfolio_summary::{
    AgingBucketTotal, DebtorTotal, PortfolioSummary, SalespersonTotal, summarize_portfolio,
};
pub use scope_filter::{ScopeFilter, ScopedLedger};
pub use source_ports::{CredentialSource, LedgerSource};
