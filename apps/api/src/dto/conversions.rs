use cartera_application::{
    AgingBucketTotal, DebtorTotal, IdentityReport, PortfolioSummary, SalespersonTotal,
};
use cartera_core::AccessScope;
use cartera_domain::LedgerRow;

use super::types::{
    AccessScopeResponse, AgingBucketResponse, DebtorResponse, IdentityReportResponse,
    LedgerRowResponse, PortfolioSummaryResponse, SalespersonTotalResponse,
};

impl From<&AccessScope> for AccessScopeResponse {
    fn from(scope: &AccessScope) -> Self {
        match scope {
            AccessScope::Unrestricted => Self {
                kind: "general",
                identity: None,
            },
            AccessScope::RestrictedTo(identity) => Self {
                kind: "salesperson",
                identity: Some(identity.clone()),
            },
        }
    }
}

impl From<&LedgerRow> for LedgerRowResponse {
    fn from(row: &LedgerRow) -> Self {
        Self {
            salesperson: row.salesperson().map(ToOwned::to_owned),
            client_id: row.client_id().map(ToOwned::to_owned),
            client_name: row.client_name().map(ToOwned::to_owned),
            document: row.document().map(ToOwned::to_owned),
            balance: row.balance(),
            due_date: row
                .due_date()
                .map(|due_date| due_date.format("%Y-%m-%d").to_string()),
            days_overdue: row.days_overdue(),
            aging_bucket: row.aging_bucket().map(|bucket| bucket.as_str()),
            phone: row.phone().map(ToOwned::to_owned),
            extra: row.extra().clone(),
        }
    }
}

impl From<AgingBucketTotal> for AgingBucketResponse {
    fn from(total: AgingBucketTotal) -> Self {
        Self {
            bucket: total.bucket.as_str(),
            balance: total.balance,
            documents: total.documents,
        }
    }
}

impl From<SalespersonTotal> for SalespersonTotalResponse {
    fn from(total: SalespersonTotal) -> Self {
        Self {
            salesperson: total.salesperson,
            balance: total.balance,
            overdue_balance: total.overdue_balance,
            documents: total.documents,
        }
    }
}

impl From<DebtorTotal> for DebtorResponse {
    fn from(total: DebtorTotal) -> Self {
        Self {
            client_key: total.client_key,
            client_name: total.client_name,
            phone: total.phone,
            balance: total.balance,
            overdue_balance: total.overdue_balance,
            max_days_overdue: total.max_days_overdue,
            documents: total.documents,
        }
    }
}

impl From<PortfolioSummary> for PortfolioSummaryResponse {
    fn from(summary: PortfolioSummary) -> Self {
        Self {
            document_count: summary.document_count,
            client_count: summary.client_count,
            total_balance: summary.total_balance,
            overdue_balance: summary.overdue_balance,
            overdue_ratio: summary.overdue_ratio,
            aging: summary
                .aging
                .into_iter()
                .map(AgingBucketResponse::from)
                .collect(),
            unclassified_balance: summary.unclassified_balance,
            by_salesperson: summary
                .by_salesperson
                .into_iter()
                .map(SalespersonTotalResponse::from)
                .collect(),
            top_debtors: summary
                .top_debtors
                .into_iter()
                .map(DebtorResponse::from)
                .collect(),
        }
    }
}

impl From<IdentityReport> for IdentityReportResponse {
    fn from(report: IdentityReport) -> Self {
        Self {
            missing_in_ledger: report.missing_in_ledger,
            without_credentials: report.without_credentials,
        }
    }
}
