//! Ports for the external sources a dashboard session reads.

use async_trait::async_trait;
use cartera_core::AppResult;
use cartera_domain::{CredentialTable, Ledger};

/// Port for the credentials file.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Loads and validates the credential table.
    ///
    /// Fails with `AppError::Configuration` when the source is missing or
    /// malformed.
    async fn load_credentials(&self) -> AppResult<CredentialTable>;
}

/// Port for the receivables export.
#[async_trait]
pub trait LedgerSource: Send + Sync {
    /// Loads the full ledger.
    ///
    /// Fails with `AppError::DataSource` when the source is missing,
    /// unreadable, or lacks the salesperson column.
    async fn load_ledger(&self) -> AppResult<Ledger>;
}
