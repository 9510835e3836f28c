use std::collections::BTreeSet;
use std::sync::Arc;

use cartera_core::{AccessScope, AppError, AppResult};
use cartera_domain::{CredentialTable, IdentityMatching, Ledger};
use tracing::{info, warn};

use crate::{
    CredentialSource, LedgerSource, PortfolioSummary, ScopeFilter, ScopedLedger,
    resolve_access_scope, summarize_portfolio,
};

/// Per-request dashboard context: the resolved scope and its visible rows.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    scope: AccessScope,
    scoped_ledger: ScopedLedger,
}

impl DashboardSession {
    /// Returns the viewer's access scope.
    #[must_use]
    pub fn scope(&self) -> &AccessScope {
        &self.scope
    }

    /// Returns the rows visible to the viewer.
    #[must_use]
    pub fn scoped_ledger(&self) -> &ScopedLedger {
        &self.scoped_ledger
    }

    /// Computes dashboard KPIs for the visible rows.
    #[must_use]
    pub fn summary(&self, top_debtors: usize) -> PortfolioSummary {
        summarize_portfolio(&self.scoped_ledger, top_debtors)
    }
}

/// Spelling drift between the credentials file and the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityReport {
    /// Credential identities the ledger roster does not recognize.
    pub missing_in_ledger: Vec<String>,
    /// Ledger salespeople no credential entry matches.
    pub without_credentials: Vec<String>,
}

/// Application service opening dashboard sessions.
#[derive(Clone)]
pub struct DashboardService {
    credential_source: Arc<dyn CredentialSource>,
    ledger_source: Arc<dyn LedgerSource>,
    scope_filter: ScopeFilter,
}

impl DashboardService {
    /// Creates a new dashboard service.
    #[must_use]
    pub fn new(
        credential_source: Arc<dyn CredentialSource>,
        ledger_source: Arc<dyn LedgerSource>,
        scope_filter: ScopeFilter,
    ) -> Self {
        Self {
            credential_source,
            ledger_source,
            scope_filter,
        }
    }

    /// Authenticates a viewer and returns the rows they may see.
    ///
    /// Credentials load first; the ledger is only read once the password is
    /// accepted. Both sources are read fresh for every session.
    pub async fn open_session(&self, submitted_password: &str) -> AppResult<DashboardSession> {
        let scope = self.authenticate(submitted_password).await?;
        let ledger = self.load_ledger().await?;

        let scoped_ledger = self
            .scope_filter
            .filter(ledger, &scope)
            .inspect_err(|error| {
                if let AppError::UnknownIdentity(identity) = error {
                    warn!(
                        identity = identity.as_str(),
                        matching = self.scope_filter.matching().as_str(),
                        "credential identity does not appear in the ledger"
                    );
                }
            })?;

        info!(
            scope = %scope,
            visible_rows = scoped_ledger.len(),
            "dashboard session opened"
        );

        Ok(DashboardSession {
            scope,
            scoped_ledger,
        })
    }

    /// Compares credential identities with the ledger salesperson roster.
    ///
    /// Requires the general password.
    pub async fn identity_report(&self, submitted_password: &str) -> AppResult<IdentityReport> {
        let credentials = self.load_credentials().await?;
        let scope = resolve_access_scope(submitted_password, &credentials).inspect_err(|_| {
            warn!("identity report authentication rejected");
        })?;

        if !scope.is_unrestricted() {
            return Err(AppError::Forbidden(
                "the identity report requires the general password".to_owned(),
            ));
        }

        let ledger = self.load_ledger().await?;
        let matching = self.scope_filter.matching();
        let identities: Vec<&str> = credentials.identities().collect();

        let missing_in_ledger: BTreeSet<String> = identities
            .iter()
            .filter(|identity| !ledger.recognizes(identity, matching))
            .map(|identity| (*identity).to_owned())
            .collect();

        let without_credentials: BTreeSet<String> = ledger
            .salesperson_roster()
            .iter()
            .filter(|value| !is_credentialed(value, &identities, matching))
            .cloned()
            .collect();

        info!(
            missing_in_ledger = missing_in_ledger.len(),
            without_credentials = without_credentials.len(),
            "identity report computed"
        );

        Ok(IdentityReport {
            missing_in_ledger: missing_in_ledger.into_iter().collect(),
            without_credentials: without_credentials.into_iter().collect(),
        })
    }

    async fn authenticate(&self, submitted_password: &str) -> AppResult<AccessScope> {
        let credentials = self.load_credentials().await?;

        resolve_access_scope(submitted_password, &credentials).inspect_err(|_| {
            warn!("dashboard authentication rejected");
        })
    }

    async fn load_credentials(&self) -> AppResult<CredentialTable> {
        let credentials = self.credential_source.load_credentials().await?;
        credentials.ensure_distinct_identities(self.scope_filter.matching())?;
        Ok(credentials)
    }

    async fn load_ledger(&self) -> AppResult<Arc<Ledger>> {
        let ledger = self.ledger_source.load_ledger().await?;
        Ok(Arc::new(ledger))
    }
}

fn is_credentialed(value: &str, identities: &[&str], matching: IdentityMatching) -> bool {
    identities
        .iter()
        .any(|identity| matching.matches(identity, value))
}

#[cfg(test)]
mod tests;
