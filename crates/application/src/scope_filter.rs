use std::sync::Arc;

use cartera_core::{AccessScope, AppError, AppResult};
use cartera_domain::{IdentityMatching, Ledger, LedgerRow};

/// Read-only view of the ledger rows visible under one access scope.
///
/// Holds row positions into a shared ledger; rows are never copied.
#[derive(Debug, Clone)]
pub struct ScopedLedger {
    ledger: Arc<Ledger>,
    positions: Vec<usize>,
}

impl ScopedLedger {
    /// Returns visible rows in ledger order.
    pub fn rows(&self) -> impl Iterator<Item = &LedgerRow> + '_ {
        let rows = self.ledger.rows();
        self.positions
            .iter()
            .filter_map(move |position| rows.get(*position))
    }

    /// Returns the number of visible rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns whether the scope sees no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns the underlying ledger.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

/// Restricts a ledger to the rows an access scope may see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeFilter {
    matching: IdentityMatching,
}

impl ScopeFilter {
    /// Creates a scope filter using the given identity matching mode.
    #[must_use]
    pub fn new(matching: IdentityMatching) -> Self {
        Self { matching }
    }

    /// Returns the identity matching mode.
    #[must_use]
    pub fn matching(&self) -> IdentityMatching {
        self.matching
    }

    /// Returns the rows visible under `scope`.
    ///
    /// An unrestricted scope sees the whole ledger. A restricted identity
    /// unknown to the ledger roster fails with `AppError::UnknownIdentity`;
    /// a known identity without rows yields an empty view.
    pub fn filter(&self, ledger: Arc<Ledger>, scope: &AccessScope) -> AppResult<ScopedLedger> {
        let positions = match scope {
            AccessScope::Unrestricted => (0..ledger.len()).collect(),
            AccessScope::RestrictedTo(identity) => {
                if !ledger.recognizes(identity, self.matching) {
                    return Err(AppError::UnknownIdentity(identity.clone()));
                }

                let wanted = self.matching.key(identity);
                ledger
                    .rows()
                    .iter()
                    .enumerate()
                    .filter(|(_, row)| {
                        row.salesperson()
                            .is_some_and(|value| self.matching.key(value) == wanted)
                    })
                    .map(|(position, _)| position)
                    .collect()
            }
        };

        Ok(ScopedLedger { ledger, positions })
    }
}
