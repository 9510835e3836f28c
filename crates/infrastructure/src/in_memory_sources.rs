use async_trait::async_trait;
use cartera_application::{CredentialSource, LedgerSource};
use cartera_core::AppResult;
use cartera_domain::{CredentialTable, Ledger};
use tokio::sync::RwLock;

/// Credential source serving a fixed table.
#[derive(Debug, Clone)]
pub struct InMemoryCredentialSource {
    table: CredentialTable,
}

impl InMemoryCredentialSource {
    /// Creates a source serving the given table.
    #[must_use]
    pub fn new(table: CredentialTable) -> Self {
        Self { table }
    }
}

#[async_trait]
impl CredentialSource for InMemoryCredentialSource {
    async fn load_credentials(&self) -> AppResult<CredentialTable> {
        Ok(self.table.clone())
    }
}

/// Ledger source serving a replaceable in-memory ledger.
#[derive(Debug, Default)]
pub struct InMemoryLedgerSource {
    ledger: RwLock<Ledger>,
}

impl InMemoryLedgerSource {
    /// Creates a source serving the given ledger.
    #[must_use]
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: RwLock::new(ledger),
        }
    }

    /// Swaps the served ledger. Sessions opened afterwards see the new rows.
    pub async fn replace_ledger(&self, ledger: Ledger) {
        *self.ledger.write().await = ledger;
    }
}

#[async_trait]
impl LedgerSource for InMemoryLedgerSource {
    async fn load_ledger(&self) -> AppResult<Ledger> {
        Ok(self.ledger.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use cartera_domain::{LedgerRow, LedgerRowInput};

    use super::*;

    fn row(salesperson: &str) -> LedgerRow {
        LedgerRow::new(LedgerRowInput {
            salesperson: Some(salesperson.to_owned()),
            balance: 10.0,
            ..LedgerRowInput::default()
        })
    }

    #[tokio::test]
    async fn replaced_ledger_is_served_on_next_load() {
        let source = InMemoryLedgerSource::new(Ledger::new(vec![row("Ana Ruiz")]));
        assert_eq!(
            source.load_ledger().await.map(|ledger| ledger.len()).ok(),
            Some(1)
        );

        source
            .replace_ledger(Ledger::new(vec![row("Ana Ruiz"), row("Ben Lee")]))
            .await;
        let ledger = source.load_ledger().await.unwrap_or_else(|_| panic!("test"));
        assert!(ledger.salesperson_roster().contains("Ben Lee"));
    }

    #[tokio::test]
    async fn credential_table_is_served_unchanged() {
        let table = CredentialTable::new("root1", [("Ana Ruiz", "a1")])
            .unwrap_or_else(|_| panic!("test"));
        let source = InMemoryCredentialSource::new(table);

        let loaded = source.load_credentials().await.unwrap_or_else(|_| panic!("test"));
        assert_eq!(loaded.identities().collect::<Vec<_>>(), vec!["Ana Ruiz"]);
    }
}
