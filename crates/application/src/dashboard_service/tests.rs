use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use cartera_core::{AccessScope, AppError, AppResult};
use cartera_domain::{CredentialTable, IdentityMatching, Ledger, LedgerRow, LedgerRowInput};

use crate::{CredentialSource, LedgerSource, ScopeFilter};

use super::DashboardService;

struct FakeCredentialSource {
    salespeople: Vec<(&'static str, &'static str)>,
}

#[async_trait]
impl CredentialSource for FakeCredentialSource {
    async fn load_credentials(&self) -> AppResult<CredentialTable> {
        CredentialTable::new("root1", self.salespeople.clone())
    }
}

struct BrokenCredentialSource;

#[async_trait]
impl CredentialSource for BrokenCredentialSource {
    async fn load_credentials(&self) -> AppResult<CredentialTable> {
        Err(AppError::Configuration(
            "credentials file 'config/credentials.toml' was not found".to_owned(),
        ))
    }
}

#[derive(Default)]
struct FakeLedgerSource {
    salespeople: Vec<&'static str>,
    settled: Vec<&'static str>,
    loads: AtomicUsize,
}

#[async_trait]
impl LedgerSource for FakeLedgerSource {
    async fn load_ledger(&self) -> AppResult<Ledger> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let rows = self
            .salespeople
            .iter()
            .enumerate()
            .map(|(index, salesperson)| {
                LedgerRow::new(LedgerRowInput {
                    salesperson: Some((*salesperson).to_owned()),
                    client_id: Some(format!("C{index}")),
                    balance: 100.0,
                    days_overdue: Some(10),
                    ..LedgerRowInput::default()
                })
            })
            .collect();

        Ok(Ledger::with_roster(rows, self.settled.clone()))
    }
}

fn scenario_credentials() -> Arc<FakeCredentialSource> {
    Arc::new(FakeCredentialSource {
        salespeople: vec![("Ana Ruiz", "a1"), ("Ben Lee", "b1"), ("Ana R.", "ana")],
    })
}

fn scenario_ledger() -> Arc<FakeLedgerSource> {
    Arc::new(FakeLedgerSource {
        salespeople: vec!["Ana Ruiz", "Ana Ruiz", "Carla Gómez"],
        settled: vec!["Ben Lee"],
        ..FakeLedgerSource::default()
    })
}

fn service(
    credentials: Arc<dyn CredentialSource>,
    ledger: Arc<dyn LedgerSource>,
    matching: IdentityMatching,
) -> DashboardService {
    DashboardService::new(credentials, ledger, ScopeFilter::new(matching))
}

#[tokio::test]
async fn general_password_opens_unrestricted_session() {
    let service = service(
        scenario_credentials(),
        scenario_ledger(),
        IdentityMatching::Exact,
    );

    let session = service.open_session("root1").await;
    assert!(session.is_ok());
    let session = session.unwrap_or_else(|_| panic!("test"));
    assert_eq!(session.scope(), &AccessScope::Unrestricted);
    assert_eq!(session.scoped_ledger().len(), 3);
}

#[tokio::test]
async fn salesperson_password_opens_restricted_session() {
    let service = service(
        scenario_credentials(),
        scenario_ledger(),
        IdentityMatching::Exact,
    );

    let session = service
        .open_session("a1")
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(session.scope(), &AccessScope::restricted_to("Ana Ruiz"));
    assert_eq!(session.scoped_ledger().len(), 2);
    assert_eq!(session.summary(5).total_balance, 200.0);
}

#[tokio::test]
async fn settled_salesperson_gets_valid_empty_session() {
    let service = service(
        scenario_credentials(),
        scenario_ledger(),
        IdentityMatching::Exact,
    );

    let session = service
        .open_session("b1")
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(session.scope(), &AccessScope::restricted_to("Ben Lee"));
    assert!(session.scoped_ledger().is_empty());
}

#[tokio::test]
async fn misspelled_credential_identity_is_surfaced() {
    let service = service(
        scenario_credentials(),
        scenario_ledger(),
        IdentityMatching::Exact,
    );

    let result = service.open_session("ana").await;
    assert!(matches!(result, Err(AppError::UnknownIdentity(identity)) if identity == "Ana R."));
}

#[tokio::test]
async fn wrong_password_never_reads_the_ledger() {
    let ledger = scenario_ledger();
    let service = service(scenario_credentials(), ledger.clone(), IdentityMatching::Exact);

    let result = service.open_session("zzz").await;
    assert!(matches!(result, Err(AppError::Authentication(_))));
    assert_eq!(ledger.loads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn configuration_error_halts_before_authentication() {
    let ledger = scenario_ledger();
    let service = service(
        Arc::new(BrokenCredentialSource),
        ledger.clone(),
        IdentityMatching::Exact,
    );

    let result = service.open_session("root1").await;
    assert!(matches!(result, Err(AppError::Configuration(_))));
    assert_eq!(ledger.loads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn every_session_reloads_the_ledger() {
    let ledger = scenario_ledger();
    let service = service(scenario_credentials(), ledger.clone(), IdentityMatching::Exact);

    assert!(service.open_session("root1").await.is_ok());
    assert!(service.open_session("a1").await.is_ok());
    assert_eq!(ledger.loads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn normalized_matching_accepts_spelling_variants() {
    let credentials = Arc::new(FakeCredentialSource {
        salespeople: vec![("carla gomez", "c1")],
    });
    let service = service(credentials, scenario_ledger(), IdentityMatching::Normalized);

    let session = service
        .open_session("c1")
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(session.scoped_ledger().len(), 1);
}

#[tokio::test]
async fn identity_report_lists_drift_in_both_directions() {
    let service = service(
        scenario_credentials(),
        scenario_ledger(),
        IdentityMatching::Exact,
    );

    let report = service
        .identity_report("root1")
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(report.missing_in_ledger, vec!["Ana R.".to_owned()]);
    assert_eq!(report.without_credentials, vec!["Carla Gómez".to_owned()]);
}

#[tokio::test]
async fn identity_report_is_forbidden_for_salespeople() {
    let service = service(
        scenario_credentials(),
        scenario_ledger(),
        IdentityMatching::Exact,
    );

    let result = service.identity_report("a1").await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn normalized_matching_rejects_colliding_credential_identities() {
    let ledger = scenario_ledger();
    let credentials = Arc::new(FakeCredentialSource {
        salespeople: vec![("Ana Ruiz", "a1"), ("ana ruiz", "a2")],
    });
    let normalized = service(credentials.clone(), ledger.clone(), IdentityMatching::Normalized);

    let result = normalized.open_session("a2").await;
    assert!(matches!(result, Err(AppError::Configuration(message)) if message.contains("Ana Ruiz, ana ruiz")));
    assert_eq!(ledger.loads.load(Ordering::SeqCst), 0);

    let exact = service(credentials, ledger, IdentityMatching::Exact);
    assert!(matches!(
        exact.open_session("a2").await,
        Err(AppError::UnknownIdentity(identity)) if identity == "ana ruiz"
    ));
}
