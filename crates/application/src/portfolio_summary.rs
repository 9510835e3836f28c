//! Portfolio KPIs computed over a scoped ledger.

use std::collections::{BTreeMap, HashSet};

use cartera_domain::{AgingBucket, LedgerRow};

use crate::ScopedLedger;

/// Balance and document count for one aging bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct AgingBucketTotal {
    /// Aging bucket.
    pub bucket: AgingBucket,
    /// Outstanding balance in the bucket.
    pub balance: f64,
    /// Documents in the bucket.
    pub documents: usize,
}

/// Totals for one salesperson.
#[derive(Debug, Clone, PartialEq)]
pub struct SalespersonTotal {
    /// Salesperson identity, `None` for rows without one.
    pub salesperson: Option<String>,
    /// Outstanding balance.
    pub balance: f64,
    /// Overdue part of the balance.
    pub overdue_balance: f64,
    /// Documents.
    pub documents: usize,
}

/// Totals for one client, used for the collections call list.
#[derive(Debug, Clone, PartialEq)]
pub struct DebtorTotal {
    /// Client grouping key (NIT, else name).
    pub client_key: String,
    /// Client display name from the first row seen.
    pub client_name: Option<String>,
    /// Contact phone from the first row that has one.
    pub phone: Option<String>,
    /// Outstanding balance.
    pub balance: f64,
    /// Overdue part of the balance.
    pub overdue_balance: f64,
    /// Largest days past due across the client's documents.
    pub max_days_overdue: Option<i64>,
    /// Documents.
    pub documents: usize,
}

/// Dashboard KPIs for one scope.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSummary {
    /// Visible documents.
    pub document_count: usize,
    /// Distinct clients among visible documents.
    pub client_count: usize,
    /// Total outstanding balance.
    pub total_balance: f64,
    /// Balance of documents past due.
    pub overdue_balance: f64,
    /// `overdue_balance / total_balance`, zero when the total is zero.
    pub overdue_ratio: f64,
    /// Per-bucket totals, every bucket present, least overdue first.
    pub aging: Vec<AgingBucketTotal>,
    /// Balance of documents whose days past due are unknown.
    pub unclassified_balance: f64,
    /// Per-salesperson totals, largest balance first.
    pub by_salesperson: Vec<SalespersonTotal>,
    /// Largest debtors, largest balance first.
    pub top_debtors: Vec<DebtorTotal>,
}

/// Computes KPIs for the rows of a scoped ledger.
#[must_use]
pub fn summarize_portfolio(scoped: &ScopedLedger, top_debtors: usize) -> PortfolioSummary {
    let mut aging: BTreeMap<AgingBucket, AgingBucketTotal> = AgingBucket::ALL
        .into_iter()
        .map(|bucket| {
            (
                bucket,
                AgingBucketTotal {
                    bucket,
                    balance: 0.0,
                    documents: 0,
                },
            )
        })
        .collect();
    let mut salespeople: BTreeMap<Option<String>, SalespersonTotal> = BTreeMap::new();
    let mut debtors: BTreeMap<String, DebtorTotal> = BTreeMap::new();
    let mut clients = HashSet::new();

    let mut document_count = 0;
    let mut total_balance = 0.0;
    let mut overdue_balance = 0.0;
    let mut unclassified_balance = 0.0;

    for row in scoped.rows() {
        let balance = row.balance();
        let overdue = overdue_part(row);

        document_count += 1;
        total_balance += balance;
        overdue_balance += overdue;

        match row.aging_bucket() {
            Some(bucket) => {
                if let Some(total) = aging.get_mut(&bucket) {
                    total.balance += balance;
                    total.documents += 1;
                }
            }
            None => unclassified_balance += balance,
        }

        let salesperson = row.salesperson().map(str::to_owned);
        let entry = salespeople
            .entry(salesperson.clone())
            .or_insert_with(|| SalespersonTotal {
                salesperson,
                balance: 0.0,
                overdue_balance: 0.0,
                documents: 0,
            });
        entry.balance += balance;
        entry.overdue_balance += overdue;
        entry.documents += 1;

        if let Some(client_key) = row.client_key() {
            clients.insert(client_key.to_owned());
            accumulate_debtor(&mut debtors, client_key, row, balance, overdue);
        }
    }

    let mut by_salesperson: Vec<SalespersonTotal> = salespeople.into_values().collect();
    by_salesperson.sort_by(|left, right| {
        right
            .balance
            .total_cmp(&left.balance)
            .then_with(|| left.salesperson.cmp(&right.salesperson))
    });

    let mut ranked_debtors: Vec<DebtorTotal> = debtors.into_values().collect();
    ranked_debtors.sort_by(|left, right| {
        right
            .balance
            .total_cmp(&left.balance)
            .then_with(|| left.client_key.cmp(&right.client_key))
    });
    ranked_debtors.truncate(top_debtors);

    let overdue_ratio = if total_balance.abs() > f64::EPSILON {
        overdue_balance / total_balance
    } else {
        0.0
    };

    PortfolioSummary {
        document_count,
        client_count: clients.len(),
        total_balance,
        overdue_balance,
        overdue_ratio,
        aging: aging.into_values().collect(),
        unclassified_balance,
        by_salesperson,
        top_debtors: ranked_debtors,
    }
}

fn overdue_part(row: &LedgerRow) -> f64 {
    match row.days_overdue() {
        Some(days) if days > 0 => row.balance(),
        _ => 0.0,
    }
}

fn accumulate_debtor(
    debtors: &mut BTreeMap<String, DebtorTotal>,
    client_key: &str,
    row: &LedgerRow,
    balance: f64,
    overdue: f64,
) {
    let debtor = debtors
        .entry(client_key.to_owned())
        .or_insert_with(|| DebtorTotal {
            client_key: client_key.to_owned(),
            client_name: row.client_name().map(str::to_owned),
            phone: None,
            balance: 0.0,
            overdue_balance: 0.0,
            max_days_overdue: None,
            documents: 0,
        });

    debtor.balance += balance;
    debtor.overdue_balance += overdue;
    debtor.documents += 1;
    if debtor.phone.is_none() {
        debtor.phone = row.phone().map(str::to_owned);
    }
    debtor.max_days_overdue = match (debtor.max_days_overdue, row.days_overdue()) {
        (Some(current), Some(days)) => Some(current.max(days)),
        (current, days) => current.or(days),
    };
}
