//! Receivables ledger loaded from the tabular export.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::{AgingBucket, IdentityMatching};

/// Field values for one ledger row before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerRowInput {
    /// Salesperson responsible for the account.
    pub salesperson: Option<String>,
    /// Client tax identifier (NIT).
    pub client_id: Option<String>,
    /// Client display name.
    pub client_name: Option<String>,
    /// Invoice or document number.
    pub document: Option<String>,
    /// Outstanding balance.
    pub balance: f64,
    /// Invoice due date.
    pub due_date: Option<NaiveDate>,
    /// Days past due, negative when not yet due.
    pub days_overdue: Option<i64>,
    /// Client contact phone.
    pub phone: Option<String>,
    /// Remaining columns keyed by canonical column name.
    pub extra: BTreeMap<String, String>,
}

/// One outstanding invoice line.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    salesperson: Option<String>,
    client_id: Option<String>,
    client_name: Option<String>,
    document: Option<String>,
    balance: f64,
    due_date: Option<NaiveDate>,
    days_overdue: Option<i64>,
    phone: Option<String>,
    extra: BTreeMap<String, String>,
}

impl LedgerRow {
    /// Creates a ledger row. Blank text fields are stored as missing.
    ///
    /// Non-blank salesperson values are stored verbatim: scope filtering
    /// compares them byte for byte.
    #[must_use]
    pub fn new(input: LedgerRowInput) -> Self {
        Self {
            salesperson: non_blank(input.salesperson),
            client_id: non_blank(input.client_id),
            client_name: non_blank(input.client_name),
            document: non_blank(input.document),
            balance: if input.balance.is_finite() {
                input.balance
            } else {
                0.0
            },
            due_date: input.due_date,
            days_overdue: input.days_overdue,
            phone: non_blank(input.phone),
            extra: input.extra,
        }
    }

    /// Returns the salesperson identity.
    #[must_use]
    pub fn salesperson(&self) -> Option<&str> {
        self.salesperson.as_deref()
    }

    /// Returns the client tax identifier.
    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// Returns the client display name.
    #[must_use]
    pub fn client_name(&self) -> Option<&str> {
        self.client_name.as_deref()
    }

    /// Returns the key used to group rows per client: NIT, else name.
    #[must_use]
    pub fn client_key(&self) -> Option<&str> {
        self.client_id().or_else(|| self.client_name())
    }

    /// Returns the document number.
    #[must_use]
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Returns the outstanding balance.
    #[must_use]
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Returns the due date.
    #[must_use]
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns days past due.
    #[must_use]
    pub fn days_overdue(&self) -> Option<i64> {
        self.days_overdue
    }

    /// Returns the aging bucket, when days past due are known.
    #[must_use]
    pub fn aging_bucket(&self) -> Option<AgingBucket> {
        self.days_overdue.map(AgingBucket::for_days_overdue)
    }

    /// Returns the client contact phone.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Returns columns without a dedicated field.
    #[must_use]
    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}

/// Immutable ledger plus the roster of salespeople named by its source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    rows: Vec<LedgerRow>,
    roster: BTreeSet<String>,
}

impl Ledger {
    /// Creates a ledger whose roster is the salesperson values of its rows.
    #[must_use]
    pub fn new(rows: Vec<LedgerRow>) -> Self {
        Self::with_roster(rows, Vec::<String>::new())
    }

    /// Creates a ledger whose roster also lists salespeople without rows.
    ///
    /// Used when the loader drops settled lines: their salesperson stays a
    /// recognized identity even though no visible row carries it.
    #[must_use]
    pub fn with_roster<I, S>(rows: Vec<LedgerRow>, additional_identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roster: BTreeSet<String> = rows
            .iter()
            .filter_map(|row| row.salesperson().map(str::to_owned))
            .collect();
        roster.extend(
            additional_identities
                .into_iter()
                .map(Into::into)
                .filter(|identity| !identity.trim().is_empty()),
        );

        Self { rows, roster }
    }

    /// Returns rows in source order.
    #[must_use]
    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the ledger has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns distinct non-missing salesperson values.
    #[must_use]
    pub fn salesperson_roster(&self) -> &BTreeSet<String> {
        &self.roster
    }

    /// Returns whether the roster knows the identity under the matching mode.
    #[must_use]
    pub fn recognizes(&self, identity: &str, matching: IdentityMatching) -> bool {
        match matching {
            IdentityMatching::Exact => self.roster.contains(identity),
            IdentityMatching::Normalized => {
                let wanted = matching.key(identity);
                self.roster.iter().any(|value| matching.key(value) == wanted)
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
