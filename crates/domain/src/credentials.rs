//! Credential table for dashboard viewers.
//!
//! One general password unlocks the whole ledger; every other entry maps a
//! salesperson identity to the password that unlocks that salesperson's
//! rows. The table is validated once when loaded and never changes.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::fmt::{Debug, Formatter};

use cartera_core::{AppError, AppResult, NonEmptyString};

use crate::IdentityMatching;

/// Reserved label of the general (unrestricted) credential.
pub const GENERAL_IDENTITY: &str = "general";

/// Password value loaded from the credentials file.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    fn new(value: impl Into<String>, owner: &str) -> AppResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(AppError::Configuration(format!(
                "password for '{owner}' must not be empty"
            )));
        }

        Ok(Self(value))
    }

    /// Returns whether the submitted value equals this password exactly.
    #[must_use]
    pub fn matches(&self, submitted: &str) -> bool {
        self.0 == submitted
    }
}

impl Debug for Password {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("Password(***)")
    }
}

/// Password entry for one salesperson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalespersonCredential {
    identity: NonEmptyString,
    password: Password,
}

impl SalespersonCredential {
    /// Returns the salesperson identity as written in the credentials file.
    #[must_use]
    pub fn identity(&self) -> &str {
        self.identity.as_str()
    }

    /// Returns the salesperson password.
    #[must_use]
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Validated credential table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialTable {
    general: Password,
    salespeople: Vec<SalespersonCredential>,
}

impl CredentialTable {
    /// Creates a validated credential table.
    ///
    /// Salesperson entries keep the given order. Identities must be non-empty,
    /// unique and different from the reserved `general` label; no password may
    /// be shared between two entries, the general one included.
    pub fn new<I, K, V>(general_password: impl Into<String>, salespeople: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let general = Password::new(general_password, GENERAL_IDENTITY)?;

        let mut seen_identities = HashSet::new();
        let mut entries = Vec::new();
        for (identity, password) in salespeople {
            let identity = identity.into();
            let identity = NonEmptyString::new(identity).map_err(|_| {
                AppError::Configuration("salesperson identities must not be blank".to_owned())
            })?;

            if identity.as_str().trim().eq_ignore_ascii_case(GENERAL_IDENTITY) {
                return Err(AppError::Configuration(format!(
                    "'{identity}' is reserved for the general password and cannot name a salesperson"
                )));
            }

            if !seen_identities.insert(identity.as_str().to_owned()) {
                return Err(AppError::Configuration(format!(
                    "salesperson '{identity}' is listed more than once"
                )));
            }

            let password = Password::new(password, identity.as_str())?;
            entries.push(SalespersonCredential { identity, password });
        }

        let table = Self {
            general,
            salespeople: entries,
        };
        table.ensure_unique_passwords()?;

        Ok(table)
    }

    /// Returns the general password.
    #[must_use]
    pub fn general_password(&self) -> &Password {
        &self.general
    }

    /// Returns salesperson entries in stored order.
    #[must_use]
    pub fn salespeople(&self) -> &[SalespersonCredential] {
        &self.salespeople
    }

    /// Returns salesperson identities in stored order.
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.salespeople.iter().map(SalespersonCredential::identity)
    }

    /// Fails when two identities name the same salesperson under `matching`.
    ///
    /// Construction only rejects byte-identical identities; `"Ana Ruiz"` and
    /// `"ana ruiz"` are distinct there but collide once matching is normalized.
    pub fn ensure_distinct_identities(&self, matching: IdentityMatching) -> AppResult<()> {
        let mut spellings: BTreeMap<Cow<'_, str>, Vec<&str>> = BTreeMap::new();
        for identity in self.identities() {
            spellings
                .entry(matching.key(identity))
                .or_default()
                .push(identity);
        }

        let collisions: Vec<String> = spellings
            .into_values()
            .filter(|identities| identities.len() > 1)
            .map(|identities| identities.join(", "))
            .collect();

        if collisions.is_empty() {
            return Ok(());
        }

        Err(AppError::Configuration(format!(
            "salesperson identities collide under {} matching: {}",
            matching.as_str(),
            collisions.join("; ")
        )))
    }

    fn ensure_unique_passwords(&self) -> AppResult<()> {
        let mut owners: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        owners
            .entry(self.general.0.as_str())
            .or_default()
            .push(GENERAL_IDENTITY);
        for entry in &self.salespeople {
            owners
                .entry(entry.password.0.as_str())
                .or_default()
                .push(entry.identity());
        }

        let mut collisions: Vec<String> = owners
            .into_values()
            .filter(|identities| identities.len() > 1)
            .map(|identities| identities.join(", "))
            .collect();

        if collisions.is_empty() {
            return Ok(());
        }

        collisions.sort();
        Err(AppError::Configuration(format!(
            "passwords must be unique, shared by: {}",
            collisions.join("; ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> AppResult<CredentialTable> {
        CredentialTable::new("root1", [("Ana Ruiz", "a1"), ("Ben Lee", "b1")])
    }

    #[test]
    fn valid_table_keeps_entry_order() {
        let table = sample_table();
        assert!(table.is_ok());
        let table = table.unwrap_or_else(|_| panic!("test"));
        assert_eq!(
            table.identities().collect::<Vec<_>>(),
            vec!["Ana Ruiz", "Ben Lee"]
        );
        assert!(table.general_password().matches("root1"));
    }

    #[test]
    fn empty_general_password_is_rejected() {
        let result = CredentialTable::new("", [("Ana Ruiz", "a1")]);
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn blank_identity_is_rejected() {
        let result = CredentialTable::new("root1", [("  ", "a1")]);
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn reserved_general_identity_is_rejected() {
        let result = CredentialTable::new("root1", [("General", "a1")]);
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn duplicate_identity_is_rejected() {
        let result = CredentialTable::new("root1", [("Ana Ruiz", "a1"), ("Ana Ruiz", "a2")]);
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn shared_password_names_identities_but_not_password() {
        let result = CredentialTable::new("root1", [("Ana Ruiz", "s3cret"), ("Ben Lee", "s3cret")]);
        let message = match result {
            Err(AppError::Configuration(message)) => message,
            other => panic!("unexpected result: {other:?}"),
        };
        assert!(message.contains("Ana Ruiz, Ben Lee"));
        assert!(!message.contains("s3cret"));
    }

    #[test]
    fn salesperson_password_equal_to_general_is_rejected() {
        let result = CredentialTable::new("root1", [("Ana Ruiz", "root1")]);
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn case_variants_collide_only_under_normalized_matching() {
        let table = CredentialTable::new("root1", [("Ana Ruiz", "a1"), ("ana  ruiz", "a2")])
            .unwrap_or_else(|_| panic!("test"));

        assert!(table.ensure_distinct_identities(IdentityMatching::Exact).is_ok());
        let message = match table.ensure_distinct_identities(IdentityMatching::Normalized) {
            Err(AppError::Configuration(message)) => message,
            other => panic!("unexpected result: {other:?}"),
        };
        assert!(message.contains("Ana Ruiz, ana  ruiz"));
        assert!(!message.contains("a2"));
    }

    #[test]
    fn debug_output_redacts_passwords() {
        let table = sample_table().unwrap_or_else(|_| panic!("test"));
        let rendered = format!("{table:?}");
        assert!(!rendered.contains("root1"));
        assert!(!rendered.contains("a1\""));
        assert!(rendered.contains("Ana Ruiz"));
    }
}
