//! Salesperson identity comparison rules.

use std::borrow::Cow;
use std::str::FromStr;

use cartera_core::AppError;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// How identities from the credentials file are compared with ledger values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityMatching {
    /// Byte-exact comparison. Case and accent variants are different people.
    #[default]
    Exact,
    /// Comparison after accent folding, case folding and whitespace collapsing.
    Normalized,
}

impl IdentityMatching {
    /// Returns the configuration string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Normalized => "normalized",
        }
    }

    /// Returns the comparison key for an identity under this mode.
    #[must_use]
    pub fn key<'a>(&self, identity: &'a str) -> Cow<'a, str> {
        match self {
            Self::Exact => Cow::Borrowed(identity),
            Self::Normalized => Cow::Owned(normalize_identity(identity)),
        }
    }

    /// Returns whether two identities are the same person under this mode.
    #[must_use]
    pub fn matches(&self, left: &str, right: &str) -> bool {
        self.key(left) == self.key(right)
    }
}

impl FromStr for IdentityMatching {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "normalized" => Ok(Self::Normalized),
            other => Err(AppError::Validation(format!(
                "identity matching must be either 'exact' or 'normalized', got '{other}'"
            ))),
        }
    }
}

/// Folds accents and case and collapses runs of whitespace.
///
/// `"  José   MARÍA "` becomes `"jose maria"`.
#[must_use]
pub fn normalize_identity(value: &str) -> String {
    let folded: String = value
        .to_lowercase()
        .nfd()
        .filter(|character| !is_combining_mark(*character))
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn normalization_is_idempotent(value in "[A-Za-zÁÉÍÓÚáéíóúÑñÜü .]{0,24}") {
            let once = normalize_identity(&value);
            prop_assert_eq!(normalize_identity(&once), once);
        }

        #[test]
        fn normalized_mode_ignores_ascii_case(value in "[A-Za-z ]{1,24}") {
            prop_assert!(IdentityMatching::Normalized.matches(&value, &value.to_uppercase()));
        }
    }

    #[test]
    fn exact_mode_distinguishes_case_and_accents() {
        let matching = IdentityMatching::Exact;
        assert!(matching.matches("Ana Ruiz", "Ana Ruiz"));
        assert!(!matching.matches("Ana Ruiz", "ana ruiz"));
        assert!(!matching.matches("José", "Jose"));
    }

    #[test]
    fn normalized_mode_folds_case_accents_and_spacing() {
        let matching = IdentityMatching::Normalized;
        assert!(matching.matches("José  María", "jose maria"));
        assert!(matching.matches(" ÑUÑEZ ", "ñuñez"));
        assert!(!matching.matches("Ana R.", "Ana Ruiz"));
    }

    #[test]
    fn normalize_identity_strips_combining_marks() {
        assert_eq!(normalize_identity("Peña Gómez"), "pena gomez");
    }

    #[test]
    fn matching_mode_parses_from_configuration() {
        assert_eq!(
            "Normalized".parse::<IdentityMatching>().ok(),
            Some(IdentityMatching::Normalized)
        );
        assert!("fuzzy".parse::<IdentityMatching>().is_err());
    }
}
