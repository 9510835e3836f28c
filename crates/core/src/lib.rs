//! Shared primitives for all Rust crates in Cartera.

#![forbid(unsafe_code)]

/// Access scope primitives shared across services.
pub mod auth;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::AccessScope;

/// Result type used across Cartera crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Common application error categories.
///
/// Every variant is terminal for the session that raised it. Messages may
/// name files, columns and identities but never carry a password.
#[derive(Debug, Error)]
pub enum AppError {
    /// Credential source is missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Ledger source is missing, unreadable, or lacks a required column.
    #[error("data source error: {0}")]
    DataSource(String),

    /// Submitted password matches no credential entry.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Restricted identity does not appear in the ledger salesperson column.
    #[error(
        "unknown identity '{0}': no matching salesperson in the ledger, check the spelling in the credentials file"
    )]
    UnknownIdentity(String),

    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Viewer is authenticated but the scope does not allow the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::{AppError, NonEmptyString};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn non_empty_string_keeps_surrounding_whitespace() {
        let value = NonEmptyString::new(" Ana Ruiz ");
        assert_eq!(
            value.map(String::from).unwrap_or_default(),
            " Ana Ruiz ".to_owned()
        );
    }

    #[test]
    fn unknown_identity_message_echoes_identity() {
        let error = AppError::UnknownIdentity("Ana R.".to_owned());
        assert!(error.to_string().contains("'Ana R.'"));
    }
}
