use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Access restriction resolved for one authenticated viewer.
///
/// Produced once per session from the submitted password. A
/// `RestrictedTo` scope is only meaningful once the identity has been
/// checked against the ledger salesperson roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "identity", rename_all = "snake_case")]
pub enum AccessScope {
    /// General viewer, sees every ledger row.
    Unrestricted,
    /// Salesperson viewer, sees only rows carrying this identity.
    RestrictedTo(String),
}

impl AccessScope {
    /// Creates a scope restricted to one salesperson identity.
    #[must_use]
    pub fn restricted_to(identity: impl Into<String>) -> Self {
        Self::RestrictedTo(identity.into())
    }

    /// Returns the restricted identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        match self {
            Self::Unrestricted => None,
            Self::RestrictedTo(identity) => Some(identity.as_str()),
        }
    }

    /// Returns whether the scope sees the whole ledger.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }
}

impl Display for AccessScope {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unrestricted => formatter.write_str("general"),
            Self::RestrictedTo(identity) => write!(formatter, "salesperson '{identity}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AccessScope;

    #[test]
    fn restricted_scope_exposes_identity() {
        let scope = AccessScope::restricted_to("Ana Ruiz");
        assert_eq!(scope.identity(), Some("Ana Ruiz"));
        assert!(!scope.is_unrestricted());
    }

    #[test]
    fn unrestricted_scope_displays_as_general() {
        assert_eq!(AccessScope::Unrestricted.to_string(), "general");
        assert_eq!(AccessScope::Unrestricted.identity(), None);
    }
}
