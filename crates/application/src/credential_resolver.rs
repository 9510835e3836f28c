use cartera_core::{AccessScope, AppError, AppResult};
use cartera_domain::CredentialTable;

/// Resolves the access scope unlocked by a submitted password.
///
/// The general password is checked first, then salesperson entries in
/// stored order. Comparison is exact string equality.
pub fn resolve_access_scope(submitted: &str, table: &CredentialTable) -> AppResult<AccessScope> {
    if submitted.is_empty() {
        return Err(AppError::Authentication("a password is required".to_owned()));
    }

    if table.general_password().matches(submitted) {
        return Ok(AccessScope::Unrestricted);
    }

    table
        .salespeople()
        .iter()
        .find(|entry| entry.password().matches(submitted))
        .map(|entry| AccessScope::restricted_to(entry.identity()))
        .ok_or_else(|| AppError::Authentication("incorrect password".to_owned()))
}
