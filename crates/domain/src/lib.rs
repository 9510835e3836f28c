//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod aging;
mod credentials;
mod identity;
mod ledger;

pub use aging::AgingBucket;
pub use credentials::{CredentialTable, GENERAL_IDENTITY, Password, SalespersonCredential};
pub use identity::{IdentityMatching, normalize_identity};
pub use ledger::{Ledger, LedgerRow, LedgerRowInput};
