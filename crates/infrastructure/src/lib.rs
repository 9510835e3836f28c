//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_sources;
mod spreadsheet_ledger_source;
mod toml_credential_source;

pub use in_memory_sources::{InMemoryCredentialSource, InMemoryLedgerSource};
pub use spreadsheet_ledger_source::{
    DEFAULT_SALESPERSON_COLUMN, SpreadsheetLedgerConfig, SpreadsheetLedgerSource,
};
pub use toml_credential_source::{TomlCredentialSource, parse_credentials_toml};
