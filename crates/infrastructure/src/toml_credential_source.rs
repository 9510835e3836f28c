//! Credentials file adapter.
//!
//! Expected layout:
//!
//! ```toml
//! [general]
//! password = "root1"
//!
//! [vendedores]
//! "Ana Ruiz" = "a1"
//! "Ben Lee" = "b1"
//! ```
//!
//! Passwords must be quoted strings. Salesperson order follows the document.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cartera_application::CredentialSource;
use cartera_core::{AppError, AppResult};
use cartera_domain::CredentialTable;
use toml::{Table, Value};
use tracing::info;

const GENERAL_SECTION: &str = "general";
const SALESPEOPLE_SECTION: &str = "vendedores";

/// Credential source reading a TOML file on every load.
#[derive(Debug, Clone)]
pub struct TomlCredentialSource {
    path: PathBuf,
}

impl TomlCredentialSource {
    /// Creates a source for the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the credentials file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }
}

#[async_trait]
impl CredentialSource for TomlCredentialSource {
    async fn load_credentials(&self) -> AppResult<CredentialTable> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_credentials_file(&path))
            .await
            .map_err(|error| AppError::Internal(format!("credential loading task failed: {error}")))?
    }
}

fn read_credentials_file(path: &Path) -> AppResult<CredentialTable> {
    let content = std::fs::read_to_string(path).map_err(|error| match error.kind() {
        ErrorKind::NotFound => AppError::Configuration(format!(
            "credentials file '{}' was not found",
            path.display()
        )),
        _ => AppError::Configuration(format!(
            "failed to read credentials file '{}': {error}",
            path.display()
        )),
    })?;

    let table = parse_credentials_toml(&content).map_err(|error| match error {
        AppError::Configuration(message) => {
            AppError::Configuration(format!("{}: {message}", path.display()))
        }
        other => other,
    })?;

    info!(
        path = %path.display(),
        salespeople = table.salespeople().len(),
        "credential table loaded"
    );

    Ok(table)
}

/// Parses and validates a credentials document.
pub fn parse_credentials_toml(content: &str) -> AppResult<CredentialTable> {
    // The TOML error renders the offending source line, which may hold a password.
    let document: Table = content.parse().map_err(|error: toml::de::Error| {
        let line = error
            .span()
            .and_then(|span| content.get(..span.start))
            .map(|before| before.matches('\n').count() + 1);
        match line {
            Some(line) => AppError::Configuration(format!(
                "invalid TOML near line {line}: {}",
                error.message()
            )),
            None => AppError::Configuration(format!("invalid TOML: {}", error.message())),
        }
    })?;

    let general = section(&document, GENERAL_SECTION)?;
    let general_password = match general.get("password") {
        Some(Value::String(password)) => password.clone(),
        Some(_) => {
            return Err(AppError::Configuration(format!(
                "[{GENERAL_SECTION}] password must be a quoted string"
            )));
        }
        None => {
            return Err(AppError::Configuration(format!(
                "[{GENERAL_SECTION}] is missing the 'password' key"
            )));
        }
    };

    let salespeople = section(&document, SALESPEOPLE_SECTION)?
        .iter()
        .map(|(identity, value)| match value {
            Value::String(password) => Ok((identity.clone(), password.clone())),
            _ => Err(AppError::Configuration(format!(
                "password for '{identity}' in [{SALESPEOPLE_SECTION}] must be a quoted string"
            ))),
        })
        .collect::<AppResult<Vec<_>>>()?;

    CredentialTable::new(general_password, salespeople)
}

fn section<'a>(document: &'a Table, name: &str) -> AppResult<&'a Table> {
    match document.get(name) {
        Some(Value::Table(table)) => Ok(table),
        Some(_) => Err(AppError::Configuration(format!(
            "'{name}' must be a table section"
        ))),
        None => Err(AppError::Configuration(format!(
            "missing [{name}] section"
        ))),
    }
}
