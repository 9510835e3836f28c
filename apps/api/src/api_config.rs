use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use cartera_core::AppError;
use cartera_domain::IdentityMatching;
use cartera_infrastructure::{DEFAULT_SALESPERSON_COLUMN, SpreadsheetLedgerConfig};
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub credentials_path: PathBuf,
    pub ledger: SpreadsheetLedgerConfig,
    pub identity_matching: IdentityMatching,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = match optional_env("API_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))?,
            None => 3001,
        };
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let credentials_path = optional_env("CARTERA_CREDENTIALS_PATH")
            .unwrap_or_else(|| "config/credentials.toml".to_owned())
            .into();

        let mut ledger = SpreadsheetLedgerConfig::new(required_non_empty_env("CARTERA_LEDGER_PATH")?);
        ledger.sheet = optional_env("CARTERA_LEDGER_SHEET");
        ledger.salesperson_column = optional_env("CARTERA_SALESPERSON_COLUMN")
            .unwrap_or_else(|| DEFAULT_SALESPERSON_COLUMN.to_owned());
        ledger.as_of = optional_env("CARTERA_LEDGER_AS_OF")
            .map(|value| {
                NaiveDate::parse_from_str(value.as_str(), "%Y-%m-%d").map_err(|error| {
                    AppError::Validation(format!(
                        "invalid CARTERA_LEDGER_AS_OF '{value}', expected YYYY-MM-DD: {error}"
                    ))
                })
            })
            .transpose()?;
        ledger.include_settled = match optional_env("CARTERA_INCLUDE_SETTLED") {
            Some(value) => parse_flag("CARTERA_INCLUDE_SETTLED", value.as_str())?,
            None => false,
        };

        let identity_matching = optional_env("CARTERA_IDENTITY_MATCHING")
            .map(|value| IdentityMatching::from_str(value.as_str()))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            api_host,
            api_port,
            frontend_url,
            credentials_path,
            ledger,
            identity_matching,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    optional_env(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn parse_flag(name: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(AppError::Validation(format!(
            "{name} must be 'true' or 'false', got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_flag;

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("FLAG", "TRUE").ok(), Some(true));
        assert_eq!(parse_flag("FLAG", " no ").ok(), Some(false));
        assert!(parse_flag("FLAG", "maybe").is_err());
    }
}
