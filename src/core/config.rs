//! Search configuration
//!
//! Loaded once at process start and treated as immutable afterwards. Only the
//! connection string is required; everything else has a default.

use std::fmt::Display;
use std::str::FromStr;

use anyhow::{Context, Result, bail};

use super::constants::{
    DEFAULT_BR_VIEW, DEFAULT_DATABASE_URL, DEFAULT_MAX_ROWS, DEFAULT_QUERY_TIMEOUT_SECS,
    ENV_BR_VIEW, ENV_DATABASE_URL, ENV_MAX_ROWS, ENV_QUERY_TIMEOUT,
};

/// Executor-facing configuration for business request searches
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Store connection string
    pub database_url: String,
    /// Reporting view the bundled executor selects from
    pub br_view: String,
    /// Statement timeout applied by the bundled executor
    pub query_timeout_secs: u64,
    /// Cap on rows returned by one search
    pub max_rows: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            br_view: DEFAULT_BR_VIEW.to_string(),
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

impl SearchConfig {
    /// Load configuration from the environment (reading `.env` if present)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var(ENV_DATABASE_URL)
            .with_context(|| format!("{ENV_DATABASE_URL} must be set"))?;
        let br_view =
            std::env::var(ENV_BR_VIEW).unwrap_or_else(|_| DEFAULT_BR_VIEW.to_string());
        if !valid_identifier(&br_view) {
            bail!("{ENV_BR_VIEW} is not a valid object name: {br_view:?}");
        }

        Ok(Self {
            database_url,
            br_view,
            query_timeout_secs: env_or(ENV_QUERY_TIMEOUT, DEFAULT_QUERY_TIMEOUT_SECS)?,
            max_rows: env_or(ENV_MAX_ROWS, DEFAULT_MAX_ROWS)?,
        })
    }
}

/// The view name is interpolated into statement text, so it must look like a
/// plain object name
fn valid_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key}: {e}")),
        Err(_) => Ok(default),
    }
}
