//! Application configuration

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Which store backs characters and the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Sqlite,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "sqlite" => Ok(StoreKind::Sqlite),
            other => anyhow::bail!("unknown store backend '{}', expected memory or sqlite", other),
        }
    }
}

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Store backend
    pub store_backend: StoreKind,
    /// SQLite database file, used by the sqlite backend
    pub sqlite_path: String,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            store_backend: var("STORE_BACKEND")
                .unwrap_or_else(|| "sqlite".to_string())
                .parse()
                .context("STORE_BACKEND must be memory or sqlite")?,
            sqlite_path: var("SQLITE_PATH").unwrap_or_else(|| "data/chargen.db".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_vars(|_| None).unwrap();
        assert_eq!(config.store_backend, StoreKind::Sqlite);
        assert_eq!(config.sqlite_path, "data/chargen.db");
    }

    #[test]
    fn test_overrides_and_bad_backend() {
        let config = AppConfig::from_vars(|key| match key {
            "STORE_BACKEND" => Some("Memory".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.store_backend, StoreKind::Memory);

        let err = AppConfig::from_vars(|key| match key {
            "STORE_BACKEND" => Some("postgres".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("STORE_BACKEND"));
    }
}
