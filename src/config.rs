//! Process configuration, read from the environment
use super::store::{InMemoryRideStore, RideStore, SledRideStore};
use anyhow::Context;
use std::path::PathBuf;

pub const STORE_VAR: &str = "RIDESHARE_STORE";
pub const DB_PATH_VAR: &str = "RIDESHARE_DB_PATH";
pub const DB_TEMPORARY_VAR: &str = "RIDESHARE_DB_TEMPORARY";
pub const LOG_FILTER_VAR: &str = "RUST_LOG";

const DEFAULT_DB_PATH: &str = "rideshare.db";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Sled { path: PathBuf, temporary: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store: StoreBackend,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreBackend::Memory,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key/value source; unset keys fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let backend = lookup(STORE_VAR).unwrap_or_else(|| "memory".to_string());

        let store = match backend.trim().to_ascii_lowercase().as_str() {
            "memory" => StoreBackend::Memory,
            "sled" => {
                let path = lookup(DB_PATH_VAR).unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
                let temporary = match lookup(DB_TEMPORARY_VAR) {
                    Some(raw) => raw
                        .trim()
                        .parse::<bool>()
                        .with_context(|| format!("{DB_TEMPORARY_VAR} must be true or false"))?,
                    None => false,
                };
                StoreBackend::Sled {
                    path: PathBuf::from(path),
                    temporary,
                }
            }
            other => anyhow::bail!("unknown {STORE_VAR} '{other}', expected memory or sled"),
        };

        let log_filter = lookup(LOG_FILTER_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self { store, log_filter })
    }

    pub fn open_store(&self) -> anyhow::Result<Box<dyn RideStore>> {
        match &self.store {
            StoreBackend::Memory => Ok(Box::new(InMemoryRideStore::new())),
            StoreBackend::Sled { path, temporary } => {
                let db = sled::Config::new()
                    .path(path)
                    .temporary(*temporary)
                    .open()
                    .with_context(|| format!("failed to open sled db at {}", path.display()))?;
                Ok(Box::new(SledRideStore::new(&db)?))
            }
        }
    }
}
