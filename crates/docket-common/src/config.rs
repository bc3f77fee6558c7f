//! Docket Configuration
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DOCKET_API_PORT` | `8080` | HTTP API port |
//! | `DOCKET_MONGO_URL` | `mongodb://localhost:27017` | MongoDB connection URL |
//! | `DOCKET_MONGO_DB` | `docket` | MongoDB database name |
//! | `DOCKET_COLLECTION` | `docket` | Collection for docket records |
//! | `DOCKET_USER_COLLECTION` | `users` | Collection for user accounts |
//! | `DOCKET_TOKEN_SECRET` | - | Session token signing secret (required) |
//! | `DOCKET_STORAGE` | `mongo` | `mongo` or `memory` |
//! | `DOCKET_LOG_JSON` | `false` | Emit JSON log lines |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(String),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: String, value: String },
}

/// Where records and accounts are kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Mongo,
    /// Process-local maps, lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(ConfigError::Invalid {
                key: "DOCKET_STORAGE".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Clone)]
pub struct DocketConfig {
    pub api_port: u16,
    pub mongo_url: String,
    pub mongo_db: String,
    pub docket_collection: String,
    pub user_collection: String,
    pub token_secret: String,
    pub storage: StorageBackend,
    pub log_json: bool,
}

// Hand-written so the signing secret never lands in a log line.
impl fmt::Debug for DocketConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocketConfig")
            .field("api_port", &self.api_port)
            .field("mongo_url", &self.mongo_url)
            .field("mongo_db", &self.mongo_db)
            .field("docket_collection", &self.docket_collection)
            .field("user_collection", &self.user_collection)
            .field("token_secret", &"<redacted>")
            .field("storage", &self.storage)
            .field("log_json", &self.log_json)
            .finish()
    }
}

impl DocketConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let api_port = match lookup("DOCKET_API_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "DOCKET_API_PORT".to_string(),
                value: raw.clone(),
            })?,
            None => 8080,
        };

        let token_secret = lookup("DOCKET_TOKEN_SECRET")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::Missing("DOCKET_TOKEN_SECRET".to_string()))?;

        let storage = match lookup("DOCKET_STORAGE") {
            Some(raw) => raw.parse()?,
            None => StorageBackend::default(),
        };

        let log_json = lookup("DOCKET_LOG_JSON")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            api_port,
            mongo_url: or_default("DOCKET_MONGO_URL", "mongodb://localhost:27017"),
            mongo_db: or_default("DOCKET_MONGO_DB", "docket"),
            docket_collection: or_default("DOCKET_COLLECTION", "docket"),
            user_collection: or_default("DOCKET_USER_COLLECTION", "users"),
            token_secret,
            storage,
            log_json,
        })
    }
}
