//! TOML-based application configuration.
//!
//! Holds the remote sync endpoint and the signed-in identity. Stored at
//! `<data_dir>/config.toml`. Authentication itself (how the user id was
//! obtained) is outside the core; the CLI stores whatever identity the
//! auth flow produced.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, StorageError};

use super::data_dir;

/// Remote endpoint settings (PostgREST-style REST API).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL, e.g. `https://xyz.supabase.co`.
    #[serde(default)]
    pub url: Option<String>,
    /// API key sent as both `apikey` and bearer token.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl RemoteConfig {
    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.api_key.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Signed-in user id; None while anonymous.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Config {
    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load the config, returning defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| {
            StorageError::ConfigLoadFailed {
                path,
                message: e.to_string(),
            }
            .into()
        })
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| StorageError::ConfigSaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}
