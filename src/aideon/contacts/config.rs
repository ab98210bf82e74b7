use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::aideon::contacts::error::{Result, SyncError};

/// Configuration file looked up in the working directory when no explicit
/// path is given.
pub const DEFAULT_CONFIG_FILE: &str = "contacts-sync.toml";

/// Default endpoint of the People API.
pub const DEFAULT_API_BASE_URL: &str = "https://people.googleapis.com/v1";

/// Largest page the contacts service hands out per listing request.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// How a stale remote contact is brought up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Delete the remote contact and create it again from the local row.
    #[default]
    Replace,
    /// Use the service's update operation, falling back to replace when the
    /// listed contact has no etag.
    InPlace,
}

/// Settings of the bulk eraser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EraseConfig {
    /// Name of the temporary group every contact is moved into.
    pub group_name: String,
    /// Wait after creating the group before moving members into it.
    pub grace_secs: u64,
    /// Attempts per membership move before giving up.
    pub max_attempts: u32,
    /// First retry delay, doubled on every further attempt.
    pub backoff_ms: u64,
}

impl Default for EraseConfig {
    fn default() -> Self {
        Self {
            group_name: "temp".into(),
            grace_secs: 10,
            max_attempts: 5,
            backoff_ms: 500,
        }
    }
}

impl EraseConfig {
    pub fn grace(&self) -> Duration {
        Duration::from_secs(self.grace_secs)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// Top level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Address book export.
    pub input: PathBuf,
    /// Installed-app client secret used to refresh tokens.
    pub client_secret: PathBuf,
    /// Persisted authorization token.
    pub token: PathBuf,
    pub api_base_url: String,
    pub page_size: u32,
    /// Request timeout. Unset keeps the transport default.
    pub timeout_secs: Option<u64>,
    pub update_mode: UpdateMode,
    pub erase: EraseConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("contacts.csv"),
            client_secret: PathBuf::from("credentials.json"),
            token: PathBuf::from("token.json"),
            api_base_url: DEFAULT_API_BASE_URL.into(),
            page_size: MAX_PAGE_SIZE,
            timeout_secs: None,
            update_mode: UpdateMode::Replace,
            erase: EraseConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Loads the configuration.
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// read when present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(SyncError::MissingInput(path.to_path_buf()));
                }
                Self::from_toml(&fs::read_to_string(path)?)?
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_toml(&fs::read_to_string(default_path)?)?
                } else {
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(SyncError::Config(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.erase.max_attempts == 0 {
            return Err(SyncError::Config("erase.max_attempts must be at least 1".into()));
        }
        if self.erase.group_name.trim().is_empty() {
            return Err(SyncError::Config("erase.group_name must not be empty".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
