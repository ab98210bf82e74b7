//! Credential persistence for the contacts service.
//!
//! The token obtained through the one-time consent flow is stored as JSON and
//! reused across runs. Expired tokens are refreshed with the `refresh_token`
//! grant and written back. The consent flow itself is not handled here.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aideon::contacts::error::{Result, SyncError};

/// Token endpoint used when neither the token file nor the client secret names one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are refreshed before use.
const EXPIRY_SKEW_SECS: i64 = 60;

/// Anything able to hand out a bearer token for the next request.
pub trait TokenSource {
    fn access_token(&mut self) -> Result<String>;
}

/// A fixed bearer token, e.g. for tests or tokens minted elsewhere.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenSource for StaticToken {
    fn access_token(&mut self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Serialized authorization token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl StoredToken {
    /// Whether the token is expired or about to expire at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now + Duration::seconds(EXPIRY_SKEW_SECS),
            None => false,
        }
    }

    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// OAuth client registration, as downloaded from the provider console.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    #[serde(default)]
    installed: Option<ClientSecret>,
    #[serde(default)]
    web: Option<ClientSecret>,
}

impl ClientSecret {
    /// Reads an `installed` or `web` client secret file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SyncError::MissingInput(path.to_path_buf()));
        }
        let file: ClientSecretFile = serde_json::from_str(&fs::read_to_string(path)?)?;
        file.installed.or(file.web).ok_or_else(|| {
            SyncError::Auth(format!(
                "{} holds neither an installed nor a web client",
                path.display()
            ))
        })
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Token persisted on disk, refreshed on demand.
#[derive(Debug)]
pub struct TokenStore {
    token_path: PathBuf,
    secret_path: PathBuf,
    http: Client,
    token: Option<StoredToken>,
}

impl TokenStore {
    pub fn new(token_path: impl Into<PathBuf>, secret_path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            token_path: token_path.into(),
            secret_path: secret_path.into(),
            http: Client::builder().build()?,
            token: None,
        })
    }

    fn consent_required(&self, reason: &str) -> SyncError {
        SyncError::Auth(format!(
            "{reason}; complete the consent flow to write {}",
            self.token_path.display()
        ))
    }

    fn refresh(&self, token: &StoredToken) -> Result<StoredToken> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or_else(|| self.consent_required("token expired and cannot be refreshed"))?;
        let secret = ClientSecret::load(&self.secret_path)?;
        let token_uri = token
            .token_uri
            .clone()
            .or_else(|| secret.token_uri.clone())
            .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string());

        debug!(token_uri = %token_uri, "refreshing access token");
        let response = self
            .http
            .post(&token_uri)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", secret.client_id.as_str()),
                ("client_secret", secret.client_secret.as_str()),
                ("refresh_token", refresh_token),
            ])
            .send()?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(self.consent_required(&format!("token refresh failed ({status}): {body}")));
        }

        let refreshed: RefreshResponse = response.json()?;
        Ok(StoredToken {
            access_token: refreshed.access_token,
            refresh_token: refreshed
                .refresh_token
                .or_else(|| token.refresh_token.clone()),
            expires_at: refreshed
                .expires_in
                .map(|secs| Utc::now() + Duration::seconds(secs)),
            token_uri: Some(token_uri),
        })
    }
}

impl TokenSource for TokenStore {
    fn access_token(&mut self) -> Result<String> {
        let token = match self.token.take() {
            Some(token) => token,
            None => StoredToken::load(&self.token_path)?
                .ok_or_else(|| self.consent_required("no stored token"))?,
        };

        let token = if token.is_expired_at(Utc::now()) {
            let refreshed = self.refresh(&token)?;
            refreshed.save(&self.token_path)?;
            info!(path = %self.token_path.display(), "access token refreshed");
            refreshed
        } else {
            token
        };

        let access_token = token.access_token.clone();
        self.token = Some(token);
        Ok(access_token)
    }
}
