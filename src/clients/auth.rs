use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::config::AppConfig;

pub type AuthError = Box<dyn std::error::Error + Send + Sync>;

const TOKEN_URL: &str = "https://zoom.us/oauth/token";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// OAuth2 server-to-server credential exchange. Tokens are cached and
/// refreshed five minutes ahead of expiry.
pub struct ZoomAuth {
    client_id: String,
    client_secret: String,
    account_id: String,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ZoomAuth {
    pub fn new(client_id: String, client_secret: String, account_id: String) -> Self {
        Self {
            client_id,
            client_secret,
            account_id,
            http: reqwest::Client::new(),
            cached: Mutex::new(None),
        }
    }

    /// Reads ZOOM_API_KEY / ZOOM_API_SECRET / ZOOM_ACCOUNT_ID from the
    /// config (with env fallback handled by the caller's config loader).
    pub fn from_config(config: &AppConfig) -> Result<Self, AuthError> {
        let client_id = config
            .get("ZOOM_API_KEY")
            .ok_or("ZOOM_API_KEY must be set")?;
        let client_secret = config
            .get("ZOOM_API_SECRET")
            .ok_or("ZOOM_API_SECRET must be set")?;
        let account_id = config
            .get("ZOOM_ACCOUNT_ID")
            .ok_or("ZOOM_ACCOUNT_ID must be set")?;
        Ok(Self::new(client_id, client_secret, account_id))
    }

    pub async fn access_token(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().await;

        if let Some(existing) = cached.as_ref() {
            if Utc::now() < existing.expires_at - Duration::minutes(5) {
                return Ok(existing.token.clone());
            }
        }

        let url = format!(
            "{}?grant_type=account_credentials&account_id={}",
            TOKEN_URL, self.account_id
        );
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Failed to get OAuth token: {} - {}", status, body).into());
        }

        let data: TokenResponse = response.json().await?;
        let token = data.access_token.clone();
        *cached = Some(CachedToken {
            token: data.access_token,
            expires_at: Utc::now() + Duration::seconds(data.expires_in),
        });

        Ok(token)
    }
}
