//! Service-account token source.
//!
//! Mints short-lived OAuth2 access tokens from a Google service account
//! key: sign an RS256 assertion, exchange it at the key's token endpoint,
//! and cache the result until shortly before expiry.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

const OAUTH_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh the cached token this long before it actually expires.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Clone, Debug, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: String,
    pub project_id: Option<String>,
}

impl ServiceAccountKey {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    bearer: String,
    expires_at: DateTime<Utc>,
}

pub struct TokenSource {
    key: ServiceAccountKey,
    http: reqwest::Client,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Self {
        Self {
            key,
            http,
            cached: RwLock::new(None),
        }
    }

    /// A currently-valid bearer token, refreshed on demand.
    pub async fn bearer(&self) -> anyhow::Result<String> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref()
                && Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) < token.expires_at
            {
                return Ok(token.bearer.clone());
            }
        }

        let mut cached = self.cached.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(token) = cached.as_ref()
            && Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) < token.expires_at
        {
            return Ok(token.bearer.clone());
        }

        let token = self.fetch_token().await?;
        let bearer = token.bearer.clone();
        *cached = Some(token);
        Ok(bearer)
    }

    async fn fetch_token(&self) -> anyhow::Result<CachedToken> {
        let now = Utc::now();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: OAUTH_SCOPE,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        let assertion = encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?,
        )?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Token exchange failed with {}: {}", status, body);
        }

        let token: TokenResponse = response.json().await?;
        Ok(CachedToken {
            bearer: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        })
    }
}
