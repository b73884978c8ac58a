//! Identity Toolkit REST adapter.
//!
//! Talks to the admin surface of the Identity Toolkit v1 API
//! (`projects.accounts` lookup / signUp / update) with service-account
//! credentials. Upstream error identifiers arrive as the leading token of
//! the error message ("EMAIL_EXISTS : ...") and are mapped onto
//! [`IdentityError`] kinds in one place.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::token::TokenSource;
use crate::providers::BoxFuture;
use crate::providers::identity::{IdentityAccount, IdentityError, IdentityProvider};

pub struct FirebaseIdentityProvider {
    http: reqwest::Client,
    token: Arc<TokenSource>,
    api_base: String,
    project_id: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl FirebaseIdentityProvider {
    pub fn new(
        http: reqwest::Client,
        token: Arc<TokenSource>,
        api_base: String,
        project_id: String,
    ) -> Self {
        Self {
            http,
            token,
            api_base,
            project_id,
        }
    }

    fn endpoint(&self, op: &str) -> String {
        format!(
            "{}/projects/{}/accounts{}",
            self.api_base.trim_end_matches('/'),
            self.project_id,
            op
        )
    }

    async fn post(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, IdentityError> {
        let bearer = self
            .token
            .bearer()
            .await
            .map_err(|e| IdentityError::Provider {
                code: "credential-fetch".to_string(),
                message: e.to_string(),
            })?;

        let response = self
            .http
            .post(url)
            .bearer_auth(bearer)
            .json(&body)
            .send()
            .await
            .map_err(|e| IdentityError::Provider {
                code: "transport".to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let payload: serde_json::Value =
            response.json().await.map_err(|e| IdentityError::Provider {
                code: "transport".to_string(),
                message: e.to_string(),
            })?;

        if !status.is_success() {
            return Err(classify_api_error(&payload, status.as_u16()));
        }

        Ok(payload)
    }
}

/// Map an upstream error body onto the provider error kinds.
///
/// Only the identifiers the upsert flow cares about get their own variant;
/// everything else stays a raw provider error.
fn classify_api_error(payload: &serde_json::Value, http_status: u16) -> IdentityError {
    let message = serde_json::from_value::<ApiErrorBody>(payload.clone())
        .map(|body| body.error.message)
        .unwrap_or_else(|_| format!("HTTP {}", http_status));

    // "EMAIL_EXISTS : The email address is already in use" style messages;
    // the identifier is the first whitespace-delimited token.
    let code = message
        .split_whitespace()
        .next()
        .unwrap_or("UNKNOWN")
        .to_string();

    match code.as_str() {
        "EMAIL_EXISTS" | "DUPLICATE_EMAIL" => IdentityError::EmailExists,
        "INVALID_PASSWORD" | "WEAK_PASSWORD" => IdentityError::InvalidPassword,
        "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => IdentityError::UserNotFound,
        _ => IdentityError::Provider { code, message },
    }
}

impl IdentityProvider for FirebaseIdentityProvider {
    fn find_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<IdentityAccount, IdentityError>> {
        Box::pin(async move {
            let payload = self
                .post(&self.endpoint(":lookup"), json!({ "email": [email] }))
                .await?;

            let lookup: LookupResponse =
                serde_json::from_value(payload).map_err(|e| IdentityError::Provider {
                    code: "decode".to_string(),
                    message: e.to_string(),
                })?;

            let user = lookup
                .users
                .into_iter()
                .next()
                .ok_or(IdentityError::UserNotFound)?;

            debug!(uid = %user.local_id, "Resolved identity account by email");

            Ok(IdentityAccount {
                uid: user.local_id,
                email: user.email.unwrap_or_else(|| email.to_string()),
            })
        })
    }

    fn create_user<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<IdentityAccount, IdentityError>> {
        Box::pin(async move {
            let payload = self
                .post(
                    &self.endpoint(""),
                    json!({ "email": email, "password": password }),
                )
                .await?;

            let created: SignUpResponse =
                serde_json::from_value(payload).map_err(|e| IdentityError::Provider {
                    code: "decode".to_string(),
                    message: e.to_string(),
                })?;

            debug!(uid = %created.local_id, "Created identity account");

            Ok(IdentityAccount {
                uid: created.local_id,
                email: email.to_string(),
            })
        })
    }

    fn update_password<'a>(
        &'a self,
        uid: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<(), IdentityError>> {
        Box::pin(async move {
            self.post(
                &self.endpoint(":update"),
                json!({ "localId": uid, "password": password }),
            )
            .await?;

            debug!(uid = %uid, "Updated identity account password");

            Ok(())
        })
    }
}
