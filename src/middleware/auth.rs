use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::utils::jwt::verify_token;

/// Claims carried by a caller's bearer token.
///
/// `role` and `superadmin` are set by the token issuer for privileged
/// accounts; ordinary tokens carry neither.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superadmin: Option<bool>,
    pub exp: usize,
    pub iat: usize,
}

/// Extractor providing the caller's identity, when one is present.
///
/// Unlike a hard-failing auth extractor, this never rejects the request:
/// a missing or invalid token produces an anonymous context, and the
/// authorization guard decides how to classify that. This keeps the
/// guard the single owner of the `unauthenticated` error.
#[derive(Debug, Clone, Default)]
pub struct CallerContext {
    pub claims: Option<Claims>,
}

impl FromRequestParts<AppState> for CallerContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .and_then(|token| verify_token(token, &state.jwt_config).ok());

        Ok(CallerContext { claims })
    }
}
