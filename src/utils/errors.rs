use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Caller-facing error classification for the callable API.
///
/// Every failure surfaced by the API carries exactly one of these codes,
/// serialized in the response body alongside a short message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Unauthenticated,
    PermissionDenied,
    InvalidArgument,
    FailedPrecondition,
    AlreadyExists,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::PermissionDenied => "permission-denied",
            Self::InvalidArgument => "invalid-argument",
            Self::FailedPrecondition => "failed-precondition",
            Self::AlreadyExists => "already-exists",
            Self::Internal => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::InvalidArgument => StatusCode::BAD_REQUEST,
            Self::FailedPrecondition => StatusCode::PRECONDITION_FAILED,
            Self::AlreadyExists => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub code: ErrorCode,
    pub error: Error,
    /// Raw upstream provider code, attached to `internal` failures only.
    pub provider_code: Option<String>,
}

impl AppError {
    pub fn new<E>(code: ErrorCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            code,
            error: err.into(),
            provider_code: None,
        }
    }

    pub fn unauthenticated(message: &str) -> Self {
        Self::new(ErrorCode::Unauthenticated, anyhow::anyhow!("{}", message))
    }

    pub fn permission_denied(message: &str) -> Self {
        Self::new(ErrorCode::PermissionDenied, anyhow::anyhow!("{}", message))
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::new(ErrorCode::InvalidArgument, anyhow::anyhow!("{}", message))
    }

    pub fn failed_precondition(message: &str) -> Self {
        Self::new(ErrorCode::FailedPrecondition, anyhow::anyhow!("{}", message))
    }

    pub fn already_exists(message: &str) -> Self {
        Self::new(ErrorCode::AlreadyExists, anyhow::anyhow!("{}", message))
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorCode::Internal, err)
    }

    /// Internal failure that keeps the upstream provider code for diagnostics.
    pub fn internal_with_code<E>(err: E, provider_code: impl Into<String>) -> Self
    where
        E: Into<Error>,
    {
        Self {
            code: ErrorCode::Internal,
            error: err.into(),
            provider_code: Some(provider_code.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self.provider_code {
            Some(provider_code) => Json(json!({
                "code": self.code.as_str(),
                "error": self.error.to_string(),
                "providerCode": provider_code,
            })),
            None => Json(json!({
                "code": self.code.as_str(),
                "error": self.error.to_string(),
            })),
        };

        (self.code.status(), body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_map_to_expected_statuses() {
        assert_eq!(
            ErrorCode::Unauthenticated.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::PermissionDenied.status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::InvalidArgument.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::FailedPrecondition.status(),
            StatusCode::PRECONDITION_FAILED
        );
        assert_eq!(ErrorCode::AlreadyExists.status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::Internal.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes_serialize_as_kebab_case() {
        assert_eq!(ErrorCode::Unauthenticated.as_str(), "unauthenticated");
        assert_eq!(ErrorCode::PermissionDenied.as_str(), "permission-denied");
        assert_eq!(ErrorCode::InvalidArgument.as_str(), "invalid-argument");
        assert_eq!(
            ErrorCode::FailedPrecondition.as_str(),
            "failed-precondition"
        );
        assert_eq!(ErrorCode::AlreadyExists.as_str(), "already-exists");
        assert_eq!(ErrorCode::Internal.as_str(), "internal");
    }

    #[test]
    fn test_from_anyhow_defaults_to_internal() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(err.code, ErrorCode::Internal);
        assert!(err.provider_code.is_none());
    }

    #[test]
    fn test_internal_with_code_keeps_provider_code() {
        let err = AppError::internal_with_code(anyhow::anyhow!("upstream"), "auth/unknown");
        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.provider_code.as_deref(), Some("auth/unknown"));
    }
}
