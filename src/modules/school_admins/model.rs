//! School admin upsert models and DTOs.
//!
//! The wire payload is loosely typed and accepts historical field aliases
//! (`adminEmail` for `email`, `adminPassword` for `password`); callers are
//! normalized into a single strongly-typed request before any business
//! logic runs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::errors::AppError;

/// Raw payload of the `upsertSchoolAdmin` callable.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpsertSchoolAdminPayload {
    pub school_id: Option<String>,
    pub email: Option<String>,
    pub admin_email: Option<String>,
    pub password: Option<String>,
    pub admin_password: Option<String>,
}

/// Normalized upsert request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertSchoolAdminRequest {
    pub school_id: String,
    pub email: String,
    pub password: Option<String>,
}

impl UpsertSchoolAdminPayload {
    /// Collapse aliases and normalize the payload.
    ///
    /// Precedence: the primary field wins over its alias whenever it is
    /// non-empty (`email`) or present at all (`password`). `schoolId` is
    /// trimmed, the email is trimmed and lowercased, and both are required.
    pub fn normalize(self) -> Result<UpsertSchoolAdminRequest, AppError> {
        let school_id = self.school_id.unwrap_or_default().trim().to_string();
        if school_id.is_empty() {
            return Err(AppError::invalid_argument("schoolId required"));
        }

        let email = self
            .email
            .filter(|e| !e.is_empty())
            .or(self.admin_email)
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        if email.is_empty() {
            return Err(AppError::invalid_argument("email required"));
        }

        let password = self.password.or(self.admin_password);

        Ok(UpsertSchoolAdminRequest {
            school_id,
            email,
            password,
        })
    }
}

/// Response of a successful upsert.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSchoolAdminResponse {
    pub uid: String,
    pub email: String,
    pub school_id: String,
}

/// Error body returned for every failed call.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::ErrorCode;

    fn payload(value: serde_json::Value) -> UpsertSchoolAdminPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_trims_and_lowercases_email() {
        let request = payload(serde_json::json!({
            "schoolId": "  school-1  ",
            "email": "  Admin@School.Test  ",
        }))
        .normalize()
        .unwrap();

        assert_eq!(request.school_id, "school-1");
        assert_eq!(request.email, "admin@school.test");
        assert_eq!(request.password, None);
    }

    #[test]
    fn test_normalize_rejects_missing_school_id() {
        let err = payload(serde_json::json!({ "email": "a@b.c" }))
            .normalize()
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
        assert_eq!(err.error.to_string(), "schoolId required");
    }

    #[test]
    fn test_normalize_rejects_blank_school_id() {
        let err = payload(serde_json::json!({ "schoolId": "   ", "email": "a@b.c" }))
            .normalize()
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_normalize_rejects_missing_email() {
        let err = payload(serde_json::json!({ "schoolId": "school-1" }))
            .normalize()
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
        assert_eq!(err.error.to_string(), "email required");
    }

    #[test]
    fn test_email_wins_over_admin_email() {
        let request = payload(serde_json::json!({
            "schoolId": "school-1",
            "email": "primary@school.test",
            "adminEmail": "alias@school.test",
        }))
        .normalize()
        .unwrap();

        assert_eq!(request.email, "primary@school.test");
    }

    #[test]
    fn test_admin_email_alias_fills_in_for_empty_primary() {
        let request = payload(serde_json::json!({
            "schoolId": "school-1",
            "email": "",
            "adminEmail": "alias@school.test",
        }))
        .normalize()
        .unwrap();

        assert_eq!(request.email, "alias@school.test");
    }

    #[test]
    fn test_admin_password_alias_fills_in_for_absent_primary() {
        let request = payload(serde_json::json!({
            "schoolId": "school-1",
            "email": "a@b.c",
            "adminPassword": "secret1",
        }))
        .normalize()
        .unwrap();

        assert_eq!(request.password.as_deref(), Some("secret1"));
    }

    #[test]
    fn test_present_password_wins_over_alias() {
        let request = payload(serde_json::json!({
            "schoolId": "school-1",
            "email": "a@b.c",
            "password": "",
            "adminPassword": "secret1",
        }))
        .normalize()
        .unwrap();

        // An explicitly-sent empty password still shadows the alias.
        assert_eq!(request.password.as_deref(), Some(""));
    }
}
