use tracing::{debug, error, info, instrument};

use crate::providers::docstore::{DocumentStore, FieldValue, WriteFields};
use crate::providers::identity::{IdentityAccount, IdentityError, IdentityProvider};
use crate::utils::errors::AppError;

use super::model::{UpsertSchoolAdminRequest, UpsertSchoolAdminResponse};

const MIN_PASSWORD_CHARS: usize = 6;

pub struct SchoolAdminService;

impl SchoolAdminService {
    /// Ensure an identity account exists for the admin email, then record
    /// the account on the school document.
    ///
    /// The two mutations are not transactional: a failed document write
    /// leaves the account creation or password reset in place, and the
    /// caller is expected to retry the whole call.
    #[instrument(
        skip(identity, documents, request),
        fields(school.id = %request.school_id)
    )]
    pub async fn upsert_school_admin(
        identity: &dyn IdentityProvider,
        documents: &dyn DocumentStore,
        request: UpsertSchoolAdminRequest,
    ) -> Result<UpsertSchoolAdminResponse, AppError> {
        let account = match identity.find_by_email(&request.email).await {
            Ok(account) => Self::reset_password_if_supplied(identity, account, &request).await?,
            Err(IdentityError::UserNotFound) => {
                debug!("No identity account for email, creating one");
                Self::create_account(identity, &request).await?
            }
            Err(e) => return Err(classify_identity_error(e)),
        };

        let school_path = format!("schools/{}", request.school_id);
        let mut fields = WriteFields::new();
        fields.insert(
            "adminEmail".to_string(),
            FieldValue::String(request.email.clone()),
        );
        fields.insert(
            "adminUid".to_string(),
            FieldValue::String(account.uid.clone()),
        );
        fields.insert("adminPasswordSet".to_string(), FieldValue::Boolean(true));
        fields.insert("adminUpdatedAt".to_string(), FieldValue::ServerTimestamp);

        documents.merge_set(&school_path, fields).await.map_err(|e| {
            error!(
                school.id = %request.school_id,
                uid = %account.uid,
                provider_code = %e.provider_code(),
                error = %e,
                "Failed to record school admin on school document"
            );
            AppError::internal_with_code(
                anyhow::anyhow!("Failed to record school admin: {}", e),
                e.provider_code(),
            )
        })?;

        info!(
            school.id = %request.school_id,
            uid = %account.uid,
            "School admin upserted"
        );

        Ok(UpsertSchoolAdminResponse {
            uid: account.uid,
            email: request.email,
            school_id: request.school_id,
        })
    }

    async fn create_account(
        identity: &dyn IdentityProvider,
        request: &UpsertSchoolAdminRequest,
    ) -> Result<IdentityAccount, AppError> {
        // Length is checked on the trimmed value, but the password is sent
        // to the provider exactly as supplied.
        let password = request
            .password
            .as_deref()
            .filter(|p| p.trim().chars().count() >= MIN_PASSWORD_CHARS)
            .ok_or_else(|| {
                AppError::failed_precondition("Password required, minimum 6 characters")
            })?;

        let account = identity
            .create_user(&request.email, password)
            .await
            .map_err(classify_identity_error)?;

        info!(uid = %account.uid, "Created school admin identity account");
        Ok(account)
    }

    async fn reset_password_if_supplied(
        identity: &dyn IdentityProvider,
        account: IdentityAccount,
        request: &UpsertSchoolAdminRequest,
    ) -> Result<IdentityAccount, AppError> {
        let Some(password) = request
            .password
            .as_deref()
            .filter(|p| !p.trim().is_empty())
        else {
            debug!(uid = %account.uid, "No password supplied, leaving account untouched");
            return Ok(account);
        };

        identity
            .update_password(&account.uid, password)
            .await
            .map_err(classify_identity_error)?;

        info!(uid = %account.uid, "Reset school admin password");
        Ok(account)
    }
}

/// Map provider error kinds onto caller-facing classifications.
///
/// Exactly two provider codes are special-cased; everything else collapses
/// to `internal`, logged with full detail before the sanitized message
/// leaves the process.
fn classify_identity_error(err: IdentityError) -> AppError {
    match err {
        IdentityError::EmailExists => AppError::already_exists("Email already exists"),
        IdentityError::InvalidPassword => AppError::invalid_argument("Invalid password"),
        err => {
            let provider_code = err.provider_code().to_string();
            error!(
                provider_code = %provider_code,
                error = %err,
                "Identity provider failure"
            );
            AppError::internal_with_code(anyhow::anyhow!("{}", err), provider_code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::memory::{MemoryDocumentStore, MemoryIdentityProvider};
    use crate::utils::errors::ErrorCode;

    fn request(school_id: &str, email: &str, password: Option<&str>) -> UpsertSchoolAdminRequest {
        UpsertSchoolAdminRequest {
            school_id: school_id.to_string(),
            email: email.to_string(),
            password: password.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_short_password() {
        let identity = MemoryIdentityProvider::new();
        let documents = MemoryDocumentStore::new();

        let err = SchoolAdminService::upsert_school_admin(
            &identity,
            &documents,
            request("school-1", "admin@school.test", Some("abc12")),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::FailedPrecondition);
        assert_eq!(identity.account_count(), 0);
        assert_eq!(documents.write_count(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_password() {
        let identity = MemoryIdentityProvider::new();
        let documents = MemoryDocumentStore::new();

        let err = SchoolAdminService::upsert_school_admin(
            &identity,
            &documents,
            request("school-1", "admin@school.test", None),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::FailedPrecondition);
    }

    #[tokio::test]
    async fn test_create_path_writes_school_record() {
        let identity = MemoryIdentityProvider::new();
        let documents = MemoryDocumentStore::new();

        let response = SchoolAdminService::upsert_school_admin(
            &identity,
            &documents,
            request("school-1", "admin@school.test", Some("abc123")),
        )
        .await
        .unwrap();

        let account = identity.account_for("admin@school.test").unwrap();
        assert_eq!(response.uid, account.uid);
        assert_eq!(response.school_id, "school-1");

        let school = documents.document("schools/school-1").unwrap();
        assert_eq!(school["adminEmail"], "admin@school.test");
        assert_eq!(school["adminUid"], account.uid.as_str());
        assert_eq!(school["adminPasswordSet"], true);
        assert!(school.contains_key("adminUpdatedAt"));
    }

    #[tokio::test]
    async fn test_password_length_checked_on_trimmed_value() {
        let identity = MemoryIdentityProvider::new();
        let documents = MemoryDocumentStore::new();

        // 7 chars with padding, 5 after trimming.
        let err = SchoolAdminService::upsert_school_admin(
            &identity,
            &documents,
            request("school-1", "admin@school.test", Some(" abc12 ")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::FailedPrecondition);
    }

    #[tokio::test]
    async fn test_update_path_resets_password_when_supplied() {
        let identity = MemoryIdentityProvider::new();
        let uid = identity.insert_account("admin@school.test");
        let documents = MemoryDocumentStore::new();

        let response = SchoolAdminService::upsert_school_admin(
            &identity,
            &documents,
            request("school-1", "admin@school.test", Some("newpass1")),
        )
        .await
        .unwrap();

        assert_eq!(response.uid, uid);
        assert_eq!(
            identity.password_updates(),
            vec![(uid, "newpass1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_update_path_leaves_account_untouched_without_password() {
        let identity = MemoryIdentityProvider::new();
        identity.insert_account("admin@school.test");
        let documents = MemoryDocumentStore::new();

        SchoolAdminService::upsert_school_admin(
            &identity,
            &documents,
            request("school-1", "admin@school.test", None),
        )
        .await
        .unwrap();

        assert!(identity.password_updates().is_empty());
        assert_eq!(documents.write_count(), 1);
    }

    #[tokio::test]
    async fn test_blank_password_is_treated_as_absent_on_update() {
        let identity = MemoryIdentityProvider::new();
        identity.insert_account("admin@school.test");
        let documents = MemoryDocumentStore::new();

        SchoolAdminService::upsert_school_admin(
            &identity,
            &documents,
            request("school-1", "admin@school.test", Some("   ")),
        )
        .await
        .unwrap();

        assert!(identity.password_updates().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_for_existing_account() {
        let identity = MemoryIdentityProvider::new();
        let uid = identity.insert_account("admin@school.test");
        let documents = MemoryDocumentStore::new();

        for _ in 0..2 {
            let response = SchoolAdminService::upsert_school_admin(
                &identity,
                &documents,
                request("school-1", "admin@school.test", None),
            )
            .await
            .unwrap();
            assert_eq!(response.uid, uid);
        }

        assert_eq!(identity.account_count(), 1);
        assert!(identity.password_updates().is_empty());

        let school = documents.document("schools/school-1").unwrap();
        assert_eq!(school["adminUid"], uid.as_str());
        assert_eq!(school["adminEmail"], "admin@school.test");
    }

    #[tokio::test]
    async fn test_creation_race_loser_sees_already_exists() {
        let identity = MemoryIdentityProvider::new();
        let documents = MemoryDocumentStore::new();

        // First caller wins the race.
        SchoolAdminService::upsert_school_admin(
            &identity,
            &documents,
            request("school-1", "admin@school.test", Some("abc123")),
        )
        .await
        .unwrap();

        // The second caller's lookup ran before the winner's create landed.
        identity.set_stale_lookups(true);
        let err = SchoolAdminService::upsert_school_admin(
            &identity,
            &documents,
            request("school-1", "admin@school.test", Some("abc123")),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::AlreadyExists);
        assert_eq!(identity.account_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_school_write_surfaces_internal_and_keeps_account() {
        let identity = MemoryIdentityProvider::new();
        let documents = MemoryDocumentStore::new();
        documents.set_fail_writes(true);

        let err = SchoolAdminService::upsert_school_admin(
            &identity,
            &documents,
            request("school-1", "admin@school.test", Some("abc123")),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.provider_code.as_deref(), Some("unavailable"));
        // The account mutation is not rolled back.
        assert!(identity.account_for("admin@school.test").is_some());
        assert!(documents.document("schools/school-1").is_none());
    }

    #[test]
    fn test_unclassified_provider_error_keeps_provider_code() {
        let err = classify_identity_error(IdentityError::Provider {
            code: "QUOTA_EXCEEDED".to_string(),
            message: "slow down".to_string(),
        });
        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.provider_code.as_deref(), Some("QUOTA_EXCEEDED"));
    }

    #[test]
    fn test_classification_table() {
        assert_eq!(
            classify_identity_error(IdentityError::EmailExists).code,
            ErrorCode::AlreadyExists
        );
        assert_eq!(
            classify_identity_error(IdentityError::InvalidPassword).code,
            ErrorCode::InvalidArgument
        );
        assert_eq!(
            classify_identity_error(IdentityError::UserNotFound).code,
            ErrorCode::Internal
        );
    }
}
