//! Superadmin authorization guard.
//!
//! Administrative mutations are restricted to superadmins. The check runs
//! in two stages: token claims first (no external lookup), then a
//! fallback to the caller's admin profile document for roles assigned
//! outside the token-issuance flow.

use tracing::{debug, warn};

use crate::middleware::auth::CallerContext;
use crate::providers::docstore::{Document, DocumentStore};
use crate::utils::errors::AppError;

const SUPERADMIN_ROLE: &str = "superadmin";

/// Verify that the caller may perform administrative mutations.
///
/// Fails with `unauthenticated` when no caller identity is present and
/// `permission-denied` when the caller is not an authorized superadmin.
/// No external call is made when the token claims already grant access.
pub async fn assert_superadmin(
    documents: &dyn DocumentStore,
    caller: &CallerContext,
) -> Result<(), AppError> {
    let Some(claims) = caller.claims.as_ref().filter(|c| !c.sub.is_empty()) else {
        return Err(AppError::unauthenticated("Sign-in required"));
    };

    let claim_role = normalized_role(claims.role.as_deref());
    if claims.superadmin == Some(true) || claim_role == SUPERADMIN_ROLE {
        debug!(uid = %claims.sub, "Superadmin granted via token claims");
        return Ok(());
    }

    let profile = resolve_admin_profile(documents, &claims.sub).await?;

    if profile.get("enabled").and_then(|v| v.as_bool()) == Some(false) {
        warn!(uid = %claims.sub, "Disabled account attempted an admin mutation");
        return Err(AppError::permission_denied("Account disabled"));
    }

    let role = normalized_role(profile.get("role").and_then(|v| v.as_str()));
    if role != SUPERADMIN_ROLE {
        warn!(uid = %claims.sub, role = %role, "Caller lacks the superadmin role");
        return Err(AppError::permission_denied("Requires superadmin"));
    }

    debug!(uid = %claims.sub, "Superadmin granted via profile record");
    Ok(())
}

fn normalized_role(role: Option<&str>) -> String {
    role.map(|r| r.trim().to_lowercase()).unwrap_or_default()
}

/// Resolve the caller's admin profile document.
///
/// Checks the lowercase collection first, then the capitalized variant.
/// The dual lookup is a compatibility shim for a historical schema rename;
/// delete the second path once the data migration completes. Missing
/// documents resolve to an empty attribute set.
async fn resolve_admin_profile(
    documents: &dyn DocumentStore,
    uid: &str,
) -> Result<Document, AppError> {
    for collection in ["users", "Users"] {
        let path = format!("{}/{}", collection, uid);
        let found = documents.get(&path).await.map_err(|e| {
            AppError::internal_with_code(
                anyhow::anyhow!("Profile lookup failed: {}", e),
                e.provider_code(),
            )
        })?;

        if let Some(profile) = found {
            return Ok(profile);
        }
    }

    Ok(Document::new())
}
