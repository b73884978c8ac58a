use axum::{Json, extract::State};

use crate::middleware::auth::CallerContext;
use crate::middleware::guard::assert_superadmin;
use crate::state::AppState;
use crate::utils::errors::AppError;

use super::model::{ErrorResponse, UpsertSchoolAdminPayload, UpsertSchoolAdminResponse};
use super::service::SchoolAdminService;

#[utoipa::path(
    post,
    path = "/api/rpc/upsertSchoolAdmin",
    request_body = UpsertSchoolAdminPayload,
    responses(
        (status = 200, description = "School admin account ensured and recorded", body = UpsertSchoolAdminResponse),
        (status = 400, description = "Missing schoolId/email, or provider rejected the password", body = ErrorResponse),
        (status = 401, description = "No caller identity", body = ErrorResponse),
        (status = 403, description = "Caller is not a superadmin", body = ErrorResponse),
        (status = 409, description = "Email collided with an existing account during creation", body = ErrorResponse),
        (status = 412, description = "Password required to create the account", body = ErrorResponse),
        (status = 500, description = "Unclassified provider failure", body = ErrorResponse)
    ),
    tag = "School Admins",
    security(("bearer_auth" = []))
)]
pub async fn upsert_school_admin(
    State(state): State<AppState>,
    caller: CallerContext,
    Json(payload): Json<UpsertSchoolAdminPayload>,
) -> Result<Json<UpsertSchoolAdminResponse>, AppError> {
    // Authorization runs before validation so no payload detail leaks to
    // unauthorized callers.
    assert_superadmin(state.documents.as_ref(), &caller).await?;

    let request = payload.normalize()?;
    let response = SchoolAdminService::upsert_school_admin(
        state.identity.as_ref(),
        state.documents.as_ref(),
        request,
    )
    .await?;

    Ok(Json(response))
}
