use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::school_admins::model::{
    ErrorResponse, UpsertSchoolAdminPayload, UpsertSchoolAdminResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(crate::modules::school_admins::controller::upsert_school_admin),
    components(
        schemas(UpsertSchoolAdminPayload, UpsertSchoolAdminResponse, ErrorResponse)
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "School Admins", description = "School administrator provisioning")
    ),
    info(
        title = "Slateboard Admin API",
        version = "0.1.0",
        description = "Callable operations for provisioning school administrator accounts.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
