use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::school_admins::router::init_school_admins_router;
use crate::state::AppState;
use axum::{Router, middleware};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api", Router::new().nest("/rpc", init_school_admins_router()))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
}
