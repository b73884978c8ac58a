use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::upsert_school_admin;

pub fn init_school_admins_router() -> Router<AppState> {
    Router::new().route("/upsertSchoolAdmin", post(upsert_school_admin))
}
