/*
 * Responsibility
 * - URL layout of v1
 * - /groups accepts the user id as a path segment, `?userid=` or a JSON body
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::groups::get_groups;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups", get(get_groups).post(get_groups))
        .route("/groups/{userid}", get(get_groups).post(get_groups))
}
