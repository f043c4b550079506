//! Route definitions for the `/files` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::file;
use crate::state::AppState;

/// Routes mounted at `/files`.
///
/// ```text
/// GET    /     -> list
/// POST   /     -> upload (multipart)
/// GET    /{id} -> get_by_id
/// DELETE /{id} -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(file::list).post(file::upload))
        .route("/{id}", get(file::get_by_id).delete(file::delete))
}
