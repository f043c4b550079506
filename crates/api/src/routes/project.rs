//! Route definitions for the `/projects` resource.
//!
//! Also mounts file attachment routes under
//! `/projects/{project_id}/files/{file_id}`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{file, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                -> list
/// POST   /                                -> create
/// GET    /{id}                            -> get_by_id
/// PUT    /{id}                            -> update
/// DELETE /{id}                            -> delete
///
/// POST   /{project_id}/files/{file_id}    -> attach
/// DELETE /{project_id}/files/{file_id}    -> detach
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route(
            "/{project_id}/files/{file_id}",
            post(file::attach).delete(file::detach),
        )
}
