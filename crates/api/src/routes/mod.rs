pub mod activity;
pub mod auth;
pub mod file;
pub mod health;
pub mod project;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                          register (public)
/// /auth/login                             login (public)
///
/// /projects                               list, create
/// /projects/{id}                          get, update, delete
/// /projects/{project_id}/files/{file_id}  attach, detach
///
/// /activities                             list, create
/// /activities/{id}                        get, update, delete
///
/// /files                                  list, upload (multipart)
/// /files/{id}                             get, delete
///
/// /users                                  list, create
/// /users/{id}                             get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", project::router())
        .nest("/activities", activity::router())
        .nest("/files", file::router())
        .nest("/users", user::router())
}
