//! Handlers for the `/users` resource.
//!
//! Requests carry plaintext passwords; they are argon2-hashed here so the
//! db layer only ever sees hashes. Responses use [`UserResponse`] and never
//! include the hash.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use workplan_core::error::CoreError;
use workplan_core::types::DbId;
use workplan_db::models::user::{CreateUser, UpdateUser, UserResponse};
use workplan_db::repositories::UserRepo;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::Envelope;
use crate::state::AppState;

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    /// Defaults to `"user"` if omitted.
    pub role: Option<String>,
}

/// Request body for `PUT /users/{id}`. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<Envelope<UserResponse>> {
    if input.username.trim().is_empty() || input.password.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Username and password are required".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let created = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            password_hash,
            role: input.role.unwrap_or_else(|| "user".to_string()),
        },
    )
    .await?;
    Ok(Envelope::created(UserResponse::from(created)))
}

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Envelope<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Envelope::ok(users.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Envelope<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Envelope::ok(UserResponse::from(user)))
}

/// PUT /api/v1/users/{id}
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Envelope<UserResponse>> {
    let password_hash = match &input.password {
        Some(password) => Some(
            hash_password(password)
                .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?,
        ),
        None => None,
    };

    let updated = UserRepo::update(
        &state.pool,
        id,
        &UpdateUser {
            username: input.username,
            password_hash,
            role: input.role,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Envelope::ok(UserResponse::from(updated)))
}

/// DELETE /api/v1/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Envelope<()>> {
    let deleted = UserRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        Ok(Envelope::success())
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }
}
