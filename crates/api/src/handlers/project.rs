//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::Json;
use workplan_core::error::CoreError;
use workplan_core::types::DbId;
use workplan_db::models::project::{CreateProject, Project, ProjectDetail, UpdateProject};
use workplan_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::Envelope;
use crate::state::AppState;

/// POST /api/v1/projects
///
/// Creates the project row and its nested activity forest in one transaction.
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<CreateProject>,
) -> AppResult<Envelope<ProjectDetail>> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Project name is required".into(),
        )));
    }
    let detail = ProjectRepo::create(&state.pool, &input).await?;
    Ok(Envelope::created(detail))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Envelope<Vec<Project>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Envelope::ok(projects))
}

/// GET /api/v1/projects/{id}
///
/// Returns the project with its pruned visible activity tree and attached
/// files; soft-deleted sub-activities never appear in the output.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Envelope<ProjectDetail>> {
    let detail = ProjectRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Envelope::ok(detail))
}

/// PUT /api/v1/projects/{id}
///
/// Patches the project fields and reconciles the submitted activity tree
/// against the persisted one.
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Envelope<ProjectDetail>> {
    ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    // Reload so the response carries the reconciled tree with fresh ids.
    let detail = ProjectRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Envelope::ok(detail))
}

/// DELETE /api/v1/projects/{id}
///
/// Cascading soft-delete: the project, its activities, and its file
/// attachments are all marked deleted.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Envelope<()>> {
    let deleted = ProjectRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(user_id = user.user_id, project_id = id, "Project deleted");
        Ok(Envelope::success())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}
