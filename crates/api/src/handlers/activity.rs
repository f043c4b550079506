//! Handlers for the `/activities` resource.

use axum::extract::{Path, State};
use axum::Json;
use workplan_core::activity_tree::ActivityNode;
use workplan_core::error::CoreError;
use workplan_core::types::DbId;
use workplan_db::models::activity::{
    Activity, ActivityDetail, CreateActivities, UpdateActivity,
};
use workplan_db::repositories::{ActivityRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::Envelope;
use crate::state::AppState;

/// POST /api/v1/activities
///
/// Creates a descriptor forest under an existing project. Nesting depth is
/// only bounded by the request body itself.
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<CreateActivities>,
) -> AppResult<Envelope<Vec<ActivityNode>>> {
    if input.activities.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "At least one activity is required".into(),
        )));
    }

    ProjectRepo::find_by_id(&state.pool, input.project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: input.project_id,
        }))?;

    let created =
        ActivityRepo::create_forest(&state.pool, input.project_id, &input.activities).await?;
    Ok(Envelope::created(created))
}

/// GET /api/v1/activities
pub async fn list(State(state): State<AppState>) -> AppResult<Envelope<Vec<Activity>>> {
    let activities = ActivityRepo::list(&state.pool).await?;
    Ok(Envelope::ok(activities))
}

/// GET /api/v1/activities/{id}
///
/// Returns the activity with its visible subtree.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Envelope<ActivityDetail>> {
    let (activity, children) = ActivityRepo::find_subtree(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Activity",
            id,
        }))?;
    Ok(Envelope::ok(ActivityDetail { activity, children }))
}

/// PUT /api/v1/activities/{id}
///
/// Renames the activity and reconciles its submitted child forest against
/// the persisted subtree.
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateActivity>,
) -> AppResult<Envelope<ActivityDetail>> {
    ActivityRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Activity",
            id,
        }))?;

    let (activity, children) = ActivityRepo::find_subtree(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Activity",
            id,
        }))?;
    Ok(Envelope::ok(ActivityDetail { activity, children }))
}

/// DELETE /api/v1/activities/{id}
///
/// Cascading soft-delete: the activity and its whole subtree are marked
/// deleted, nothing outside the subtree is touched.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Envelope<()>> {
    let deleted = ActivityRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(user_id = user.user_id, activity_id = id, "Activity subtree deleted");
        Ok(Envelope::success())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Activity",
            id,
        }))
    }
}
