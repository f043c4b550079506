//! Handlers for the `/files` resource and project file attachments.

use axum::extract::{Multipart, Path, State};
use uuid::Uuid;
use workplan_core::error::CoreError;
use workplan_core::types::DbId;
use workplan_db::models::file::{CreateFile, File};
use workplan_db::models::project_file::ProjectFile;
use workplan_db::repositories::{FileRepo, ProjectFileRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::Envelope;
use crate::state::AppState;

/// POST /api/v1/files
///
/// Accepts a multipart form with a required `file` field. The bytes are
/// written under the configured upload directory with a unique prefix, and
/// a metadata row records the original name and the stored path.
pub async fn upload(
    State(state): State<AppState>,
    _user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Envelope<File>> {
    let mut file_data: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            let filename = field.file_name().unwrap_or("upload.bin").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file_data = Some((filename, data.to_vec()));
        }
        // ignore unknown fields
    }

    let (filename, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    tokio::fs::create_dir_all(&state.config.upload_dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    // Prefix with a UUID so repeated uploads of the same name never collide.
    let stored_filename = format!("{}_{filename}", Uuid::new_v4());
    let file_path = state.config.upload_dir.join(&stored_filename);
    tokio::fs::write(&file_path, &data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let file = FileRepo::create(
        &state.pool,
        &CreateFile {
            file_name: filename,
            file_path: file_path.to_string_lossy().to_string(),
        },
    )
    .await?;

    tracing::info!(file_id = file.id, size = data.len(), "File uploaded");
    Ok(Envelope::created(file))
}

/// GET /api/v1/files
pub async fn list(State(state): State<AppState>) -> AppResult<Envelope<Vec<File>>> {
    let files = FileRepo::list(&state.pool).await?;
    Ok(Envelope::ok(files))
}

/// GET /api/v1/files/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Envelope<File>> {
    let file = FileRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "File", id }))?;
    Ok(Envelope::ok(file))
}

/// DELETE /api/v1/files/{id}
///
/// Soft-deletes the metadata row. The bytes stay on disk.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Envelope<()>> {
    let deleted = FileRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(user_id = user.user_id, file_id = id, "File deleted");
        Ok(Envelope::success())
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "File", id }))
    }
}

/// POST /api/v1/projects/{project_id}/files/{file_id}
///
/// Attaches a file to a project. Both sides must be visible; attaching an
/// already-attached pair returns the existing link instead of a duplicate.
pub async fn attach(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((project_id, file_id)): Path<(DbId, DbId)>,
) -> AppResult<Envelope<ProjectFile>> {
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    FileRepo::find_by_id(&state.pool, file_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "File",
            id: file_id,
        }))?;

    let link = ProjectFileRepo::attach(&state.pool, project_id, file_id).await?;
    Ok(Envelope::created(link))
}

/// DELETE /api/v1/projects/{project_id}/files/{file_id}
///
/// Detaches a file from a project by soft-deleting the link row. The file
/// itself stays visible.
pub async fn detach(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((project_id, file_id)): Path<(DbId, DbId)>,
) -> AppResult<Envelope<()>> {
    let detached = ProjectFileRepo::detach(&state.pool, project_id, file_id).await?;
    if detached {
        Ok(Envelope::success())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "ProjectFile",
            id: file_id,
        }))
    }
}
