//! Repository for the `project_files` attachment table.

use sqlx::PgPool;
use workplan_core::types::DbId;

use crate::models::project_file::ProjectFile;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, file_id, is_deleted, created_at, updated_at";

/// Provides attach/detach operations for the project/file join entity.
pub struct ProjectFileRepo;

impl ProjectFileRepo {
    /// Attach a file to a project. If a visible attachment already exists the
    /// existing row is returned instead of creating a duplicate.
    pub async fn attach(
        pool: &PgPool,
        project_id: DbId,
        file_id: DbId,
    ) -> Result<ProjectFile, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_files
             WHERE project_id = $1 AND file_id = $2 AND NOT is_deleted"
        );
        if let Some(existing) = sqlx::query_as::<_, ProjectFile>(&query)
            .bind(project_id)
            .bind(file_id)
            .fetch_optional(pool)
            .await?
        {
            return Ok(existing);
        }

        let insert = format!(
            "INSERT INTO project_files (project_id, file_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectFile>(&insert)
            .bind(project_id)
            .bind(file_id)
            .fetch_one(pool)
            .await
    }

    /// Detach a file from a project by soft-deleting the attachment row.
    /// Neither the file nor the project row is touched. Returns `true` if a
    /// visible attachment was marked.
    pub async fn detach(
        pool: &PgPool,
        project_id: DbId,
        file_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE project_files SET is_deleted = TRUE, updated_at = NOW()
             WHERE project_id = $1 AND file_id = $2 AND NOT is_deleted",
        )
        .bind(project_id)
        .bind(file_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
