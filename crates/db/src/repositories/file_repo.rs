//! Repository for the `files` table.

use sqlx::PgPool;
use workplan_core::types::DbId;

use crate::models::file::{CreateFile, File};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, file_name, file_path, is_deleted, created_at, updated_at";

/// Provides CRUD operations for file metadata rows.
pub struct FileRepo;

impl FileRepo {
    /// Record an uploaded file, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateFile) -> Result<File, sqlx::Error> {
        let query = format!(
            "INSERT INTO files (file_name, file_path)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, File>(&query)
            .bind(&input.file_name)
            .bind(&input.file_path)
            .fetch_one(pool)
            .await
    }

    /// Find a visible file by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<File>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM files WHERE id = $1 AND NOT is_deleted");
        sqlx::query_as::<_, File>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all visible files ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<File>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM files WHERE NOT is_deleted ORDER BY id");
        sqlx::query_as::<_, File>(&query).fetch_all(pool).await
    }

    /// List the visible files attached to a project through visible
    /// attachment rows.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<File>, sqlx::Error> {
        sqlx::query_as::<_, File>(
            "SELECT f.id, f.file_name, f.file_path, f.is_deleted, f.created_at, f.updated_at
             FROM files f
             JOIN project_files pf ON pf.file_id = f.id
             WHERE pf.project_id = $1 AND NOT pf.is_deleted AND NOT f.is_deleted
             ORDER BY f.id",
        )
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Soft-delete a file by id. Returns `true` if a visible row was marked.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE files SET is_deleted = TRUE, updated_at = NOW()
             WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
