//! Repository for the `projects` table.

use sqlx::PgPool;
use workplan_core::activity_tree;
use workplan_core::types::DbId;

use crate::models::project::{CreateProject, Project, ProjectDetail, UpdateProject};
use crate::repositories::{ActivityRepo, FileRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, start_date, end_date, is_deleted, created_at, updated_at";

/// Provides CRUD operations for projects, including the nested activity
/// forest handled in the same transaction as the project row.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project together with its activity forest, returning the
    /// created row and the created roots with database-assigned ids.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProject,
    ) -> Result<ProjectDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (name, start_date, end_date)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(&mut *tx)
            .await?;

        let roots = activity_tree::build_tree(&input.activities);
        let activities =
            ActivityRepo::insert_forest(&mut tx, project.id, None, &roots).await?;
        tx.commit().await?;

        Ok(ProjectDetail {
            project,
            activities,
            files: Vec::new(),
        })
    }

    /// List all visible projects ordered by id (no trees attached).
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE NOT is_deleted ORDER BY id");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Find a visible project by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND NOT is_deleted");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a project with its pruned visible activity tree and attached
    /// visible files. Returns `None` if the project is missing or deleted.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectDetail>, sqlx::Error> {
        let Some(project) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let records = ActivityRepo::records_for_project(pool, id).await?;
        let activities = activity_tree::prune_deleted(activity_tree::assemble(records));
        let files = FileRepo::list_by_project(pool, id).await?;
        Ok(Some(ProjectDetail {
            project,
            activities,
            files,
        }))
    }

    /// Patch the project row and reconcile the submitted activity tree
    /// against the persisted one, all in one transaction.
    ///
    /// Returns `None` if no visible row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                start_date = COALESCE($3, start_date),
                end_date = COALESCE($4, end_date),
                updated_at = NOW()
             WHERE id = $1 AND NOT is_deleted
             RETURNING {COLUMNS}"
        );
        let Some(project) = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let records = ActivityRepo::records_for_project(&mut *tx, id).await?;
        let mut forest = activity_tree::assemble(records);
        activity_tree::reconcile(&mut forest, &input.activities);
        ActivityRepo::apply_forest(&mut tx, id, None, &forest).await?;

        tx.commit().await?;
        Ok(Some(project))
    }

    /// Cascade soft-delete: marks the project, its activities, and its file
    /// attachments. Returns `true` if a visible project row was marked.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE projects SET is_deleted = TRUE, updated_at = NOW()
             WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE activities SET is_deleted = TRUE, updated_at = NOW()
             WHERE project_id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE project_files SET is_deleted = TRUE, updated_at = NOW()
             WHERE project_id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
