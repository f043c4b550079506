//! Repository for the `activities` table.
//!
//! The pure tree logic lives in `workplan_core::activity_tree`; this module
//! feeds it flat rows and persists its output. All multi-row mutations run
//! inside one transaction.

use futures::future::BoxFuture;
use sqlx::{PgPool, Postgres, Transaction};
use workplan_core::activity_tree::{self, ActivityInput, ActivityNode, ActivityRecord};
use workplan_core::types::DbId;

use crate::models::activity::{Activity, ActivityTreeRow, UpdateActivity};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, parent_activity_id, name, is_deleted, created_at, updated_at";

/// Provides CRUD and tree operations for activities.
pub struct ActivityRepo;

impl ActivityRepo {
    /// Insert a descriptor forest under a project, returning the created
    /// roots fully populated with their database-assigned ids.
    pub async fn create_forest(
        pool: &PgPool,
        project_id: DbId,
        inputs: &[ActivityInput],
    ) -> Result<Vec<ActivityNode>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let roots = activity_tree::build_tree(inputs);
        let created = Self::insert_forest(&mut tx, project_id, None, &roots).await?;
        tx.commit().await?;
        Ok(created)
    }

    /// List all visible activities ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<Activity>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM activities WHERE NOT is_deleted ORDER BY id");
        sqlx::query_as::<_, Activity>(&query).fetch_all(pool).await
    }

    /// Find a visible activity by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Activity>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM activities WHERE id = $1 AND NOT is_deleted");
        sqlx::query_as::<_, Activity>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load the visible subtree rooted at `id`: the row itself plus its
    /// pruned child forest. Returns `None` if the root is missing or deleted.
    pub async fn find_subtree(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<(Activity, Vec<ActivityNode>)>, sqlx::Error> {
        let Some(activity) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let records = Self::subtree_records(pool, id).await?;
        let forest = activity_tree::prune_deleted(activity_tree::assemble(records));
        let children = forest
            .into_iter()
            .next()
            .map(|root| root.children)
            .unwrap_or_default();
        Ok(Some((activity, children)))
    }

    /// Rename an activity and reconcile its submitted child forest against
    /// the persisted subtree. Returns `None` if no visible row matches.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateActivity,
    ) -> Result<Option<Activity>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM activities WHERE id = $1 AND NOT is_deleted");
        let Some(activity) = sqlx::query_as::<_, Activity>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(name) = &input.name {
            sqlx::query(
                "UPDATE activities SET name = $2, updated_at = NOW()
                 WHERE id = $1 AND name IS DISTINCT FROM $2",
            )
            .bind(id)
            .bind(name)
            .execute(&mut *tx)
            .await?;
        }

        let records = Self::subtree_records(&mut *tx, id).await?;
        let mut forest = activity_tree::assemble(records);
        if let Some(root) = forest.first_mut() {
            activity_tree::reconcile(&mut root.children, &input.children);
            Self::apply_forest(&mut tx, activity.project_id, Some(id), &root.children).await?;
        }

        let reloaded = format!("SELECT {COLUMNS} FROM activities WHERE id = $1");
        let updated = sqlx::query_as::<_, Activity>(&reloaded)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Cascade soft-delete: marks the activity and every node reachable from
    /// it via the child relation. Returns `true` if the root was visible.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE activities SET is_deleted = TRUE, updated_at = NOW()
             WHERE NOT is_deleted AND id IN (
                 WITH RECURSIVE subtree AS (
                     SELECT id FROM activities WHERE id = $1 AND NOT is_deleted
                     UNION ALL
                     SELECT a.id FROM activities a
                     JOIN subtree s ON a.parent_activity_id = s.id
                 )
                 SELECT id FROM subtree
             )",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load every activity row of a project (deleted included) as flat
    /// records for tree assembly.
    pub(crate) async fn records_for_project<'e, E>(
        executor: E,
        project_id: DbId,
    ) -> Result<Vec<ActivityRecord>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, ActivityTreeRow>(
            "SELECT id, parent_activity_id, name, is_deleted
             FROM activities WHERE project_id = $1 ORDER BY id",
        )
        .bind(project_id)
        .fetch_all(executor)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Load the subtree rooted at `id` (deleted included) as flat records.
    /// The root's parent reference is cleared so assembly treats it as a root.
    async fn subtree_records<'e, E>(
        executor: E,
        id: DbId,
    ) -> Result<Vec<ActivityRecord>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, ActivityTreeRow>(
            "WITH RECURSIVE subtree AS (
                 SELECT id, parent_activity_id, name, is_deleted
                 FROM activities WHERE id = $1
                 UNION ALL
                 SELECT a.id, a.parent_activity_id, a.name, a.is_deleted
                 FROM activities a
                 JOIN subtree s ON a.parent_activity_id = s.id
             )
             SELECT id, parent_activity_id, name, is_deleted FROM subtree ORDER BY id",
        )
        .bind(id)
        .fetch_all(executor)
        .await?;
        Ok(rows
            .into_iter()
            .map(ActivityRecord::from)
            .map(|mut record| {
                if record.id == id {
                    record.parent_id = None;
                }
                record
            })
            .collect())
    }

    /// Recursively insert a freshly built forest, wiring each child to the
    /// id its parent was just assigned. Returns the forest with ids filled.
    pub(crate) fn insert_forest<'a>(
        tx: &'a mut Transaction<'static, Postgres>,
        project_id: DbId,
        parent_id: Option<DbId>,
        nodes: &'a [ActivityNode],
    ) -> BoxFuture<'a, Result<Vec<ActivityNode>, sqlx::Error>> {
        Box::pin(async move {
            let mut created = Vec::with_capacity(nodes.len());
            for node in nodes {
                let id: DbId = sqlx::query_scalar(
                    "INSERT INTO activities (project_id, parent_activity_id, name)
                     VALUES ($1, $2, $3)
                     RETURNING id",
                )
                .bind(project_id)
                .bind(parent_id)
                .bind(&node.name)
                .fetch_one(&mut **tx)
                .await?;
                let children =
                    Self::insert_forest(tx, project_id, Some(id), &node.children).await?;
                created.push(ActivityNode {
                    id: Some(id),
                    name: node.name.clone(),
                    is_deleted: false,
                    children,
                });
            }
            Ok(created)
        })
    }

    /// Persist a reconciled forest: matched nodes get a conditional rename,
    /// fresh nodes are inserted together with their subtrees.
    pub(crate) fn apply_forest<'a>(
        tx: &'a mut Transaction<'static, Postgres>,
        project_id: DbId,
        parent_id: Option<DbId>,
        nodes: &'a [ActivityNode],
    ) -> BoxFuture<'a, Result<(), sqlx::Error>> {
        Box::pin(async move {
            for node in nodes {
                match node.id {
                    Some(id) => {
                        sqlx::query(
                            "UPDATE activities SET name = $2, updated_at = NOW()
                             WHERE id = $1 AND name IS DISTINCT FROM $2",
                        )
                        .bind(id)
                        .bind(&node.name)
                        .execute(&mut **tx)
                        .await?;
                        Self::apply_forest(tx, project_id, Some(id), &node.children).await?;
                    }
                    None => {
                        Self::insert_forest(
                            tx,
                            project_id,
                            parent_id,
                            std::slice::from_ref(node),
                        )
                        .await?;
                    }
                }
            }
            Ok(())
        })
    }
}
