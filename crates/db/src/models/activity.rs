//! Activity entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use workplan_core::activity_tree::{ActivityInput, ActivityNode, ActivityRecord};
use workplan_core::types::{DbId, Timestamp};

/// An activity row from the `activities` table.
///
/// `parent_activity_id` is `None` for root activities owned directly by the
/// project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Activity {
    pub id: DbId,
    pub project_id: DbId,
    pub parent_activity_id: Option<DbId>,
    pub name: String,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a descriptor forest under one project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateActivities {
    pub project_id: DbId,
    pub activities: Vec<ActivityInput>,
}

/// DTO for updating one activity: an optional rename plus the desired child
/// forest to reconcile against the persisted children.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateActivity {
    pub name: Option<String>,
    #[serde(default)]
    pub children: Vec<ActivityInput>,
}

/// Read model for `GET /activities/{id}`: the row plus its visible subtree.
#[derive(Debug, Serialize)]
pub struct ActivityDetail {
    #[serde(flatten)]
    pub activity: Activity,
    pub children: Vec<ActivityNode>,
}

/// Flat row used when loading a tree for assembly.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityTreeRow {
    pub id: DbId,
    pub parent_activity_id: Option<DbId>,
    pub name: String,
    pub is_deleted: bool,
}

impl From<ActivityTreeRow> for ActivityRecord {
    fn from(row: ActivityTreeRow) -> Self {
        ActivityRecord {
            id: row.id,
            parent_id: row.parent_activity_id,
            name: row.name,
            is_deleted: row.is_deleted,
        }
    }
}
