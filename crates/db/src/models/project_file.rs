//! Project/file attachment join entity.

use serde::Serialize;
use sqlx::FromRow;
use workplan_core::types::{DbId, Timestamp};

/// One attachment relationship from the `project_files` table.
///
/// Soft-deleting this row detaches the file from the project without
/// removing either side.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectFile {
    pub id: DbId,
    pub project_id: DbId,
    pub file_id: DbId,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
