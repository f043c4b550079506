//! File metadata entity model and DTOs.
//!
//! Rows describe uploaded files; the bytes themselves live on disk under the
//! configured upload directory.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use workplan_core::types::{DbId, Timestamp};

/// A file row from the `files` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct File {
    pub id: DbId,
    pub file_name: String,
    pub file_path: String,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording an uploaded file.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFile {
    pub file_name: String,
    pub file_path: String,
}
