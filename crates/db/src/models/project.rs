//! Project entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use workplan_core::activity_tree::{ActivityInput, ActivityNode};
use workplan_core::types::{DbId, Timestamp};

use crate::models::file::File;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project, optionally with a nested activity forest
/// that is inserted in the same transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub activities: Vec<ActivityInput>,
}

/// DTO for updating an existing project.
///
/// Scalar fields are optional patches; `activities` is the desired tree that
/// gets reconciled against the persisted one.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub activities: Vec<ActivityInput>,
}

/// Read model for `GET /projects/{id}`: the row plus its visible activity
/// tree and attached files.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub activities: Vec<ActivityNode>,
    pub files: Vec<File>,
}
