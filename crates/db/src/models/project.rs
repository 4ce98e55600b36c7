//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyloom_core::types::{DbId, Timestamp};

/// A row from the `projects` table.
///
/// `plot_view_mode` and `level_names` only change how the client renders
/// the outline tree, never the tree itself.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// `complete` or `simplified`.
    pub plot_view_mode: String,
    /// User-customized labels per node kind, e.g. `{"book": "Volume"}`.
    pub level_names: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// DTO for updating a project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub plot_view_mode: Option<String>,
    pub level_names: Option<serde_json::Value>,
}
