//! World setting entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyloom_core::types::{DbId, Timestamp};

/// A row from the `world_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSetting {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub content: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new world setting.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorldSetting {
    pub name: Option<String>,
    pub content: Option<String>,
}

/// DTO for updating a world setting. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorldSetting {
    pub name: Option<String>,
    pub content: Option<String>,
}
