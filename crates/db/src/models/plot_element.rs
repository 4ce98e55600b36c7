//! Plot element entity model and DTOs.
//!
//! Plot elements form the self-referencing outline tree
//! (book/part/chapter/scene/beat). `kind` serializes as `"type"` and
//! `sort_order` as `"order"` to match the REST contract.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyloom_core::types::{DbId, Timestamp};

use crate::models::patch;

/// A row from the `plot_elements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotElement {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub parent_id: Option<DbId>,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub status: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub notes: Option<String>,
    pub mood: Option<String>,
    pub pov: Option<String>,
    pub target_words: Option<i32>,
    pub word_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl storyloom_core::hierarchy::OutlineItem for PlotElement {
    fn id(&self) -> DbId {
        self.id
    }
    fn parent_id(&self) -> Option<DbId> {
        self.parent_id
    }
    fn kind(&self) -> &str {
        &self.kind
    }
    fn sort_order(&self) -> i32 {
        self.sort_order
    }
}

/// DTO for creating a new plot element.
///
/// `project_id`, `title` and `kind` are required but modeled as `Option`
/// so the handler can report which field is missing as a 400 instead of a
/// deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlotElement {
    pub project_id: Option<DbId>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub parent_id: Option<DbId>,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
    pub status: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub notes: Option<String>,
    pub mood: Option<String>,
    pub pov: Option<String>,
    pub target_words: Option<i32>,
    #[serde(default)]
    pub auto_create_children: bool,
}

/// Validated create input passed to the repository.
#[derive(Debug, Clone)]
pub struct NewPlotElement {
    pub project_id: DbId,
    pub title: String,
    pub kind: String,
    pub parent_id: Option<DbId>,
    pub sort_order: Option<i32>,
    pub status: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub notes: Option<String>,
    pub mood: Option<String>,
    pub pov: Option<String>,
    pub target_words: Option<i32>,
    pub auto_create_children: bool,
}

/// DTO for updating an existing plot element. All fields are optional;
/// `parent_id` distinguishes "absent" from "explicitly null" so a node can
/// be made a root.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlotElement {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
    #[serde(default, deserialize_with = "patch::double_option")]
    pub parent_id: Option<Option<DbId>>,
    pub status: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub notes: Option<String>,
    pub mood: Option<String>,
    pub pov: Option<String>,
    pub target_words: Option<i32>,
}

/// Parent display projection attached to list/detail responses.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentSummary {
    pub id: DbId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Immediate-child row fetched for list/detail responses.
///
/// `parent_id` is used for grouping only and is not serialized; the list
/// projection omits `word_count`, the detail projection includes it.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildSummary {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub parent_id: Option<DbId>,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub status: String,
    #[serde(skip_serializing)]
    pub word_count: i32,
}

/// Child projection for the detail endpoint (adds `wordCount`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildDetail {
    pub id: DbId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub status: String,
    pub word_count: i32,
}

impl From<ChildSummary> for ChildDetail {
    fn from(child: ChildSummary) -> Self {
        ChildDetail {
            id: child.id,
            title: child.title,
            kind: child.kind,
            sort_order: child.sort_order,
            status: child.status,
            word_count: child.word_count,
        }
    }
}

/// A character relation row joined with the character's display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterLink {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub plot_element_id: DbId,
    pub character_id: DbId,
    pub role: Option<String>,
    pub importance: String,
    pub name: String,
    /// Only populated (and serialized) by the detail query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// DTO for linking a character to a plot element.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCharacterLink {
    pub character_id: Option<DbId>,
    pub role: Option<String>,
    pub importance: Option<String>,
}

/// A world-setting relation row joined with the setting's display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingLink {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub plot_element_id: DbId,
    pub setting_id: DbId,
    pub relevance: Option<String>,
    pub name: String,
    /// Only populated (and serialized) by the detail query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// DTO for linking a world setting to a plot element.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSettingLink {
    pub setting_id: Option<DbId>,
    pub relevance: Option<String>,
}

/// A timeline relation row joined with the timeline's display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineLink {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub plot_element_id: DbId,
    pub timeline_id: DbId,
    pub relationship: String,
    pub description: Option<String>,
    pub name: String,
    /// Only populated (and serialized) by the detail query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_date: Option<String>,
}
