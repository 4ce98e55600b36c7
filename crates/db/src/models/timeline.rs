//! Timeline entity model and DTOs, including plot-element linking.
//!
//! Timeline/plot-element links live on the timeline resource
//! (`POST/PUT/DELETE /timelines/{id}/plot-elements/...`), so their DTOs
//! sit here rather than in `plot_element`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyloom_core::types::{DbId, Timestamp};

/// A row from the `timelines` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// Free-form in-story date ("Year 312, midwinter"), not a calendar date.
    pub story_date: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new timeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeline {
    pub name: Option<String>,
    pub description: Option<String>,
    pub story_date: Option<String>,
}

/// DTO for updating a timeline. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimeline {
    pub name: Option<String>,
    pub description: Option<String>,
    pub story_date: Option<String>,
}

/// A row from the `timeline_plot_elements` join table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePlotElement {
    pub id: DbId,
    pub timeline_id: DbId,
    pub plot_element_id: DbId,
    pub relationship: String,
    pub description: Option<String>,
}

/// DTO for linking a plot element to a timeline. `relationship` is
/// required; the handler reports it by name when missing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimelineLink {
    pub plot_element_id: Option<DbId>,
    pub relationship: Option<String>,
    pub description: Option<String>,
}

/// DTO for updating an existing timeline link.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimelineLink {
    pub relationship: Option<String>,
    pub description: Option<String>,
}
