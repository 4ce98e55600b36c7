//! Outline vocabulary: node kinds, statuses, the auto-child mapping, and
//! the canonical word count.
//!
//! Kinds and statuses are stored as TEXT and validated here rather than in
//! the database driver, so handlers can return field-level validation
//! errors before touching the pool.

use crate::error::CoreError;

/// Node kinds ordered by conventional nesting depth, shallowest first.
pub const NODE_KINDS: &[&str] = &["book", "part", "chapter", "scene", "beat"];

/// Kinds that never receive an auto-created child.
pub const LEAF_KINDS: &[&str] = &["chapter", "scene", "beat"];

/// Workflow statuses, independent of tree position.
pub const NODE_STATUSES: &[&str] = &["planned", "outlined", "drafted", "completed"];

/// Default status for newly created nodes.
pub const DEFAULT_STATUS: &str = "planned";

/// How a project renders its outline.
pub const PLOT_VIEW_MODES: &[&str] = &["complete", "simplified"];

/// Validate a project's plot view mode.
pub fn validate_view_mode(mode: &str) -> Result<(), CoreError> {
    if PLOT_VIEW_MODES.contains(&mode) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid plot view mode '{mode}'. Must be one of: {}",
            PLOT_VIEW_MODES.join(", ")
        )))
    }
}

/// Validate that a kind is one of the known outline levels.
pub fn validate_kind(kind: &str) -> Result<(), CoreError> {
    if NODE_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid node type '{kind}'. Must be one of: {}",
            NODE_KINDS.join(", ")
        )))
    }
}

/// Validate that a status is one of the known workflow labels.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if NODE_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid status '{status}'. Must be one of: {}",
            NODE_STATUSES.join(", ")
        )))
    }
}

/// Validate that a title is non-empty after trimming.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        Err(CoreError::Validation("title must not be empty".to_string()))
    } else {
        Ok(())
    }
}

/// The kind an auto-created child takes, if the parent kind gets one.
///
/// Only container kinds above the leaf levels participate: a new book gets
/// a part, a new part gets a chapter. Chapters, scenes and beats never
/// auto-create children.
pub fn auto_child_kind(kind: &str) -> Option<&'static str> {
    match kind {
        "book" => Some("part"),
        "part" => Some("chapter"),
        _ => None,
    }
}

/// Placeholder title for an auto-created child of the given kind.
pub fn placeholder_title(kind: &str) -> String {
    format!("Untitled {kind}")
}

/// Canonical word count: the number of non-whitespace characters.
///
/// This is the single definition used by both the repository (persisted
/// count) and the outline engine (optimistic local count).
pub fn word_count(content: &str) -> i32 {
    content.chars().filter(|c| !c.is_whitespace()).count() as i32
}
