//! Repository for the `timelines` table and its plot-element links.

use sqlx::PgPool;
use storyloom_core::types::DbId;

use crate::models::timeline::{
    CreateTimeline, Timeline, TimelinePlotElement, UpdateTimeline, UpdateTimelineLink,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, description, story_date, created_at, updated_at";

/// Columns of the `timeline_plot_elements` join table.
const LINK_COLUMNS: &str = "id, timeline_id, plot_element_id, relationship, description";

/// Provides CRUD operations for timelines and their plot-element links.
pub struct TimelineRepo;

impl TimelineRepo {
    /// Insert a new timeline, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        name: &str,
        input: &CreateTimeline,
    ) -> Result<Timeline, sqlx::Error> {
        let query = format!(
            "INSERT INTO timelines (project_id, name, description, story_date)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Timeline>(&query)
            .bind(project_id)
            .bind(name)
            .bind(&input.description)
            .bind(&input.story_date)
            .fetch_one(pool)
            .await
    }

    /// Find a timeline by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Timeline>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM timelines WHERE id = $1");
        sqlx::query_as::<_, Timeline>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all timelines for a given project, ordered by creation time.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Timeline>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM timelines WHERE project_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Timeline>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a timeline. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTimeline,
    ) -> Result<Option<Timeline>, sqlx::Error> {
        let query = format!(
            "UPDATE timelines SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                story_date = COALESCE($4, story_date),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Timeline>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.story_date)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a timeline. Returns `true` if a row was removed.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM timelines WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- Plot-element links --

    /// Link a plot element to a timeline.
    ///
    /// Duplicate (timeline, plot element) pairs violate
    /// `uq_timeline_plot_elements` and surface as a conflict.
    pub async fn link_plot_element(
        pool: &PgPool,
        timeline_id: DbId,
        plot_element_id: DbId,
        relationship: &str,
        description: Option<&str>,
    ) -> Result<TimelinePlotElement, sqlx::Error> {
        let query = format!(
            "INSERT INTO timeline_plot_elements
                (timeline_id, plot_element_id, relationship, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {LINK_COLUMNS}"
        );
        sqlx::query_as::<_, TimelinePlotElement>(&query)
            .bind(timeline_id)
            .bind(plot_element_id)
            .bind(relationship)
            .bind(description)
            .fetch_one(pool)
            .await
    }

    /// Update an existing timeline link. Returns `None` if the pair is not
    /// linked.
    pub async fn update_link(
        pool: &PgPool,
        timeline_id: DbId,
        plot_element_id: DbId,
        input: &UpdateTimelineLink,
    ) -> Result<Option<TimelinePlotElement>, sqlx::Error> {
        let query = format!(
            "UPDATE timeline_plot_elements SET
                relationship = COALESCE($3, relationship),
                description = COALESCE($4, description)
             WHERE timeline_id = $1 AND plot_element_id = $2
             RETURNING {LINK_COLUMNS}"
        );
        sqlx::query_as::<_, TimelinePlotElement>(&query)
            .bind(timeline_id)
            .bind(plot_element_id)
            .bind(&input.relationship)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Remove a timeline link. Returns `true` if a row was removed.
    pub async fn unlink_plot_element(
        pool: &PgPool,
        timeline_id: DbId,
        plot_element_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM timeline_plot_elements
             WHERE timeline_id = $1 AND plot_element_id = $2",
        )
        .bind(timeline_id)
        .bind(plot_element_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
