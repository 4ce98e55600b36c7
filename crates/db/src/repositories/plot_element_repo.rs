//! Repository for the `plot_elements` table and its relation rows.
//!
//! Sibling order groups are (`project_id`, `parent_id`, `kind`): the
//! creation path computes the next order inside that group, and reorders
//! renumber within it. Structural rules the API enforces (childless
//! delete, same-project parent, cycle-free reparent) are backed by
//! `count_children` and `is_descendant` here.

use sqlx::{PgPool, Postgres, Transaction};
use storyloom_core::outline::{auto_child_kind, placeholder_title, word_count};
use storyloom_core::types::DbId;

use crate::models::plot_element::{
    CharacterLink, ChildSummary, NewPlotElement, ParentSummary, PlotElement, SettingLink,
    TimelineLink, UpdatePlotElement,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, title, kind, parent_id, sort_order, status, \
    summary, content, notes, mood, pov, target_words, word_count, created_at, updated_at";

/// Filter on the `parent_id` column for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentFilter {
    /// No parent constraint.
    Any,
    /// Root nodes only (`parent_id IS NULL`).
    Root,
    /// Direct children of the given node.
    Node(DbId),
}

/// Provides CRUD and hierarchy operations for plot elements.
pub struct PlotElementRepo;

impl PlotElementRepo {
    /// Insert a new plot element, returning the created row.
    ///
    /// Runs as one transaction: when `sort_order` is omitted it is computed
    /// as max+1 within the (`project_id`, `parent_id`, `kind`) sibling
    /// group, and when `auto_create_children` is set and the kind maps to a
    /// child kind, exactly one placeholder child is inserted alongside.
    /// The returned row is always the requested node, never the auto-child.
    pub async fn create(pool: &PgPool, input: &NewPlotElement) -> Result<PlotElement, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let sort_order = match input.sort_order {
            Some(order) => order,
            None => {
                Self::next_order(&mut tx, input.project_id, input.parent_id, &input.kind).await?
            }
        };

        let words = input.content.as_deref().map(word_count).unwrap_or(0);

        let query = format!(
            "INSERT INTO plot_elements
                (project_id, title, kind, parent_id, sort_order, status,
                 summary, content, notes, mood, pov, target_words, word_count)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'planned'),
                     $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        let element = sqlx::query_as::<_, PlotElement>(&query)
            .bind(input.project_id)
            .bind(&input.title)
            .bind(&input.kind)
            .bind(input.parent_id)
            .bind(sort_order)
            .bind(&input.status)
            .bind(&input.summary)
            .bind(&input.content)
            .bind(&input.notes)
            .bind(&input.mood)
            .bind(&input.pov)
            .bind(input.target_words)
            .bind(words)
            .fetch_one(&mut *tx)
            .await?;

        if input.auto_create_children {
            if let Some(child_kind) = auto_child_kind(&input.kind) {
                let query = format!(
                    "INSERT INTO plot_elements
                        (project_id, title, kind, parent_id, sort_order)
                     VALUES ($1, $2, $3, $4, 1)
                     RETURNING {COLUMNS}"
                );
                sqlx::query_as::<_, PlotElement>(&query)
                    .bind(input.project_id)
                    .bind(placeholder_title(child_kind))
                    .bind(child_kind)
                    .bind(element.id)
                    .fetch_one(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(element)
    }

    /// Next order value in the (`project_id`, `parent_id`, `kind`) group.
    async fn next_order(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
        parent_id: Option<DbId>,
        kind: &str,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(sort_order), 0) + 1 FROM plot_elements
             WHERE project_id = $1
               AND parent_id IS NOT DISTINCT FROM $2
               AND kind = $3",
        )
        .bind(project_id)
        .bind(parent_id)
        .bind(kind)
        .fetch_one(&mut **tx)
        .await
    }

    /// Find a plot element by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PlotElement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM plot_elements WHERE id = $1");
        sqlx::query_as::<_, PlotElement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List plot elements for a project, optionally filtered by kind
    /// and/or parent, ordered by `sort_order` ascending.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        kind: Option<&str>,
        parent: ParentFilter,
    ) -> Result<Vec<PlotElement>, sqlx::Error> {
        let (root_only, parent_id) = match parent {
            ParentFilter::Any => (false, None),
            ParentFilter::Root => (true, None),
            ParentFilter::Node(id) => (false, Some(id)),
        };
        let query = format!(
            "SELECT {COLUMNS} FROM plot_elements
             WHERE project_id = $1
               AND ($2::text IS NULL OR kind = $2)
               AND (NOT $3 OR parent_id IS NULL)
               AND ($4::bigint IS NULL OR parent_id = $4)
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, PlotElement>(&query)
            .bind(project_id)
            .bind(kind)
            .bind(root_only)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Update a plot element. Only non-`None` fields in `input` are
    /// applied; `parent_id = Some(None)` clears the parent. A content
    /// update recomputes `word_count`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlotElement,
    ) -> Result<Option<PlotElement>, sqlx::Error> {
        let parent_set = input.parent_id.is_some();
        let parent_value = input.parent_id.flatten();
        let words = input.content.as_deref().map(word_count);

        let query = format!(
            "UPDATE plot_elements SET
                title = COALESCE($2, title),
                kind = COALESCE($3, kind),
                sort_order = COALESCE($4, sort_order),
                parent_id = CASE WHEN $5 THEN $6 ELSE parent_id END,
                status = COALESCE($7, status),
                summary = COALESCE($8, summary),
                content = COALESCE($9, content),
                notes = COALESCE($10, notes),
                mood = COALESCE($11, mood),
                pov = COALESCE($12, pov),
                target_words = COALESCE($13, target_words),
                word_count = COALESCE($14, word_count),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PlotElement>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.kind)
            .bind(input.sort_order)
            .bind(parent_set)
            .bind(parent_value)
            .bind(&input.status)
            .bind(&input.summary)
            .bind(&input.content)
            .bind(&input.notes)
            .bind(&input.mood)
            .bind(&input.pov)
            .bind(input.target_words)
            .bind(words)
            .fetch_optional(pool)
            .await
    }

    /// Number of direct children of a node.
    pub async fn count_children(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM plot_elements WHERE parent_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Whether `candidate` lies inside the subtree rooted at `root`
    /// (including `root` itself). Used as the reparent cycle guard.
    pub async fn is_descendant(
        pool: &PgPool,
        root: DbId,
        candidate: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "WITH RECURSIVE subtree AS (
                SELECT id FROM plot_elements WHERE id = $1
                UNION ALL
                SELECT p.id FROM plot_elements p
                JOIN subtree s ON p.parent_id = s.id
             )
             SELECT EXISTS (SELECT 1 FROM subtree WHERE id = $2)",
        )
        .bind(root)
        .bind(candidate)
        .fetch_one(pool)
        .await
    }

    /// Permanently delete a plot element. Relation rows go with it by FK
    /// cascade; the caller is responsible for the childless-delete guard.
    /// Returns `true` if a row was removed.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM plot_elements WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- Response projections --

    /// Display summaries for the given node ids (used to attach parent
    /// summaries to list/detail responses).
    pub async fn summaries(pool: &PgPool, ids: &[DbId]) -> Result<Vec<ParentSummary>, sqlx::Error> {
        sqlx::query_as::<_, ParentSummary>(
            "SELECT id, title, kind FROM plot_elements WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Immediate-child summaries for the given parent ids, ordered by
    /// `sort_order` ascending.
    pub async fn child_summaries(
        pool: &PgPool,
        parent_ids: &[DbId],
    ) -> Result<Vec<ChildSummary>, sqlx::Error> {
        sqlx::query_as::<_, ChildSummary>(
            "SELECT id, parent_id, title, kind, sort_order, status, word_count
             FROM plot_elements
             WHERE parent_id = ANY($1)
             ORDER BY sort_order ASC, id ASC",
        )
        .bind(parent_ids)
        .fetch_all(pool)
        .await
    }

    /// Character links for the given element ids with the character's
    /// display name. `detailed` additionally selects the description (the
    /// detail endpoint's richer projection).
    pub async fn character_links(
        pool: &PgPool,
        element_ids: &[DbId],
        detailed: bool,
    ) -> Result<Vec<CharacterLink>, sqlx::Error> {
        let description = if detailed {
            "c.description"
        } else {
            "NULL::text AS description"
        };
        let query = format!(
            "SELECT l.id, l.plot_element_id, l.character_id, l.role, l.importance,
                    c.name, {description}
             FROM plot_element_characters l
             JOIN characters c ON c.id = l.character_id
             WHERE l.plot_element_id = ANY($1)
             ORDER BY l.id ASC"
        );
        sqlx::query_as::<_, CharacterLink>(&query)
            .bind(element_ids)
            .fetch_all(pool)
            .await
    }

    /// World-setting links for the given element ids. `detailed` adds the
    /// setting's content.
    pub async fn setting_links(
        pool: &PgPool,
        element_ids: &[DbId],
        detailed: bool,
    ) -> Result<Vec<SettingLink>, sqlx::Error> {
        let content = if detailed {
            "w.content"
        } else {
            "NULL::text AS content"
        };
        let query = format!(
            "SELECT l.id, l.plot_element_id, l.setting_id, l.relevance,
                    w.name, {content}
             FROM plot_element_settings l
             JOIN world_settings w ON w.id = l.setting_id
             WHERE l.plot_element_id = ANY($1)
             ORDER BY l.id ASC"
        );
        sqlx::query_as::<_, SettingLink>(&query)
            .bind(element_ids)
            .fetch_all(pool)
            .await
    }

    /// Timeline links for the given element ids. `detailed` adds the
    /// timeline's story date.
    pub async fn timeline_links(
        pool: &PgPool,
        element_ids: &[DbId],
        detailed: bool,
    ) -> Result<Vec<TimelineLink>, sqlx::Error> {
        let story_date = if detailed {
            "t.story_date"
        } else {
            "NULL::text AS story_date"
        };
        let query = format!(
            "SELECT l.id, l.plot_element_id, l.timeline_id, l.relationship, l.description,
                    t.name, {story_date}
             FROM timeline_plot_elements l
             JOIN timelines t ON t.id = l.timeline_id
             WHERE l.plot_element_id = ANY($1)
             ORDER BY l.id ASC"
        );
        sqlx::query_as::<_, TimelineLink>(&query)
            .bind(element_ids)
            .fetch_all(pool)
            .await
    }

    // -- Relation rows --

    /// Link a character to a plot element.
    ///
    /// Duplicate pairs violate `uq_plot_element_characters` and surface as
    /// a conflict. `importance` defaults to `'minor'`.
    pub async fn link_character(
        pool: &PgPool,
        plot_element_id: DbId,
        character_id: DbId,
        role: Option<&str>,
        importance: Option<&str>,
    ) -> Result<CharacterLink, sqlx::Error> {
        let link_id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO plot_element_characters
                (plot_element_id, character_id, role, importance)
             VALUES ($1, $2, $3, COALESCE($4, 'minor'))
             RETURNING id",
        )
        .bind(plot_element_id)
        .bind(character_id)
        .bind(role)
        .bind(importance)
        .fetch_one(pool)
        .await?;

        sqlx::query_as::<_, CharacterLink>(
            "SELECT l.id, l.plot_element_id, l.character_id, l.role, l.importance,
                    c.name, c.description
             FROM plot_element_characters l
             JOIN characters c ON c.id = l.character_id
             WHERE l.id = $1",
        )
        .bind(link_id)
        .fetch_one(pool)
        .await
    }

    /// Remove a character link. Returns `true` if a row was removed.
    pub async fn unlink_character(
        pool: &PgPool,
        plot_element_id: DbId,
        character_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM plot_element_characters
             WHERE plot_element_id = $1 AND character_id = $2",
        )
        .bind(plot_element_id)
        .bind(character_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Link a world setting to a plot element.
    ///
    /// Duplicate pairs violate `uq_plot_element_settings` and surface as a
    /// conflict.
    pub async fn link_setting(
        pool: &PgPool,
        plot_element_id: DbId,
        setting_id: DbId,
        relevance: Option<&str>,
    ) -> Result<SettingLink, sqlx::Error> {
        let link_id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO plot_element_settings (plot_element_id, setting_id, relevance)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(plot_element_id)
        .bind(setting_id)
        .bind(relevance)
        .fetch_one(pool)
        .await?;

        sqlx::query_as::<_, SettingLink>(
            "SELECT l.id, l.plot_element_id, l.setting_id, l.relevance,
                    w.name, w.content
             FROM plot_element_settings l
             JOIN world_settings w ON w.id = l.setting_id
             WHERE l.id = $1",
        )
        .bind(link_id)
        .fetch_one(pool)
        .await
    }

    /// Remove a world-setting link. Returns `true` if a row was removed.
    pub async fn unlink_setting(
        pool: &PgPool,
        plot_element_id: DbId,
        setting_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM plot_element_settings
             WHERE plot_element_id = $1 AND setting_id = $2",
        )
        .bind(plot_element_id)
        .bind(setting_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
