//! Repository for the `world_settings` table.

use sqlx::PgPool;
use storyloom_core::types::DbId;

use crate::models::world_setting::{CreateWorldSetting, UpdateWorldSetting, WorldSetting};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, content, created_at, updated_at";

/// Provides CRUD operations for world settings.
pub struct WorldSettingRepo;

impl WorldSettingRepo {
    /// Insert a new world setting, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        name: &str,
        input: &CreateWorldSetting,
    ) -> Result<WorldSetting, sqlx::Error> {
        let query = format!(
            "INSERT INTO world_settings (project_id, name, content)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorldSetting>(&query)
            .bind(project_id)
            .bind(name)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Find a world setting by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WorldSetting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM world_settings WHERE id = $1");
        sqlx::query_as::<_, WorldSetting>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all world settings for a given project, ordered by name ascending.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<WorldSetting>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM world_settings WHERE project_id = $1 ORDER BY name ASC"
        );
        sqlx::query_as::<_, WorldSetting>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a world setting. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorldSetting,
    ) -> Result<Option<WorldSetting>, sqlx::Error> {
        let query = format!(
            "UPDATE world_settings SET
                name = COALESCE($2, name),
                content = COALESCE($3, content),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorldSetting>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.content)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a world setting. Returns `true` if a row was removed.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM world_settings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
