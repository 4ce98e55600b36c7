//! Handlers for the `/world-settings` resource.
//!
//! Same shape as characters: list/create nested under projects, item
//! operations flat.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use storyloom_core::error::CoreError;
use storyloom_core::types::DbId;
use storyloom_db::models::world_setting::{CreateWorldSetting, UpdateWorldSetting, WorldSetting};
use storyloom_db::repositories::{ProjectRepo, WorldSettingRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/world-settings
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateWorldSetting>,
) -> AppResult<(StatusCode, Json<WorldSetting>)> {
    let name = input
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("name is required".to_string()))?;

    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let setting = WorldSettingRepo::create(&state.pool, project_id, name, &input).await?;
    Ok((StatusCode::CREATED, Json(setting)))
}

/// GET /api/v1/projects/{project_id}/world-settings
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<WorldSetting>>> {
    let settings = WorldSettingRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(settings))
}

/// GET /api/v1/world-settings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<WorldSetting>> {
    let setting = WorldSettingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "World setting",
            id,
        }))?;
    Ok(Json(setting))
}

/// PUT /api/v1/world-settings/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorldSetting>,
) -> AppResult<Json<WorldSetting>> {
    let setting = WorldSettingRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "World setting",
            id,
        }))?;
    Ok(Json(setting))
}

/// DELETE /api/v1/world-settings/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = WorldSettingRepo::hard_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "World setting",
            id,
        }))
    }
}
