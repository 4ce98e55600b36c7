//! Handlers for the `/characters` resource.
//!
//! List and create are nested under projects
//! (`/projects/{project_id}/characters`); item operations are flat
//! (`/characters/{id}`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use storyloom_core::error::CoreError;
use storyloom_core::types::DbId;
use storyloom_db::models::character::{Character, CreateCharacter, UpdateCharacter};
use storyloom_db::repositories::{CharacterRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/characters
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateCharacter>,
) -> AppResult<(StatusCode, Json<Character>)> {
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

    let character = CharacterRepo::create(&state.pool, project_id, name, &input).await?;
    Ok((StatusCode::CREATED, Json(character)))
}

/// GET /api/v1/projects/{project_id}/characters
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Character>>> {
    let characters = CharacterRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(characters))
}

/// GET /api/v1/characters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Character>> {
    let character = CharacterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))?;
    Ok(Json(character))
}

/// PUT /api/v1/characters/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCharacter>,
) -> AppResult<Json<Character>> {
    let character = CharacterRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))?;
    Ok(Json(character))
}

/// DELETE /api/v1/characters/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = CharacterRepo::hard_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))
    }
}
