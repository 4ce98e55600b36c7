//! Handlers for the `/timelines` resource and its plot-element links.
//!
//! Timeline/plot-element links live on the timeline side of the relation:
//! `POST/PUT/DELETE /timelines/{id}/plot-elements[/{plot_element_id}]`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use storyloom_core::error::CoreError;
use storyloom_core::types::DbId;
use storyloom_db::models::timeline::{
    CreateTimeline, CreateTimelineLink, Timeline, TimelinePlotElement, UpdateTimeline,
    UpdateTimelineLink,
};
use storyloom_db::repositories::{PlotElementRepo, ProjectRepo, TimelineRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/timelines
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateTimeline>,
) -> AppResult<(StatusCode, Json<Timeline>)> {
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

    let timeline = TimelineRepo::create(&state.pool, project_id, name, &input).await?;
    Ok((StatusCode::CREATED, Json(timeline)))
}

/// GET /api/v1/projects/{project_id}/timelines
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Timeline>>> {
    let timelines = TimelineRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(timelines))
}

/// GET /api/v1/timelines/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Timeline>> {
    let timeline = TimelineRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Timeline",
            id,
        }))?;
    Ok(Json(timeline))
}

/// PUT /api/v1/timelines/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTimeline>,
) -> AppResult<Json<Timeline>> {
    let timeline = TimelineRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Timeline",
            id,
        }))?;
    Ok(Json(timeline))
}

/// DELETE /api/v1/timelines/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = TimelineRepo::hard_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Timeline",
            id,
        }))
    }
}

// -- Plot-element links --

/// POST /api/v1/timelines/{id}/plot-elements
///
/// Duplicate (timeline, plot element) pairs surface as 409 via the unique
/// constraint classifier.
pub async fn link_plot_element(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateTimelineLink>,
) -> AppResult<(StatusCode, Json<TimelinePlotElement>)> {
    let plot_element_id = input
        .plot_element_id
        .ok_or_else(|| AppError::BadRequest("plotElementId is required".to_string()))?;
    let relationship = input
        .relationship
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("relationship is required".to_string()))?;

    TimelineRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Timeline",
            id,
        }))?;
    PlotElementRepo::find_by_id(&state.pool, plot_element_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Plot element",
            id: plot_element_id,
        }))?;

    let link = TimelineRepo::link_plot_element(
        &state.pool,
        id,
        plot_element_id,
        relationship,
        input.description.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// PUT /api/v1/timelines/{id}/plot-elements/{plot_element_id}
pub async fn update_link(
    State(state): State<AppState>,
    Path((id, plot_element_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateTimelineLink>,
) -> AppResult<Json<TimelinePlotElement>> {
    let link = TimelineRepo::update_link(&state.pool, id, plot_element_id, &input)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Plot element {plot_element_id} is not linked to timeline {id}"
            ))
        })?;
    Ok(Json(link))
}

/// DELETE /api/v1/timelines/{id}/plot-elements/{plot_element_id}
pub async fn unlink_plot_element(
    State(state): State<AppState>,
    Path((id, plot_element_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let removed = TimelineRepo::unlink_plot_element(&state.pool, id, plot_element_id).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "Plot element {plot_element_id} is not linked to timeline {id}"
        )))
    }
}
