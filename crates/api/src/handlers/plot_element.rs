//! Handlers for the `/plot-elements` resource: the outline tree CRUD plus
//! character and world-setting relation rows.
//!
//! List and detail responses carry display projections (parent summary,
//! child summaries, relation lists) so clients can render an outline level
//! without issuing one request per node.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use storyloom_core::error::CoreError;
use storyloom_core::outline::{validate_kind, validate_status, validate_title};
use storyloom_core::types::DbId;
use storyloom_db::models::plot_element::{
    CharacterLink, ChildDetail, ChildSummary, CreateCharacterLink, CreatePlotElement,
    CreateSettingLink, NewPlotElement, ParentSummary, PlotElement, SettingLink, TimelineLink,
    UpdatePlotElement,
};
use storyloom_db::repositories::{CharacterRepo, ParentFilter, PlotElementRepo, ProjectRepo, WorldSettingRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for the list endpoint.
///
/// `parentId` is a string so the `null` sentinel (roots only) can be told
/// apart from an absent parameter.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub parent_id: Option<String>,
}

/// List projection: a plot element with its display relations.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotElementWithRelations {
    #[serde(flatten)]
    pub element: PlotElement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentSummary>,
    pub children: Vec<ChildSummary>,
    pub characters: Vec<CharacterLink>,
    pub settings: Vec<SettingLink>,
    pub timelines: Vec<TimelineLink>,
}

/// Detail projection: children carry word counts, relations carry the
/// richer display fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotElementDetail {
    #[serde(flatten)]
    pub element: PlotElement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentSummary>,
    pub children: Vec<ChildDetail>,
    pub characters: Vec<CharacterLink>,
    pub settings: Vec<SettingLink>,
    pub timelines: Vec<TimelineLink>,
}

/// POST /api/v1/plot-elements
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreatePlotElement>,
) -> AppResult<(StatusCode, Json<PlotElement>)> {
    let project_id = input
        .project_id
        .ok_or_else(|| AppError::BadRequest("projectId is required".to_string()))?;
    let title = input
        .title
        .ok_or_else(|| AppError::BadRequest("title is required".to_string()))?;
    let kind = input
        .kind
        .ok_or_else(|| AppError::BadRequest("type is required".to_string()))?;

    validate_title(&title)?;
    validate_kind(&kind)?;
    if let Some(status) = &input.status {
        validate_status(status)?;
    }

    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    if let Some(parent_id) = input.parent_id {
        let parent = PlotElementRepo::find_by_id(&state.pool, parent_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Plot element",
                id: parent_id,
            }))?;
        if parent.project_id != project_id {
            return Err(AppError::BadRequest(
                "parentId must reference a plot element in the same project".to_string(),
            ));
        }
    }

    let new = NewPlotElement {
        project_id,
        title,
        kind,
        parent_id: input.parent_id,
        sort_order: input.sort_order,
        status: input.status,
        summary: input.summary,
        content: input.content,
        notes: input.notes,
        mood: input.mood,
        pov: input.pov,
        target_words: input.target_words,
        auto_create_children: input.auto_create_children,
    };
    let element = PlotElementRepo::create(&state.pool, &new).await?;
    Ok((StatusCode::CREATED, Json(element)))
}

/// GET /api/v1/plot-elements/{project_id}?type=&parentId=
///
/// `parentId=null` selects root nodes; a numeric `parentId` selects the
/// direct children of that node.
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<PlotElementWithRelations>>> {
    if let Some(kind) = &query.kind {
        validate_kind(kind)?;
    }
    let parent = match query.parent_id.as_deref() {
        None => ParentFilter::Any,
        Some("null") => ParentFilter::Root,
        Some(raw) => {
            let id: DbId = raw.parse().map_err(|_| {
                AppError::BadRequest(format!("Invalid parentId '{raw}': expected a number or 'null'"))
            })?;
            ParentFilter::Node(id)
        }
    };

    let elements =
        PlotElementRepo::list_by_project(&state.pool, project_id, query.kind.as_deref(), parent)
            .await?;

    let ids: Vec<DbId> = elements.iter().map(|e| e.id).collect();
    let mut parent_ids: Vec<DbId> = elements.iter().filter_map(|e| e.parent_id).collect();
    parent_ids.sort_unstable();
    parent_ids.dedup();

    let parents: HashMap<DbId, ParentSummary> = PlotElementRepo::summaries(&state.pool, &parent_ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut children: HashMap<DbId, Vec<ChildSummary>> = HashMap::new();
    for child in PlotElementRepo::child_summaries(&state.pool, &ids).await? {
        if let Some(parent_id) = child.parent_id {
            children.entry(parent_id).or_default().push(child);
        }
    }

    let mut characters = group_by_element(
        PlotElementRepo::character_links(&state.pool, &ids, false).await?,
        |l: &CharacterLink| l.plot_element_id,
    );
    let mut settings = group_by_element(
        PlotElementRepo::setting_links(&state.pool, &ids, false).await?,
        |l: &SettingLink| l.plot_element_id,
    );
    let mut timelines = group_by_element(
        PlotElementRepo::timeline_links(&state.pool, &ids, false).await?,
        |l: &TimelineLink| l.plot_element_id,
    );

    let items = elements
        .into_iter()
        .map(|element| {
            let id = element.id;
            PlotElementWithRelations {
                parent: element.parent_id.and_then(|p| parents.get(&p).cloned()),
                children: children.remove(&id).unwrap_or_default(),
                characters: characters.remove(&id).unwrap_or_default(),
                settings: settings.remove(&id).unwrap_or_default(),
                timelines: timelines.remove(&id).unwrap_or_default(),
                element,
            }
        })
        .collect();

    Ok(Json(items))
}

/// GET /api/v1/plot-elements/detail/{id}
pub async fn get_detail(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<PlotElementDetail>> {
    let element = PlotElementRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Plot element",
            id,
        }))?;

    let parent = match element.parent_id {
        Some(parent_id) => PlotElementRepo::summaries(&state.pool, &[parent_id])
            .await?
            .into_iter()
            .next(),
        None => None,
    };

    let children: Vec<ChildDetail> = PlotElementRepo::child_summaries(&state.pool, &[id])
        .await?
        .into_iter()
        .map(ChildDetail::from)
        .collect();

    let characters = PlotElementRepo::character_links(&state.pool, &[id], true).await?;
    let settings = PlotElementRepo::setting_links(&state.pool, &[id], true).await?;
    let timelines = PlotElementRepo::timeline_links(&state.pool, &[id], true).await?;

    Ok(Json(PlotElementDetail {
        element,
        parent,
        children,
        characters,
        settings,
        timelines,
    }))
}

/// PUT /api/v1/plot-elements/{id}
///
/// Parent reassignment validates that the new parent exists, belongs to
/// the same project, and is not inside the node's own subtree.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePlotElement>,
) -> AppResult<Json<PlotElement>> {
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    if let Some(kind) = &input.kind {
        validate_kind(kind)?;
    }
    if let Some(status) = &input.status {
        validate_status(status)?;
    }

    let element = PlotElementRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Plot element",
            id,
        }))?;

    if let Some(Some(new_parent)) = input.parent_id {
        let parent = PlotElementRepo::find_by_id(&state.pool, new_parent)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Plot element",
                id: new_parent,
            }))?;
        if parent.project_id != element.project_id {
            return Err(AppError::BadRequest(
                "parentId must reference a plot element in the same project".to_string(),
            ));
        }
        // The subtree check includes the node itself, so self-parenting is
        // caught here too.
        if PlotElementRepo::is_descendant(&state.pool, id, new_parent).await? {
            return Err(AppError::BadRequest(
                "parentId would create a cycle in the outline".to_string(),
            ));
        }
    }

    let updated = PlotElementRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Plot element",
            id,
        }))?;
    Ok(Json(updated))
}

/// DELETE /api/v1/plot-elements/{id}
///
/// Refuses to delete a node with children; clients remove subtrees
/// leaf-first.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let children = PlotElementRepo::count_children(&state.pool, id).await?;
    if children > 0 {
        return Err(AppError::BadRequest(format!(
            "Cannot delete a plot element with {children} children; delete or move them first"
        )));
    }
    let deleted = PlotElementRepo::hard_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Plot element",
            id,
        }))
    }
}

// -- Relation rows --

/// POST /api/v1/plot-elements/{id}/characters
pub async fn link_character(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateCharacterLink>,
) -> AppResult<(StatusCode, Json<CharacterLink>)> {
    let character_id = input
        .character_id
        .ok_or_else(|| AppError::BadRequest("characterId is required".to_string()))?;

    PlotElementRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Plot element",
            id,
        }))?;
    CharacterRepo::find_by_id(&state.pool, character_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id: character_id,
        }))?;

    let link = PlotElementRepo::link_character(
        &state.pool,
        id,
        character_id,
        input.role.as_deref(),
        input.importance.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// DELETE /api/v1/plot-elements/{id}/characters/{character_id}
pub async fn unlink_character(
    State(state): State<AppState>,
    Path((id, character_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let removed = PlotElementRepo::unlink_character(&state.pool, id, character_id).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "Character {character_id} is not linked to plot element {id}"
        )))
    }
}

/// POST /api/v1/plot-elements/{id}/settings
pub async fn link_setting(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateSettingLink>,
) -> AppResult<(StatusCode, Json<SettingLink>)> {
    let setting_id = input
        .setting_id
        .ok_or_else(|| AppError::BadRequest("settingId is required".to_string()))?;

    PlotElementRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Plot element",
            id,
        }))?;
    WorldSettingRepo::find_by_id(&state.pool, setting_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "World setting",
            id: setting_id,
        }))?;

    let link =
        PlotElementRepo::link_setting(&state.pool, id, setting_id, input.relevance.as_deref())
            .await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// DELETE /api/v1/plot-elements/{id}/settings/{setting_id}
pub async fn unlink_setting(
    State(state): State<AppState>,
    Path((id, setting_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let removed = PlotElementRepo::unlink_setting(&state.pool, id, setting_id).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "World setting {setting_id} is not linked to plot element {id}"
        )))
    }
}

/// Group relation rows by their owning plot element id.
fn group_by_element<T>(rows: Vec<T>, key: impl Fn(&T) -> DbId) -> HashMap<DbId, Vec<T>> {
    let mut grouped: HashMap<DbId, Vec<T>> = HashMap::new();
    for row in rows {
        grouped.entry(key(&row)).or_default().push(row);
    }
    grouped
}
