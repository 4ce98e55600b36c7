//! Route definitions for the `/projects` resource.
//!
//! Also nests collaborator list/create routes under
//! `/projects/{project_id}/...`; item operations for those entities live
//! on their own flat routers.

use axum::routing::get;
use axum::Router;

use crate::handlers::{character, project, timeline, world_setting};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
///
/// GET    /{project_id}/characters           -> list_by_project
/// POST   /{project_id}/characters           -> create
/// GET    /{project_id}/world-settings       -> list_by_project
/// POST   /{project_id}/world-settings       -> create
/// GET    /{project_id}/timelines            -> list_by_project
/// POST   /{project_id}/timelines            -> create
/// ```
pub fn router() -> Router<AppState> {
    let character_routes = Router::new().route(
        "/",
        get(character::list_by_project).post(character::create),
    );

    let world_setting_routes = Router::new().route(
        "/",
        get(world_setting::list_by_project).post(world_setting::create),
    );

    let timeline_routes = Router::new().route(
        "/",
        get(timeline::list_by_project).post(timeline::create),
    );

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .nest("/{project_id}/characters", character_routes)
        .nest("/{project_id}/world-settings", world_setting_routes)
        .nest("/{project_id}/timelines", timeline_routes)
}
