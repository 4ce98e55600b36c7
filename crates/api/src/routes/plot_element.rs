//! Route definitions for the `/plot-elements` resource.
//!
//! The list endpoint keeps the project id in the item position
//! (`GET /plot-elements/{project_id}`), so `/detail/{id}` carries the
//! single-node read.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::plot_element;
use crate::state::AppState;

/// Routes mounted at `/plot-elements`.
///
/// ```text
/// POST   /                                 -> create
/// GET    /{project_id}                     -> list_by_project (?type=&parentId=)
/// GET    /detail/{id}                      -> get_detail
/// PUT    /{id}                             -> update
/// DELETE /{id}                             -> delete
/// POST   /{id}/characters                  -> link_character
/// DELETE /{id}/characters/{character_id}   -> unlink_character
/// POST   /{id}/settings                    -> link_setting
/// DELETE /{id}/settings/{setting_id}       -> unlink_setting
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(plot_element::create))
        .route("/detail/{id}", get(plot_element::get_detail))
        .route(
            "/{id}",
            get(plot_element::list_by_project)
                .put(plot_element::update)
                .delete(plot_element::delete),
        )
        .route("/{id}/characters", post(plot_element::link_character))
        .route(
            "/{id}/characters/{character_id}",
            delete(plot_element::unlink_character),
        )
        .route("/{id}/settings", post(plot_element::link_setting))
        .route(
            "/{id}/settings/{setting_id}",
            delete(plot_element::unlink_setting),
        )
}
