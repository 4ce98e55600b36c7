//! Route definitions for `/timelines` items and their plot-element links.
//!
//! List and create live under `/projects/{project_id}/timelines`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::timeline;
use crate::state::AppState;

/// Routes mounted at `/timelines`.
///
/// ```text
/// GET    /{id}                                    -> get_by_id
/// PUT    /{id}                                    -> update
/// DELETE /{id}                                    -> delete
/// POST   /{id}/plot-elements                      -> link_plot_element
/// PUT    /{id}/plot-elements/{plot_element_id}    -> update_link
/// DELETE /{id}/plot-elements/{plot_element_id}    -> unlink_plot_element
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(timeline::get_by_id)
                .put(timeline::update)
                .delete(timeline::delete),
        )
        .route("/{id}/plot-elements", post(timeline::link_plot_element))
        .route(
            "/{id}/plot-elements/{plot_element_id}",
            put(timeline::update_link).delete(timeline::unlink_plot_element),
        )
}
