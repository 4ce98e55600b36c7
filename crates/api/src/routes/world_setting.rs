//! Route definitions for flat `/world-settings/{id}` item operations.
//!
//! List and create live under `/projects/{project_id}/world-settings`.

use axum::routing::get;
use axum::Router;

use crate::handlers::world_setting;
use crate::state::AppState;

/// Routes mounted at `/world-settings`.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(world_setting::get_by_id)
            .put(world_setting::update)
            .delete(world_setting::delete),
    )
}
