//! Route definitions for flat `/characters/{id}` item operations.
//!
//! List and create live under `/projects/{project_id}/characters`.

use axum::routing::get;
use axum::Router;

use crate::handlers::character;
use crate::state::AppState;

/// Routes mounted at `/characters`.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(character::get_by_id)
            .put(character::update)
            .delete(character::delete),
    )
}
