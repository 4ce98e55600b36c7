pub mod character;
pub mod health;
pub mod plot_element;
pub mod project;
pub mod timeline;
pub mod world_setting;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                        list, create
/// /projects/{id}                                   get, update, delete
/// /projects/{project_id}/characters                list, create
/// /projects/{project_id}/world-settings            list, create
/// /projects/{project_id}/timelines                 list, create
///
/// /characters/{id}                                 get, update, delete
/// /world-settings/{id}                             get, update, delete
///
/// /timelines/{id}                                  get, update, delete
/// /timelines/{id}/plot-elements                    link (POST)
/// /timelines/{id}/plot-elements/{plot_element_id}  update link, unlink
///
/// /plot-elements                                   create
/// /plot-elements/{project_id}                      list (?type=&parentId=)
/// /plot-elements/detail/{id}                       detail
/// /plot-elements/{id}                              update, delete
/// /plot-elements/{id}/characters                   link (POST)
/// /plot-elements/{id}/characters/{character_id}    unlink
/// /plot-elements/{id}/settings                     link (POST)
/// /plot-elements/{id}/settings/{setting_id}        unlink
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Project routes (also nests characters, world settings, timelines).
        .nest("/projects", project::router())
        // Flat item routes for project-scoped collaborator entities.
        .nest("/characters", character::router())
        .nest("/world-settings", world_setting::router())
        // Timeline items and their plot-element links.
        .nest("/timelines", timeline::router())
        // The outline tree.
        .nest("/plot-elements", plot_element::router())
}
