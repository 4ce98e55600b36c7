//! Client-side outline engine.
//!
//! Holds a local mirror of a project's plot element tree and applies
//! mutations optimistically: each command mutates the local state first,
//! then awaits the server call, and rolls the local state back when the
//! call fails. Rendering goes through the shared hierarchy builder in
//! `storyloom_core`, so the client and server agree on ordering semantics.

pub mod api;
pub mod drag;
pub mod engine;
pub mod error;
pub mod state;

pub use api::{CreateNode, HttpOutlineApi, OutlineApi, OutlineNode, UpdateNode};
pub use drag::{resolve_drag, DragPlan};
pub use engine::OutlineEngine;
pub use error::{OutlineError, OutlineResult};
pub use state::{OutlineState, ViewMode};
