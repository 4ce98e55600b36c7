//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod character_repo;
pub mod plot_element_repo;
pub mod project_repo;
pub mod timeline_repo;
pub mod world_setting_repo;

pub use character_repo::CharacterRepo;
pub use plot_element_repo::{ParentFilter, PlotElementRepo};
pub use project_repo::ProjectRepo;
pub use timeline_repo::TimelineRepo;
pub use world_setting_repo::WorldSettingRepo;
