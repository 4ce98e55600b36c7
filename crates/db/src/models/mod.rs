//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! All DTOs serialize with camelCase field names; `kind` maps to `"type"`
//! and `sort_order` to `"order"` on the wire.

pub mod character;
pub mod patch;
pub mod plot_element;
pub mod project;
pub mod timeline;
pub mod world_setting;
