//! Domain logic for the Storyloom outline system.
//!
//! Everything in this crate is pure: no database, no HTTP. The db and api
//! crates depend on the vocabularies and validation here; the outline
//! (client engine) crate reuses the hierarchy builder and reorder math so
//! both tiers agree on ordering semantics.

pub mod error;
pub mod hierarchy;
pub mod outline;
pub mod reorder;
pub mod types;
