#![forbid(unsafe_code)]

//! Domain layer for tasklane: ids, entities, payloads, partial updates and the invariant checks
//! every write goes through. Nothing in this crate performs I/O.

pub mod entity;
pub mod filter;
pub mod ids;
pub mod model;
pub mod patch;
pub mod validate;

pub use entity::{EntityKind, EntityRef, OwnedRef};
pub use patch::Patch;
