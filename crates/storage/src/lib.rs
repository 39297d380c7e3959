#![forbid(unsafe_code)]

//! SQLite-backed entity store for tasklane.
//!
//! Every public operation on [`SqliteStore`] runs in one transaction: the target is resolved, the
//! actor's membership and ownership are re-read, invariants are checked, and only then is the write
//! committed. Any failure rolls the whole operation back.

mod config;
mod store;

pub use config::StoreConfig;
pub use store::*;
