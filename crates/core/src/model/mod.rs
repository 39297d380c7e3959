#![forbid(unsafe_code)]

mod comments;
mod custom_fields;
mod projects;
mod tags;
mod tasks;
mod users;
mod workspaces;

pub use comments::*;
pub use custom_fields::*;
pub use projects::*;
pub use tags::*;
pub use tasks::*;
pub use users::*;
pub use workspaces::*;
