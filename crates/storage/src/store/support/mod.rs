#![forbid(unsafe_code)]

mod lookup;
mod rows;
mod schema;
mod time;

pub(super) use lookup::*;
pub(super) use rows::*;
pub(super) use schema::install_schema;
pub(super) use time::now_ms;
