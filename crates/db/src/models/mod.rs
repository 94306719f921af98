//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row plus the input DTOs its repository accepts.

pub mod category;
pub mod goal;
pub mod pattern;
pub mod stats;
pub mod user;
