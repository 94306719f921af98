pub mod auth;
pub mod categories;
pub mod goals;
pub mod patterns;
pub mod stats;
