//! Domain logic for the Waypoint goal tracker.
//!
//! This crate has no I/O and no internal dependencies so it can be shared by
//! the repository layer, the HTTP layer, and tests alike.

pub mod analytics;
pub mod category;
pub mod clock;
pub mod error;
pub mod goal;
pub mod lifecycle;
pub mod listing;
pub mod ownership;
pub mod recurrence;
pub mod timezone;
pub mod types;
