//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument. Methods that must run inside a caller's
//! transaction take `&mut PgConnection` instead.

pub mod category_repo;
pub mod goal_repo;
pub mod pattern_repo;
pub mod stats_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use goal_repo::{AdvanceOutcome, GoalRepo};
pub use pattern_repo::PatternRepo;
pub use stats_repo::StatsRepo;
pub use user_repo::UserRepo;
