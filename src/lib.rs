//! zeusfit - Personal strength training log
//!
//! Derives streaks, personal records and progressive-overload hints from a
//! user's stored workout history.

pub mod db;
pub mod export;
pub mod plan;
pub mod splits;
pub mod stats;
pub mod workout;

pub use db::Database;
pub use workout::{WorkoutPayload, WorkoutSession};
