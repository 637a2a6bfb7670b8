//! Platform shooter simulation core.
//!
//! The library holds everything that decides what happens in a level: entity
//! kinematics, platform landing, the enemy policy, weapons and bullet
//! collisions. The terminal front-end in `main.rs` only feeds input in and
//! draws the resulting state.

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod levels;
pub mod map;
pub mod map_loader;
pub mod physics;
