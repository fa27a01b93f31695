//! Reference host for the interception engine.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate, and
//! produces `EngagementSnapshot`s. Integrates motion itself so the core
//! crates can be exercised end to end.

pub mod components;
pub mod engagement;
pub mod engine;
pub mod scenario;
pub mod systems;
pub mod world_setup;

pub use engine::{EngagementEngine, SimConfig};
pub use intercept_core as core;
pub use systems::raid_spawner::{RaidSchedule, RaidWave};
pub use systems::snapshot::EngagementSnapshot;

#[cfg(test)]
mod tests;
