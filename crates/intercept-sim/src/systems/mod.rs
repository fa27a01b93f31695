//! ECS systems that operate on the engagement world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only).
//! They do not own state: entity state lives in components, bookkeeping in
//! the engine.

pub mod cleanup;
pub mod fire_control;
pub mod guidance;
pub mod intercept;
pub mod movement;
pub mod raid_spawner;
pub mod snapshot;
