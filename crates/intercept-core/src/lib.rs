//! Core types and definitions for the interception engine.
//!
//! This crate defines the vocabulary shared across all other crates:
//! kinematic snapshots, threat and asset records, configuration,
//! events, errors, and constants. It has no dependency on any host
//! physics or rendering framework.

pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod types;

pub use error::{InterceptError, Result};
pub use types::{KinematicState, Vec3};
