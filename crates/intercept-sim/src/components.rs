//! ECS components owned by the reference host.
//!
//! Guidance and fuse state live on the interceptor entity as the
//! `GuidanceController` and `ProximityFuse` values themselves.

use intercept_core::components::{LaunchParameters, TargetRef, ThreatId};
use intercept_core::enums::ThreatClass;
use intercept_core::types::Vec3;

/// Marker + identity for a threat entity.
#[derive(Debug, Clone, Copy)]
pub struct Threat {
    pub id: ThreatId,
    pub class: ThreatClass,
    /// Simulation time at spawn (s).
    pub spawn_time: f64,
}

/// Marker + identity for an interceptor entity.
#[derive(Debug, Clone, Copy)]
pub struct Interceptor {
    pub id: u32,
    pub target: TargetRef,
    pub launch: LaunchParameters,
    /// Simulation time at launch (s).
    pub launched_at: f64,
    /// Single-shot Pk from the assessment that committed this round.
    pub pk: f64,
    /// Where the target was last seen, for falling back to a fixed aim point.
    pub last_target_position: Vec3,
}

/// Force the guidance system commanded this tick (N).
#[derive(Debug, Clone, Copy, Default)]
pub struct AppliedForce(pub Vec3);
