//! Events emitted by the engine for the host's effects and fire-control layers.

use serde::{Deserialize, Serialize};

use crate::components::{TargetRef, ThreatId};
use crate::enums::{GuidancePhase, ThreatClass};
use crate::types::Vec3;

/// Emitted once when a proximity fuse transitions to detonated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetonationEvent {
    /// Interceptor position at detonation.
    pub position: Vec3,
    /// Detonation quality in `[0, 1]`.
    pub quality: f64,
    /// Distance to the target at the detonating scan (m).
    pub miss_distance: f64,
    /// Simulation time of the scan (s).
    pub time: f64,
}

/// Engagement lifecycle events reported by a host loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngagementEvent {
    /// Interceptor launched at a threat.
    Launched {
        interceptor_id: u32,
        threat_id: ThreatId,
        angle: f64,
        azimuth: f64,
    },
    /// Guidance phase changed.
    PhaseChanged {
        interceptor_id: u32,
        from: GuidancePhase,
        to: GuidancePhase,
    },
    /// Interceptor lost its target and picked a new one.
    Retargeted {
        interceptor_id: u32,
        target: TargetRef,
    },
    /// Proximity fuse fired.
    Detonated {
        interceptor_id: u32,
        detonation: DetonationEvent,
    },
    /// Threat destroyed by a detonation.
    ThreatKilled { threat_id: ThreatId },
    /// Threat reached the ground.
    ThreatImpact {
        threat_id: ThreatId,
        class: ThreatClass,
        position: Vec3,
    },
    /// Fire control declined to engage a threat.
    EngagementSkipped {
        threat_id: ThreatId,
        reason: String,
    },
}
