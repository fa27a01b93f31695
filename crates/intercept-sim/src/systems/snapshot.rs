//! Snapshot system: queries the ECS world and builds an `EngagementSnapshot`.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;
use serde::{Deserialize, Serialize};

use intercept_core::components::{TargetRef, ThreatId};
use intercept_core::enums::{GuidancePhase, ThreatClass};
use intercept_core::events::EngagementEvent;
use intercept_core::types::{KinematicState, SimTime, Vec3};
use intercept_guidance::{GuidanceController, ProximityFuse};
use intercept_threat_eval::ThreatCluster;

use crate::components::{Interceptor, Threat};
use crate::engagement::{Battery, ScoreState, TargetRegistry};

/// Complete view of the engagement after one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementSnapshot {
    pub time: SimTime,
    pub threats: Vec<ThreatView>,
    pub interceptors: Vec<InterceptorView>,
    /// Clusters from the most recent assessment cycle.
    pub clusters: Vec<ThreatCluster>,
    /// Events raised during this tick only.
    pub events: Vec<EngagementEvent>,
    pub magazine: u32,
    pub score: ScoreView,
}

impl EngagementSnapshot {
    /// Compact JSON for replay logs.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatView {
    pub id: ThreatId,
    pub class: ThreatClass,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Interceptors currently committed.
    pub assigned: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterceptorView {
    pub id: u32,
    pub target: TargetRef,
    pub position: Vec3,
    pub velocity: Vec3,
    pub phase: GuidancePhase,
    pub armed: bool,
    pub reengagements: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreView {
    pub threats_spawned: u32,
    pub threats_killed: u32,
    pub threats_impacted: u32,
    pub interceptors_fired: u32,
    pub detonations: u32,
}

/// Build a snapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    registry: &TargetRegistry,
    battery: &Battery,
    clusters: &[ThreatCluster],
    events: Vec<EngagementEvent>,
    score: &ScoreState,
) -> EngagementSnapshot {
    EngagementSnapshot {
        time: *time,
        threats: build_threats(world, registry),
        interceptors: build_interceptors(world),
        clusters: clusters.to_vec(),
        events,
        magazine: battery.magazine,
        score: ScoreView {
            threats_spawned: score.threats_spawned,
            threats_killed: score.threats_killed,
            threats_impacted: score.threats_impacted,
            interceptors_fired: score.interceptors_fired,
            detonations: score.detonations,
        },
    }
}

fn build_threats(world: &World, registry: &TargetRegistry) -> Vec<ThreatView> {
    let mut threats: Vec<ThreatView> = world
        .query::<(&Threat, &KinematicState)>()
        .iter()
        .map(|(_, (threat, state))| ThreatView {
            id: threat.id,
            class: threat.class,
            position: state.position,
            velocity: state.velocity,
            assigned: registry.assigned_count(threat.id),
        })
        .collect();
    threats.sort_by_key(|t| t.id);
    threats
}

fn build_interceptors(world: &World) -> Vec<InterceptorView> {
    let mut interceptors: Vec<InterceptorView> = world
        .query::<(&Interceptor, &KinematicState, &GuidanceController, &ProximityFuse)>()
        .iter()
        .map(|(_, (interceptor, state, guidance, fuse))| InterceptorView {
            id: interceptor.id,
            target: interceptor.target,
            position: state.position,
            velocity: state.velocity,
            phase: guidance.phase(),
            armed: fuse.is_armed(),
            reengagements: guidance.reengagement_attempts(),
        })
        .collect();
    interceptors.sort_by_key(|i| i.id);
    interceptors
}
