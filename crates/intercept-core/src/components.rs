//! Records exchanged between the core and its host.
//!
//! Plain data with no behavior beyond trivial accessors.

use serde::{Deserialize, Serialize};

use crate::enums::{AssetKind, ThreatClass};
use crate::types::{KinematicState, Vec3};

/// Stable identifier assigned by the host's threat spawner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThreatId(pub u32);

/// A threat as seen by the assessment layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatRecord {
    pub id: ThreatId,
    pub class: ThreatClass,
    pub state: KinematicState,
    /// Simulation time at spawn (s).
    pub spawn_time: f64,
    /// Cleared by the host on impact or kill.
    pub active: bool,
}

/// Static registry entry for something worth defending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectedAsset {
    pub name: String,
    pub position: Vec3,
    /// Footprint radius (m).
    pub radius: f64,
    pub population: f64,
    /// Relative strategic value in `[0, 1]`.
    pub strategic_value: f64,
    pub kind: AssetKind,
}

/// What an interceptor is steering toward. Resolved to a
/// [`KinematicState`] by the host before every guidance call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TargetRef {
    /// A live threat, looked up by id.
    Tracked(ThreatId),
    /// A fixed aim point in space.
    FixedPoint(Vec3),
}

impl TargetRef {
    /// Threat id if this reference tracks one.
    pub fn threat_id(&self) -> Option<ThreatId> {
        match self {
            TargetRef::Tracked(id) => Some(*id),
            TargetRef::FixedPoint(_) => None,
        }
    }
}

/// Launch solution produced once at launch time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchParameters {
    /// Elevation above the horizontal (rad).
    pub angle: f64,
    /// Horizontal bearing, `atan2(dz, dx)` (rad).
    pub azimuth: f64,
    /// Launch speed (m/s).
    pub speed: f64,
    /// Whether the high-arc root was chosen.
    pub lofted: bool,
}

impl LaunchParameters {
    /// Initial velocity vector for the interceptor's physics body.
    pub fn initial_velocity(&self) -> Vec3 {
        let horizontal = self.speed * self.angle.cos();
        Vec3::new(
            horizontal * self.azimuth.cos(),
            self.speed * self.angle.sin(),
            horizontal * self.azimuth.sin(),
        )
    }
}

/// Mutable fuse state owned by exactly one interceptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProximityFuseState {
    pub armed: bool,
    /// Terminal and monotonic: never returns to `false`.
    pub detonated: bool,
    /// Cumulative flight distance since launch or last retarget (m).
    pub distance_traveled: f64,
    /// Simulation time of the last proximity scan (s).
    pub last_scan_time: Option<f64>,
}
