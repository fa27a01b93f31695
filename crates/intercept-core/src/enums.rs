//! Enumeration types used throughout the engine.

use serde::{Deserialize, Serialize};

/// Threat category. Immutable per threat instance; drives the damage radius,
/// Pk factor, priority bonus and prediction model lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThreatClass {
    /// Short-range indirect-fire round.
    Mortar,
    /// Unguided artillery rocket.
    Rocket,
    /// Air-breathing, terrain-following missile.
    CruiseMissile,
    /// High-arc, high-speed ballistic missile.
    BallisticMissile,
    /// Slow loitering munition.
    Drone,
}

impl ThreatClass {
    pub const ALL: [ThreatClass; 5] = [
        ThreatClass::Mortar,
        ThreatClass::Rocket,
        ThreatClass::CruiseMissile,
        ThreatClass::BallisticMissile,
        ThreatClass::Drone,
    ];

    /// Motion model used to predict where this class will be.
    pub fn motion_model(self) -> MotionModel {
        match self {
            ThreatClass::Mortar | ThreatClass::Rocket | ThreatClass::BallisticMissile => {
                MotionModel::Ballistic
            }
            ThreatClass::CruiseMissile | ThreatClass::Drone => MotionModel::Linear,
        }
    }
}

/// Forward-projection model for a target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionModel {
    /// Constant velocity.
    #[default]
    Linear,
    /// Constant velocity with gravity acting on the vertical axis.
    Ballistic,
}

/// Interceptor guidance phase.
///
/// Transitions are one-directional except Midcourse ⇄ ReEngagement,
/// which is bounded by the configured re-engagement attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuidancePhase {
    /// Flying the launch heading unmodified until clear of the launcher.
    #[default]
    LaunchClearance,
    /// Lead-pursuit correction toward the predicted intercept point.
    Midcourse,
    /// Boosted turnaround after a near miss.
    ReEngagement,
}

/// Arrival pattern of a threat cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClusterPattern {
    /// Near-simultaneous impacts.
    Saturation,
    /// Spread over a wide area.
    Distributed,
    /// Impacts staggered over a long window.
    Sequential,
    /// Anything in between.
    Mixed,
}

/// Kind of protected asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetKind {
    #[default]
    City,
    MilitaryBase,
    PowerPlant,
    Infrastructure,
    Battery,
}
