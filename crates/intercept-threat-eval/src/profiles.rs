//! Class-specific lethality and engagement profiles.
//!
//! Consolidates per-class parameters for assessment scoring.

use intercept_core::enums::{MotionModel, ThreatClass};

/// Static profile for a threat class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreatClassProfile {
    /// Radius of the damage footprint around the impact point (m).
    pub damage_radius: f64,
    /// Multiplier on single-shot intercept probability.
    pub pk_factor: f64,
    /// Fixed priority bonus (0–10).
    pub priority_bonus: f64,
    /// Extra interceptors added on top of the Pk-derived salvo size.
    pub extra_interceptors: u32,
    /// Model used to project the threat forward.
    pub motion_model: MotionModel,
}

/// Get the profile for a given threat class.
pub fn get_profile(class: ThreatClass) -> ThreatClassProfile {
    match class {
        ThreatClass::BallisticMissile => ThreatClassProfile {
            damage_radius: 500.0,
            pk_factor: 0.75,
            priority_bonus: 10.0,
            extra_interceptors: 1,
            motion_model: class.motion_model(),
        },
        ThreatClass::CruiseMissile => ThreatClassProfile {
            damage_radius: 300.0,
            pk_factor: 0.85,
            priority_bonus: 8.0,
            extra_interceptors: 0,
            motion_model: class.motion_model(),
        },
        ThreatClass::Rocket => ThreatClassProfile {
            damage_radius: 150.0,
            pk_factor: 0.9,
            priority_bonus: 5.0,
            extra_interceptors: 0,
            motion_model: class.motion_model(),
        },
        ThreatClass::Mortar => ThreatClassProfile {
            damage_radius: 80.0,
            pk_factor: 0.95,
            priority_bonus: 3.0,
            extra_interceptors: 0,
            motion_model: class.motion_model(),
        },
        ThreatClass::Drone => ThreatClassProfile {
            damage_radius: 50.0,
            pk_factor: 0.95,
            priority_bonus: 2.0,
            extra_interceptors: 0,
            motion_model: class.motion_model(),
        },
    }
}
