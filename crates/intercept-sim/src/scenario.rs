//! Scenario definitions: hardcoded raid schedules.

use std::f64::consts::PI;

use intercept_core::constants::TICK_RATE;
use intercept_core::enums::ThreatClass;

use crate::systems::raid_spawner::{RaidSchedule, RaidWave};

/// Mixed raid: 3 waves, 9 threats, random bearings then a single axis.
pub fn mixed_raid() -> RaidSchedule {
    let east = 0.0;

    RaidSchedule {
        waves: vec![
            // t=0: short-range indirect fire
            RaidWave::new(0, vec![(ThreatClass::Mortar, 2), (ThreatClass::Drone, 1)]),
            // t=10s: rockets and a cruise missile
            RaidWave::new(
                secs_to_ticks(10.0),
                vec![(ThreatClass::Rocket, 2), (ThreatClass::CruiseMissile, 1)],
            ),
            // t=20s: ballistic missile with drone escort from the east
            RaidWave::with_bearing(
                secs_to_ticks(20.0),
                vec![(ThreatClass::BallisticMissile, 1), (ThreatClass::Drone, 2)],
                east,
            ),
        ],
    }
}

/// Saturation raid: 6 rockets on one axis in the same tick, then 4 mortars.
pub fn saturation_raid() -> RaidSchedule {
    let north = PI / 2.0;

    RaidSchedule {
        waves: vec![
            RaidWave::with_bearing(0, vec![(ThreatClass::Rocket, 6)], north),
            RaidWave::with_bearing(secs_to_ticks(8.0), vec![(ThreatClass::Mortar, 4)], north),
        ],
    }
}

/// Convert seconds to ticks.
pub fn secs_to_ticks(secs: f64) -> u64 {
    (secs * TICK_RATE as f64) as u64
}
