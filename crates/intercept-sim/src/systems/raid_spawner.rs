//! Raid spawning system: spawns threat waves at scheduled ticks.

use hecs::World;
use rand_chacha::ChaCha8Rng;

use intercept_core::components::ThreatId;
use intercept_core::enums::ThreatClass;
use intercept_core::types::Vec3;

use crate::engagement::ScoreState;
use crate::world_setup;

/// A single wave definition.
#[derive(Debug, Clone)]
pub struct RaidWave {
    /// Tick at which this wave spawns.
    pub spawn_at_tick: u64,
    /// Threats to spawn: (class, count).
    pub threats: Vec<(ThreatClass, u32)>,
    /// Approach bearing in the horizontal plane (rad). Random per threat if `None`.
    pub bearing: Option<f64>,
    /// Whether this wave has already been spawned.
    pub spawned: bool,
}

impl RaidWave {
    pub fn new(spawn_at_tick: u64, threats: Vec<(ThreatClass, u32)>) -> Self {
        Self {
            spawn_at_tick,
            threats,
            bearing: None,
            spawned: false,
        }
    }

    pub fn with_bearing(spawn_at_tick: u64, threats: Vec<(ThreatClass, u32)>, bearing: f64) -> Self {
        Self {
            bearing: Some(bearing),
            ..Self::new(spawn_at_tick, threats)
        }
    }
}

/// The complete timed raid for a run.
#[derive(Debug, Clone, Default)]
pub struct RaidSchedule {
    pub waves: Vec<RaidWave>,
}

impl RaidSchedule {
    /// Total number of threats across all waves.
    pub fn total_threats(&self) -> u32 {
        self.waves
            .iter()
            .flat_map(|w| w.threats.iter())
            .map(|(_, count)| count)
            .sum()
    }

    /// True once every wave has spawned.
    pub fn is_exhausted(&self) -> bool {
        self.waves.iter().all(|w| w.spawned)
    }
}

/// Check the schedule and spawn any due waves, aimed at `aim_points`.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    schedule: &mut RaidSchedule,
    aim_points: &[Vec3],
    next_threat_id: &mut u32,
    score: &mut ScoreState,
    current_tick: u64,
    now: f64,
) {
    for wave in &mut schedule.waves {
        if wave.spawned || current_tick < wave.spawn_at_tick {
            continue;
        }
        for &(class, count) in &wave.threats {
            for _ in 0..count {
                let id = ThreatId(*next_threat_id);
                *next_threat_id += 1;
                world_setup::spawn_raid_threat(world, rng, id, class, wave.bearing, aim_points, now);
                score.threats_spawned += 1;
            }
        }
        log::debug!(
            "wave at tick {} spawned {} threats",
            wave.spawn_at_tick,
            wave.threats.iter().map(|(_, n)| n).sum::<u32>()
        );
        wave.spawned = true;
    }
}
