//! Engagement engine: the reference host loop.
//!
//! `EngagementEngine` owns the hecs ECS world, spawns raids, runs fire
//! control, guidance, integration and fuses at a fixed tick, and produces
//! `EngagementSnapshot`s. Completely headless, enabling deterministic testing.

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use intercept_core::components::{ProtectedAsset, ThreatId};
use intercept_core::config::{AssessmentConfig, FuseProfiles, GuidanceConfig};
use intercept_core::constants::{DT, INTERCEPTOR_LAUNCH_SPEED, INTERCEPTOR_MASS};
use intercept_core::enums::{AssetKind, ThreatClass};
use intercept_core::error::Result;
use intercept_core::events::EngagementEvent;
use intercept_core::types::{KinematicState, SimTime, Vec3};
use intercept_threat_eval::{AssetRegistry, ThreatAssessor, ThreatCluster};

use crate::components::{Interceptor, Threat};
use crate::engagement::{Battery, ScoreState, TargetRegistry};
use crate::systems;
use crate::systems::raid_spawner::RaidSchedule;
use crate::systems::snapshot::EngagementSnapshot;
use crate::world_setup;

/// Configuration for starting a new engagement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same engagement.
    pub seed: u64,
    pub battery_position: Vec3,
    pub magazine_size: u32,
    /// Interceptor launch speed (m/s).
    pub launch_speed: f64,
    pub interceptor_mass: f64,
    /// Interceptors self-destruct after this long (s).
    pub max_flight_secs: f64,
    pub prefer_lofted: bool,
    /// Ticks between assessment / fire-control cycles.
    pub assessment_interval_ticks: u64,
    pub max_launches_per_cycle: u32,
    pub fuse: FuseProfiles,
    pub guidance: GuidanceConfig,
    pub assessment: AssessmentConfig,
    pub assets: AssetRegistry,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            battery_position: Vec3::ZERO,
            magazine_size: 40,
            launch_speed: INTERCEPTOR_LAUNCH_SPEED,
            interceptor_mass: INTERCEPTOR_MASS,
            max_flight_secs: 60.0,
            prefer_lofted: false,
            assessment_interval_ticks: 30,
            max_launches_per_cycle: 4,
            fuse: FuseProfiles::default(),
            // The battery leads by the full predicted time-to-intercept.
            guidance: GuidanceConfig {
                lead_factor: 1.0,
                ..Default::default()
            },
            assessment: AssessmentConfig::default(),
            assets: default_assets(),
        }
    }
}

/// A city beside the battery and two smaller sites.
pub fn default_assets() -> AssetRegistry {
    AssetRegistry::new(vec![
        ProtectedAsset {
            name: "Central District".into(),
            position: Vec3::new(1500.0, 0.0, 500.0),
            radius: 1200.0,
            population: 40_000.0,
            strategic_value: 0.6,
            kind: AssetKind::City,
        },
        ProtectedAsset {
            name: "Power Station".into(),
            position: Vec3::new(-1000.0, 0.0, 1500.0),
            radius: 300.0,
            population: 200.0,
            strategic_value: 0.9,
            kind: AssetKind::PowerPlant,
        },
        ProtectedAsset {
            name: "Airbase".into(),
            position: Vec3::new(500.0, 0.0, -2000.0),
            radius: 800.0,
            population: 1500.0,
            strategic_value: 0.8,
            kind: AssetKind::MilitaryBase,
        },
    ])
}

/// The engagement engine. Owns the ECS world and all host state.
pub struct EngagementEngine {
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    config: SimConfig,
    assessor: ThreatAssessor,
    registry: TargetRegistry,
    battery: Battery,
    schedule: RaidSchedule,
    clusters: Vec<ThreatCluster>,
    events: Vec<EngagementEvent>,
    score: ScoreState,
    next_threat_id: u32,
    next_interceptor_id: u32,
    despawn_buffer: Vec<Entity>,
}

impl EngagementEngine {
    /// Create an engine for `schedule`. Fails if a fuse profile is invalid.
    pub fn new(config: SimConfig, schedule: RaidSchedule) -> Result<Self> {
        config.fuse.validate()?;
        log::info!(
            "engagement engine seeded with {}, {} threats scheduled",
            config.seed,
            schedule.total_threats()
        );
        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            assessor: ThreatAssessor::new(config.assessment, config.assets.clone()),
            registry: TargetRegistry::default(),
            battery: Battery {
                position: config.battery_position,
                magazine: config.magazine_size,
            },
            schedule,
            clusters: Vec::new(),
            events: Vec::new(),
            score: ScoreState::default(),
            next_threat_id: 0,
            next_interceptor_id: 0,
            despawn_buffer: Vec::new(),
            config,
        })
    }

    /// Advance the engagement by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> EngagementSnapshot {
        self.run_systems();
        self.time.advance(DT);

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            &self.registry,
            &self.battery,
            &self.clusters,
            events,
            &self.score,
        )
    }

    /// Tick until the raid is over or `max_ticks` have run. Returns ticks run.
    pub fn run_until_finished(&mut self, max_ticks: u64) -> u64 {
        for ticks in 0..max_ticks {
            if self.is_finished() {
                return ticks;
            }
            self.tick();
        }
        max_ticks
    }

    /// All waves spawned and nothing left in the air.
    pub fn is_finished(&self) -> bool {
        self.schedule.is_exhausted()
            && self.world.query::<&Threat>().iter().next().is_none()
            && self.world.query::<&Interceptor>().iter().next().is_none()
    }

    /// Insert a threat with an explicit state outside the raid schedule.
    pub fn spawn_threat(&mut self, class: ThreatClass, state: KinematicState) -> ThreatId {
        let id = ThreatId(self.next_threat_id);
        self.next_threat_id += 1;
        world_setup::spawn_threat(&mut self.world, id, class, state, self.time.elapsed_secs);
        self.score.threats_spawned += 1;
        id
    }

    /// Remove a threat by external action. Interceptors on it retarget.
    pub fn destroy_threat(&mut self, id: ThreatId) -> bool {
        let entity = self
            .world
            .query::<&Threat>()
            .iter()
            .find(|(_, threat)| threat.id == id)
            .map(|(entity, _)| entity);
        let Some(entity) = entity else {
            return false;
        };
        self.registry.forget(id);
        self.world.despawn(entity).is_ok()
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn clusters(&self) -> &[ThreatCluster] {
        &self.clusters
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let now = self.time.elapsed_secs;
        let after_step = now + DT;

        // 1. Raid spawning
        let aim_points: Vec<Vec3> = self
            .config
            .assets
            .assets()
            .iter()
            .map(|a| a.position)
            .collect();
        systems::raid_spawner::run(
            &mut self.world,
            &mut self.rng,
            &mut self.schedule,
            &aim_points,
            &mut self.next_threat_id,
            &mut self.score,
            self.time.tick,
            now,
        );
        // 2. Assessment + fire control
        if self
            .time
            .tick
            .is_multiple_of(self.config.assessment_interval_ticks.max(1))
        {
            self.clusters = systems::fire_control::run(
                &mut self.world,
                &self.assessor,
                &mut self.registry,
                &mut self.battery,
                &self.config,
                &mut self.next_interceptor_id,
                &mut self.events,
                &mut self.score,
                now,
            );
        }
        // 3. Guidance
        systems::guidance::run(
            &mut self.world,
            &mut self.registry,
            &self.config,
            DT,
            &mut self.events,
        );
        // 4. Movement integration
        systems::movement::run(&mut self.world, DT);
        // 5. Fuses and kill rolls
        systems::intercept::run(
            &mut self.world,
            &mut self.registry,
            &mut self.rng,
            &mut self.events,
            &mut self.score,
            after_step,
        );
        // 6. Cleanup (impacts, crashed or expired interceptors)
        systems::cleanup::run(
            &mut self.world,
            &mut self.registry,
            &mut self.events,
            &mut self.score,
            &mut self.despawn_buffer,
            self.config.max_flight_secs,
            after_step,
        );
    }
}
