//! Entity spawn factories for the engagement world.
//!
//! Creates threat and interceptor entities with their component bundles.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use intercept_core::components::{LaunchParameters, TargetRef, ThreatId};
use intercept_core::constants::GRAVITY;
use intercept_core::enums::{MotionModel, ThreatClass};
use intercept_core::types::{horizontal_distance, KinematicState, Vec3};
use intercept_guidance::{GuidanceController, ProximityFuse};

use crate::components::{AppliedForce, Interceptor, Threat};

/// Spawn geometry for a threat class.
struct SpawnProfile {
    min_range: f64,
    max_range: f64,
    altitude: f64,
    /// Horizontal speed toward the aim point (m/s).
    horizontal_speed: f64,
    mass: f64,
}

fn spawn_profile(class: ThreatClass) -> SpawnProfile {
    match class {
        ThreatClass::Mortar => SpawnProfile {
            min_range: 2500.0,
            max_range: 3500.0,
            altitude: 400.0,
            horizontal_speed: 120.0,
            mass: 15.0,
        },
        ThreatClass::Rocket => SpawnProfile {
            min_range: 4000.0,
            max_range: 6000.0,
            altitude: 1500.0,
            horizontal_speed: 170.0,
            mass: 90.0,
        },
        ThreatClass::CruiseMissile => SpawnProfile {
            min_range: 6000.0,
            max_range: 8000.0,
            altitude: 600.0,
            horizontal_speed: 180.0,
            mass: 1000.0,
        },
        ThreatClass::BallisticMissile => SpawnProfile {
            min_range: 7000.0,
            max_range: 9000.0,
            altitude: 6000.0,
            horizontal_speed: 150.0,
            mass: 2000.0,
        },
        ThreatClass::Drone => SpawnProfile {
            min_range: 3000.0,
            max_range: 5000.0,
            altitude: 500.0,
            horizontal_speed: 60.0,
            mass: 50.0,
        },
    }
}

/// Spawn a threat entity with a known kinematic state.
pub fn spawn_threat(
    world: &mut World,
    id: ThreatId,
    class: ThreatClass,
    state: KinematicState,
    now: f64,
) -> Entity {
    world.spawn((
        Threat {
            id,
            class,
            spawn_time: now,
        },
        state,
    ))
}

/// Spawn a raid threat at a random range (and bearing, unless given) whose
/// unguided flight ends on one of `aim_points`, jittered.
pub fn spawn_raid_threat(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    id: ThreatId,
    class: ThreatClass,
    bearing: Option<f64>,
    aim_points: &[Vec3],
    now: f64,
) -> Entity {
    let profile = spawn_profile(class);

    let base = if aim_points.is_empty() {
        Vec3::ZERO
    } else {
        aim_points[rng.gen_range(0..aim_points.len())]
    };
    let aim = Vec3::new(
        base.x + rng.gen_range(-200.0..200.0),
        0.0,
        base.z + rng.gen_range(-200.0..200.0),
    );
    let bearing = bearing.unwrap_or_else(|| rng.gen_range(0.0..std::f64::consts::TAU));
    let range: f64 = rng.gen_range(profile.min_range..profile.max_range);

    // Bearing is measured in the x/z plane from +x toward +z.
    let position = Vec3::new(
        aim.x + range * bearing.cos(),
        profile.altitude,
        aim.z + range * bearing.sin(),
    );
    let velocity = flight_velocity(class.motion_model(), position, aim, profile.horizontal_speed);

    spawn_threat(
        world,
        id,
        class,
        KinematicState::new(position, velocity, profile.mass),
        now,
    )
}

/// Velocity that carries a body from `from` to ground level at `aim`.
fn flight_velocity(model: MotionModel, from: Vec3, aim: Vec3, horizontal_speed: f64) -> Vec3 {
    let range = horizontal_distance(from, aim);
    let heading = Vec3::new(aim.x - from.x, 0.0, aim.z - from.z).normalize_or_zero();
    let time = range / horizontal_speed;
    let vy = match model {
        // Straight dive
        MotionModel::Linear => -from.y / time,
        // y + vy·t − ½gt² = 0
        MotionModel::Ballistic => (0.5 * GRAVITY * time * time - from.y) / time,
    };
    heading * horizontal_speed + Vec3::Y * vy
}

/// Everything an interceptor entity is built from.
pub struct InterceptorLaunch {
    pub id: u32,
    pub target: TargetRef,
    pub target_position: Vec3,
    pub launch: LaunchParameters,
    pub origin: Vec3,
    pub mass: f64,
    pub pk: f64,
    pub guidance: GuidanceController,
    pub fuse: ProximityFuse,
}

/// Spawn an interceptor leaving `origin` on its launch solution.
pub fn spawn_interceptor(world: &mut World, launch: InterceptorLaunch, now: f64) -> Entity {
    let state = KinematicState::new(launch.origin, launch.launch.initial_velocity(), launch.mass);
    world.spawn((
        Interceptor {
            id: launch.id,
            target: launch.target,
            launch: launch.launch,
            launched_at: now,
            pk: launch.pk,
            last_target_position: launch.target_position,
        },
        state,
        launch.guidance,
        launch.fuse.launched_from(launch.origin),
        AppliedForce::default(),
    ))
}
