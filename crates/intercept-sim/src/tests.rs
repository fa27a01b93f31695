//! Tests for the engagement engine, fire control, guidance loop and cleanup.

use intercept_core::components::{TargetRef, ThreatId};
use intercept_core::config::ProximityFuseConfig;
use intercept_core::enums::{ClusterPattern, ThreatClass};
use intercept_core::error::InterceptError;
use intercept_core::events::EngagementEvent;
use intercept_core::types::{KinematicState, Vec3};
use intercept_guidance::ProximityFuse;
use test_log::test;

use crate::engagement::TargetRegistry;
use crate::engine::{EngagementEngine, SimConfig};
use crate::scenario::{mixed_raid, saturation_raid, secs_to_ticks};
use crate::systems::raid_spawner::RaidSchedule;
use crate::systems::snapshot::EngagementSnapshot;

fn engine(config: SimConfig, schedule: RaidSchedule) -> EngagementEngine {
    EngagementEngine::new(config, schedule).unwrap()
}

fn quiet_engine() -> EngagementEngine {
    engine(SimConfig::default(), RaidSchedule::default())
}

fn cruise_missile() -> KinematicState {
    KinematicState::new(
        Vec3::new(3000.0, 1500.0, 0.0),
        Vec3::new(-150.0, 0.0, 0.0),
        1000.0,
    )
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = || SimConfig {
        seed: 12345,
        ..Default::default()
    };
    let mut engine_a = engine(config(), mixed_raid());
    let mut engine_b = engine(config(), mixed_raid());

    for _ in 0..1500 {
        let json_a = engine_a.tick().to_json().unwrap();
        let json_b = engine_b.tick().to_json().unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = engine(
        SimConfig {
            seed: 111,
            ..Default::default()
        },
        mixed_raid(),
    );
    let mut engine_b = engine(
        SimConfig {
            seed: 222,
            ..Default::default()
        },
        mixed_raid(),
    );

    // Spawn geometry is drawn from the RNG on the first tick.
    let json_a = engine_a.tick().to_json().unwrap();
    let json_b = engine_b.tick().to_json().unwrap();
    assert_ne!(json_a, json_b, "Different seeds should produce different raids");
}

// ---- Construction ----

#[test]
fn test_invalid_fuse_profile_rejected() {
    let mut config = SimConfig::default();
    config.fuse.retarget = ProximityFuseConfig {
        optimal_radius: 20.0,
        ..ProximityFuseConfig::retarget()
    };
    assert!(matches!(
        EngagementEngine::new(config, RaidSchedule::default()),
        Err(InterceptError::InvalidFuseConfig(_))
    ));
}

#[test]
fn test_config_serde_roundtrip() {
    let config = SimConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let back: SimConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.seed, config.seed);
    assert_eq!(back.magazine_size, config.magazine_size);
    assert_eq!(back.assets.len(), 3);
    assert_eq!(back.assets.assets()[0].name, "Central District");
}

// ---- Raid schedule ----

#[test]
fn test_raid_schedule_spawns_at_correct_ticks() {
    let mut engine = engine(
        SimConfig {
            magazine_size: 0,
            ..Default::default()
        },
        mixed_raid(),
    );
    assert_eq!(mixed_raid().total_threats(), 9);

    engine.tick();
    assert_eq!(engine.score().threats_spawned, 3);

    while engine.time().tick < secs_to_ticks(10.0) {
        engine.tick();
    }
    assert_eq!(engine.score().threats_spawned, 3);
    engine.tick();
    assert_eq!(engine.score().threats_spawned, 6);

    while engine.time().tick <= secs_to_ticks(20.0) {
        engine.tick();
    }
    assert_eq!(engine.score().threats_spawned, 9);
}

#[test]
fn test_saturation_raid_total() {
    assert_eq!(saturation_raid().total_threats(), 10);
    assert!(!saturation_raid().is_exhausted());
    assert!(RaidSchedule::default().is_exhausted());
}

// ---- Movement ----

#[test]
fn test_ballistic_threat_integration() {
    let mut engine = engine(
        SimConfig {
            magazine_size: 0,
            ..Default::default()
        },
        RaidSchedule::default(),
    );
    engine.spawn_threat(
        ThreatClass::Mortar,
        KinematicState::new(Vec3::new(0.0, 1000.0, 0.0), Vec3::new(100.0, 0.0, 0.0), 15.0),
    );

    let mut snapshot = engine.tick();
    for _ in 1..60 {
        snapshot = engine.tick();
    }
    let threat = &snapshot.threats[0];
    assert!((threat.position.x - 100.0).abs() < 1e-6);
    // Semi-implicit Euler drops slightly more than ½gt² over one second
    assert!((threat.position.y - (1000.0 - 0.5 * 9.81)).abs() < 0.2);
    assert!((threat.velocity.y + 9.81).abs() < 1e-6);
}

#[test]
fn test_linear_threat_holds_velocity() {
    let mut engine = engine(
        SimConfig {
            magazine_size: 0,
            ..Default::default()
        },
        RaidSchedule::default(),
    );
    engine.spawn_threat(ThreatClass::CruiseMissile, cruise_missile());
    let mut snapshot = engine.tick();
    for _ in 1..60 {
        snapshot = engine.tick();
    }
    let threat = &snapshot.threats[0];
    assert!((threat.position.x - 2850.0).abs() < 1e-6);
    assert_eq!(threat.position.y, 1500.0);
    assert_eq!(threat.velocity, Vec3::new(-150.0, 0.0, 0.0));
}

// ---- Fire control ----

#[test]
fn test_salvo_sized_from_assessment() {
    let mut engine = quiet_engine();
    let id = engine.spawn_threat(ThreatClass::CruiseMissile, cruise_missile());
    let snapshot = engine.tick();

    // Pk 0.765 needs three shots for 0.95
    let launches: Vec<_> = snapshot
        .events
        .iter()
        .filter_map(|e| match e {
            EngagementEvent::Launched {
                threat_id, angle, ..
            } => Some((*threat_id, *angle)),
            _ => None,
        })
        .collect();
    assert_eq!(launches.len(), 3);
    for (threat_id, angle) in &launches {
        assert_eq!(*threat_id, id);
        assert!(*angle > 0.0 && *angle < std::f64::consts::FRAC_PI_2);
    }
    assert_eq!(engine.registry().assigned_count(id), 3);
    assert_eq!(snapshot.magazine, 37);
    assert_eq!(snapshot.score.interceptors_fired, 3);
    assert_eq!(snapshot.threats[0].assigned, 3);

    // Fully committed: the next cycle launches nothing more
    for _ in 0..30 {
        engine.tick();
    }
    assert_eq!(engine.score().interceptors_fired, 3);
}

#[test]
fn test_fuse_measures_flight_from_battery() {
    let mut engine = quiet_engine();
    engine.spawn_threat(ThreatClass::CruiseMissile, cruise_missile());
    engine.tick();

    let battery = engine.battery().position;
    let mut count = 0;
    for (_, (fuse, state)) in engine
        .world()
        .query::<(&ProximityFuse, &KinematicState)>()
        .iter()
    {
        // One integration step of ~4 m, all of it on the fuse's odometer
        let step = state.position.distance(battery);
        assert!(step > 3.0);
        assert!((fuse.distance_traveled() - step).abs() < 1e-9);
        count += 1;
    }
    assert_eq!(count, 3);
}

#[test]
fn test_unreachable_threat_skipped() {
    let mut engine = quiet_engine();
    // Receding faster than the interceptor flies
    let id = engine.spawn_threat(
        ThreatClass::CruiseMissile,
        KinematicState::new(Vec3::new(2000.0, 1000.0, 0.0), Vec3::new(400.0, 0.0, 0.0), 1000.0),
    );
    let snapshot = engine.tick();

    assert!(snapshot.events.iter().any(|e| matches!(
        e,
        EngagementEvent::EngagementSkipped { threat_id, .. } if *threat_id == id
    )));
    assert!(snapshot.interceptors.is_empty());
    assert_eq!(snapshot.magazine, SimConfig::default().magazine_size);
    assert!(!engine.registry().is_targeted(id));
}

#[test]
fn test_empty_magazine_holds_fire() {
    let mut engine = engine(
        SimConfig {
            magazine_size: 0,
            ..Default::default()
        },
        RaidSchedule::default(),
    );
    engine.spawn_threat(ThreatClass::CruiseMissile, cruise_missile());
    let snapshot = engine.tick();
    assert!(snapshot.interceptors.is_empty());
    assert_eq!(snapshot.score.interceptors_fired, 0);
}

// ---- Guidance loop ----

#[test]
fn test_cruise_missile_intercepted_end_to_end() {
    let mut engine = quiet_engine();
    engine.spawn_threat(ThreatClass::CruiseMissile, cruise_missile());

    let mut detonations = Vec::new();
    let mut saw_midcourse = false;
    for _ in 0..700 {
        let snapshot = engine.tick();
        saw_midcourse |= snapshot.events.iter().any(|e| {
            matches!(
                e,
                EngagementEvent::PhaseChanged {
                    to: intercept_core::enums::GuidancePhase::Midcourse,
                    ..
                }
            )
        });
        for event in snapshot.events {
            if let EngagementEvent::Detonated { detonation, .. } = event {
                detonations.push(detonation);
            }
        }
        if !detonations.is_empty() {
            break;
        }
    }

    assert!(saw_midcourse);
    assert!(!detonations.is_empty(), "salvo should reach the cruise missile");
    for detonation in &detonations {
        assert!(detonation.miss_distance <= 8.0);
        assert!((0.0..=1.0).contains(&detonation.quality));
    }
    assert_eq!(engine.score().detonations as usize, detonations.len());
}

#[test]
fn test_interceptors_retarget_to_last_position_when_threat_lost() {
    let mut engine = quiet_engine();
    let id = engine.spawn_threat(ThreatClass::CruiseMissile, cruise_missile());
    engine.tick();
    assert!(engine.destroy_threat(id));
    assert!(!engine.destroy_threat(id));

    let snapshot = engine.tick();
    let retargets = snapshot
        .events
        .iter()
        .filter(|e| matches!(e, EngagementEvent::Retargeted { .. }))
        .count();
    assert_eq!(retargets, 3);
    for interceptor in &snapshot.interceptors {
        match interceptor.target {
            TargetRef::FixedPoint(point) => assert!(point.distance(Vec3::new(3000.0, 1500.0, 0.0)) < 10.0),
            TargetRef::Tracked(_) => panic!("no threat left to track"),
        }
    }
    assert!(!engine.registry().is_targeted(id));
}

#[test]
fn test_interceptor_reacquires_untargeted_threat() {
    let mut engine = engine(
        SimConfig {
            max_launches_per_cycle: 1,
            ..Default::default()
        },
        RaidSchedule::default(),
    );
    let a = engine.spawn_threat(ThreatClass::CruiseMissile, cruise_missile());
    let b = engine.spawn_threat(
        ThreatClass::CruiseMissile,
        KinematicState::new(
            Vec3::new(3000.0, 1400.0, 300.0),
            Vec3::new(-150.0, 0.0, 0.0),
            1000.0,
        ),
    );
    engine.tick();
    let engaged: Vec<ThreatId> = engine.registry().targeted_threats().collect();
    assert_eq!(engaged.len(), 1);
    let (first, second) = if engaged[0] == a { (a, b) } else { (b, a) };
    assert_eq!(engine.registry().assigned_count(first), 1);

    engine.destroy_threat(first);
    let snapshot = engine.tick();
    assert_eq!(snapshot.interceptors[0].target, TargetRef::Tracked(second));
    assert_eq!(engine.registry().assigned_count(second), 1);
}

// ---- Cleanup ----

#[test]
fn test_threat_impact_recorded() {
    let mut engine = engine(
        SimConfig {
            magazine_size: 0,
            ..Default::default()
        },
        RaidSchedule::default(),
    );
    let id = engine.spawn_threat(
        ThreatClass::Drone,
        KinematicState::new(Vec3::new(500.0, 30.0, 0.0), Vec3::new(0.0, -30.0, 0.0), 50.0),
    );

    let mut impact = None;
    for _ in 0..120 {
        let snapshot = engine.tick();
        for event in snapshot.events {
            if let EngagementEvent::ThreatImpact { threat_id, class, .. } = event {
                impact = Some((threat_id, class));
            }
        }
    }
    assert_eq!(impact, Some((id, ThreatClass::Drone)));
    assert_eq!(engine.score().threats_impacted, 1);
    assert!(engine.is_finished());
}

#[test]
fn test_mixed_raid_runs_to_completion() {
    let mut engine = engine(SimConfig::default(), mixed_raid());
    let ticks = engine.run_until_finished(secs_to_ticks(240.0));

    assert!(engine.is_finished(), "raid still running after {ticks} ticks");
    let score = engine.score();
    assert_eq!(score.threats_spawned, 9);
    assert_eq!(score.threats_killed + score.threats_impacted, score.threats_spawned);
    assert!(score.interceptors_fired >= 1);
    assert!(score.detonations <= score.interceptors_fired);
    assert_eq!(
        engine.battery().magazine,
        SimConfig::default().magazine_size - score.interceptors_fired
    );
}

// ---- Snapshot ----

#[test]
fn test_snapshot_reports_clusters() {
    let mut engine = engine(
        SimConfig {
            magazine_size: 0,
            ..Default::default()
        },
        RaidSchedule::default(),
    );
    let v = Vec3::new(-60.0, -5.0, 0.0);
    for offset in [Vec3::ZERO, Vec3::new(100.0, 0.0, 50.0), Vec3::new(50.0, 0.0, -80.0)] {
        engine.spawn_threat(
            ThreatClass::Drone,
            KinematicState::new(Vec3::new(4000.0, 500.0, 0.0) + offset, v, 50.0),
        );
    }
    let snapshot = engine.tick();
    assert_eq!(snapshot.clusters.len(), 1);
    assert_eq!(snapshot.clusters[0].len(), 3);
    assert_eq!(snapshot.clusters[0].pattern, ClusterPattern::Saturation);
    assert_eq!(engine.clusters().len(), 1);

    let json = snapshot.to_json().unwrap();
    let back: EngagementSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.threats.len(), 3);
    assert_eq!(back.time.tick, 1);
}

// ---- Target registry ----

#[test]
fn test_target_registry_bookkeeping() {
    let mut registry = TargetRegistry::default();
    registry.assign(ThreatId(1), 10);
    registry.assign(ThreatId(1), 11);
    registry.assign(ThreatId(1), 11);
    registry.assign(ThreatId(2), 12);
    assert_eq!(registry.assigned_count(ThreatId(1)), 2);
    assert_eq!(registry.interceptors_on(ThreatId(1)), &[10, 11]);

    registry.release(10);
    assert_eq!(registry.interceptors_on(ThreatId(1)), &[11]);
    registry.release(11);
    assert!(!registry.is_targeted(ThreatId(1)));

    assert_eq!(registry.forget(ThreatId(2)), vec![12]);
    assert!(registry.forget(ThreatId(2)).is_empty());
    assert_eq!(registry.targeted_threats().count(), 0);
    assert!(registry.interceptors_on(ThreatId(7)).is_empty());
}
