//! Intercept evaluation system: fuse scans and kill rolls.

use std::collections::BTreeSet;

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use intercept_core::components::{TargetRef, ThreatId};
use intercept_core::events::EngagementEvent;
use intercept_core::types::{KinematicState, Vec3};
use intercept_guidance::ProximityFuse;

use crate::components::{Interceptor, Threat};
use crate::engagement::{ScoreState, TargetRegistry};

/// Scan every fuse against post-integration positions. A detonation on a
/// live tracked threat kills it with probability `pk × quality`.
pub fn run(
    world: &mut World,
    registry: &mut TargetRegistry,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<EngagementEvent>,
    score: &mut ScoreState,
    now: f64,
) {
    let threat_positions: Vec<(ThreatId, Entity, Vec3)> = world
        .query::<(&Threat, &KinematicState)>()
        .iter()
        .map(|(entity, (threat, state))| (threat.id, entity, state.position))
        .collect();
    let find = |id: ThreatId| threat_positions.iter().find(|(t, ..)| *t == id);

    // Id order keeps RNG consumption independent of storage layout.
    let mut interceptors: Vec<(u32, Entity)> = world
        .query::<&Interceptor>()
        .iter()
        .map(|(entity, interceptor)| (interceptor.id, entity))
        .collect();
    interceptors.sort_unstable_by_key(|(id, _)| *id);

    let mut killed: BTreeSet<ThreatId> = BTreeSet::new();
    let mut spent: Vec<(u32, Entity)> = Vec::new();

    for (id, entity) in interceptors {
        let Ok((interceptor, state, fuse)) =
            world.query_one_mut::<(&Interceptor, &KinematicState, &mut ProximityFuse)>(entity)
        else {
            continue;
        };
        let target_position = match interceptor.target {
            TargetRef::FixedPoint(point) => point,
            TargetRef::Tracked(threat_id) => match find(threat_id) {
                Some((_, _, position)) => *position,
                // Lost this tick; guidance retargets next tick.
                None => continue,
            },
        };

        let Some(detonation) = fuse.update(state.position, target_position, now) else {
            continue;
        };
        score.detonations += 1;
        spent.push((id, entity));
        events.push(EngagementEvent::Detonated {
            interceptor_id: id,
            detonation,
        });

        let Some(threat_id) = interceptor.target.threat_id() else {
            continue;
        };
        if killed.contains(&threat_id) {
            continue;
        }
        let p = (interceptor.pk * detonation.quality).clamp(0.0, 1.0);
        if rng.gen_bool(p) {
            killed.insert(threat_id);
            score.threats_killed += 1;
            events.push(EngagementEvent::ThreatKilled { threat_id });
            log::debug!("interceptor {id} killed threat {}", threat_id.0);
        }
    }

    for (id, entity) in spent {
        registry.release(id);
        let _ = world.despawn(entity);
    }
    for threat_id in killed {
        registry.forget(threat_id);
        if let Some((_, entity, _)) = find(threat_id) {
            let _ = world.despawn(*entity);
        }
    }
}
