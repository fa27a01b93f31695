//! Cleanup system: ground impacts, crashed or expired interceptors.

use hecs::{Entity, World};

use intercept_core::constants::GROUND_LEVEL;
use intercept_core::events::EngagementEvent;
use intercept_core::types::KinematicState;

use crate::components::{Interceptor, Threat};
use crate::engagement::{ScoreState, TargetRegistry};

/// Remove threats that reached the ground and interceptors that hit the
/// ground or outlived `max_flight_secs`.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(
    world: &mut World,
    registry: &mut TargetRegistry,
    events: &mut Vec<EngagementEvent>,
    score: &mut ScoreState,
    despawn_buffer: &mut Vec<Entity>,
    max_flight_secs: f64,
    now: f64,
) {
    despawn_buffer.clear();

    let mut impacts: Vec<(Entity, &Threat, &KinematicState)> = Vec::new();
    let mut query = world.query::<(&Threat, &KinematicState)>();
    for (entity, (threat, state)) in query.iter() {
        if state.position.y <= GROUND_LEVEL {
            impacts.push((entity, threat, state));
        }
    }
    impacts.sort_by_key(|(_, threat, _)| threat.id);
    for (entity, threat, state) in impacts {
        events.push(EngagementEvent::ThreatImpact {
            threat_id: threat.id,
            class: threat.class,
            position: state.position,
        });
        score.threats_impacted += 1;
        registry.forget(threat.id);
        log::debug!("threat {} impacted", threat.id.0);
        despawn_buffer.push(entity);
    }
    drop(query);

    for (entity, (interceptor, state)) in world.query_mut::<(&Interceptor, &KinematicState)>() {
        let crashed = state.position.y < GROUND_LEVEL;
        let expired = now - interceptor.launched_at > max_flight_secs;
        if crashed || expired {
            registry.release(interceptor.id);
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
