//! Guidance system: resolves each interceptor's target and stores the
//! commanded force for the movement system.

use std::collections::BTreeMap;

use hecs::World;

use intercept_core::components::{TargetRef, ThreatId};
use intercept_core::enums::{MotionModel, ThreatClass};
use intercept_core::events::EngagementEvent;
use intercept_core::types::KinematicState;
use intercept_guidance::trajectory::predict_intercept;
use intercept_guidance::{GuidanceController, ProximityFuse};

use crate::components::{AppliedForce, Interceptor, Threat};
use crate::engagement::TargetRegistry;
use crate::engine::SimConfig;

/// Snapshot of every live threat, read before any interceptor is updated.
pub type ThreatStates = BTreeMap<ThreatId, (ThreatClass, KinematicState)>;

pub fn threat_states(world: &World) -> ThreatStates {
    world
        .query::<(&Threat, &KinematicState)>()
        .iter()
        .map(|(_, (threat, state))| (threat.id, (threat.class, *state)))
        .collect()
}

/// Run guidance for all interceptors.
pub fn run(
    world: &mut World,
    registry: &mut TargetRegistry,
    config: &SimConfig,
    dt: f64,
    events: &mut Vec<EngagementEvent>,
) {
    let threats = threat_states(world);

    for (_entity, (interceptor, state, guidance, fuse, force)) in world.query_mut::<(
        &mut Interceptor,
        &KinematicState,
        &mut GuidanceController,
        &mut ProximityFuse,
        &mut AppliedForce,
    )>() {
        let target = resolve_target(
            interceptor,
            state,
            guidance,
            fuse,
            &threats,
            registry,
            config,
            events,
        );

        let before = guidance.phase();
        let command = guidance.update(state, &target, fuse, dt);
        if command.phase != before {
            events.push(EngagementEvent::PhaseChanged {
                interceptor_id: interceptor.id,
                from: before,
                to: command.phase,
            });
        }
        force.0 = command.force;
    }
}

/// Current target state. Retargets when a tracked threat is gone: to the
/// quickest-to-reach untargeted threat, or else to where the old one was last seen.
#[allow(clippy::too_many_arguments)]
fn resolve_target(
    interceptor: &mut Interceptor,
    own: &KinematicState,
    guidance: &mut GuidanceController,
    fuse: &mut ProximityFuse,
    threats: &ThreatStates,
    registry: &mut TargetRegistry,
    config: &SimConfig,
    events: &mut Vec<EngagementEvent>,
) -> KinematicState {
    let id = match interceptor.target {
        TargetRef::FixedPoint(point) => return KinematicState::fixed_point(point),
        TargetRef::Tracked(id) => id,
    };
    if let Some((_, state)) = threats.get(&id) {
        interceptor.last_target_position = state.position;
        return *state;
    }

    registry.release(interceptor.id);
    let (target, state) = match reacquire(own, threats, registry, config) {
        Some((new_id, class, state)) => {
            registry.assign(new_id, interceptor.id);
            guidance.retarget(class.motion_model());
            if let Err(err) = fuse.retarget(config.fuse.retarget) {
                log::warn!("interceptor {} kept its fuse profile: {err}", interceptor.id);
            }
            (TargetRef::Tracked(new_id), state)
        }
        None => {
            guidance.retarget(MotionModel::Linear);
            let point = interceptor.last_target_position;
            (TargetRef::FixedPoint(point), KinematicState::fixed_point(point))
        }
    };
    log::debug!(
        "interceptor {} lost threat {}, now {:?}",
        interceptor.id,
        id.0,
        target
    );
    interceptor.target = target;
    events.push(EngagementEvent::Retargeted {
        interceptor_id: interceptor.id,
        target,
    });
    state
}

/// Untargeted threat with the shortest feasible intercept from `own`.
fn reacquire(
    own: &KinematicState,
    threats: &ThreatStates,
    registry: &TargetRegistry,
    config: &SimConfig,
) -> Option<(ThreatId, ThreatClass, KinematicState)> {
    let speed = own.speed();
    let mut best: Option<(f64, ThreatId, ThreatClass, KinematicState)> = None;
    for (&id, &(class, state)) in threats {
        if registry.is_targeted(id) {
            continue;
        }
        let solution = predict_intercept(
            &state,
            class.motion_model(),
            own.position,
            speed,
            &config.guidance.solver,
        );
        if !solution.feasible {
            continue;
        }
        if best.map_or(true, |(t, ..)| solution.time_to_intercept < t) {
            best = Some((solution.time_to_intercept, id, class, state));
        }
    }
    best.map(|(_, id, class, state)| (id, class, state))
}
