//! Kinematic integration system: the host's stand-in physics engine.
//!
//! Semi-implicit Euler: velocity first, then position from the new velocity.

use hecs::World;

use intercept_core::constants::GRAVITY;
use intercept_core::enums::MotionModel;
use intercept_core::types::{KinematicState, Vec3};

use crate::components::{AppliedForce, Interceptor, Threat};

/// Integrate every body by one step of `dt` seconds.
pub fn run(world: &mut World, dt: f64) {
    for (_entity, (state, force, _interceptor)) in
        world.query_mut::<(&mut KinematicState, &AppliedForce, &Interceptor)>()
    {
        let thrust = if state.mass > 0.0 {
            force.0 / state.mass
        } else {
            Vec3::ZERO
        };
        state.velocity += (thrust - Vec3::Y * GRAVITY) * dt;
        state.position += state.velocity * dt;
    }

    for (_entity, (state, threat)) in world.query_mut::<(&mut KinematicState, &Threat)>() {
        if threat.class.motion_model() == MotionModel::Ballistic {
            state.velocity.y -= GRAVITY * dt;
        }
        state.position += state.velocity * dt;
    }
}
