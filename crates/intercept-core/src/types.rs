//! Fundamental geometric and simulation types.

use serde::{Deserialize, Serialize};

use crate::constants::GROUND_LEVEL;

/// 3D vector in simulation space (meters, Cartesian).
/// x = East, y = Up (altitude), z = South.
pub type Vec3 = glam::DVec3;

/// Read-only kinematic snapshot of a body, taken from the physics host
/// once per call. Never a living reference to the host's body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KinematicState {
    /// Position (m).
    pub position: Vec3,
    /// Velocity (m/s).
    pub velocity: Vec3,
    /// Mass (kg).
    pub mass: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl KinematicState {
    pub fn new(position: Vec3, velocity: Vec3, mass: f64) -> Self {
        Self {
            position,
            velocity,
            mass,
        }
    }

    /// A massless, motionless point. Used for fixed aim points.
    pub fn fixed_point(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            mass: 0.0,
        }
    }

    /// Speed magnitude (m/s).
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Range to another state in meters (3D distance).
    pub fn range_to(&self, other: &KinematicState) -> f64 {
        self.position.distance(other.position)
    }

    /// Horizontal range (ignoring altitude).
    pub fn horizontal_range_to(&self, other: &KinematicState) -> f64 {
        horizontal_distance(self.position, other.position)
    }

    /// Height above ground level (m).
    pub fn altitude(&self) -> f64 {
        self.position.y - GROUND_LEVEL
    }
}

/// Distance between two points projected onto the ground plane.
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f64 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    (dx * dx + dz * dz).sqrt()
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}
