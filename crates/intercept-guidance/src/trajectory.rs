//! Ballistic launch solving and intercept-point prediction.
//!
//! Pure functions: no state, no allocation. Gravity acts along -y and the
//! ground plane is `GROUND_LEVEL`.

use std::f64::consts::FRAC_PI_2;

use intercept_core::components::LaunchParameters;
use intercept_core::config::InterceptSolverConfig;
use intercept_core::constants::*;
use intercept_core::enums::MotionModel;
use intercept_core::error::{InterceptError, Result};
use intercept_core::types::{horizontal_distance, KinematicState, Vec3};

/// Predicted meeting point between an interceptor and a threat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterceptSolution {
    pub point: Vec3,
    /// Seconds from now until the meeting.
    pub time_to_intercept: f64,
    pub feasible: bool,
    /// Fixed-point iterations spent (0 for the closed-form path).
    pub iterations: u32,
}

impl InterceptSolution {
    fn infeasible(point: Vec3, time_to_intercept: f64, iterations: u32) -> Self {
        Self {
            point,
            time_to_intercept,
            feasible: false,
            iterations,
        }
    }
}

/// Where and when a body reaches the ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactPrediction {
    pub point: Vec3,
    /// Seconds from now until impact.
    pub time: f64,
    pub velocity: Vec3,
}

/// Solve for the launch elevation that carries a projectile fired at `speed`
/// from `launch` through `target`, ignoring drag.
///
/// `tan θ = (v² ± √(v⁴ − g(gR² + 2Δh·v²))) / (gR)`; `prefer_lofted` picks the
/// larger root. Returns `Unreachable` when the discriminant is negative.
pub fn solve_launch(
    launch: Vec3,
    target: Vec3,
    speed: f64,
    prefer_lofted: bool,
) -> Result<LaunchParameters> {
    if !speed.is_finite() || speed <= MIN_SPEED_EPSILON {
        return Err(InterceptError::DegenerateInput("launch speed must be positive"));
    }

    let dx = target.x - launch.x;
    let dz = target.z - launch.z;
    let range = (dx * dx + dz * dz).sqrt();
    let dh = target.y - launch.y;
    let v2 = speed * speed;

    // Straight up: the formula divides by R.
    if range < LAUNCH_DEGENERATE_RANGE {
        let ceiling = v2 / (2.0 * GRAVITY);
        if dh > ceiling {
            return Err(InterceptError::Unreachable {
                range: dh,
                max_range: ceiling,
            });
        }
        return Ok(LaunchParameters {
            angle: FRAC_PI_2,
            azimuth: 0.0,
            speed,
            lofted: prefer_lofted,
        });
    }

    let discriminant = v2 * v2 - GRAVITY * (GRAVITY * range * range + 2.0 * dh * v2);
    if discriminant < 0.0 {
        return Err(InterceptError::Unreachable {
            range,
            max_range: v2 / GRAVITY,
        });
    }

    let root = discriminant.sqrt();
    let tan_theta = if prefer_lofted {
        (v2 + root) / (GRAVITY * range)
    } else {
        (v2 - root) / (GRAVITY * range)
    };

    Ok(LaunchParameters {
        angle: tan_theta.atan(),
        azimuth: dz.atan2(dx),
        speed,
        lofted: prefer_lofted,
    })
}

/// Time for a launch to cover `horizontal_range` meters.
/// Infinite for a vertical launch.
pub fn time_of_flight(params: &LaunchParameters, horizontal_range: f64) -> f64 {
    let horizontal_speed = params.speed * params.angle.cos();
    if horizontal_speed <= MIN_SPEED_EPSILON {
        return f64::INFINITY;
    }
    horizontal_range / horizontal_speed
}

/// Drag-free ballistic position after `t` seconds.
pub fn ballistic_position(origin: Vec3, velocity: Vec3, t: f64) -> Vec3 {
    origin + velocity * t - Vec3::Y * (0.5 * GRAVITY * t * t)
}

/// Project a state `t` seconds forward under the given motion model.
pub fn project(state: &KinematicState, model: MotionModel, t: f64) -> Vec3 {
    match model {
        MotionModel::Linear => state.position + state.velocity * t,
        MotionModel::Ballistic => ballistic_position(state.position, state.velocity, t),
    }
}

/// Predict where an interceptor leaving `origin` at `closing_speed` meets the threat.
///
/// Constant-velocity threats use the closed-form quadratic when enabled;
/// everything else refines `t` by fixed-point iteration until successive
/// estimates agree within `tolerance_secs`.
pub fn predict_intercept(
    threat: &KinematicState,
    model: MotionModel,
    origin: Vec3,
    closing_speed: f64,
    config: &InterceptSolverConfig,
) -> InterceptSolution {
    if !closing_speed.is_finite() || closing_speed <= MIN_SPEED_EPSILON {
        return InterceptSolution::infeasible(threat.position, f64::INFINITY, 0);
    }

    if model == MotionModel::Linear && config.closed_form_linear {
        if let Some(t) = solve_linear_intercept(threat, origin, closing_speed) {
            let point = project(threat, model, t);
            if point.y < GROUND_LEVEL {
                return InterceptSolution::infeasible(point, t, 0);
            }
            return InterceptSolution {
                point,
                time_to_intercept: t,
                feasible: true,
                iterations: 0,
            };
        }
    }

    iterate_intercept(threat, model, origin, closing_speed, config)
}

/// [`predict_intercept`] as a `Result` for callers that skip on failure.
pub fn try_predict_intercept(
    threat: &KinematicState,
    model: MotionModel,
    origin: Vec3,
    closing_speed: f64,
    config: &InterceptSolverConfig,
) -> Result<InterceptSolution> {
    let solution = predict_intercept(threat, model, origin, closing_speed, config);
    if solution.feasible {
        return Ok(solution);
    }
    let reason = if solution.point.y < GROUND_LEVEL {
        "intercept point below ground"
    } else {
        "intercept time did not converge"
    };
    Err(InterceptError::NoFeasibleIntercept { reason })
}

fn iterate_intercept(
    threat: &KinematicState,
    model: MotionModel,
    origin: Vec3,
    closing_speed: f64,
    config: &InterceptSolverConfig,
) -> InterceptSolution {
    let mut t = threat.position.distance(origin) / closing_speed;

    for iteration in 1..=config.max_iterations {
        let candidate = project(threat, model, t);
        if candidate.y < GROUND_LEVEL {
            return InterceptSolution::infeasible(candidate, t, iteration);
        }

        let next = candidate.distance(origin) / closing_speed;
        if (next - t).abs() < config.tolerance_secs {
            let point = project(threat, model, next);
            if point.y < GROUND_LEVEL {
                return InterceptSolution::infeasible(point, next, iteration);
            }
            return InterceptSolution {
                point,
                time_to_intercept: next,
                feasible: true,
                iterations: iteration,
            };
        }
        t = next;
    }

    InterceptSolution::infeasible(project(threat, model, t), t, config.max_iterations)
}

/// Smallest positive `t` with `|p + v·t − o| = s·t`.
fn solve_linear_intercept(threat: &KinematicState, origin: Vec3, speed: f64) -> Option<f64> {
    let rel = threat.position - origin;
    let a = threat.velocity.length_squared() - speed * speed;
    let b = 2.0 * rel.dot(threat.velocity);
    let c = rel.length_squared();

    if a.abs() < 1e-9 {
        // Equal speeds: the quadratic degenerates to b·t + c = 0.
        if b >= 0.0 {
            return None;
        }
        let t = -c / b;
        return (t > 0.0).then_some(t);
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let t1 = (-b - root) / (2.0 * a);
    let t2 = (-b + root) / (2.0 * a);
    [t1, t2]
        .into_iter()
        .filter(|t| *t > 0.0)
        .min_by(|x, y| x.total_cmp(y))
}

/// Forward-project a state to its ground intersection.
///
/// Linear bodies that are not descending never reach the ground on their
/// own model, so they are projected ballistically instead.
pub fn predict_impact(state: &KinematicState, model: MotionModel) -> ImpactPrediction {
    let altitude = state.position.y - GROUND_LEVEL;
    if altitude <= 0.0 {
        return ImpactPrediction {
            point: Vec3::new(state.position.x, GROUND_LEVEL, state.position.z),
            time: 0.0,
            velocity: state.velocity,
        };
    }

    let vy = state.velocity.y;
    let model = match model {
        MotionModel::Linear if vy < -MIN_SPEED_EPSILON => MotionModel::Linear,
        _ => MotionModel::Ballistic,
    };

    let (time, velocity) = match model {
        MotionModel::Linear => (altitude / -vy, state.velocity),
        MotionModel::Ballistic => {
            let t = (vy + (vy * vy + 2.0 * GRAVITY * altitude).sqrt()) / GRAVITY;
            (t, state.velocity - Vec3::Y * (GRAVITY * t))
        }
    };

    let mut point = project(state, model, time);
    point.y = GROUND_LEVEL;

    ImpactPrediction {
        point,
        time,
        velocity,
    }
}

/// Horizontal range from `launch` to `target`.
pub fn horizontal_range(launch: Vec3, target: Vec3) -> f64 {
    horizontal_distance(launch, target)
}
