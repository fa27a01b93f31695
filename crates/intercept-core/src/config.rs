//! Tuning configuration structs.
//!
//! Plain data with `Default` impls built from [`crate::constants`].
//! Hosts may override any field or persist them with serde.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{InterceptError, Result};

/// Proximity fuse tuning for one profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityFuseConfig {
    /// Flight distance before the fuse may arm (m).
    pub arming_distance: f64,
    /// Miss distance at or below which the fuse fires (m).
    pub detonation_radius: f64,
    /// Miss distance at or below which quality is 1.0 (m).
    pub optimal_radius: f64,
    /// Minimum time between proximity scans (ms).
    pub scan_interval_ms: f64,
}

impl ProximityFuseConfig {
    /// Profile for a fresh launch.
    pub fn initial() -> Self {
        Self {
            arming_distance: FUSE_INITIAL_ARMING_DISTANCE,
            detonation_radius: FUSE_DETONATION_RADIUS,
            optimal_radius: FUSE_OPTIMAL_RADIUS,
            scan_interval_ms: FUSE_SCAN_INTERVAL_MS,
        }
    }

    /// Profile used after re-engagement or a mid-flight retarget.
    pub fn retarget() -> Self {
        Self {
            arming_distance: FUSE_RETARGET_ARMING_DISTANCE,
            ..Self::initial()
        }
    }

    /// Check `0 < optimal_radius <= detonation_radius`, `arming_distance >= 0`
    /// and `scan_interval_ms >= 0`.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            self.arming_distance,
            self.detonation_radius,
            self.optimal_radius,
            self.scan_interval_ms,
        ];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(InterceptError::InvalidFuseConfig(
                "all fuse distances and intervals must be finite".into(),
            ));
        }
        if self.optimal_radius <= 0.0 {
            return Err(InterceptError::InvalidFuseConfig(format!(
                "optimal radius must be positive, got {}",
                self.optimal_radius
            )));
        }
        if self.optimal_radius > self.detonation_radius {
            return Err(InterceptError::InvalidFuseConfig(format!(
                "optimal radius {} exceeds detonation radius {}",
                self.optimal_radius, self.detonation_radius
            )));
        }
        if self.arming_distance < 0.0 {
            return Err(InterceptError::InvalidFuseConfig(format!(
                "arming distance must not be negative, got {}",
                self.arming_distance
            )));
        }
        if self.scan_interval_ms < 0.0 {
            return Err(InterceptError::InvalidFuseConfig(format!(
                "scan interval must not be negative, got {}",
                self.scan_interval_ms
            )));
        }
        Ok(())
    }
}

impl Default for ProximityFuseConfig {
    fn default() -> Self {
        Self::initial()
    }
}

/// The named fuse profiles an interceptor carries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuseProfiles {
    pub initial: ProximityFuseConfig,
    pub retarget: ProximityFuseConfig,
}

impl FuseProfiles {
    pub fn validate(&self) -> Result<()> {
        self.initial.validate()?;
        self.retarget.validate()
    }
}

impl Default for FuseProfiles {
    fn default() -> Self {
        Self {
            initial: ProximityFuseConfig::initial(),
            retarget: ProximityFuseConfig::retarget(),
        }
    }
}

/// Intercept-point predictor tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterceptSolverConfig {
    /// Convergence threshold on successive time estimates (s).
    pub tolerance_secs: f64,
    /// Iterations before giving up.
    pub max_iterations: u32,
    /// Solve constant-velocity targets with the closed-form quadratic
    /// before falling back to iteration.
    pub closed_form_linear: bool,
}

impl Default for InterceptSolverConfig {
    fn default() -> Self {
        Self {
            tolerance_secs: INTERCEPT_TOLERANCE_SECS,
            max_iterations: INTERCEPT_MAX_ITERATIONS,
            closed_form_linear: true,
        }
    }
}

/// Guidance controller tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuidanceConfig {
    pub min_guidance_distance: f64,
    pub min_speed: f64,
    pub lead_factor: f64,
    pub gain: f64,
    /// Correction limit in multiples of g.
    pub max_g: f64,
    pub target_cruise_speed: f64,
    pub thrust_gain: f64,
    pub close_range_threshold: f64,
    pub miss_threshold: f64,
    pub min_reengage_distance: f64,
    pub reengage_energy_floor: f64,
    pub reacquisition_distance: f64,
    pub reengage_gain_multiplier: f64,
    pub reengage_g_multiplier: f64,
    pub reengage_turn_accel: f64,
    pub max_reengagement_attempts: u32,
    pub solver: InterceptSolverConfig,
}

impl GuidanceConfig {
    /// Correction force ceiling for a body of `mass` kg in the given mode (N).
    pub fn force_limit(&self, mass: f64, reengaging: bool) -> f64 {
        let g_limit = if reengaging {
            self.max_g * self.reengage_g_multiplier
        } else {
            self.max_g
        };
        mass * g_limit * GRAVITY
    }
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            min_guidance_distance: GUIDANCE_MIN_DISTANCE,
            min_speed: GUIDANCE_MIN_SPEED,
            lead_factor: GUIDANCE_LEAD_FACTOR,
            gain: GUIDANCE_GAIN,
            max_g: GUIDANCE_MAX_G,
            target_cruise_speed: GUIDANCE_CRUISE_SPEED,
            thrust_gain: GUIDANCE_THRUST_GAIN,
            close_range_threshold: GUIDANCE_CLOSE_RANGE,
            miss_threshold: REENGAGE_MISS_THRESHOLD,
            min_reengage_distance: REENGAGE_MIN_DISTANCE,
            reengage_energy_floor: REENGAGE_ENERGY_FLOOR,
            reacquisition_distance: REENGAGE_REACQUISITION_DISTANCE,
            reengage_gain_multiplier: REENGAGE_GAIN_MULTIPLIER,
            reengage_g_multiplier: REENGAGE_G_MULTIPLIER,
            reengage_turn_accel: REENGAGE_TURN_ACCEL,
            max_reengagement_attempts: REENGAGE_MAX_ATTEMPTS,
            solver: InterceptSolverConfig::default(),
        }
    }
}

/// Threat assessment and clustering tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssessmentConfig {
    /// Cumulative kill probability the salvo must reach.
    pub required_kill_probability: f64,
    pub max_interceptors_per_threat: u32,
    /// Interceptor average speed used for the earliest intercept time (m/s).
    pub interceptor_speed: f64,
    pub clustering_distance: f64,
    pub clustering_time_window: f64,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            required_kill_probability: REQUIRED_KILL_PROBABILITY,
            max_interceptors_per_threat: MAX_INTERCEPTORS_PER_THREAT,
            interceptor_speed: INTERCEPTOR_LAUNCH_SPEED,
            clustering_distance: CLUSTERING_DISTANCE,
            clustering_time_window: CLUSTERING_TIME_WINDOW,
        }
    }
}
