//! Engine constants and tuning parameters.

/// Gravitational acceleration (m/s²), acting along -y.
pub const GRAVITY: f64 = 9.81;

/// Ground plane altitude (meters).
pub const GROUND_LEVEL: f64 = 0.0;

/// Reference host tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick at the reference tick rate.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Launch solver ---

/// Horizontal range below which a launch is treated as vertical (meters).
pub const LAUNCH_DEGENERATE_RANGE: f64 = 0.01;

/// Default interceptor launch speed (m/s).
pub const INTERCEPTOR_LAUNCH_SPEED: f64 = 250.0;

/// Default interceptor mass (kg).
pub const INTERCEPTOR_MASS: f64 = 90.0;

// --- Intercept predictor ---

/// Convergence tolerance on successive time-to-intercept estimates (seconds).
pub const INTERCEPT_TOLERANCE_SECS: f64 = 0.001;

/// Fixed-point iteration cap before an intercept is declared infeasible.
pub const INTERCEPT_MAX_ITERATIONS: u32 = 20;

/// Speeds below this are treated as zero (m/s).
pub const MIN_SPEED_EPSILON: f64 = 1e-6;

// --- Proximity fuse ---

/// Arming distance for a fresh launch (meters).
pub const FUSE_INITIAL_ARMING_DISTANCE: f64 = 50.0;

/// Arming distance after re-engagement or mid-flight retarget (meters).
pub const FUSE_RETARGET_ARMING_DISTANCE: f64 = 10.0;

/// Miss distance at or below which the fuse fires (meters).
pub const FUSE_DETONATION_RADIUS: f64 = 8.0;

/// Miss distance at or below which detonation quality is perfect (meters).
pub const FUSE_OPTIMAL_RADIUS: f64 = 3.0;

/// Minimum interval between proximity scans (milliseconds).
pub const FUSE_SCAN_INTERVAL_MS: f64 = 16.0;

// --- Guidance ---

/// Flight distance before guidance corrections begin (meters).
pub const GUIDANCE_MIN_DISTANCE: f64 = 20.0;

/// Below this speed the interceptor has no guidance authority (m/s).
pub const GUIDANCE_MIN_SPEED: f64 = 5.0;

/// Fraction of the time-to-intercept used to lead the target.
pub const GUIDANCE_LEAD_FACTOR: f64 = 0.5;

/// Velocity-error gain (1/s).
pub const GUIDANCE_GAIN: f64 = 2.0;

/// Lateral acceleration limit (multiples of g).
pub const GUIDANCE_MAX_G: f64 = 30.0;

/// Speed the forward-thrust term holds the interceptor at (m/s).
pub const GUIDANCE_CRUISE_SPEED: f64 = 200.0;

/// Forward-thrust gain (1/s).
pub const GUIDANCE_THRUST_GAIN: f64 = 0.5;

/// Range inside which corrections stop to avoid overshoot oscillation (meters).
pub const GUIDANCE_CLOSE_RANGE: f64 = 3.0;

// --- Re-engagement ---

/// Closest approach under which a diverging interceptor may re-engage (meters).
pub const REENGAGE_MISS_THRESHOLD: f64 = 30.0;

/// Re-engagement only starts once at least this far from the target (meters).
pub const REENGAGE_MIN_DISTANCE: f64 = 5.0;

/// Minimum speed to attempt a turnaround (m/s).
pub const REENGAGE_ENERGY_FLOOR: f64 = 30.0;

/// Range inside which a closing interceptor returns to midcourse (meters).
pub const REENGAGE_REACQUISITION_DISTANCE: f64 = 500.0;

/// Gain multiplier while re-engaging.
pub const REENGAGE_GAIN_MULTIPLIER: f64 = 2.0;

/// G-limit multiplier while re-engaging.
pub const REENGAGE_G_MULTIPLIER: f64 = 1.5;

/// Extra lateral acceleration injected to force the turnaround (m/s²).
pub const REENGAGE_TURN_ACCEL: f64 = 40.0;

/// Re-engagement attempts allowed per interceptor.
pub const REENGAGE_MAX_ATTEMPTS: u32 = 1;

// --- Threat assessment ---

/// Target cumulative kill probability for salvo sizing.
pub const REQUIRED_KILL_PROBABILITY: f64 = 0.95;

/// Hard cap on interceptors committed to a single threat.
pub const MAX_INTERCEPTORS_PER_THREAT: u32 = 4;

/// Single-shot Pk before derating.
pub const BASE_INTERCEPT_PROBABILITY: f64 = 0.9;

/// Single-shot Pk clamp range.
pub const MIN_INTERCEPT_PROBABILITY: f64 = 0.1;
pub const MAX_INTERCEPT_PROBABILITY: f64 = 0.99;

/// Fraction of the intercept window at which to intercept.
pub const OPTIMAL_INTERCEPT_FRACTION: f64 = 0.33;

/// Latest useful intercept as a fraction of time-to-impact.
pub const MAX_INTERCEPT_TIME_FRACTION: f64 = 0.7;

// --- Clustering ---

/// Spatial radius for grouping threats (meters). Wider than
/// `DISTRIBUTED_RADIUS` so a cluster can classify as distributed.
pub const CLUSTERING_DISTANCE: f64 = 5000.0;

/// Maximum time-to-impact difference for grouping threats (seconds). More
/// than half of `SEQUENTIAL_TIME_SPAN` so a cluster can classify as sequential.
pub const CLUSTERING_TIME_WINDOW: f64 = 8.0;

/// Clusters whose impacts span less than this are saturation raids (seconds).
pub const SATURATION_TIME_SPAN: f64 = 2.0;

/// Clusters whose impacts span more than this are sequential (seconds).
pub const SEQUENTIAL_TIME_SPAN: f64 = 10.0;

/// Clusters wider than this are distributed (meters).
pub const DISTRIBUTED_RADIUS: f64 = 2000.0;
