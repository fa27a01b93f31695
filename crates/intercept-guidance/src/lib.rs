//! Interceptor kinematics: launch and intercept solving, the proximity
//! fuse, and the per-tick guidance controller.
//!
//! Every function here is a pure function of its inputs and the state it
//! is handed. The host owns time, physics integration and entity storage.

pub mod controller;
pub mod fuse;
pub mod trajectory;

pub use controller::{GuidanceCommand, GuidanceController};
pub use fuse::ProximityFuse;
pub use trajectory::{
    predict_impact, predict_intercept, solve_launch, try_predict_intercept, ImpactPrediction,
    InterceptSolution,
};
