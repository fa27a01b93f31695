//! Error taxonomy for the interception engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, InterceptError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterceptError {
    /// No real launch angle reaches the target at the given speed.
    #[error("target at {range:.1} m is outside the launch envelope ({max_range:.1} m)")]
    Unreachable { range: f64, max_range: f64 },

    /// The intercept iteration did not converge, or the intercept point lies
    /// below ground or outside the envelope.
    #[error("no feasible intercept: {reason}")]
    NoFeasibleIntercept { reason: &'static str },

    /// Fuse config violates `0 < optimal <= detonation` or has negative distances.
    #[error("invalid proximity fuse config: {0}")]
    InvalidFuseConfig(String),

    /// Near-zero speed or direction vector.
    #[error("degenerate input: {0}")]
    DegenerateInput(&'static str),
}
