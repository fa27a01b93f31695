//! Threat evaluation for the interception engine.
//!
//! Scores simultaneous threats against a protected-asset registry, orders
//! them for engagement, sizes salvos, and groups raids into clusters.

pub mod assessment;
pub mod assets;
pub mod clustering;
pub mod profiles;

pub use assessment::{ThreatAssessment, ThreatAssessor};
pub use assets::AssetRegistry;
pub use clustering::{detect_clusters, ThreatCluster};
