//! Spatiotemporal grouping of simultaneous threats into raids.

use intercept_core::components::{ThreatId, ThreatRecord};
use intercept_core::config::AssessmentConfig;
use intercept_core::constants::{DISTRIBUTED_RADIUS, SATURATION_TIME_SPAN, SEQUENTIAL_TIME_SPAN};
use intercept_core::enums::ClusterPattern;
use intercept_core::types::Vec3;
use intercept_guidance::trajectory::predict_impact;
use serde::{Deserialize, Serialize};

use crate::assessment::ThreatAssessment;

/// Threats arriving close together in space and time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatCluster {
    /// At least two, in input order.
    pub members: Vec<ThreatId>,
    /// Mean current position of the members.
    pub center: Vec3,
    /// Largest member distance from `center` (m).
    pub radius: f64,
    /// Spread of member times-to-impact (s).
    pub time_span: f64,
    pub pattern: ClusterPattern,
}

impl ThreatCluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: ThreatId) -> bool {
        self.members.contains(&id)
    }

    /// Total salvo for the cluster, summed over members that have an assessment.
    pub fn required_interceptors(&self, assessments: &[ThreatAssessment]) -> u32 {
        assessments
            .iter()
            .filter(|a| self.contains(a.threat_id))
            .map(|a| a.required_interceptors)
            .sum()
    }
}

/// Greedy single pass over active threats in input order.
///
/// Each unclustered threat gathers every other unclustered threat within
/// `clustering_distance` of it whose time-to-impact differs by at most
/// `clustering_time_window`. Groups of two or more become clusters.
pub fn detect_clusters(threats: &[ThreatRecord], config: &AssessmentConfig) -> Vec<ThreatCluster> {
    let active: Vec<(&ThreatRecord, f64)> = threats
        .iter()
        .filter(|t| t.active)
        .map(|t| (t, predict_impact(&t.state, t.class.motion_model()).time))
        .collect();

    let mut clustered = vec![false; active.len()];
    let mut clusters = Vec::new();

    for i in 0..active.len() {
        if clustered[i] {
            continue;
        }
        let (seed, seed_time) = active[i];

        let mut group = vec![i];
        for (j, (other, other_time)) in active.iter().enumerate() {
            if j == i || clustered[j] {
                continue;
            }
            let near = seed.state.position.distance(other.state.position)
                <= config.clustering_distance;
            let concurrent = (seed_time - other_time).abs() <= config.clustering_time_window;
            if near && concurrent {
                group.push(j);
            }
        }
        if group.len() < 2 {
            continue;
        }

        group.sort_unstable();
        for &k in &group {
            clustered[k] = true;
        }
        let members: Vec<(&ThreatRecord, f64)> = group.iter().map(|&k| active[k]).collect();
        let cluster = build_cluster(&members);
        log::debug!(
            "cluster of {} threats, {:?}, span {:.1}s",
            cluster.len(),
            cluster.pattern,
            cluster.time_span
        );
        clusters.push(cluster);
    }

    clusters
}

fn build_cluster(members: &[(&ThreatRecord, f64)]) -> ThreatCluster {
    let count = members.len() as f64;
    let center = members
        .iter()
        .fold(Vec3::ZERO, |acc, (t, _)| acc + t.state.position)
        / count;
    let radius = members
        .iter()
        .map(|(t, _)| t.state.position.distance(center))
        .fold(0.0, f64::max);
    let earliest = members.iter().map(|(_, time)| *time).fold(f64::INFINITY, f64::min);
    let latest = members
        .iter()
        .map(|(_, time)| *time)
        .fold(f64::NEG_INFINITY, f64::max);
    let time_span = latest - earliest;

    ThreatCluster {
        members: members.iter().map(|(t, _)| t.id).collect(),
        center,
        radius,
        time_span,
        pattern: classify_pattern(time_span, radius),
    }
}

/// Arrival pattern from impact spread and spatial extent.
pub fn classify_pattern(time_span: f64, radius: f64) -> ClusterPattern {
    if time_span < SATURATION_TIME_SPAN {
        ClusterPattern::Saturation
    } else if time_span > SEQUENTIAL_TIME_SPAN {
        ClusterPattern::Sequential
    } else if radius > DISTRIBUTED_RADIUS {
        ClusterPattern::Distributed
    } else {
        ClusterPattern::Mixed
    }
}
