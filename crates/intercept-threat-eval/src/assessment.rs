//! Threat scoring: impact analysis, priority, single-shot Pk, salvo sizing
//! and intercept timing.

use intercept_core::components::{ThreatId, ThreatRecord};
use intercept_core::config::AssessmentConfig;
use intercept_core::constants::*;
use intercept_core::enums::ThreatClass;
use intercept_core::types::Vec3;
use intercept_guidance::trajectory::predict_impact;
use serde::{Deserialize, Serialize};

use crate::assets::AssetRegistry;
use crate::profiles::get_profile;

/// Scored threat, recomputed every assessment cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatAssessment {
    pub threat_id: ThreatId,
    pub class: ThreatClass,
    /// 0–100.
    pub priority: f64,
    pub impact_point: Vec3,
    /// Time to impact from now (s).
    pub impact_time: f64,
    pub impact_velocity: Vec3,
    pub damage_radius: f64,
    pub population_at_risk: f64,
    pub infrastructure_value: f64,
    /// 0–1.
    pub strategic_importance: f64,
    /// Single-shot Pk.
    pub intercept_probability: f64,
    pub required_interceptors: u32,
    /// Best time from now to meet the threat (s). May precede the earliest
    /// reachable time when the window is already closed.
    pub optimal_intercept_time: f64,
}

/// Stateless scorer over a fixed asset registry.
#[derive(Debug, Clone)]
pub struct ThreatAssessor {
    config: AssessmentConfig,
    assets: AssetRegistry,
}

impl ThreatAssessor {
    pub fn new(config: AssessmentConfig, assets: AssetRegistry) -> Self {
        Self { config, assets }
    }

    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    /// Score one threat against the asset registry from `battery`.
    pub fn assess(&self, threat: &ThreatRecord, battery: Vec3) -> ThreatAssessment {
        let profile = get_profile(threat.class);
        let impact = predict_impact(&threat.state, profile.motion_model);

        let mut population_at_risk = 0.0;
        let mut infrastructure_value = 0.0;
        let mut strategic_importance: f64 = 0.0;
        for (asset, overlap) in self.assets.exposed_to(impact.point, profile.damage_radius) {
            population_at_risk += asset.population * overlap;
            infrastructure_value += asset.strategic_value * overlap;
            strategic_importance = strategic_importance.max(asset.strategic_value * overlap);
        }
        let strategic_importance = strategic_importance.clamp(0.0, 1.0);

        let priority = (population_score(population_at_risk)
            + time_score(impact.time)
            + strategic_importance * 20.0
            + profile.priority_bonus)
            .clamp(0.0, 100.0);

        let distance = battery.distance(threat.state.position);
        let intercept_probability = intercept_probability(
            threat.class,
            distance,
            threat.state.altitude(),
            threat.state.speed(),
        );
        let required_interceptors = required_interceptors(
            intercept_probability,
            self.config.required_kill_probability,
            threat.class,
            self.config.max_interceptors_per_threat,
        );
        let optimal_intercept_time =
            optimal_intercept_time(distance, self.config.interceptor_speed, impact.time);

        ThreatAssessment {
            threat_id: threat.id,
            class: threat.class,
            priority,
            impact_point: impact.point,
            impact_time: impact.time,
            impact_velocity: impact.velocity,
            damage_radius: profile.damage_radius,
            population_at_risk,
            infrastructure_value,
            strategic_importance,
            intercept_probability,
            required_interceptors,
            optimal_intercept_time,
        }
    }

    /// Assess every active threat and order by engagement priority.
    ///
    /// Highest priority first; ties go to the earlier impact, then the lower id.
    pub fn prioritize(&self, threats: &[ThreatRecord], battery: Vec3) -> Vec<ThreatAssessment> {
        let mut assessments: Vec<ThreatAssessment> = threats
            .iter()
            .filter(|t| t.active)
            .map(|t| self.assess(t, battery))
            .collect();
        assessments.sort_by(|a, b| {
            b.priority
                .total_cmp(&a.priority)
                .then(a.impact_time.total_cmp(&b.impact_time))
                .then(a.threat_id.cmp(&b.threat_id))
        });
        log::trace!("prioritized {} threats", assessments.len());
        assessments
    }
}

/// Bucketed score for population at risk: 0, 10, 20, 30 or 40.
pub fn population_score(population: f64) -> f64 {
    if population >= 10_000.0 {
        40.0
    } else if population >= 5_000.0 {
        30.0
    } else if population >= 1_000.0 {
        20.0
    } else if population > 0.0 {
        10.0
    } else {
        0.0
    }
}

/// Bucketed urgency score: higher as time-to-impact shrinks.
pub fn time_score(impact_time: f64) -> f64 {
    if impact_time < 10.0 {
        30.0
    } else if impact_time < 20.0 {
        20.0
    } else if impact_time < 30.0 {
        10.0
    } else {
        0.0
    }
}

/// Single-shot Pk after range, altitude, speed and class derating.
pub fn intercept_probability(class: ThreatClass, distance: f64, altitude: f64, speed: f64) -> f64 {
    let mut p = BASE_INTERCEPT_PROBABILITY;

    if distance > 15_000.0 {
        p *= 0.7;
    } else if distance > 10_000.0 {
        p *= 0.85;
    }

    // Low fliers are masked by ground clutter
    if altitude < 100.0 {
        p *= 0.8;
    }

    if speed > 1000.0 {
        p *= 0.7;
    } else if speed > 500.0 {
        p *= 0.85;
    }

    p *= get_profile(class).pk_factor;
    p.clamp(MIN_INTERCEPT_PROBABILITY, MAX_INTERCEPT_PROBABILITY)
}

/// Salvo size reaching `required_kill_probability` with independent shots
/// of probability `single_shot`.
pub fn required_interceptors(
    single_shot: f64,
    required_kill_probability: f64,
    class: ThreatClass,
    max_interceptors: u32,
) -> u32 {
    let p = single_shot.clamp(MIN_INTERCEPT_PROBABILITY, MAX_INTERCEPT_PROBABILITY);
    let n = ((1.0 - required_kill_probability).ln() / (1.0 - p).ln()).ceil();
    let base = if n.is_finite() {
        (n as u32).max(1)
    } else {
        max_interceptors
    };
    base.saturating_add(get_profile(class).extra_interceptors).min(max_interceptors)
}

/// Point a third of the way into the intercept window.
pub fn optimal_intercept_time(distance: f64, interceptor_speed: f64, impact_time: f64) -> f64 {
    let min_time = distance / interceptor_speed.max(MIN_SPEED_EPSILON);
    let max_time = impact_time * MAX_INTERCEPT_TIME_FRACTION;
    min_time + (max_time - min_time) * OPTIMAL_INTERCEPT_FRACTION
}
