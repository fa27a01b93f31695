//! Proximity fuse state machine: Unarmed → Armed → Detonated.
//!
//! One fuse per interceptor. Arming is gated on cumulative flight distance so
//! an interceptor can never detonate at its own launcher; scans while armed
//! are rate limited by simulation time.

use intercept_core::components::ProximityFuseState;
use intercept_core::config::ProximityFuseConfig;
use intercept_core::error::Result;
use intercept_core::events::DetonationEvent;
use intercept_core::types::Vec3;

#[derive(Debug, Clone)]
pub struct ProximityFuse {
    config: ProximityFuseConfig,
    state: ProximityFuseState,
    last_position: Option<Vec3>,
}

impl ProximityFuse {
    /// Create an unarmed fuse. Rejects configs violating
    /// `0 < optimal_radius <= detonation_radius` or with negative distances.
    pub fn new(config: ProximityFuseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: ProximityFuseState::default(),
            last_position: None,
        })
    }

    /// Measure flight distance from `origin` rather than from the first
    /// scanned position, so the first integration step counts toward arming.
    pub fn launched_from(mut self, origin: Vec3) -> Self {
        self.last_position = Some(origin);
        self
    }

    pub fn config(&self) -> &ProximityFuseConfig {
        &self.config
    }

    pub fn state(&self) -> &ProximityFuseState {
        &self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state.armed
    }

    pub fn is_detonated(&self) -> bool {
        self.state.detonated
    }

    pub fn distance_traveled(&self) -> f64 {
        self.state.distance_traveled
    }

    /// Evaluate the fuse for one tick with post-integration positions.
    ///
    /// Returns the detonation event on the single tick the fuse fires.
    /// Every call after that is a no-op.
    pub fn update(&mut self, own: Vec3, target: Vec3, now: f64) -> Option<DetonationEvent> {
        if self.state.detonated {
            return None;
        }

        if let Some(previous) = self.last_position.replace(own) {
            self.state.distance_traveled += previous.distance(own);
        }

        if !self.state.armed && self.state.distance_traveled >= self.config.arming_distance {
            self.state.armed = true;
            log::debug!(
                "fuse armed after {:.1}m of flight",
                self.state.distance_traveled
            );
        }
        if !self.state.armed {
            return None;
        }

        let interval_secs = self.config.scan_interval_ms / 1000.0;
        if let Some(last_scan) = self.state.last_scan_time {
            if now - last_scan < interval_secs {
                return None;
            }
        }
        self.state.last_scan_time = Some(now);

        let miss_distance = own.distance(target);
        if miss_distance > self.config.detonation_radius {
            return None;
        }

        self.state.detonated = true;
        let quality = self.quality(miss_distance);
        log::debug!("fuse detonated at {miss_distance:.2}m, quality {quality:.2}");

        Some(DetonationEvent {
            position: own,
            quality,
            miss_distance,
            time: now,
        })
    }

    /// Swap in a new profile and restart arming from the current position.
    /// Ignored once detonated.
    pub fn retarget(&mut self, config: ProximityFuseConfig) -> Result<()> {
        config.validate()?;
        if self.state.detonated {
            return Ok(());
        }
        self.config = config;
        self.state.armed = false;
        self.state.distance_traveled = 0.0;
        self.state.last_scan_time = None;
        Ok(())
    }

    /// Detonation quality for a miss distance under this fuse's config.
    pub fn quality(&self, miss_distance: f64) -> f64 {
        detonation_quality(&self.config, miss_distance)
    }
}

/// 1.0 inside the optimal radius, falling linearly to 0.0 at the
/// detonation radius.
pub fn detonation_quality(config: &ProximityFuseConfig, miss_distance: f64) -> f64 {
    if miss_distance <= config.optimal_radius {
        return 1.0;
    }
    let span = config.detonation_radius - config.optimal_radius;
    if span <= 0.0 {
        return 0.0;
    }
    (1.0 - (miss_distance - config.optimal_radius) / span).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use intercept_core::error::InterceptError;
    use test_log::test;

    fn config() -> ProximityFuseConfig {
        ProximityFuseConfig {
            arming_distance: 50.0,
            detonation_radius: 8.0,
            optimal_radius: 3.0,
            scan_interval_ms: 16.0,
        }
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let bad = ProximityFuseConfig {
            optimal_radius: 9.0,
            ..config()
        };
        assert!(matches!(
            ProximityFuse::new(bad),
            Err(InterceptError::InvalidFuseConfig(_))
        ));
    }

    #[test]
    fn test_never_detonates_unarmed() {
        let mut fuse = ProximityFuse::new(config()).unwrap();
        // Target sitting on the launcher: in range but fuse not armed
        let target = Vec3::new(1.0, 0.0, 0.0);
        let mut t = 0.0;
        for i in 0..40 {
            let own = Vec3::new(0.0, i as f64, 0.0);
            assert!(fuse.update(own, target, t).is_none() || fuse.is_armed());
            t += 0.1;
        }
        assert!(!fuse.is_detonated());
        assert!(!fuse.is_armed());
        assert!((fuse.distance_traveled() - 39.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_step_from_launch_origin_counts() {
        let origin = Vec3::new(10.0, 0.0, -5.0);
        let mut fuse = ProximityFuse::new(config()).unwrap().launched_from(origin);
        let target = Vec3::new(0.0, 1000.0, 0.0);
        fuse.update(origin + Vec3::new(0.0, 4.0, 3.0), target, 0.0);
        assert!((fuse.distance_traveled() - 5.0).abs() < 1e-12);

        let mut unseeded = ProximityFuse::new(config()).unwrap();
        unseeded.update(origin + Vec3::new(0.0, 4.0, 3.0), target, 0.0);
        assert_eq!(unseeded.distance_traveled(), 0.0);
    }

    #[test]
    fn test_arms_at_arming_distance_then_detonates() {
        let mut fuse = ProximityFuse::new(config()).unwrap();
        let far = Vec3::new(1000.0, 1000.0, 1000.0);

        assert!(fuse.update(Vec3::ZERO, far, 0.0).is_none());
        assert!(fuse.update(Vec3::new(0.0, 49.0, 0.0), far, 0.1).is_none());
        assert!(!fuse.is_armed());
        assert!(fuse.update(Vec3::new(0.0, 50.0, 0.0), far, 0.2).is_none());
        assert!(fuse.is_armed());

        let target = Vec3::new(0.0, 52.0, 0.0);
        let event = fuse.update(Vec3::new(0.0, 50.0, 0.0), target, 0.3).unwrap();
        assert!(fuse.is_detonated());
        assert_eq!(event.quality, 1.0);
        assert!((event.miss_distance - 2.0).abs() < 1e-12);
        assert_eq!(event.time, 0.3);
    }

    #[test]
    fn test_zero_arming_distance_arms_immediately() {
        let mut fuse = ProximityFuse::new(ProximityFuseConfig {
            arming_distance: 0.0,
            ..config()
        })
        .unwrap();
        let event = fuse.update(Vec3::ZERO, Vec3::new(5.5, 0.0, 0.0), 0.0);
        assert!(event.is_some());
    }

    #[test]
    fn test_scan_rate_limited() {
        let mut fuse = ProximityFuse::new(ProximityFuseConfig {
            arming_distance: 0.0,
            scan_interval_ms: 100.0,
            ..config()
        })
        .unwrap();
        let far = Vec3::new(0.0, 0.0, 100.0);
        assert!(fuse.update(Vec3::ZERO, far, 1.0).is_none());
        assert_eq!(fuse.state().last_scan_time, Some(1.0));

        // In range, but only 50 ms since the last scan
        let near = Vec3::new(0.0, 0.0, 1.0);
        assert!(fuse.update(Vec3::ZERO, near, 1.05).is_none());
        assert!(!fuse.is_detonated());
        assert_eq!(fuse.state().last_scan_time, Some(1.0));

        assert!(fuse.update(Vec3::ZERO, near, 1.1).is_some());
    }

    #[test]
    fn test_detonated_is_terminal() {
        let mut fuse = ProximityFuse::new(ProximityFuseConfig {
            arming_distance: 0.0,
            ..config()
        })
        .unwrap();
        let target = Vec3::new(1.0, 0.0, 0.0);
        assert!(fuse.update(Vec3::ZERO, target, 0.0).is_some());
        for i in 1..20 {
            assert!(fuse.update(Vec3::ZERO, target, i as f64).is_none());
            assert!(fuse.is_detonated());
        }
        // Retarget cannot revive a detonated fuse
        fuse.retarget(ProximityFuseConfig::retarget()).unwrap();
        assert!(fuse.is_detonated());
        assert!(fuse.is_armed());
    }

    #[test]
    fn test_retarget_restarts_arming() {
        let mut fuse = ProximityFuse::new(config()).unwrap();
        let far = Vec3::new(0.0, 0.0, 5000.0);
        fuse.update(Vec3::ZERO, far, 0.0);
        fuse.update(Vec3::new(0.0, 100.0, 0.0), far, 0.5);
        assert!(fuse.is_armed());

        let retarget = ProximityFuseConfig {
            arming_distance: 10.0,
            ..config()
        };
        fuse.retarget(retarget).unwrap();
        assert!(!fuse.is_armed());
        assert_eq!(fuse.distance_traveled(), 0.0);
        assert_eq!(fuse.config().arming_distance, 10.0);

        // Close target, but only 5 m flown since retarget
        let near = Vec3::new(0.0, 105.0, 2.0);
        assert!(fuse.update(Vec3::new(0.0, 105.0, 0.0), near, 0.6).is_none());
        assert!(!fuse.is_armed());
        // 10 m flown: armed and in range
        assert!(fuse.update(Vec3::new(0.0, 110.0, 0.0), Vec3::new(0.0, 110.0, 2.0), 0.7).is_some());
    }

    #[test]
    fn test_quality_endpoints_and_monotonic() {
        let fuse = ProximityFuse::new(config()).unwrap();
        assert_eq!(fuse.quality(0.0), 1.0);
        assert_eq!(fuse.quality(3.0), 1.0);
        assert_eq!(fuse.quality(8.0), 0.0);
        assert!((fuse.quality(5.5) - 0.5).abs() < 1e-12);

        let mut previous = f64::INFINITY;
        let mut miss = 3.0;
        while miss <= 8.0 {
            let q = fuse.quality(miss);
            assert!(q <= previous, "quality rose at {miss}");
            assert!((0.0..=1.0).contains(&q));
            previous = q;
            miss += 0.05;
        }
    }

    #[test]
    fn test_quality_when_radii_equal() {
        let cfg = ProximityFuseConfig {
            optimal_radius: 5.0,
            detonation_radius: 5.0,
            ..config()
        };
        assert_eq!(detonation_quality(&cfg, 5.0), 1.0);
        assert_eq!(detonation_quality(&cfg, 5.1), 0.0);
    }
}
