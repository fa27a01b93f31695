//! Per-interceptor guidance phase machine.
//!
//! LaunchClearance → Midcourse → (optional) ReEngagement → Midcourse.
//! Each tick turns the interceptor and target snapshots into a bounded
//! correction force for the host's physics integrator.

use intercept_core::config::{FuseProfiles, GuidanceConfig, ProximityFuseConfig};
use intercept_core::constants::GRAVITY;
use intercept_core::enums::{GuidancePhase, MotionModel};
use intercept_core::error::Result;
use intercept_core::types::{KinematicState, Vec3};

use crate::fuse::ProximityFuse;
use crate::trajectory::{predict_intercept, project};

/// Force command for one tick. Recomputed every tick, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidanceCommand {
    /// Total force to apply (N): correction + forward thrust + gravity compensation.
    pub force: Vec3,
    /// `|force|` (N).
    pub magnitude: f64,
    /// G-limited steering component of `force` (N).
    pub correction: Vec3,
    /// Phase the controller was in when the command was produced.
    pub phase: GuidancePhase,
}

impl GuidanceCommand {
    /// No force: the interceptor flies ballistically this tick.
    pub fn idle(phase: GuidancePhase) -> Self {
        Self {
            force: Vec3::ZERO,
            magnitude: 0.0,
            correction: Vec3::ZERO,
            phase,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.magnitude == 0.0
    }
}

#[derive(Debug, Clone)]
pub struct GuidanceController {
    config: GuidanceConfig,
    retarget_profile: ProximityFuseConfig,
    target_model: MotionModel,
    phase: GuidancePhase,
    reengagement_attempts: u32,
    min_distance: f64,
    last_distance: Option<f64>,
}

impl GuidanceController {
    /// Create a controller in LaunchClearance. Both fuse profiles are
    /// validated here so re-engagement can never fail mid-flight.
    pub fn new(
        config: GuidanceConfig,
        fuse_profiles: &FuseProfiles,
        target_model: MotionModel,
    ) -> Result<Self> {
        fuse_profiles.validate()?;
        Ok(Self {
            config,
            retarget_profile: fuse_profiles.retarget,
            target_model,
            phase: GuidancePhase::LaunchClearance,
            reengagement_attempts: 0,
            min_distance: f64::INFINITY,
            last_distance: None,
        })
    }

    pub fn phase(&self) -> GuidancePhase {
        self.phase
    }

    pub fn config(&self) -> &GuidanceConfig {
        &self.config
    }

    pub fn reengagement_attempts(&self) -> u32 {
        self.reengagement_attempts
    }

    /// Closest approach to the target since launch or last re-engagement (m).
    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    /// Point the controller at a different target. Miss tracking restarts.
    pub fn retarget(&mut self, target_model: MotionModel) {
        self.target_model = target_model;
        self.min_distance = f64::INFINITY;
        self.last_distance = None;
    }

    /// Compute this tick's command.
    ///
    /// `fuse` is read for flight distance and reset to the retarget profile
    /// when re-engagement starts.
    pub fn update(
        &mut self,
        own: &KinematicState,
        target: &KinematicState,
        fuse: &mut ProximityFuse,
        dt: f64,
    ) -> GuidanceCommand {
        let finite = own.position.is_finite()
            && own.velocity.is_finite()
            && target.position.is_finite()
            && target.velocity.is_finite();
        if !finite || dt <= 0.0 || own.mass <= 0.0 {
            return GuidanceCommand::idle(self.phase);
        }

        let speed = own.velocity.length();
        let to_target = target.position - own.position;
        let distance = to_target.length();
        let previous = self.last_distance.replace(distance);
        self.min_distance = self.min_distance.min(distance);

        self.advance_phase(own, target, fuse, distance, previous, speed);

        if self.phase == GuidancePhase::LaunchClearance {
            return GuidanceCommand::idle(self.phase);
        }
        if speed < self.config.min_speed {
            log::trace!("speed {speed:.2} m/s below guidance authority");
            return GuidanceCommand::idle(self.phase);
        }
        if distance < self.config.close_range_threshold {
            return GuidanceCommand::idle(self.phase);
        }

        let aim = self.aim_point(own, target, speed);
        let Some(los) = (aim - own.position).try_normalize() else {
            return GuidanceCommand::idle(self.phase);
        };
        let heading = own.velocity / speed;
        let reengaging = self.phase == GuidancePhase::ReEngagement;

        let gain = if reengaging {
            self.config.gain * self.config.reengage_gain_multiplier
        } else {
            self.config.gain
        };
        let velocity_error = los * speed - own.velocity;
        let mut correction = velocity_error * own.mass * gain;
        // Never command more than the whole velocity error in one tick.
        correction = correction.clamp_length_max(velocity_error.length() * own.mass / dt);
        if reengaging {
            correction += turn_direction(heading, los) * own.mass * self.config.reengage_turn_accel;
        }
        correction = correction.clamp_length_max(self.config.force_limit(own.mass, reengaging));

        let thrust = heading
            * ((self.config.target_cruise_speed - speed).max(0.0)
                * own.mass
                * self.config.thrust_gain);
        let gravity_compensation = Vec3::Y * (own.mass * GRAVITY);
        let force = correction + thrust + gravity_compensation;

        GuidanceCommand {
            force,
            magnitude: force.length(),
            correction,
            phase: self.phase,
        }
    }

    fn advance_phase(
        &mut self,
        own: &KinematicState,
        target: &KinematicState,
        fuse: &mut ProximityFuse,
        distance: f64,
        previous: Option<f64>,
        speed: f64,
    ) {
        match self.phase {
            GuidancePhase::LaunchClearance => {
                if fuse.distance_traveled() >= self.config.min_guidance_distance {
                    self.set_phase(GuidancePhase::Midcourse);
                }
            }
            GuidancePhase::Midcourse => {
                if self.should_reengage(distance, previous, speed) {
                    self.reengagement_attempts += 1;
                    self.min_distance = distance;
                    if let Err(err) = fuse.retarget(self.retarget_profile) {
                        log::warn!("retarget fuse profile rejected: {err}");
                    }
                    log::debug!(
                        "re-engaging at {distance:.1}m (attempt {})",
                        self.reengagement_attempts
                    );
                    self.set_phase(GuidancePhase::ReEngagement);
                }
            }
            GuidancePhase::ReEngagement => {
                let closing = closing_velocity(own, target);
                if closing > 0.0 && distance < self.config.reacquisition_distance {
                    self.set_phase(GuidancePhase::Midcourse);
                }
            }
        }
    }

    /// Got close, now diverging, still has energy and attempts left.
    fn should_reengage(&self, distance: f64, previous: Option<f64>, speed: f64) -> bool {
        let Some(last) = previous else {
            return false;
        };
        self.min_distance < self.config.miss_threshold
            && distance > last
            && distance > self.config.min_reengage_distance
            && self.reengagement_attempts < self.config.max_reengagement_attempts
            && speed > self.config.reengage_energy_floor
    }

    /// Lead point: the target projected forward by `lead_factor` of the
    /// predicted time-to-intercept. Falls back to the target's current
    /// position when no feasible intercept exists.
    fn aim_point(&self, own: &KinematicState, target: &KinematicState, speed: f64) -> Vec3 {
        let solution = predict_intercept(
            target,
            self.target_model,
            own.position,
            speed,
            &self.config.solver,
        );
        if !solution.feasible {
            log::trace!("no feasible intercept, pursuing current target position");
            return target.position;
        }
        let lead_time = solution.time_to_intercept * self.config.lead_factor;
        project(target, self.target_model, lead_time)
    }

    fn set_phase(&mut self, phase: GuidancePhase) {
        log::debug!("guidance phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}

/// Rate at which the range to the target is shrinking (m/s, positive when closing).
pub fn closing_velocity(own: &KinematicState, target: &KinematicState) -> f64 {
    let los = (target.position - own.position).normalize_or_zero();
    los.dot(own.velocity - target.velocity)
}

/// Unit vector perpendicular to `heading`, toward `los`.
/// Any perpendicular when `los` is directly behind.
fn turn_direction(heading: Vec3, los: Vec3) -> Vec3 {
    let lateral = los - heading * los.dot(heading);
    match lateral.try_normalize() {
        Some(dir) => dir,
        None if los.dot(heading) < 0.0 => heading.any_orthonormal_vector(),
        None => Vec3::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intercept_core::constants::DT;
    use intercept_core::error::InterceptError;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn armed_fuse() -> ProximityFuse {
        let mut fuse = ProximityFuse::new(FuseProfiles::default().initial).unwrap();
        let far = Vec3::new(1.0e6, 1.0e6, 1.0e6);
        fuse.update(Vec3::ZERO, far, 0.0);
        fuse.update(Vec3::new(0.0, 100.0, 0.0), far, 1.0);
        fuse
    }

    fn controller(model: MotionModel) -> GuidanceController {
        GuidanceController::new(GuidanceConfig::default(), &FuseProfiles::default(), model).unwrap()
    }

    #[test]
    fn test_rejects_invalid_fuse_profiles() {
        let bad = ProximityFuseConfig {
            optimal_radius: 12.0,
            ..ProximityFuseConfig::initial()
        };
        for profiles in [
            FuseProfiles {
                initial: bad,
                ..FuseProfiles::default()
            },
            FuseProfiles {
                retarget: bad,
                ..FuseProfiles::default()
            },
        ] {
            assert!(matches!(
                GuidanceController::new(GuidanceConfig::default(), &profiles, MotionModel::Linear),
                Err(InterceptError::InvalidFuseConfig(_))
            ));
        }
    }

    #[test]
    fn test_launch_clearance_emits_no_force() {
        let mut fuse = ProximityFuse::new(FuseProfiles::default().initial).unwrap();
        let mut guidance = controller(MotionModel::Linear);
        let own = KinematicState::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, 200.0, 0.0), 90.0);
        let target = KinematicState::new(Vec3::new(2000.0, 1000.0, 0.0), Vec3::new(-100.0, 0.0, 0.0), 50.0);

        fuse.update(Vec3::ZERO, target.position, 0.0);
        fuse.update(own.position, target.position, DT);
        let command = guidance.update(&own, &target, &mut fuse, DT);

        assert_eq!(command.phase, GuidancePhase::LaunchClearance);
        assert!(command.is_idle());
    }

    #[test]
    fn test_enters_midcourse_after_clearance() {
        let mut fuse = armed_fuse();
        let mut guidance = controller(MotionModel::Linear);
        let own = KinematicState::new(Vec3::new(0.0, 100.0, 0.0), Vec3::new(0.0, 200.0, 0.0), 90.0);
        let target = KinematicState::new(Vec3::new(2000.0, 1000.0, 0.0), Vec3::new(-100.0, 0.0, 0.0), 50.0);

        let command = guidance.update(&own, &target, &mut fuse, DT);
        assert_eq!(command.phase, GuidancePhase::Midcourse);
        assert!(!command.is_idle());
        // Steering toward +x where the target is
        assert!(command.correction.x > 0.0);
    }

    #[test]
    fn test_low_speed_short_circuits() {
        let mut fuse = armed_fuse();
        let mut guidance = controller(MotionModel::Linear);
        let own = KinematicState::new(Vec3::new(0.0, 100.0, 0.0), Vec3::new(0.0, 1.0, 0.0), 90.0);
        let target = KinematicState::fixed_point(Vec3::new(500.0, 500.0, 0.0));
        let command = guidance.update(&own, &target, &mut fuse, DT);
        assert!(command.is_idle());
        assert_eq!(command.phase, GuidancePhase::Midcourse);

        let at_rest = KinematicState::new(own.position, Vec3::ZERO, 90.0);
        assert!(guidance.update(&at_rest, &target, &mut fuse, DT).is_idle());
    }

    #[test]
    fn test_close_range_stops_correcting() {
        let mut fuse = armed_fuse();
        let mut guidance = controller(MotionModel::Linear);
        let own = KinematicState::new(Vec3::new(0.0, 100.0, 0.0), Vec3::new(150.0, 0.0, 0.0), 90.0);
        let target = KinematicState::fixed_point(Vec3::new(2.0, 100.0, 0.0));
        assert!(guidance.update(&own, &target, &mut fuse, DT).is_idle());
    }

    #[test]
    fn test_non_finite_input_is_ignored() {
        let mut fuse = armed_fuse();
        let mut guidance = controller(MotionModel::Linear);
        let own = KinematicState::new(Vec3::new(0.0, f64::NAN, 0.0), Vec3::new(150.0, 0.0, 0.0), 90.0);
        let target = KinematicState::fixed_point(Vec3::new(500.0, 100.0, 0.0));
        assert!(guidance.update(&own, &target, &mut fuse, DT).is_idle());
    }

    #[test]
    fn test_aligned_flight_needs_only_gravity_and_thrust() {
        let mut fuse = armed_fuse();
        let mut guidance = controller(MotionModel::Linear);
        let mass = 90.0;
        let own = KinematicState::new(Vec3::new(0.0, 100.0, 0.0), Vec3::new(200.0, 0.0, 0.0), mass);
        let target = KinematicState::fixed_point(Vec3::new(3000.0, 100.0, 0.0));
        let command = guidance.update(&own, &target, &mut fuse, DT);

        assert!(command.correction.length() < 1e-6);
        // At cruise speed there is no thrust term, only gravity compensation
        assert!((command.force - Vec3::Y * mass * GRAVITY).length() < 1e-6);
    }

    #[test]
    fn test_g_limit_holds_for_random_inputs() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let config = GuidanceConfig::default();
        for _ in 0..2000 {
            let mut fuse = armed_fuse();
            let mut guidance = controller(MotionModel::Ballistic);
            let mass = rng.gen_range(1.0..500.0);
            let own = KinematicState::new(
                Vec3::new(
                    rng.gen_range(-5000.0..5000.0),
                    rng.gen_range(0.0..5000.0),
                    rng.gen_range(-5000.0..5000.0),
                ),
                Vec3::new(
                    rng.gen_range(-800.0..800.0),
                    rng.gen_range(-800.0..800.0),
                    rng.gen_range(-800.0..800.0),
                ),
                mass,
            );
            let target = KinematicState::new(
                Vec3::new(
                    rng.gen_range(-5000.0..5000.0),
                    rng.gen_range(0.0..5000.0),
                    rng.gen_range(-5000.0..5000.0),
                ),
                Vec3::new(
                    rng.gen_range(-1500.0..1500.0),
                    rng.gen_range(-1500.0..1500.0),
                    rng.gen_range(-1500.0..1500.0),
                ),
                100.0,
            );
            let command = guidance.update(&own, &target, &mut fuse, DT);
            let limit = config.force_limit(mass, false);
            assert_eq!(command.phase, GuidancePhase::Midcourse);
            assert!(
                command.correction.length() <= limit * (1.0 + 1e-9),
                "correction {:.1}N exceeds limit {:.1}N",
                command.correction.length(),
                limit
            );
        }
    }

    #[test]
    fn test_reengages_after_near_miss_and_resets_fuse() {
        let mut fuse = armed_fuse();
        let mut guidance = controller(MotionModel::Linear);
        let target = KinematicState::fixed_point(Vec3::new(0.0, 500.0, 0.0));
        let velocity = Vec3::new(150.0, 0.0, 0.0);

        // Pass 10 m abeam of the target, then start opening the range.
        let approach = KinematicState::new(Vec3::new(-20.0, 510.0, 0.0), velocity, 90.0);
        guidance.update(&approach, &target, &mut fuse, DT);
        let abeam = KinematicState::new(Vec3::new(0.0, 510.0, 0.0), velocity, 90.0);
        guidance.update(&abeam, &target, &mut fuse, DT);
        assert_eq!(guidance.phase(), GuidancePhase::Midcourse);

        let past = KinematicState::new(Vec3::new(20.0, 510.0, 0.0), velocity, 90.0);
        let command = guidance.update(&past, &target, &mut fuse, DT);

        assert_eq!(command.phase, GuidancePhase::ReEngagement);
        assert_eq!(guidance.reengagement_attempts(), 1);
        assert!(!fuse.is_armed(), "fuse must re-arm from the re-engagement point");
        assert_eq!(fuse.config().arming_distance, FuseProfiles::default().retarget.arming_distance);

        let limit = guidance.config().force_limit(90.0, true);
        assert!(command.correction.length() <= limit * (1.0 + 1e-9));
        // Turning back toward -x
        assert!(command.correction.x < 0.0);
    }

    #[test]
    fn test_reengagement_capped_at_configured_attempts() {
        let mut fuse = armed_fuse();
        let mut guidance = controller(MotionModel::Linear);
        let target = KinematicState::fixed_point(Vec3::new(0.0, 500.0, 0.0));

        let pass = |guidance: &mut GuidanceController, fuse: &mut ProximityFuse, dir: f64| {
            let velocity = Vec3::new(150.0 * dir, 0.0, 0.0);
            for x in [-20.0, 0.0, 20.0] {
                let own = KinematicState::new(Vec3::new(x * dir, 510.0, 0.0), velocity, 90.0);
                guidance.update(&own, &target, fuse, DT);
            }
        };

        pass(&mut guidance, &mut fuse, 1.0);
        assert_eq!(guidance.phase(), GuidancePhase::ReEngagement);

        // Turned around and closing again inside the re-acquisition distance
        let closing = KinematicState::new(Vec3::new(100.0, 510.0, 0.0), Vec3::new(-150.0, 0.0, 0.0), 90.0);
        guidance.update(&closing, &target, &mut fuse, DT);
        assert_eq!(guidance.phase(), GuidancePhase::Midcourse);

        pass(&mut guidance, &mut fuse, -1.0);
        assert_eq!(guidance.phase(), GuidancePhase::Midcourse);
        assert_eq!(guidance.reengagement_attempts(), 1);
    }

    #[test]
    fn test_no_reengagement_without_energy() {
        let mut fuse = armed_fuse();
        let mut guidance = controller(MotionModel::Linear);
        let target = KinematicState::fixed_point(Vec3::new(0.0, 500.0, 0.0));
        let velocity = Vec3::new(20.0, 0.0, 0.0);
        for x in [-20.0, 0.0, 20.0] {
            let own = KinematicState::new(Vec3::new(x, 510.0, 0.0), velocity, 90.0);
            guidance.update(&own, &target, &mut fuse, DT);
        }
        assert_eq!(guidance.phase(), GuidancePhase::Midcourse);
        assert_eq!(guidance.reengagement_attempts(), 0);
    }

    #[test]
    fn test_turn_direction_when_target_directly_behind() {
        let heading = Vec3::X;
        let dir = turn_direction(heading, -Vec3::X);
        assert!((dir.length() - 1.0).abs() < 1e-12);
        assert!(dir.dot(heading).abs() < 1e-12);
        assert_eq!(turn_direction(heading, Vec3::X), Vec3::ZERO);
    }

    #[test]
    fn test_closing_velocity_sign() {
        let own = KinematicState::new(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0), 1.0);
        let ahead = KinematicState::fixed_point(Vec3::new(500.0, 0.0, 0.0));
        let behind = KinematicState::fixed_point(Vec3::new(-500.0, 0.0, 0.0));
        assert_eq!(closing_velocity(&own, &ahead), 100.0);
        assert_eq!(closing_velocity(&own, &behind), -100.0);
    }
}
