//! Fire control system: assesses the raid, sizes salvos and launches interceptors.

use hecs::World;

use intercept_core::components::{LaunchParameters, TargetRef, ThreatRecord};
use intercept_core::error::Result;
use intercept_core::events::EngagementEvent;
use intercept_core::types::{KinematicState, Vec3};
use intercept_guidance::trajectory::{solve_launch, try_predict_intercept, InterceptSolution};
use intercept_guidance::{GuidanceController, ProximityFuse};
use intercept_threat_eval::{detect_clusters, ThreatAssessment, ThreatAssessor, ThreatCluster};

use crate::components::Threat;
use crate::engagement::{Battery, ScoreState, TargetRegistry};
use crate::engine::SimConfig;
use crate::world_setup::{self, InterceptorLaunch};

/// Run one assessment cycle. Returns the clusters detected this cycle.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    assessor: &ThreatAssessor,
    registry: &mut TargetRegistry,
    battery: &mut Battery,
    config: &SimConfig,
    next_interceptor_id: &mut u32,
    events: &mut Vec<EngagementEvent>,
    score: &mut ScoreState,
    now: f64,
) -> Vec<ThreatCluster> {
    let records = collect_threat_records(world);
    let clusters = detect_clusters(&records, assessor.config());
    let assessments = assessor.prioritize(&records, battery.position);

    let mut launches = 0;
    for assessment in &assessments {
        if launches >= config.max_launches_per_cycle || battery.magazine == 0 {
            break;
        }
        let committed = registry.assigned_count(assessment.threat_id);
        if committed >= assessment.required_interceptors {
            continue;
        }
        let Some(record) = records.iter().find(|r| r.id == assessment.threat_id) else {
            continue;
        };

        let (solution, launch) = match plan_launch(record, battery.position, config) {
            Ok(plan) => plan,
            Err(err) => {
                log::warn!("not engaging threat {}: {err}", record.id.0);
                events.push(EngagementEvent::EngagementSkipped {
                    threat_id: record.id,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let salvo = (assessment.required_interceptors - committed)
            .min(config.max_launches_per_cycle - launches)
            .min(battery.magazine);
        for _ in 0..salvo {
            let id = *next_interceptor_id;
            let launched = launch_interceptor(
                world,
                config,
                assessment,
                record,
                battery.position,
                launch,
                id,
                now,
            );
            if let Err(err) = launched {
                log::warn!("launch against threat {} aborted: {err}", record.id.0);
                break;
            }
            *next_interceptor_id += 1;
            battery.magazine -= 1;
            launches += 1;
            registry.assign(record.id, id);
            score.interceptors_fired += 1;
            events.push(EngagementEvent::Launched {
                interceptor_id: id,
                threat_id: record.id,
                angle: launch.angle,
                azimuth: launch.azimuth,
            });
        }
        log::debug!(
            "engaged threat {} (priority {:.0}) with {salvo}, intercept in {:.1}s",
            record.id.0,
            assessment.priority,
            solution.time_to_intercept
        );
    }

    clusters
}

/// Active threats as assessment records, in id order.
pub fn collect_threat_records(world: &World) -> Vec<ThreatRecord> {
    let mut records: Vec<ThreatRecord> = world
        .query::<(&Threat, &KinematicState)>()
        .iter()
        .map(|(_, (threat, state))| ThreatRecord {
            id: threat.id,
            class: threat.class,
            state: *state,
            spawn_time: threat.spawn_time,
            active: true,
        })
        .collect();
    records.sort_by_key(|r| r.id);
    records
}

/// Predicted intercept point and the launch that reaches it.
fn plan_launch(
    threat: &ThreatRecord,
    origin: Vec3,
    config: &SimConfig,
) -> Result<(InterceptSolution, LaunchParameters)> {
    let solution = try_predict_intercept(
        &threat.state,
        threat.class.motion_model(),
        origin,
        config.launch_speed,
        &config.guidance.solver,
    )?;
    let launch = solve_launch(origin, solution.point, config.launch_speed, config.prefer_lofted)?;
    Ok((solution, launch))
}

#[allow(clippy::too_many_arguments)]
fn launch_interceptor(
    world: &mut World,
    config: &SimConfig,
    assessment: &ThreatAssessment,
    threat: &ThreatRecord,
    origin: Vec3,
    launch: LaunchParameters,
    id: u32,
    now: f64,
) -> Result<()> {
    let guidance =
        GuidanceController::new(config.guidance, &config.fuse, threat.class.motion_model())?;
    let fuse = ProximityFuse::new(config.fuse.initial)?;
    world_setup::spawn_interceptor(
        world,
        InterceptorLaunch {
            id,
            target: TargetRef::Tracked(threat.id),
            target_position: threat.state.position,
            launch,
            origin,
            mass: config.interceptor_mass,
            pk: assessment.intercept_probability,
            guidance,
            fuse,
        },
        now,
    );
    Ok(())
}
