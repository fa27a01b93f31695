//! Fire-control bookkeeping kept outside the ECS world.

use std::collections::BTreeMap;

use intercept_core::components::ThreatId;
use intercept_core::types::Vec3;

/// Which interceptors are committed to which threats.
///
/// Owned by the engine and handed to systems by `&mut`.
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    assignments: BTreeMap<ThreatId, Vec<u32>>,
}

impl TargetRegistry {
    pub fn assign(&mut self, threat: ThreatId, interceptor: u32) {
        let entry = self.assignments.entry(threat).or_default();
        if !entry.contains(&interceptor) {
            entry.push(interceptor);
        }
    }

    /// Drop an interceptor from whatever threat it was committed to.
    pub fn release(&mut self, interceptor: u32) {
        self.assignments.retain(|_, ids| {
            ids.retain(|id| *id != interceptor);
            !ids.is_empty()
        });
    }

    /// Remove a dead threat, returning the interceptors that were on it.
    pub fn forget(&mut self, threat: ThreatId) -> Vec<u32> {
        self.assignments.remove(&threat).unwrap_or_default()
    }

    pub fn assigned_count(&self, threat: ThreatId) -> u32 {
        self.assignments.get(&threat).map_or(0, |ids| ids.len() as u32)
    }

    pub fn is_targeted(&self, threat: ThreatId) -> bool {
        self.assigned_count(threat) > 0
    }

    pub fn interceptors_on(&self, threat: ThreatId) -> &[u32] {
        self.assignments.get(&threat).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn targeted_threats(&self) -> impl Iterator<Item = ThreatId> + '_ {
        self.assignments.keys().copied()
    }
}

/// The launcher: a fixed site with a finite magazine.
#[derive(Debug, Clone, Copy)]
pub struct Battery {
    pub position: Vec3,
    pub magazine: u32,
}

/// Running score state tracked by the engine.
#[derive(Debug, Clone, Default)]
pub struct ScoreState {
    pub threats_spawned: u32,
    pub threats_killed: u32,
    pub threats_impacted: u32,
    pub interceptors_fired: u32,
    pub detonations: u32,
}
