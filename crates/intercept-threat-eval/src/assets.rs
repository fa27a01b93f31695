//! Read-only registry of protected assets.

use intercept_core::components::ProtectedAsset;
use intercept_core::types::{horizontal_distance, Vec3};
use serde::{Deserialize, Serialize};

/// Fixed set of assets a battery defends. Built once, never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetRegistry {
    assets: Vec<ProtectedAsset>,
}

impl AssetRegistry {
    pub fn new(assets: Vec<ProtectedAsset>) -> Self {
        Self { assets }
    }

    pub fn assets(&self) -> &[ProtectedAsset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Assets whose footprint overlaps a damage circle, with their overlap factor.
    pub fn exposed_to(
        &self,
        impact_point: Vec3,
        damage_radius: f64,
    ) -> impl Iterator<Item = (&ProtectedAsset, f64)> {
        self.assets.iter().filter_map(move |asset| {
            let d = horizontal_distance(impact_point, asset.position);
            let overlap = overlap_factor(d, damage_radius, asset.radius);
            (overlap > 0.0).then_some((asset, overlap))
        })
    }
}

/// Approximate fraction of overlap between two circles `d` apart.
///
/// 0 when the circles do not touch, 1 when one contains the other,
/// linear in between.
pub fn overlap_factor(d: f64, r1: f64, r2: f64) -> f64 {
    let outer = r1 + r2;
    let inner = (r1 - r2).abs();
    if d >= outer {
        return 0.0;
    }
    if d <= inner {
        return 1.0;
    }
    ((outer - d) / (outer - inner)).clamp(0.0, 1.0)
}
