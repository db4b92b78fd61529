//! Survey-selection geometry.
//!
//! Each tier covers a region of the Galaxy bounded by an inner and an outer
//! heliocentric radius. Beyond the inner radius, sources within the
//! Galactic-plane band `|b| < excluded_latitude_deg` are lost to extinction,
//! so only the two opposed conical shells above and below the plane count.
//!
//! The default values are the survey's empirical constants. A JSON file with
//! the same shape can replace them (`ness density --geometry geometry.json`).

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::Tier;
use crate::error::AppError;

/// Which volume formula applies to a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    /// Full sphere of the outer radius; no plane exclusion.
    Sphere,
    /// Sphere of the inner radius plus the cone shell out to the outer radius.
    SpherePlusConeShell,
    /// Disc of the inner radius and height `scale_height`, plus the cone shell.
    CylinderPlusConeShell,
}

/// Radii (kpc) and formula for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierGeometry {
    pub radius_inner: f64,
    pub radius_outer: f64,
    pub kind: GeometryKind,
}

/// Geometry configuration for all tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyGeometry {
    /// One entry per tier, in `Tier::ALL` order.
    pub tiers: [TierGeometry; Tier::COUNT],
    /// Vertical scale height (kpc) of the cylinder-kind tier.
    pub scale_height: f64,
    /// Half-width (degrees) of the Galactic-plane band excluded from the outer shells.
    pub excluded_latitude_deg: f64,
}

impl Default for SurveyGeometry {
    fn default() -> Self {
        use GeometryKind::*;
        Self {
            tiers: [
                TierGeometry { radius_inner: 0.0, radius_outer: 0.250, kind: Sphere },
                TierGeometry { radius_inner: 0.0, radius_outer: 0.300, kind: Sphere },
                TierGeometry { radius_inner: 0.400, radius_outer: 0.600, kind: SpherePlusConeShell },
                TierGeometry { radius_inner: 0.800, radius_outer: 1.200, kind: SpherePlusConeShell },
                TierGeometry { radius_inner: 2.0, radius_outer: 3.0, kind: CylinderPlusConeShell },
            ],
            scale_height: 0.1,
            excluded_latitude_deg: 1.5,
        }
    }
}

impl SurveyGeometry {
    pub fn tier(&self, tier: Tier) -> &TierGeometry {
        &self.tiers[tier.index()]
    }

    /// Load a geometry override from JSON. Validation happens when the
    /// density run starts.
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|e| {
            AppError::input(format!("Failed to open geometry JSON '{}': {e}", path.display()))
        })?;
        serde_json::from_reader(file)
            .map_err(|e| AppError::input(format!("Invalid geometry JSON '{}': {e}", path.display())))
    }

    /// Reject configurations that would make an area or volume zero, negative
    /// or non-finite.
    pub fn validate(&self) -> Result<(), AppError> {
        for tier in Tier::ALL {
            let g = self.tier(tier);
            if !(g.radius_inner.is_finite() && g.radius_outer.is_finite()) {
                return Err(AppError::input(format!("Tier '{tier}': radii must be finite.")));
            }
            if g.radius_inner < 0.0 || g.radius_outer <= 0.0 {
                return Err(AppError::input(format!(
                    "Tier '{tier}': need radius_inner >= 0 and radius_outer > 0 (got {}, {}).",
                    g.radius_inner, g.radius_outer
                )));
            }
            if g.radius_inner > g.radius_outer {
                return Err(AppError::input(format!(
                    "Tier '{tier}': radius_inner {} exceeds radius_outer {}.",
                    g.radius_inner, g.radius_outer
                )));
            }
        }

        if !(self.scale_height.is_finite() && self.scale_height > 0.0) {
            return Err(AppError::input(format!(
                "scale_height must be finite and > 0 (got {}).",
                self.scale_height
            )));
        }
        if !(self.excluded_latitude_deg.is_finite()
            && (0.0..90.0).contains(&self.excluded_latitude_deg))
        {
            return Err(AppError::input(format!(
                "excluded_latitude_deg must be in [0, 90) (got {}).",
                self.excluded_latitude_deg
            )));
        }

        for tier in Tier::ALL {
            let volume = crate::density::tier_volume(self, tier);
            if !(volume.is_finite() && volume > 0.0) {
                return Err(AppError::input(format!(
                    "Tier '{tier}': geometry yields a non-positive volume ({volume})."
                )));
            }
        }

        Ok(())
    }
}
