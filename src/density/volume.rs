//! Tier volumes (kpc³) and projected disc areas (kpc²).
//!
//! ```text
//! sphere(r)        = 4/3 π r³
//! cylinder(r, h)   = π r² h
//! cone_shell(a, b) = 2/3 π (b³ − a³) tan(π·lat/180)
//! ```
//!
//! `cone_shell` is the volume of the two opposed conical shells between radii
//! `a` and `b` whose half-angle is `90° − lat`: the part of the outer shell
//! left once the Galactic-plane band `|b| < lat` is removed.

use std::f64::consts::PI;

use crate::domain::{GeometryKind, SurveyGeometry, Tier};

pub fn sphere_volume(radius: f64) -> f64 {
    4.0 / 3.0 * PI * radius.powi(3)
}

pub fn cylinder_volume(radius: f64, height: f64) -> f64 {
    PI * radius.powi(2) * height
}

pub fn cone_shell_volume(radius_inner: f64, radius_outer: f64, excluded_latitude_deg: f64) -> f64 {
    2.0 / 3.0
        * PI
        * (radius_outer.powi(3) - radius_inner.powi(3))
        * (PI * excluded_latitude_deg / 180.0).tan()
}

/// Volume enclosed by one tier.
pub fn tier_volume(geometry: &SurveyGeometry, tier: Tier) -> f64 {
    let g = geometry.tier(tier);
    match g.kind {
        GeometryKind::Sphere => sphere_volume(g.radius_outer),
        GeometryKind::SpherePlusConeShell => {
            sphere_volume(g.radius_inner)
                + cone_shell_volume(g.radius_inner, g.radius_outer, geometry.excluded_latitude_deg)
        }
        GeometryKind::CylinderPlusConeShell => {
            cylinder_volume(g.radius_inner, geometry.scale_height)
                + cone_shell_volume(g.radius_inner, g.radius_outer, geometry.excluded_latitude_deg)
        }
    }
}

pub fn tier_volumes(geometry: &SurveyGeometry) -> [f64; Tier::COUNT] {
    Tier::ALL.map(|tier| tier_volume(geometry, tier))
}

/// Face-on area of the tier's outer radius.
pub fn disc_area(geometry: &SurveyGeometry, tier: Tier) -> f64 {
    PI * geometry.tier(tier).radius_outer.powi(2)
}
