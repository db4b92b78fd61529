//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the survey tiers (`Tier`) and per-object rows (`ObjectRecord`)
//! - the survey-selection geometry configuration (`SurveyGeometry`)
//! - computed outputs (`TierMetrics`, `SurveyTotals`, `DensityReport`)

pub mod geometry;
pub mod types;

pub use geometry::*;
pub use types::*;
