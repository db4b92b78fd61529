//! Shared domain types.
//!
//! Everything here is created fresh for a run and never mutated once the
//! stage that produced it returns.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Survey stratum, ordered from the nearest/faintest to the most extreme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    VeryLow,
    Low,
    Intermediate,
    High,
    Extreme,
}

impl Tier {
    pub const COUNT: usize = 5;

    pub const ALL: [Tier; Tier::COUNT] = [
        Tier::VeryLow,
        Tier::Low,
        Tier::Intermediate,
        Tier::High,
        Tier::Extreme,
    ];

    /// Label used in the survey table's tier column.
    pub fn label(self) -> &'static str {
        match self {
            Tier::VeryLow => "very low",
            Tier::Low => "low",
            Tier::Intermediate => "intermediate",
            Tier::High => "high",
            Tier::Extreme => "extreme",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tier::VeryLow => 0,
            Tier::Low => 1,
            Tier::Intermediate => 2,
            Tier::High => 3,
            Tier::Extreme => 4,
        }
    }

    pub fn from_label(label: &str) -> Option<Tier> {
        Tier::ALL.into_iter().find(|t| t.label() == label)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One surveyed object as read from the input table.
///
/// `label` keeps the raw tier text so rows with unknown labels reach the
/// partitioner and can be reported there.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRecord {
    /// 1-based line number in the source file.
    pub line: usize,
    pub label: String,
    /// Dust production rate (M☉/yr).
    pub dpr: f64,
}

/// The loaded survey table.
#[derive(Debug, Clone)]
pub struct SurveyTable {
    pub source: PathBuf,
    pub tier_column: String,
    pub dpr_column: String,
    pub records: Vec<ObjectRecord>,
}

impl SurveyTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Derived statistics for one tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierMetrics {
    pub tier: Tier,
    pub count: usize,
    /// M☉/yr
    pub dpr_total: f64,
    /// kpc³
    pub volume: f64,
    /// kpc²
    pub disc_area: f64,
    /// M☉/yr/kpc²
    pub disc_density: f64,
    /// M☉/yr/kpc³
    pub volume_density: f64,
}

/// Grand totals across all tiers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurveyTotals {
    pub count: usize,
    pub dpr_total: f64,
    pub disc_density: f64,
    pub volume_density: f64,
}

/// Output of the density stage: one entry per tier in `Tier::ALL` order.
#[derive(Debug, Clone)]
pub struct DensityReport {
    pub tiers: [TierMetrics; Tier::COUNT],
    pub totals: SurveyTotals,
    /// Rows whose tier label matched none of the known tiers.
    pub excluded_rows: usize,
}

impl DensityReport {
    pub fn tier(&self, tier: Tier) -> &TierMetrics {
        &self.tiers[tier.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_in_order() {
        for (i, tier) in Tier::ALL.into_iter().enumerate() {
            assert_eq!(tier.index(), i);
            assert_eq!(Tier::from_label(tier.label()), Some(tier));
        }
        assert_eq!(Tier::from_label("Very Low"), None);
        assert_eq!(Tier::from_label(""), None);
    }
}
