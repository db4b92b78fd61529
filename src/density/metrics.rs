//! Disc- and volume-averaged DPR per tier, plus survey totals.

use tracing::debug;

use crate::density::{TierPartition, disc_area, sum_tiers, tier_volume};
use crate::domain::{DensityReport, ObjectRecord, SurveyGeometry, SurveyTotals, Tier, TierMetrics};

/// Compute every tier's metrics and the grand totals.
///
/// `geometry` must already be validated: areas and volumes are then strictly
/// positive, so an empty tier yields zero densities.
pub fn compute_density_report(
    records: &[ObjectRecord],
    partition: &TierPartition,
    geometry: &SurveyGeometry,
) -> DensityReport {
    let sums = sum_tiers(records, partition);

    let tiers = Tier::ALL.map(|tier| {
        let sum = sums[tier.index()];
        let volume = tier_volume(geometry, tier);
        let disc_area = disc_area(geometry, tier);
        let metrics = TierMetrics {
            tier,
            count: sum.count,
            dpr_total: sum.dpr_total,
            volume,
            disc_area,
            disc_density: sum.dpr_total / disc_area,
            volume_density: sum.dpr_total / volume,
        };
        debug!(
            tier = tier.label(),
            count = metrics.count,
            dpr_total = metrics.dpr_total,
            volume = metrics.volume,
            volume_density = metrics.volume_density,
            "tier metrics"
        );
        metrics
    });

    DensityReport {
        totals: survey_totals(&tiers),
        tiers,
        excluded_rows: partition.excluded.len(),
    }
}

pub fn survey_totals(tiers: &[TierMetrics]) -> SurveyTotals {
    tiers.iter().fold(SurveyTotals::default(), |acc, m| SurveyTotals {
        count: acc.count + m.count,
        dpr_total: acc.dpr_total + m.dpr_total,
        disc_density: acc.disc_density + m.disc_density,
        volume_density: acc.volume_density + m.volume_density,
    })
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::density::{partition_by_tier, sphere_volume};

    fn rec(label: &str, dpr: f64) -> ObjectRecord {
        ObjectRecord { line: 0, label: label.to_string(), dpr }
    }

    fn report_for(records: &[ObjectRecord]) -> DensityReport {
        let partition = partition_by_tier(records);
        compute_density_report(records, &partition, &SurveyGeometry::default())
    }

    #[test]
    fn three_row_example() {
        let records = vec![rec("very low", 1e-7), rec("low", 2e-7), rec("very low", 3e-7)];
        let report = report_for(&records);

        let very_low = report.tier(Tier::VeryLow);
        assert_eq!(very_low.count, 2);
        assert!((very_low.dpr_total - 4e-7).abs() < 1e-21);
        let expected = 4e-7 / ((4.0 / 3.0) * PI * 0.25_f64.powi(3));
        assert!((very_low.volume_density - expected).abs() <= 1e-12 * expected);
        assert_eq!(very_low.volume_density, very_low.dpr_total / sphere_volume(0.25));

        let low = report.tier(Tier::Low);
        assert_eq!(low.count, 1);
        assert_eq!(low.dpr_total, 2e-7);

        for tier in [Tier::Intermediate, Tier::High, Tier::Extreme] {
            let m = report.tier(tier);
            assert_eq!(m.count, 0);
            assert_eq!(m.dpr_total, 0.0);
            assert_eq!(m.disc_density, 0.0);
            assert_eq!(m.volume_density, 0.0);
        }
        assert_eq!(report.totals.count, 3);
        assert_eq!(report.excluded_rows, 0);
    }

    #[test]
    fn densities_are_exact_quotients() {
        let records = vec![
            rec("very low", 3.1e-9),
            rec("low", 7.7e-8),
            rec("intermediate", 2.2e-7),
            rec("high", 4.4e-7),
            rec("extreme", 1.3e-5),
            rec("extreme", 2.9e-6),
        ];
        let report = report_for(&records);
        for m in &report.tiers {
            assert_eq!(m.volume_density, m.dpr_total / m.volume);
            assert_eq!(m.disc_density, m.dpr_total / m.disc_area);
        }
    }

    #[test]
    fn totals_sum_over_tiers() {
        let records = vec![
            rec("very low", 1e-8),
            rec("high", 2e-7),
            rec("extreme", 3e-6),
            rec("unclassified", 9e-5),
        ];
        let report = report_for(&records);
        let t = report.totals;

        assert_eq!(t.count, 3);
        assert_eq!(report.excluded_rows, 1);
        let dpr: f64 = report.tiers.iter().map(|m| m.dpr_total).sum();
        let vol: f64 = report.tiers.iter().map(|m| m.volume_density).sum();
        let disc: f64 = report.tiers.iter().map(|m| m.disc_density).sum();
        assert!((t.dpr_total - dpr).abs() <= 1e-15 * dpr);
        assert!((t.volume_density - vol).abs() <= 1e-15 * vol);
        assert!((t.disc_density - disc).abs() <= 1e-15 * disc);
    }

    #[test]
    fn empty_survey_gives_zero_everywhere() {
        let report = report_for(&[]);
        for m in &report.tiers {
            assert_eq!(m.count, 0);
            assert_eq!(m.dpr_total, 0.0);
            assert_eq!(m.disc_density, 0.0);
            assert_eq!(m.volume_density, 0.0);
            assert!(!m.dpr_total.is_sign_negative());
            assert!(!m.disc_density.is_sign_negative());
            assert!(!m.volume_density.is_sign_negative());
            assert!(m.volume > 0.0);
        }
        assert_eq!(report.totals, SurveyTotals::default());
    }
}
