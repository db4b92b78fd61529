//! Per-tier DPR sums.

use crate::density::TierPartition;
use crate::domain::{ObjectRecord, Tier};

/// Count and summed DPR of one tier.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TierSum {
    pub count: usize,
    pub dpr_total: f64,
}

/// Sum the DPR of the rows in `bin`, in row order. An empty bin sums to +0.0.
pub fn sum_bin(records: &[ObjectRecord], bin: &[usize]) -> TierSum {
    // Float `Sum` starts at -0.0; the table must show a positive zero.
    TierSum {
        count: bin.len(),
        dpr_total: bin.iter().fold(0.0, |acc, &i| acc + records[i].dpr),
    }
}

pub fn sum_tiers(records: &[ObjectRecord], partition: &TierPartition) -> [TierSum; Tier::COUNT] {
    Tier::ALL.map(|tier| sum_bin(records, partition.bin(tier)))
}

/// Raw DPR values of one tier, for the figure.
pub fn bin_values(records: &[ObjectRecord], bin: &[usize]) -> Vec<f64> {
    bin.iter().map(|&i| records[i].dpr).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::partition_by_tier;

    fn rec(label: &str, dpr: f64) -> ObjectRecord {
        ObjectRecord { line: 0, label: label.to_string(), dpr }
    }

    #[test]
    fn sums_and_counts_per_tier() {
        let records = vec![rec("high", 1.0e-7), rec("extreme", 5.0e-6), rec("high", 2.0e-7)];
        let partition = partition_by_tier(&records);
        let sums = sum_tiers(&records, &partition);

        assert_eq!(sums[Tier::High.index()].count, 2);
        assert!((sums[Tier::High.index()].dpr_total - 3.0e-7).abs() < 1e-20);
        assert_eq!(sums[Tier::Extreme.index()].count, 1);
        assert_eq!(sums[Tier::Extreme.index()].dpr_total, 5.0e-6);
    }

    #[test]
    fn empty_bin_sums_to_zero() {
        let sum = sum_bin(&[], &[]);
        assert_eq!(sum, TierSum { count: 0, dpr_total: 0.0 });
        assert!(!sum.dpr_total.is_sign_negative());
    }
}
