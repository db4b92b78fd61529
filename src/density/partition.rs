//! Group rows by tier label.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::domain::{ObjectRecord, Tier};

/// Row indices per tier, plus the rows no tier claimed.
#[derive(Debug, Clone, Default)]
pub struct TierPartition {
    /// Indices into the record slice, in original row order, one list per tier.
    pub bins: [Vec<usize>; Tier::COUNT],
    /// Rows whose label matched no tier.
    pub excluded: Vec<usize>,
    /// Distinct unrecognized labels, sorted.
    pub unknown_labels: BTreeSet<String>,
}

impl TierPartition {
    pub fn bin(&self, tier: Tier) -> &[usize] {
        &self.bins[tier.index()]
    }

    pub fn assigned(&self) -> usize {
        self.bins.iter().map(Vec::len).sum()
    }
}

/// Assign every record to the tier whose label it carries.
///
/// Rows with an unknown label stay out of every bin. They are still reported:
/// the caller gets their indices and a warning is logged.
pub fn partition_by_tier(records: &[ObjectRecord]) -> TierPartition {
    let mut partition = TierPartition::default();

    for (idx, record) in records.iter().enumerate() {
        match Tier::from_label(&record.label) {
            Some(tier) => partition.bins[tier.index()].push(idx),
            None => {
                partition.excluded.push(idx);
                partition.unknown_labels.insert(record.label.clone());
            }
        }
    }

    for tier in Tier::ALL {
        debug!(tier = tier.label(), rows = partition.bin(tier).len(), "partitioned tier");
    }
    if !partition.excluded.is_empty() {
        let labels: Vec<&str> = partition.unknown_labels.iter().map(String::as_str).collect();
        warn!(
            excluded = partition.excluded.len(),
            "rows with unrecognized tier labels excluded from every tier: {labels:?}"
        );
    }

    partition
}
