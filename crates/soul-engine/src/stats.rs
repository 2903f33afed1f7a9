//! Aggregate statistics over a soul's epochs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use soul_core::{Archetype, Axis};

use crate::soul::Soul;

/// Summary of a soul's consultation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoulStatistics {
    /// Number of epochs aggregated.
    pub total_epochs: usize,
    /// Mean resonance.
    pub average_resonance: f64,
    /// Mean clarity.
    pub average_clarity: f64,
    /// Mean flux.
    pub average_flux: f64,
    /// Mean emergence.
    pub average_emergence: f64,
    /// How often each pattern occurred.
    pub pattern_frequency: BTreeMap<String, usize>,
    /// The most frequent pattern. Ties go to the earlier archetype.
    pub most_common_pattern: String,
    /// Timestamp of the first epoch.
    pub first_epoch_at: DateTime<Utc>,
    /// Timestamp of the last epoch.
    pub last_epoch_at: DateTime<Utc>,
}

impl SoulStatistics {
    /// Mean value of one axis.
    pub fn average(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Resonance => self.average_resonance,
            Axis::Clarity => self.average_clarity,
            Axis::Flux => self.average_flux,
            Axis::Emergence => self.average_emergence,
        }
    }
}

/// Compute statistics, or `None` when the soul has no epochs yet.
pub fn statistics(soul: &Soul) -> Option<SoulStatistics> {
    let epochs = soul.epochs();
    let first = epochs.first()?;
    let last = epochs.last()?;

    let mut sums = [0u64; 4];
    let mut pattern_frequency: BTreeMap<String, usize> = BTreeMap::new();
    for epoch in epochs {
        for (sum, value) in sums.iter_mut().zip(epoch.reading.axes()) {
            *sum += u64::from(value);
        }
        *pattern_frequency
            .entry(epoch.reading.pattern.clone())
            .or_default() += 1;
    }

    let count = epochs.len() as f64;
    let [resonance, clarity, flux, emergence] = sums.map(|s| s as f64 / count);

    let rank = |name: &str| Archetype::by_name(name).map_or(usize::MAX, |(i, _)| i);
    let most_common_pattern = pattern_frequency
        .iter()
        .max_by(|(a, ca), (b, cb)| {
            ca.cmp(cb)
                .then_with(|| rank(b).cmp(&rank(a)))
                .then_with(|| b.cmp(a))
        })
        .map(|(name, _)| name.clone())?;

    Some(SoulStatistics {
        total_epochs: epochs.len(),
        average_resonance: resonance,
        average_clarity: clarity,
        average_flux: flux,
        average_emergence: emergence,
        pattern_frequency,
        most_common_pattern,
        first_epoch_at: first.timestamp,
        last_epoch_at: last.timestamp,
    })
}
