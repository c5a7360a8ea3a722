// Ring merger: point-wise sum of interface series sharing a ring/region key.
//
// Alignment is positional, not by timestamp. All series come from the same fetch
// window, so they share a cadence; when lengths differ the merge is truncated to
// the shortest contributor. Mixed cadences are not corrected.

use std::collections::HashMap;

use serde::Deserialize;

use crate::models::{AggregatedSeries, MonitoredInterface, TimeSeries};

/// Merge key for the upstream layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeBy {
    /// `region/ring`
    Ring,
    /// `region`
    Region,
}

impl MergeBy {
    pub fn key_for(self, iface: &MonitoredInterface) -> String {
        match self {
            MergeBy::Ring => iface.ring_key(),
            MergeBy::Region => iface.region.clone(),
        }
    }
}

/// One merged series per distinct key, in order of each key's first appearance.
pub fn merge_series(groups: impl IntoIterator<Item = (String, TimeSeries)>) -> Vec<AggregatedSeries> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<AggregatedSeries> = Vec::new();

    for (key, series) in groups {
        match index.get(&key) {
            Some(&i) => add_positional(&mut merged[i], &series),
            None => {
                index.insert(key.clone(), merged.len());
                merged.push(AggregatedSeries {
                    key,
                    series,
                    contributors: 1,
                });
            }
        }
    }
    merged
}

fn add_positional(acc: &mut AggregatedSeries, other: &TimeSeries) {
    let len = acc.series.len().min(other.len());
    acc.series.samples.truncate(len);
    for (a, b) in acc.series.samples.iter_mut().zip(&other.samples) {
        a.in_rate += b.in_rate;
        a.out_rate += b.out_rate;
    }
    acc.contributors += 1;
}
