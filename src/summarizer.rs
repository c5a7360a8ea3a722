// Summarizer: p95/peak statistics, capacity resolution, utilization and the
// running per-CO peak totals.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use crate::models::{MonitoredInterface, ReportRow, TimeSeries};

pub const PERCENTILE: f64 = 95.0;

/// How a unit's capacity (Gbps) is derived from its configured bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CapacityPolicy {
    /// Commit is already Gbps. Utilization is undefined for a zero commit.
    CommitOnly,
    /// `(burstable + commit) / 1024` from Mbps; a zero sum resolves to 1.
    BurstablePlusCommitScaled,
    /// Commit is Gbps; a zero commit reports 0 % utilization.
    CommitWithZeroGuard,
}

impl CapacityPolicy {
    pub fn capacity(self, burstable: f64, commit: f64) -> f64 {
        match self {
            CapacityPolicy::CommitOnly | CapacityPolicy::CommitWithZeroGuard => commit,
            CapacityPolicy::BurstablePlusCommitScaled => {
                let scaled = (burstable + commit) / 1024.0;
                if scaled == 0.0 { 1.0 } else { scaled }
            }
        }
    }

    /// `round(max / capacity * 100, 1)`, or the policy's zero-capacity answer.
    pub fn utilization(self, max_rate: f64, capacity: f64) -> Option<f64> {
        if capacity > 0.0 {
            return Some(round_to(max_rate / capacity * 100.0, 1));
        }
        match self {
            CapacityPolicy::CommitOnly => None,
            CapacityPolicy::BurstablePlusCommitScaled | CapacityPolicy::CommitWithZeroGuard => {
                Some(0.0)
            }
        }
    }
}

/// Linear-interpolation percentile over the `(n - 1) * p` rank, inclusive of
/// min and max. `None` for an empty slice.
pub fn percentile(values: &[f64], pct: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let rank = (sorted.len() - 1) as f64 * (pct / 100.0).clamp(0.0, 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Rounds to `decimals` places, ties to even (37.25 -> 37.2, 37.35 -> 37.4).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Running `(sum max in, sum max out)` per parent grouping key.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeakTotals {
    pub sum_max_in: f64,
    pub sum_max_out: f64,
}

/// Order-dependent accumulator. Each `add` returns the totals including the
/// unit just added, so a row shows the sum of everything folded before it
/// under the same key.
#[derive(Debug, Default)]
pub struct CapacityLedger {
    totals: HashMap<String, PeakTotals>,
}

impl CapacityLedger {
    pub fn add(&mut self, key: &str, max_in: f64, max_out: f64) -> PeakTotals {
        let entry = self.totals.entry(key.to_string()).or_default();
        entry.sum_max_in += max_in;
        entry.sum_max_out += max_out;
        *entry
    }

    pub fn get(&self, key: &str) -> Option<PeakTotals> {
        self.totals.get(key).copied()
    }
}

/// One logical unit handed to the summarizer: a device series, or a merged ring
/// series with the interface whose capacity and labels it reports under.
#[derive(Debug, Clone, Copy)]
pub struct SummaryUnit<'a> {
    pub unit: &'a str,
    pub meta: &'a MonitoredInterface,
    pub series: &'a TimeSeries,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct UnitStats {
    p95_in: f64,
    p95_out: f64,
    max_in: f64,
    max_out: f64,
}

fn unit_stats(series: &TimeSeries) -> Option<UnitStats> {
    let values_in: Vec<f64> = series.in_rates().filter(|v| v.is_finite()).collect();
    let values_out: Vec<f64> = series.out_rates().filter(|v| v.is_finite()).collect();
    if values_in.is_empty() || values_out.is_empty() {
        return None;
    }
    Some(UnitStats {
        p95_in: percentile(&values_in, PERCENTILE)?,
        p95_out: percentile(&values_out, PERCENTILE)?,
        max_in: values_in.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        max_out: values_out.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    })
}

/// Single-threaded stage. Owns the ledger; units are folded in the order they are
/// passed in.
#[derive(Debug)]
pub struct Summarizer {
    policy: CapacityPolicy,
    cumulative: bool,
    ledger: CapacityLedger,
    skipped: usize,
}

impl Summarizer {
    pub fn new(policy: CapacityPolicy, cumulative: bool) -> Self {
        Self {
            policy,
            cumulative,
            ledger: CapacityLedger::default(),
            skipped: 0,
        }
    }

    /// Emits a row, or `None` when the unit has no finite in or out samples.
    pub fn summarize(&mut self, unit: SummaryUnit<'_>) -> Option<ReportRow> {
        let Some(stats) = unit_stats(unit.series) else {
            debug!(unit = unit.unit, "no finite samples; unit skipped");
            self.skipped += 1;
            return None;
        };
        let meta = unit.meta;

        let totals = self
            .cumulative
            .then(|| self.ledger.add(&meta.co_key(), stats.max_in, stats.max_out));

        let capacity = self
            .policy
            .capacity(meta.burstable_capacity, meta.committed_capacity);

        Some(ReportRow {
            region: meta.region.clone(),
            location: meta.location.clone(),
            device: meta.device_name.clone(),
            device_cr: meta.device_cr.clone(),
            unit: unit.unit.to_string(),
            p95_in: round_to(stats.p95_in, 2),
            p95_out: round_to(stats.p95_out, 2),
            max_in: round_to(stats.max_in, 2),
            max_out: round_to(stats.max_out, 2),
            sum_max_in: totals.map(|t| round_to(t.sum_max_in, 2)),
            sum_max_out: totals.map(|t| round_to(t.sum_max_out, 2)),
            capacity: round_to(capacity, 2),
            utilization_in: self.policy.utilization(stats.max_in, capacity),
            utilization_out: self.policy.utilization(stats.max_out, capacity),
        })
    }

    pub fn summarize_all<'a>(
        &mut self,
        units: impl IntoIterator<Item = SummaryUnit<'a>>,
    ) -> Vec<ReportRow> {
        units
            .into_iter()
            .filter_map(|unit| self.summarize(unit))
            .collect()
    }

    /// Units dropped for lack of usable samples so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn ledger(&self) -> &CapacityLedger {
        &self.ledger
    }
}
