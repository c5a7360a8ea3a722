// One report run: fetch (parallel) -> normalize -> merge -> summarize (sequential).

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::fetch::{FetchExecutor, FetchFailure, FetchReport};
use crate::merger::{MergeBy, merge_series};
use crate::models::{MonitoredInterface, ReportMode, ReportRow, TimeSeries};
use crate::normalizer::normalize;
use crate::source::MetricSource;
use crate::summarizer::{CapacityPolicy, Summarizer, SummaryUnit};
use crate::window::FetchWindow;

#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub mode: ReportMode,
    pub policy: CapacityPolicy,
    pub merge_by: MergeBy,
    pub parallelism: usize,
}

impl PipelineSettings {
    /// Mode defaults: the mode's own capacity policy, merge per ring, 4 workers.
    pub fn for_mode(mode: ReportMode) -> Self {
        Self {
            mode,
            policy: mode.default_capacity_policy(),
            merge_by: MergeBy::Ring,
            parallelism: 4,
        }
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub rows: Vec<ReportRow>,
    pub interfaces: usize,
    pub fetch_failures: Vec<FetchFailure>,
    /// Payloads that parsed to no samples at all.
    pub empty_series: usize,
    /// Units dropped by the summarizer for lack of finite samples.
    pub skipped_units: usize,
}

impl RunSummary {
    pub fn has_data(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Everything that did not make it into the report, for the run summary line.
    pub fn skipped(&self) -> usize {
        self.fetch_failures.len() + self.empty_series + self.skipped_units
    }
}

pub struct Pipeline {
    executor: FetchExecutor,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(source: Arc<dyn MetricSource>, settings: PipelineSettings) -> Self {
        Self {
            executor: FetchExecutor::new(source, settings.parallelism),
            settings,
        }
    }

    /// Runs the whole pipeline. Rows follow topology declaration order, whatever
    /// order the fetches complete in.
    #[instrument(skip_all, fields(mode = self.settings.mode.as_str(), start = window.start, end = window.end))]
    pub async fn run(&self, interfaces: &[MonitoredInterface], window: FetchWindow) -> RunSummary {
        let mut ordered = interfaces.to_vec();
        ordered.sort_by_key(|i| i.ordinal);

        let fetched = self.executor.fetch_all(&ordered, window).await;
        let summary = summarize_fetched(&ordered, fetched, &self.settings);
        info!(
            interfaces = summary.interfaces,
            rows = summary.rows.len(),
            fetch_failures = summary.fetch_failures.len(),
            empty_series = summary.empty_series,
            skipped_units = summary.skipped_units,
            "report run complete"
        );
        summary
    }
}

/// Sequential stage over collected fetch results. `ordered` must be the slice
/// that was fetched, in declaration order.
pub fn summarize_fetched(
    ordered: &[MonitoredInterface],
    fetched: FetchReport,
    settings: &PipelineSettings,
) -> RunSummary {
    let mut empty_series = 0usize;
    let mut normalized: Vec<(usize, TimeSeries)> = Vec::with_capacity(ordered.len());
    for (slot, iface) in ordered.iter().enumerate() {
        let Some(raw) = fetched.payload(slot) else {
            continue;
        };
        let series = normalize(raw);
        if series.is_empty() {
            debug!(series_id = %iface.series_id, "dump has no usable samples");
            empty_series += 1;
            continue;
        }
        normalized.push((slot, series));
    }

    let mut summarizer = Summarizer::new(settings.policy, settings.mode.tracks_cumulative());
    let rows = if settings.mode.merges_series() {
        // Capacity and labels come from the first declared interface under a key,
        // fetched or not.
        let mut first_slot: HashMap<String, usize> = HashMap::new();
        for (slot, iface) in ordered.iter().enumerate() {
            first_slot.entry(settings.merge_by.key_for(iface)).or_insert(slot);
        }
        let merged = merge_series(
            normalized
                .into_iter()
                .map(|(slot, series)| (settings.merge_by.key_for(&ordered[slot]), series)),
        );
        let units = merged.iter().filter_map(|agg| {
            let meta = &ordered[*first_slot.get(&agg.key)?];
            Some(SummaryUnit {
                unit: &agg.key,
                meta,
                series: &agg.series,
            })
        });
        summarizer.summarize_all(units)
    } else {
        let units = normalized.iter().map(|(slot, series)| {
            let meta = &ordered[*slot];
            SummaryUnit {
                unit: &meta.device_name,
                meta,
                series,
            }
        });
        summarizer.summarize_all(units)
    };

    RunSummary {
        rows,
        interfaces: ordered.len(),
        fetch_failures: fetched.failures,
        empty_series,
        skipped_units: summarizer.skipped(),
    }
}
