// Domain models: monitored interfaces, bandwidth series, report rows

mod interface;
mod report;
mod series;

pub use interface::MonitoredInterface;
pub use report::{ReportMode, ReportRow};
pub use series::{AggregatedSeries, Sample, TimeSeries};
