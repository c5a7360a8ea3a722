// Metric source: where raw rrdtool dumps come from.
//
// Every call runs `rrdtool fetch <root>/<series> AVERAGE --start <s> --end <e>`,
// either on the monitoring host over ssh or locally. One process per call; see
// `session` for the lifetime rules.

mod command;
mod session;

pub use command::CommandSource;
pub use session::Session;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::SourceConfig;
use crate::error::FetchError;
use crate::window::FetchWindow;

/// Capability to fetch one series' raw counter dump for a window.
#[async_trait]
pub trait MetricSource: Send + Sync {
    async fn fetch(&self, series_id: &str, window: &FetchWindow) -> Result<String, FetchError>;
}

pub fn from_config(config: &SourceConfig) -> Arc<dyn MetricSource> {
    Arc::new(CommandSource::from_config(config))
}

/// Consolidation function requested from rrdtool.
pub const CONSOLIDATION: &str = "AVERAGE";

/// Argument vector for `rrdtool fetch`, without the program name.
pub fn rrd_fetch_args(rrd_root: &str, series_id: &str, window: &FetchWindow) -> Vec<String> {
    vec![
        "fetch".into(),
        series_path(rrd_root, series_id),
        CONSOLIDATION.into(),
        "--start".into(),
        window.start.to_string(),
        "--end".into(),
        window.end.to_string(),
    ]
}

pub fn series_path(rrd_root: &str, series_id: &str) -> String {
    format!(
        "{}/{}",
        rrd_root.trim_end_matches('/'),
        series_id.trim_start_matches('/')
    )
}
