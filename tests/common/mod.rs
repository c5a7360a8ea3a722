// Shared test helpers: interfaces, rrdtool dumps and an in-memory metric source

#![allow(dead_code)]

use async_trait::async_trait;
use ringcap::error::FetchError;
use ringcap::models::MonitoredInterface;
use ringcap::source::MetricSource;
use ringcap::window::FetchWindow;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Bytes/sec that normalize to exactly 1.0 Gbps.
pub const ONE_GBPS_RAW: f64 = 128_000_000.0;

pub fn iface(ordinal: usize, location: &str, device: &str, commit: f64) -> MonitoredInterface {
    MonitoredInterface {
        ordinal,
        series_id: format!("rra/{}.rrd", device),
        region: "MB".into(),
        location: location.into(),
        ring_name: format!("ring-{}", location),
        device_name: device.into(),
        device_cr: None,
        series_type: None,
        burstable_capacity: 0.0,
        committed_capacity: commit,
    }
}

/// rrdtool-style dump; rates given in Gbps are scaled back to raw bytes/sec.
pub fn dump_gbps(points: &[(i64, f64, f64)]) -> String {
    let mut out = String::from("                 traffic_in         traffic_out\n\n");
    for (ts, i, o) in points {
        out.push_str(&format!(
            "{}: {:e} {:e}\n",
            ts,
            i * ONE_GBPS_RAW,
            o * ONE_GBPS_RAW
        ));
    }
    out
}

/// Flat series of `n` points at a 300s step with constant rates.
pub fn flat_dump(n: usize, in_gbps: f64, out_gbps: f64) -> String {
    let points: Vec<_> = (0..n)
        .map(|k| (1_700_000_000 + 300 * k as i64, in_gbps, out_gbps))
        .collect();
    dump_gbps(&points)
}

pub fn window() -> FetchWindow {
    FetchWindow::new(1_700_000_000, 1_700_086_399)
}

enum Reply {
    Ok(String),
    Fail(String),
}

/// In-memory source keyed by series id. Unknown ids fail like a missing RRD.
#[derive(Default)]
pub struct FakeSource {
    replies: HashMap<String, Reply>,
    delays: HashMap<String, Duration>,
    pub calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, series_id: &str, raw: String) -> Self {
        self.replies.insert(series_id.into(), Reply::Ok(raw));
        self
    }

    pub fn fail(mut self, series_id: &str, stderr: &str) -> Self {
        self.replies.insert(series_id.into(), Reply::Fail(stderr.into()));
        self
    }

    pub fn delay(mut self, series_id: &str, delay: Duration) -> Self {
        self.delays.insert(series_id.into(), delay);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl MetricSource for FakeSource {
    async fn fetch(&self, series_id: &str, _window: &FetchWindow) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .delays
            .get(series_id)
            .copied()
            .unwrap_or(Duration::from_millis(5));
        tokio::time::sleep(delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.replies.get(series_id) {
            Some(Reply::Ok(raw)) => Ok(raw.clone()),
            Some(Reply::Fail(stderr)) => Err(FetchError::Remote {
                status: "exit status: 1".into(),
                stderr: stderr.clone(),
            }),
            None => Err(FetchError::Remote {
                status: "exit status: 1".into(),
                stderr: format!("ERROR: opening '{}': No such file or directory", series_id),
            }),
        }
    }
}
