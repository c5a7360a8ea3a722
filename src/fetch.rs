// Bounded fetch pool: `parallelism` workers pull jobs from one shared queue and
// report `(slot, result)` on a result channel. Results are matched back to their
// interface by slot, so completion order never matters downstream.

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::models::MonitoredInterface;
use crate::source::MetricSource;
use crate::window::FetchWindow;

struct FetchJob {
    slot: usize,
    series_id: String,
}

type FetchResult = (usize, Result<String, FetchError>);

/// A terminal failure for one interface in this run. No retry is attempted.
#[derive(Debug)]
pub struct FetchFailure {
    pub ordinal: usize,
    pub series_id: String,
    pub error: FetchError,
}

/// Outcome of a batch, indexed like the interface slice that was fetched.
#[derive(Debug, Default)]
pub struct FetchReport {
    payloads: Vec<Option<String>>,
    pub failures: Vec<FetchFailure>,
}

impl FetchReport {
    pub fn payload(&self, slot: usize) -> Option<&str> {
        self.payloads.get(slot).and_then(|p| p.as_deref())
    }

    pub fn succeeded(&self) -> usize {
        self.payloads.iter().filter(|p| p.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

pub struct FetchExecutor {
    source: Arc<dyn MetricSource>,
    parallelism: usize,
}

impl FetchExecutor {
    pub fn new(source: Arc<dyn MetricSource>, parallelism: usize) -> Self {
        Self {
            source,
            parallelism: parallelism.max(1),
        }
    }

    /// Fetches every interface for the same window. Per-interface failures are
    /// recorded and never abort the batch.
    pub async fn fetch_all(
        &self,
        interfaces: &[MonitoredInterface],
        window: FetchWindow,
    ) -> FetchReport {
        if interfaces.is_empty() {
            return FetchReport::default();
        }

        let (job_tx, job_rx) = mpsc::channel::<FetchJob>(interfaces.len());
        for (slot, iface) in interfaces.iter().enumerate() {
            let job = FetchJob {
                slot,
                series_id: iface.series_id.clone(),
            };
            if job_tx.send(job).await.is_err() {
                break;
            }
        }
        drop(job_tx);

        let queue = Arc::new(Mutex::new(job_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<FetchResult>(self.parallelism * 2);
        let workers = self.parallelism.min(interfaces.len());
        let handles: Vec<_> = (0..workers)
            .map(|worker_id| {
                spawn_worker(
                    worker_id,
                    self.source.clone(),
                    queue.clone(),
                    result_tx.clone(),
                    window,
                )
            })
            .collect();
        drop(result_tx);

        let mut payloads: Vec<Option<String>> = vec![None; interfaces.len()];
        let mut seen = vec![false; interfaces.len()];
        let mut failures = Vec::new();

        while let Some((slot, result)) = result_rx.recv().await {
            seen[slot] = true;
            let iface = &interfaces[slot];
            match result {
                Ok(raw) => payloads[slot] = Some(raw),
                Err(error) => {
                    warn!(
                        series_id = %iface.series_id,
                        ordinal = iface.ordinal,
                        error = %error,
                        "fetch failed; interface skipped"
                    );
                    failures.push(FetchFailure {
                        ordinal: iface.ordinal,
                        series_id: iface.series_id.clone(),
                        error,
                    });
                }
            }
        }

        for joined in join_all(handles).await {
            if let Err(e) = joined {
                warn!(error = %e, "fetch worker terminated abnormally");
            }
        }

        // A worker that died mid-job leaves its slot unanswered.
        for (slot, iface) in interfaces.iter().enumerate() {
            if !seen[slot] {
                failures.push(FetchFailure {
                    ordinal: iface.ordinal,
                    series_id: iface.series_id.clone(),
                    error: FetchError::Cancelled,
                });
            }
        }
        failures.sort_by_key(|f| f.ordinal);

        let report = FetchReport { payloads, failures };
        info!(
            requested = interfaces.len(),
            fetched = report.succeeded(),
            failed = report.failures.len(),
            workers,
            "fetch batch complete"
        );
        report
    }
}

fn spawn_worker(
    worker_id: usize,
    source: Arc<dyn MetricSource>,
    queue: Arc<Mutex<mpsc::Receiver<FetchJob>>>,
    result_tx: mpsc::Sender<FetchResult>,
    window: FetchWindow,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let job = queue.lock().await.recv().await;
            let Some(job) = job else { break };
            debug!(worker_id, series_id = %job.series_id, "fetching");
            let result = source.fetch(&job.series_id, &window).await;
            if result_tx.send((job.slot, result)).await.is_err() {
                break;
            }
        }
        debug!(worker_id, "fetch worker idle; queue drained");
    })
}
