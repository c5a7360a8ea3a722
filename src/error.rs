// Domain error types. Application glue (config, main) uses anyhow on top of these.

use std::time::Duration;
use thiserror::Error;

/// Fatal before any fetch: the topology document cannot be turned into interfaces.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("failed to read topology {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("topology is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("topology top level must be a mapping of regions, got {found}")]
    NotAMapping { found: &'static str },

    #[error("topology input is empty")]
    EmptyInput,
}

/// Per-interface fetch failure. Never aborts the batch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("remote command failed ({status}): {stderr}")]
    Remote { status: String, stderr: String },

    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("session i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("worker pool closed before the job completed")]
    Cancelled,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("start date {start} is after end date {end}")]
    Inverted { start: String, end: String },

    #[error("local time {0} does not exist in this timezone")]
    NonexistentLocalTime(String),

    #[error("invalid date {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),
}
