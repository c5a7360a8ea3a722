// Report rows and report layouts

use serde::{Deserialize, Serialize};

use crate::summarizer::CapacityPolicy;

/// Report layout. Each deployment variant picks one; the capacity policy can be
/// overridden independently in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Access rings: one row per device, running SUM Max per CO.
    Access,
    /// Metro rings: one row per device.
    Metro,
    /// Upstream links: interfaces merged per ring (or region).
    Upstream,
    /// Transit/peering POPs: one row per device, capacities in Mbps.
    Peering,
}

impl ReportMode {
    pub fn default_capacity_policy(self) -> CapacityPolicy {
        match self {
            // A zero commit still prints 0 % on the access and metro sheets.
            ReportMode::Access | ReportMode::Metro => CapacityPolicy::CommitWithZeroGuard,
            ReportMode::Upstream | ReportMode::Peering => {
                CapacityPolicy::BurstablePlusCommitScaled
            }
        }
    }

    /// Only the access layout carries the cumulative SUM Max columns.
    pub fn tracks_cumulative(self) -> bool {
        matches!(self, ReportMode::Access)
    }

    pub fn merges_series(self) -> bool {
        matches!(self, ReportMode::Upstream)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportMode::Access => "access",
            ReportMode::Metro => "metro",
            ReportMode::Upstream => "upstream",
            ReportMode::Peering => "peering",
        }
    }
}

/// One summarized unit (device or merged ring). Values are already rounded:
/// 2 decimals for Gbps, 1 for percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub region: String,
    pub location: String,
    pub device: String,
    pub device_cr: Option<String>,
    /// Device name for per-device layouts, merge key for merged layouts.
    pub unit: String,
    pub p95_in: f64,
    pub p95_out: f64,
    pub max_in: f64,
    pub max_out: f64,
    pub sum_max_in: Option<f64>,
    pub sum_max_out: Option<f64>,
    pub capacity: f64,
    /// Absent when the capacity policy cannot define a ratio (zero commit, no guard).
    pub utilization_in: Option<f64>,
    pub utilization_out: Option<f64>,
}
