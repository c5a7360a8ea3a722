// Monitored interface: one RRD series and its place in the topology

use serde::{Deserialize, Serialize};

/// One physical/logical measurement point, flattened from the topology document.
/// Created once by the topology loader and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredInterface {
    /// Position in topology declaration order. Summaries fold rows in this order.
    pub ordinal: usize,
    /// RRD path relative to the counter store root.
    pub series_id: String,
    pub region: String,
    /// CO / location. Empty when the topology has no location level.
    pub location: String,
    pub ring_name: String,
    pub device_name: String,
    #[serde(default)]
    pub device_cr: Option<String>,
    #[serde(default)]
    pub series_type: Option<String>,
    #[serde(default)]
    pub burstable_capacity: f64,
    #[serde(default)]
    pub committed_capacity: f64,
}

impl MonitoredInterface {
    /// Parent grouping key for capacity-planning roll-ups (region + CO).
    pub fn co_key(&self) -> String {
        format!("{}/{}", self.region, self.location)
    }

    pub fn ring_key(&self) -> String {
        format!("{}/{}", self.region, self.ring_name)
    }
}
