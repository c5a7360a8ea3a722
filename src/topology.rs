// Topology loader: region -> (location ->)? ring -> device -> [entries] JSON into a flat
// interface list, in declaration order.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::TopologyError;
use crate::models::MonitoredInterface;

/// region, location, ring, device.
const MAX_DEPTH: usize = 4;

const SERIES_ID_FIELDS: &[&str] = &["rrd", "seriesId"];
const BURSTABLE_FIELDS: &[&str] = &["Burstable", "Burstable_Mbps"];
const COMMIT_FIELDS: &[&str] = &["Commit", "Commit_Mbps"];

pub fn load_topology(path: impl AsRef<Path>) -> Result<Vec<MonitoredInterface>, TopologyError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| TopologyError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_topology(&text)
}

/// Flattens a topology document. Entries without a series locator are skipped;
/// missing capacities default to 0. Only a non-mapping top level is rejected.
pub fn parse_topology(text: &str) -> Result<Vec<MonitoredInterface>, TopologyError> {
    if text.trim().is_empty() {
        return Err(TopologyError::EmptyInput);
    }
    let doc: Value = serde_json::from_str(text)?;
    let Value::Object(regions) = doc else {
        return Err(TopologyError::NotAMapping {
            found: value_kind(&doc),
        });
    };

    let mut out = Vec::new();
    for (region, node) in &regions {
        let mut path = vec![region.as_str()];
        walk(node, &mut path, &mut out);
    }
    debug!(
        regions = regions.len(),
        interfaces = out.len(),
        "topology loaded"
    );
    Ok(out)
}

fn walk<'a>(node: &'a Value, path: &mut Vec<&'a str>, out: &mut Vec<MonitoredInterface>) {
    match node {
        Value::Object(children) => {
            if path.len() >= MAX_DEPTH {
                warn!(path = %path.join("/"), "topology nested deeper than device level; skipped");
                return;
            }
            for (key, child) in children {
                path.push(key.as_str());
                walk(child, path, out);
                path.pop();
            }
        }
        Value::Array(entries) => {
            for entry in entries {
                let Value::Object(entry) = entry else {
                    debug!(path = %path.join("/"), "non-object interface entry skipped");
                    continue;
                };
                if let Some(iface) = interface_from_entry(path, entry, out.len()) {
                    out.push(iface);
                }
            }
        }
        other => {
            debug!(path = %path.join("/"), kind = value_kind(other), "scalar topology node skipped");
        }
    }
}

fn interface_from_entry(
    path: &[&str],
    entry: &Map<String, Value>,
    ordinal: usize,
) -> Option<MonitoredInterface> {
    let Some(series_id) = series_id(entry) else {
        debug!(path = %path.join("/"), "entry without series locator skipped");
        return None;
    };
    let device_cr = string_field(entry, "Device");

    // Shallow variants carry the device only in the entry itself.
    let (region, location, ring, device) = match *path {
        [region, location, ring, device] => (region, location, ring, device.to_string()),
        [region, ring, device] => (region, "", ring, device.to_string()),
        [region, ring] => (region, "", ring, device_cr.clone().unwrap_or_else(|| ring.into())),
        [region] => (
            region,
            "",
            region,
            device_cr.clone().unwrap_or_else(|| region.into()),
        ),
        _ => return None,
    };

    Some(MonitoredInterface {
        ordinal,
        series_id,
        region: region.to_string(),
        location: location.to_string(),
        ring_name: ring.to_string(),
        device_name: device,
        device_cr,
        series_type: string_field(entry, "Type"),
        burstable_capacity: capacity_field(entry, BURSTABLE_FIELDS),
        committed_capacity: capacity_field(entry, COMMIT_FIELDS),
    })
}

fn series_id(entry: &Map<String, Value>) -> Option<String> {
    SERIES_ID_FIELDS
        .iter()
        .filter_map(|k| entry.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_field(entry: &Map<String, Value>, key: &str) -> Option<String> {
    match entry.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First present alias wins. Non-numeric, negative or non-finite values read as 0.
fn capacity_field(entry: &Map<String, Value>, aliases: &[&str]) -> f64 {
    let raw = aliases.iter().find_map(|k| entry.get(*k));
    let value = match raw {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
