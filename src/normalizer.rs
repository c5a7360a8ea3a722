// rrdtool fetch output -> Gbps time series.
//
// Input shape (header, optional blank line, then data):
//     "          traffic_in          traffic_out"
//     ""
//     "1718000100: 1.2345e+07 9.8765e+06"

use tracing::debug;

use crate::models::{Sample, TimeSeries};

/// Value substituted for "nan" samples. Deflates p95/max instead of excluding
/// the sample; downstream reports depend on it.
pub const INVALID_SAMPLE_VALUE: f64 = 0.0;

/// Converts a raw counter rate to Gbps: `value * 8 / 1e6 / 1024`, in that order.
pub fn to_gbps(value: f64) -> f64 {
    value * 8.0 / 1_000_000.0 / 1024.0
}

/// Parses a dump into samples in order of appearance. Malformed lines are dropped
/// silently; an empty result means "no usable data".
pub fn normalize(raw: &str) -> TimeSeries {
    let mut samples = Vec::new();
    let mut dropped = 0usize;

    for line in raw.lines().skip(1) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 || !tokens[0].contains(':') {
            continue;
        }
        match parse_data_line(&tokens) {
            Some(sample) => samples.push(sample),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(
            dropped_lines = dropped,
            samples = samples.len(),
            "malformed data lines skipped"
        );
    }
    TimeSeries::new(samples)
}

fn parse_data_line(tokens: &[&str]) -> Option<Sample> {
    let timestamp: i64 = tokens[0].replace(':', "").parse().ok()?;
    let in_rate = parse_rate(tokens[1])?;
    let out_rate = parse_rate(tokens[2])?;
    Some(Sample::new(timestamp, to_gbps(in_rate), to_gbps(out_rate)))
}

fn parse_rate(token: &str) -> Option<f64> {
    if token.eq_ignore_ascii_case("nan") {
        return Some(INVALID_SAMPLE_VALUE);
    }
    token.parse::<f64>().ok()
}
