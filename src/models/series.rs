// Bandwidth time series (Gbps) produced by the normalizer and the ring merger

use serde::{Deserialize, Serialize};

/// One point of a bandwidth series. Rates are in Gbps after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Unix seconds, as reported by rrdtool.
    pub timestamp: i64,
    pub in_rate: f64,
    pub out_rate: f64,
}

impl Sample {
    pub fn new(timestamp: i64, in_rate: f64, out_rate: f64) -> Self {
        Self {
            timestamp,
            in_rate,
            out_rate,
        }
    }
}

/// Samples in order of appearance in the dump. Duplicated timestamps are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub samples: Vec<Sample>,
}

impl TimeSeries {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn in_rates(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.in_rate)
    }

    pub fn out_rates(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.out_rate)
    }
}

/// Series for one ring/region key: the positional sum of its contributors.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSeries {
    pub key: String,
    pub series: TimeSeries,
    /// Number of interface series summed into this one.
    pub contributors: usize,
}
