// Ring merger tests: positional sums, truncation, key order

mod common;

use ringcap::merger::{MergeBy, merge_series};
use ringcap::models::{Sample, TimeSeries};

fn series(points: &[(i64, f64, f64)]) -> TimeSeries {
    TimeSeries::new(points.iter().map(|&(t, i, o)| Sample::new(t, i, o)).collect())
}

#[test]
fn same_key_is_summed_point_wise() {
    let merged = merge_series(vec![
        ("MB/R1".to_string(), series(&[(0, 1.0, 2.0), (300, 3.0, 4.0)])),
        ("MB/R1".to_string(), series(&[(0, 10.0, 20.0), (300, 30.0, 40.0)])),
    ]);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].key, "MB/R1");
    assert_eq!(merged[0].contributors, 2);
    assert_eq!(
        merged[0].series,
        series(&[(0, 11.0, 22.0), (300, 33.0, 44.0)])
    );
}

#[test]
fn alignment_is_by_position_not_timestamp() {
    let merged = merge_series(vec![
        ("k".to_string(), series(&[(0, 1.0, 1.0), (300, 1.0, 1.0)])),
        ("k".to_string(), series(&[(600, 2.0, 2.0), (900, 2.0, 2.0)])),
    ]);
    // Timestamps come from the first contributor.
    assert_eq!(merged[0].series, series(&[(0, 3.0, 3.0), (300, 3.0, 3.0)]));
}

#[test]
fn length_mismatch_truncates_to_shortest() {
    let merged = merge_series(vec![
        ("k".to_string(), series(&[(0, 1.0, 1.0), (1, 1.0, 1.0), (2, 1.0, 1.0)])),
        ("k".to_string(), series(&[(0, 1.0, 1.0), (1, 1.0, 1.0)])),
        ("k".to_string(), series(&[(0, 1.0, 1.0), (1, 1.0, 1.0), (2, 1.0, 1.0)])),
    ]);
    assert_eq!(merged[0].series.len(), 2);
    assert_eq!(merged[0].series.samples[1].in_rate, 3.0);
}

#[test]
fn keys_emitted_in_first_appearance_order() {
    let merged = merge_series(vec![
        ("b".to_string(), series(&[(0, 1.0, 1.0)])),
        ("a".to_string(), series(&[(0, 1.0, 1.0)])),
        ("b".to_string(), series(&[(0, 1.0, 1.0)])),
    ]);
    let keys: Vec<&str> = merged.iter().map(|m| m.key.as_str()).collect();
    assert_eq!(keys, vec!["b", "a"]);
    assert_eq!(merged[0].contributors, 2);
    assert_eq!(merged[1].contributors, 1);
}

#[test]
fn no_input_emits_nothing() {
    assert!(merge_series(Vec::<(String, TimeSeries)>::new()).is_empty());
}

#[test]
fn merge_by_selects_ring_or_region_key() {
    let i = common::iface(0, "HN", "dev-1", 10.0);
    assert_eq!(MergeBy::Ring.key_for(&i), "MB/ring-HN");
    assert_eq!(MergeBy::Region.key_for(&i), "MB");
}
