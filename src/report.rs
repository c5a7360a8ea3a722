// Report assembly: stable per-mode column order, CSV export and a console table.

use std::path::Path;

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::models::{ReportMode, ReportRow};

/// Column headers in output order for a mode.
pub fn columns(mode: ReportMode) -> Vec<&'static str> {
    let mut cols = vec!["Region", "CO", "Device", "Device CR"];
    cols.push(if mode.merges_series() { "Ring" } else { "Unit" });
    cols.extend([
        "95% In (Gbps)",
        "95% Out (Gbps)",
        "Max In (Gbps)",
        "Max Out (Gbps)",
    ]);
    if mode.tracks_cumulative() {
        cols.extend(["SUM Max In (Gbps)", "SUM Max Out (Gbps)"]);
    }
    cols.extend(["Capacity (Gbps)", "Utilization In (%)", "Utilization Out (%)"]);
    cols
}

/// Cell values for a row, aligned with `columns(mode)`.
pub fn cells(row: &ReportRow, mode: ReportMode) -> Vec<String> {
    let mut out = vec![
        row.region.clone(),
        row.location.clone(),
        row.device.clone(),
        row.device_cr.clone().unwrap_or_default(),
        row.unit.clone(),
        fmt2(row.p95_in),
        fmt2(row.p95_out),
        fmt2(row.max_in),
        fmt2(row.max_out),
    ];
    if mode.tracks_cumulative() {
        out.push(row.sum_max_in.map(fmt2).unwrap_or_default());
        out.push(row.sum_max_out.map(fmt2).unwrap_or_default());
    }
    out.push(fmt2(row.capacity));
    out.push(row.utilization_in.map(fmt1).unwrap_or_default());
    out.push(row.utilization_out.map(fmt1).unwrap_or_default());
    out
}

fn fmt2(v: f64) -> String {
    format!("{:.2}", v)
}

fn fmt1(v: f64) -> String {
    format!("{:.1}", v)
}

/// RFC 4180 CSV with a header line; `\n` line endings.
pub fn to_csv(rows: &[ReportRow], mode: ReportMode) -> String {
    let mut out = String::new();
    push_csv_line(&mut out, columns(mode).iter().copied());
    for row in rows {
        let cells = cells(row, mode);
        push_csv_line(&mut out, cells.iter().map(String::as_str));
    }
    out
}

fn push_csv_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let line = fields.map(csv_field).collect::<Vec<_>>().join(",");
    out.push_str(&line);
    out.push('\n');
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn write_csv(path: impl AsRef<Path>, rows: &[ReportRow], mode: ReportMode) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, to_csv(rows, mode))
        .map_err(|e| anyhow::anyhow!("write {}: {}", path.display(), e))
}

pub fn render_table(rows: &[ReportRow], mode: ReportMode) -> String {
    let mut builder = Builder::default();
    builder.push_record(columns(mode).into_iter().map(String::from));
    for row in rows {
        builder.push_record(cells(row, mode));
    }
    builder.build().with(Style::modern()).to_string()
}
