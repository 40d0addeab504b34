//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks of a fetched series
//! - deterministic output (helpful for golden tests)
//!
//! Samples are drawn as `o`; the y-axis is labeled at the top, middle and
//! bottom rows, and a footer names the series and its time span.

use crate::domain::TimeColumn;

/// Render a time column as a fixed-grid ASCII chart.
pub fn render_column(column: &TimeColumn, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    if column.rows.is_empty() {
        return format!("{}: no data\n", column.name);
    }

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &(_, v) in &column.rows {
        if v.is_finite() {
            y_min = y_min.min(v);
            y_max = y_max.max(v);
        }
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        return format!("{}: no finite values to plot\n", column.name);
    }
    if (y_max - y_min).abs() < f64::EPSILON {
        y_min -= 0.5;
        y_max += 0.5;
    }

    let mut grid = vec![vec![' '; width]; height];
    let n = column.rows.len();
    for (i, &(_, v)) in column.rows.iter().enumerate() {
        if !v.is_finite() {
            continue;
        }
        let x = if n == 1 { 0 } else { i * (width - 1) / (n - 1) };
        let t = (v - y_min) / (y_max - y_min);
        let y = ((1.0 - t) * (height - 1) as f64).round() as usize;
        grid[y.min(height - 1)][x] = 'o';
    }

    let mut out = String::new();
    for (row_idx, row) in grid.iter().enumerate() {
        let label = if row_idx == 0 {
            format!("{y_max:>10.1} ")
        } else if row_idx == height - 1 {
            format!("{y_min:>10.1} ")
        } else if row_idx == height / 2 {
            format!("{:>10.1} ", (y_min + y_max) / 2.0)
        } else {
            " ".repeat(11)
        };
        out.push_str(&label);
        out.push('|');
        out.extend(row.iter());
        out.push('\n');
    }

    let first = column.rows[0].0.to_rfc3339();
    let last = column.rows[n - 1].0.to_rfc3339();
    out.push_str(&format!(
        "{:>11}{} .. {}  ({} points, {})\n",
        "", first, last, n, column.name
    ));
    out
}
