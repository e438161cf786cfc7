use std::fs;
use std::path::Path;

use crate::runner::QueryRow;

/// Writes the Markdown summary table plus per-outcome tables for draw queries.
pub fn write_summary(
    path: impl AsRef<Path>,
    run_id: &str,
    tolerance: f64,
    rows: &[QueryRow],
) -> std::io::Result<()> {
    fs::write(path.as_ref(), render_summary(run_id, tolerance, rows))
}

pub fn render_summary(run_id: &str, tolerance: f64, rows: &[QueryRow]) -> String {
    let mut out = String::new();
    out.push_str("# Draw Odds Summary\n\n");
    out.push_str(&format!("Run: `{run_id}`, tolerance {tolerance:.3}\n\n"));
    out.push_str("| Query | Kind | Draws | Samples | Exact | Simulated | Error | z | p-value | Overlap | Pass |\n");
    out.push_str("|-------|------|-------|---------|-------|-----------|-------|---|---------|---------|------|\n");

    for row in rows {
        out.push_str(&format!(
            "| {query} | {kind} | {draws} | {samples} | {exact:.4} | {simulated:.4} | {error:.4} | {z} | {p} | {overlap} | {pass} |\n",
            query = row.query,
            kind = row.kind,
            draws = row.draws,
            samples = row.samples,
            exact = row.exact,
            simulated = row.simulated,
            error = row.error,
            z = format_optional(row.z_score, 2),
            p = format_optional(row.p_value, 3),
            overlap = if row.overlapping_tags { "Yes" } else { "No" },
            pass = if row.passed { "Yes" } else { "No" },
        ));
    }

    for row in rows.iter().filter(|row| !row.exact_pmf.is_empty()) {
        out.push_str(&format!("\n## {}\n\n", row.query));
        out.push_str("| Hits | Exact P | Simulated P |\n");
        out.push_str("|------|---------|-------------|\n");
        let outcomes = row.exact_pmf.len().max(row.simulated_frequencies.len());
        for k in 0..outcomes {
            let exact = row.exact_pmf.get(k).copied().unwrap_or(0.0);
            let observed = row.simulated_frequencies.get(k).copied().unwrap_or(0);
            let simulated = if row.samples == 0 {
                0.0
            } else {
                observed as f64 / row.samples as f64
            };
            out.push_str(&format!("| {k} | {exact:.4} | {simulated:.4} |\n"));
        }
    }

    out
}

fn format_optional(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => "n/a".to_string(),
    }
}
