//! Formatted output.
//!
//! We keep formatting code in one place so:
//! - the density code stays purely numeric and testable
//! - the LaTeX layout lives next to the tests that pin it down

use std::path::Path;

use crate::domain::{DensityReport, SurveyTotals, SurveyTable, Tier, TierMetrics};

/// Split `x` into a mantissa in `[1, 10)` and a decimal exponent, with the
/// mantissa rounded half away from zero to `decimals` digits.
///
/// A mantissa that rounds up to 10 carries into the exponent (`9.996` at two
/// digits becomes `1.00e1`, never `10.00e0`). Zero, of either sign, is `0.0…`
/// with exponent 0.
pub fn split_scientific(x: f64, decimals: usize) -> (String, i32) {
    if x == 0.0 || !x.is_finite() {
        // `+ 0.0` turns -0.0 into 0.0.
        return (format!("{:.decimals$}", x + 0.0), 0);
    }

    let mut exponent = x.abs().log10().floor() as i32;
    let mut mantissa = scale_by_power_of_ten(x, -exponent);
    // log10 can land one off near exact powers of ten.
    if mantissa.abs() >= 10.0 {
        mantissa /= 10.0;
        exponent += 1;
    } else if mantissa.abs() < 1.0 {
        mantissa *= 10.0;
        exponent -= 1;
    }

    let digits = 10f64.powi(decimals as i32);
    let mut rounded = (mantissa * digits).round();
    if rounded.abs() >= 10.0 * digits {
        rounded = (rounded / 10.0).round();
        exponent += 1;
    }
    (format!("{:.decimals$}", rounded / digits), exponent)
}

/// `x * 10^power`, multiplying for positive powers so that values such as
/// `0.125` scale without picking up error from dividing by `0.1`.
fn scale_by_power_of_ten(x: f64, power: i32) -> f64 {
    if power >= 0 {
        x * 10f64.powi(power)
    } else {
        x / 10f64.powi(-power)
    }
}

/// Render a non-negative value as LaTeX scientific notation.
///
/// `"$m \times 10^{e}$"` when the exponent is non-zero, plain `"m"` otherwise.
/// Zero renders as `0.0…`.
pub fn texify(x: f64, decimals: usize) -> String {
    let (mantissa, exponent) = split_scientific(x, decimals);
    if exponent == 0 {
        mantissa
    } else {
        format!("${mantissa} \\times 10^{{{exponent}}}$")
    }
}

pub fn texify_all(values: &[f64], decimals: usize) -> Vec<String> {
    values.iter().map(|&v| texify(v, decimals)).collect()
}

/// Reverse `texify`. Returns `None` for text it did not produce.
pub fn parse_texified(s: &str) -> Option<f64> {
    let s = s.trim();
    match s.strip_prefix('$').and_then(|rest| rest.strip_suffix('$')) {
        Some(inner) => {
            let (mantissa, rest) = inner.split_once(" \\times 10^{")?;
            let exponent = rest.strip_suffix('}')?;
            let m: f64 = mantissa.parse().ok()?;
            let e: i32 = exponent.parse().ok()?;
            format!("{m}e{e}").parse().ok()
        }
        None => s.parse().ok(),
    }
}

/// Markup strings for one table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedRow {
    pub label: String,
    pub count: String,
    pub dpr_total: String,
    pub disc_density: String,
    pub volume_density: String,
}

impl FormattedRow {
    pub fn from_metrics(metrics: &TierMetrics, decimals: usize) -> Self {
        Self {
            label: metrics.tier.index().to_string(),
            count: metrics.count.to_string(),
            dpr_total: texify(metrics.dpr_total, decimals),
            disc_density: texify(metrics.disc_density, decimals),
            volume_density: texify(metrics.volume_density, decimals),
        }
    }

    pub fn from_totals(totals: &SurveyTotals, decimals: usize) -> Self {
        Self {
            label: "Total".to_string(),
            count: totals.count.to_string(),
            dpr_total: texify(totals.dpr_total, decimals),
            disc_density: texify(totals.disc_density, decimals),
            volume_density: texify(totals.volume_density, decimals),
        }
    }

    fn to_latex(&self) -> String {
        format!(
            "    {}  &{}&{}& {}& {}\\\\",
            self.label, self.count, self.dpr_total, self.disc_density, self.volume_density
        )
    }
}

const TABLE_HEAD: [&str; 4] = [
    r"    \begin{tabular}{llccc}",
    r"    \hline Tier & No. & Total DPR & Disc-averaged DPR & Volume-averaged DPR \\",
    r"     & & M$_\odot$\,yr$^{-1}$& M$_\odot$\,yr$^{-1}$\,kpc$^{-2}$ & M$_\odot$\,yr$^{-1}$\,kpc$^{-3}$ \\",
    r"    \hline\hline",
];

/// Format the per-tier LaTeX table with its trailing totals row.
pub fn format_density_table(report: &DensityReport, decimals: usize) -> String {
    let mut lines: Vec<String> = TABLE_HEAD.iter().map(|s| s.to_string()).collect();

    for metrics in &report.tiers {
        lines.push(FormattedRow::from_metrics(metrics, decimals).to_latex());
    }
    lines.push(r"    \hline".to_string());
    lines.push(FormattedRow::from_totals(&report.totals, decimals).to_latex());
    lines.push(r"    \hline".to_string());
    lines.push(r"    \end{tabular}".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Human-readable summary of a density run (goes to stderr).
pub fn format_run_summary(table: &SurveyTable, report: &DensityReport, figure: Option<&Path>) -> String {
    let mut out = String::new();

    out.push_str("=== ness - DPR density ===\n");
    out.push_str(&format!("Input: {}\n", table.source.display()));
    out.push_str(&format!(
        "Columns: tier='{}' dpr='{}'\n",
        table.tier_column, table.dpr_column
    ));
    out.push_str(&format!(
        "Rows: read={} | binned={} | excluded={}\n",
        table.len(),
        report.totals.count,
        report.excluded_rows
    ));

    out.push_str(&format!(
        "{:<14} {:>6} {:>12} {:>12} {:>14}\n",
        "tier", "n", "DPR", "volume", "DPR/volume"
    ));
    for tier in Tier::ALL {
        let m = report.tier(tier);
        out.push_str(&format!(
            "{:<14} {:>6} {:>12.3e} {:>12.4} {:>14.3e}\n",
            tier.label(),
            m.count,
            m.dpr_total,
            m.volume,
            m.volume_density
        ));
    }

    if let Some(path) = figure {
        out.push_str(&format!("Figure: {}\n", path.display()));
    }

    out
}
