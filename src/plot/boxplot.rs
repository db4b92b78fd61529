//! SVG box-and-whisker figure of log10(DPR) per tier.
//!
//! Plot elements, per tier:
//! - box: first to third quartile
//! - black line: median
//! - dashed green line: mean
//! - whiskers: 2.5 / 97.5 percentiles
//! - open circles: points beyond the whiskers

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, info, warn};

use crate::domain::Tier;
use crate::error::AppError;
use crate::plot::label::{RenderLabel, dpr_axis_label};
use crate::plot::stats::BoxStats;

/// Figure settings, passed explicitly to the renderer.
#[derive(Debug, Clone)]
pub struct FigureConfig {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Whisker percentiles.
    pub whis: (f64, f64),
    /// Try the Unicode axis label before the ASCII one.
    pub rich_labels: bool,
    pub font_size: u32,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("NESS_DPR_density.svg"),
            width: 640,
            height: 480,
            whis: (2.5, 97.5),
            rich_labels: true,
            font_size: 16,
        }
    }
}

/// Log10 of the positive values of one tier. Returns the values and how many
/// were skipped for having no logarithm.
pub fn log_dpr(values: &[f64]) -> (Vec<f64>, usize) {
    let logs: Vec<f64> = values.iter().filter(|&&v| v > 0.0).map(|v| v.log10()).collect();
    let skipped = values.len() - logs.len();
    (logs, skipped)
}

/// Box statistics for each tier, in `Tier::ALL` order.
pub fn tier_box_stats(per_tier: &[Vec<f64>; Tier::COUNT], whis: (f64, f64)) -> [Option<BoxStats>; Tier::COUNT] {
    Tier::ALL.map(|tier| {
        let (logs, skipped) = log_dpr(&per_tier[tier.index()]);
        if skipped > 0 {
            warn!(
                tier = tier.label(),
                skipped, "non-positive DPR values left out of the figure"
            );
        }
        BoxStats::compute(&logs, whis)
    })
}

/// Draws the y-axis label onto the whole figure area.
pub type LabelDrawer = for<'a> fn(&DrawingArea<SVGBackend<'a>, Shift>, &RenderLabel, u32) -> Result<(), String>;

/// Render the figure. Returns the label variant that ended up on the axis.
pub fn render_dpr_boxplot(
    per_tier: &[Vec<f64>; Tier::COUNT],
    config: &FigureConfig,
) -> Result<RenderLabel, AppError> {
    render_with_label_drawer(per_tier, config, draw_axis_label)
}

/// Same as `render_dpr_boxplot`, with the y-axis label drawn by `drawer`.
pub fn render_with_label_drawer(
    per_tier: &[Vec<f64>; Tier::COUNT],
    config: &FigureConfig,
    drawer: LabelDrawer,
) -> Result<RenderLabel, AppError> {
    let stats = tier_box_stats(per_tier, config.whis);

    let label = draw_on(&config.path, &stats, config, drawer).map_err(|e| {
        AppError::output(format!("Failed to render figure '{}': {e}", config.path.display()))
    })?;

    info!(path = %config.path.display(), rich = label.is_rich(), "wrote DPR figure");
    Ok(label)
}

/// The only place a label failure is recovered: a rich label that cannot be
/// drawn is logged and replaced by the plain one.
fn draw_label_with_fallback(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    config: &FigureConfig,
    drawer: LabelDrawer,
) -> Result<RenderLabel, String> {
    let label = dpr_axis_label(config.rich_labels);
    match drawer(area, &label, config.font_size) {
        Ok(()) => Ok(label),
        Err(e) if label.is_rich() => {
            warn!("rich axis label failed ({e}); falling back to plain text");
            let plain = dpr_axis_label(false);
            drawer(area, &plain, config.font_size)?;
            Ok(plain)
        }
        Err(e) => Err(e),
    }
}

/// Rotated label, centred vertically in the left margin.
fn draw_axis_label(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    label: &RenderLabel,
    font_size: u32,
) -> Result<(), String> {
    let (_, height) = area.dim_in_pixel();
    let style = ("sans-serif", font_size)
        .into_font()
        .transform(FontTransform::Rotate270)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw_text(label.text(), &style, (LABEL_X, height as i32 / 2))
        .map_err(|e| e.to_string())
}

fn y_range(stats: &[Option<BoxStats>]) -> (f64, f64) {
    let (lo, hi) = stats.iter().flatten().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
        let lo = s.fliers.iter().copied().fold(lo.min(s.whisker_low), f64::min);
        let hi = s.fliers.iter().copied().fold(hi.max(s.whisker_high), f64::max);
        (lo, hi)
    });
    if !(lo.is_finite() && hi.is_finite()) {
        return (-10.0, -4.0);
    }
    let pad = ((hi - lo) * 0.05).max(0.25);
    (lo - pad, hi + pad)
}

const MEAN_DASHES: usize = 4;
/// x pixel of the y-axis label centre.
const LABEL_X: i32 = 20;

/// Split `[x0, x1]` into `n` dashes separated by gaps of the same length.
fn dash_segments(x0: f64, x1: f64, n: usize) -> impl Iterator<Item = (f64, f64)> {
    let step = (x1 - x0) / (2 * n - 1) as f64;
    (0..n).map(move |k| {
        let a = x0 + step * (2 * k) as f64;
        (a, a + step)
    })
}

fn draw_on(
    path: &Path,
    stats: &[Option<BoxStats>],
    config: &FigureConfig,
    drawer: LabelDrawer,
) -> Result<RenderLabel, Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let (y_min, y_max) = y_range(stats);
    debug!(y_min, y_max, "figure y range");

    let x_max = Tier::COUNT as f64 - 0.5;
    let mut chart = ChartBuilder::on(&root)
        .margin(12)
        .x_label_area_size(36)
        .y_label_area_size(64)
        .build_cartesian_2d(-0.5f64..x_max, y_min..y_max)?;

    let tier_name = |x: &f64| {
        let i = x.round();
        if (x - i).abs() < 1e-6 && i >= 0.0 && (i as usize) < Tier::COUNT {
            Tier::ALL[i as usize].label().to_string()
        } else {
            String::new()
        }
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(Tier::COUNT)
        .x_label_formatter(&tier_name)
        .label_style(("sans-serif", config.font_size))
        .draw()?;

    let outline = ShapeStyle { color: BLACK.to_rgba(), filled: false, stroke_width: 1 };
    let mean_style = ShapeStyle { color: GREEN.to_rgba(), filled: false, stroke_width: 1 };
    let half = 0.25;
    let cap = 0.12;

    for (i, s) in stats.iter().enumerate() {
        let Some(s) = s else { continue };
        let x = i as f64;

        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - half, s.q1), (x + half, s.q3)],
            outline,
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x - half, s.median), (x + half, s.median)],
            BLACK.stroke_width(2),
        )))?;
        chart.draw_series(
            dash_segments(x - half, x + half, MEAN_DASHES)
                .map(|(a, b)| PathElement::new(vec![(a, s.mean), (b, s.mean)], mean_style)),
        )?;
        chart.draw_series([
            PathElement::new(vec![(x, s.q1), (x, s.whisker_low)], outline),
            PathElement::new(vec![(x, s.q3), (x, s.whisker_high)], outline),
            PathElement::new(vec![(x - cap, s.whisker_low), (x + cap, s.whisker_low)], outline),
            PathElement::new(vec![(x - cap, s.whisker_high), (x + cap, s.whisker_high)], outline),
        ])?;
        chart.draw_series(s.fliers.iter().map(|&y| Circle::new((x, y), 3, outline)))?;
    }

    let label = draw_label_with_fallback(&root, config, drawer)?;
    root.present()?;
    Ok(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tiers() -> [Vec<f64>; Tier::COUNT] {
        [
            vec![1e-9, 3e-9, 2e-8, 5e-9],
            vec![2e-8, 1e-7],
            vec![],
            vec![1e-7, 4e-7, 9e-7, 2e-6, 0.0],
            vec![3e-6, 1e-5, 4e-5],
        ]
    }

    #[test]
    fn dashes_span_the_box() {
        let dashes: Vec<_> = dash_segments(-0.25, 0.25, 4).collect();
        assert_eq!(dashes.len(), 4);
        assert!((dashes[0].0 + 0.25).abs() < 1e-12);
        assert!((dashes[3].1 - 0.25).abs() < 1e-12);
        assert!(dashes.windows(2).all(|w| w[1].0 > w[0].1));
    }

    #[test]
    fn log_dpr_skips_non_positive() {
        let (logs, skipped) = log_dpr(&[1e-7, 0.0, 1e-5]);
        assert_eq!(skipped, 1);
        assert_eq!(logs.len(), 2);
        assert!((logs[0] + 7.0).abs() < 1e-12);
        assert!((logs[1] + 5.0).abs() < 1e-12);
    }

    #[test]
    fn empty_tier_has_no_box() {
        let stats = tier_box_stats(&sample_tiers(), (2.5, 97.5));
        assert!(stats[Tier::Intermediate.index()].is_none());
        assert_eq!(stats[Tier::High.index()].as_ref().map(|s| s.n), Some(4));
    }

    #[test]
    fn y_range_covers_all_boxes() {
        let stats = tier_box_stats(&sample_tiers(), (2.5, 97.5));
        let (lo, hi) = y_range(&stats);
        assert!(lo < -9.0);
        assert!(hi > 40e-6_f64.log10());
        assert_eq!(y_range(&[None, None]), (-10.0, -4.0));
    }

    #[test]
    fn writes_svg_with_plain_label() {
        let dir = tempfile::tempdir().unwrap();
        let config = FigureConfig {
            path: dir.path().join("dpr.svg"),
            rich_labels: false,
            ..FigureConfig::default()
        };

        let label = render_dpr_boxplot(&sample_tiers(), &config).unwrap();
        assert!(!label.is_rich());

        let svg = std::fs::read_to_string(&config.path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("extreme"));
        assert!(svg.contains("log10(DPR"));
    }

    fn fails_on_rich(
        _: &DrawingArea<SVGBackend<'_>, Shift>,
        label: &RenderLabel,
        _: u32,
    ) -> Result<(), String> {
        if label.is_rich() {
            Err("missing glyph".to_string())
        } else {
            Ok(())
        }
    }

    fn rich_only(
        _: &DrawingArea<SVGBackend<'_>, Shift>,
        label: &RenderLabel,
        _: u32,
    ) -> Result<(), String> {
        assert!(label.is_rich(), "plain label requested after an I/O failure");
        Ok(())
    }

    #[test]
    fn rich_label_failure_falls_back_to_plain() {
        let dir = tempfile::tempdir().unwrap();
        let config = FigureConfig { path: dir.path().join("dpr.svg"), ..FigureConfig::default() };
        assert!(config.rich_labels);

        let label = render_with_label_drawer(&sample_tiers(), &config, fails_on_rich).unwrap();
        assert_eq!(label, dpr_axis_label(false));
        assert!(config.path.exists());
    }

    #[test]
    fn io_failure_does_not_retry_the_label() {
        let dir = tempfile::tempdir().unwrap();
        let config = FigureConfig {
            path: dir.path().join("missing").join("dpr.svg"),
            ..FigureConfig::default()
        };
        let err = render_with_label_drawer(&sample_tiers(), &config, rich_only).unwrap_err();
        assert_eq!(err.exit_code(), AppError::OUTPUT);
    }

    #[test]
    fn unwritable_path_is_an_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = FigureConfig {
            path: dir.path().join("missing").join("dpr.svg"),
            ..FigureConfig::default()
        };
        let err = render_dpr_boxplot(&sample_tiers(), &config).unwrap_err();
        assert_eq!(err.exit_code(), AppError::OUTPUT);
    }
}
