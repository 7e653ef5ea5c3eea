//! Chart rendering from a finished report.
//!
//! One scaling chart per input size: threads on a log2 x-axis, mean time on
//! a log y-axis, one line per variant. Serial variants, measured only at one
//! thread, are drawn as a marker plus a dashed horizontal reference line.
//! Optional speedup charts use the same layout with baseline/mean on y.

use plotters::prelude::*;
use plotters::style::{FontStyle, register_font};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::{info, warn};

use crate::config::{PlotConfig, UNIT_THREADS, Variant};
use crate::error::{HarnessError, HarnessResult};
use crate::report::{BenchmarkReport, PlotRow};

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FONT_READY: OnceLock<bool> = OnceLock::new();

/// One line (or reference line) on a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    /// (threads, value), ordered by threads.
    pub points: Vec<(f64, f64)>,
    /// Drawn as a horizontal reference across the thread range.
    pub reference: bool,
}

/// `benchmark_<timestamp>_size_<size>.png`
pub fn scaling_file_name(timestamp: &str, size: u64) -> String {
    format!("benchmark_{timestamp}_size_{size}.png")
}

/// `speedup_<timestamp>_size_<size>.png`
pub fn speedup_file_name(timestamp: &str, size: u64) -> String {
    format!("speedup_{timestamp}_size_{size}.png")
}

/// Group one size's rows into chart series, in first-seen label order.
///
/// In a group that swept more than one thread count, registered serial
/// variants become reference series. A label missing from `variants` is a
/// reference when all its rows sit at one thread. Non-positive means cannot
/// be placed on a log axis and are dropped with a warning.
pub fn scaling_series(rows: &[PlotRow], variants: &[Variant]) -> Vec<Series> {
    let swept_other = rows.iter().any(|r| r.threads != UNIT_THREADS);

    let mut labels: Vec<&str> = Vec::new();
    for row in rows {
        if !labels.contains(&row.label.as_str()) {
            labels.push(&row.label);
        }
    }

    labels
        .into_iter()
        .filter_map(|label| {
            let mut points: Vec<(f64, f64)> = rows
                .iter()
                .filter(|r| r.label == label)
                .filter_map(|r| {
                    if r.mean > 0.0 {
                        Some((f64::from(r.threads), r.mean))
                    } else {
                        warn!(
                            "Skipping {} at size={} threads={}: non-positive mean {}",
                            label, r.size, r.threads, r.mean
                        );
                        None
                    }
                })
                .collect();
            if points.is_empty() {
                return None;
            }
            points.sort_by(|a, b| a.0.total_cmp(&b.0));

            let serial = match variants.iter().find(|v| v.label == label) {
                Some(variant) => !variant.is_parallel(),
                None => points.iter().all(|&(t, _)| t == f64::from(UNIT_THREADS)),
            };
            let reference = swept_other && serial;
            Some(Series {
                label: label.to_string(),
                points,
                reference,
            })
        })
        .collect()
}

/// Speedup series for every non-reference variant in `series`.
///
/// The baseline is the reference series of the same toolchain (per the
/// registry), falling back to the variant's own one-thread mean.
pub fn speedup_series(series: &[Series], variants: &[Variant]) -> Vec<Series> {
    let toolchain = |label: &str| {
        variants
            .iter()
            .find(|v| v.label == label)
            .map(|v| v.toolchain.as_str())
    };

    series
        .iter()
        .filter(|s| !s.reference)
        .filter_map(|s| {
            let serial = toolchain(&s.label).and_then(|tc| {
                series
                    .iter()
                    .find(|other| other.reference && toolchain(&other.label) == Some(tc))
            });
            let baseline = match serial {
                Some(serial) => serial.points[0].1,
                None => s
                    .points
                    .iter()
                    .find(|&&(t, _)| t == f64::from(UNIT_THREADS))
                    .map(|&(_, mean)| mean)?,
            };

            Some(Series {
                label: s.label.clone(),
                points: s.points.iter().map(|&(t, mean)| (t, baseline / mean)).collect(),
                reference: false,
            })
        })
        .collect()
}

/// Log-axis ranges padding the data on both sides.
fn axis_ranges(series: &[Series]) -> ((f64, f64), (f64, f64)) {
    let points = series.iter().flat_map(|s| s.points.iter());
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    ((x_min / 1.5, x_max * 1.5), (y_min / 2.0, y_max * 2.0))
}

/// Register a TrueType font for chart text. Returns whether text can be drawn.
///
/// Resolved once per process; later calls reuse the first outcome.
fn ensure_font(config: &PlotConfig) -> bool {
    *FONT_READY.get_or_init(|| {
        let candidates = config
            .font
            .iter()
            .cloned()
            .chain(FONT_CANDIDATES.iter().map(|p| PathBuf::from(*p)));

        for path in candidates {
            let Ok(bytes) = std::fs::read(&path) else {
                continue;
            };
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if register_font("sans-serif", FontStyle::Normal, bytes).is_ok() {
                info!("Chart font: {}", path.display());
                return true;
            }
            warn!("Unusable font file {}", path.display());
        }

        warn!("No TrueType font found; charts will be rendered without text");
        false
    })
}

fn plot_err<E: std::fmt::Display>(e: E) -> HarnessError {
    HarnessError::Plot(e.to_string())
}

/// Draw `series` on log-log axes into a PNG at `path`.
fn draw_chart(
    path: &Path,
    title: &str,
    y_desc: &str,
    series: &[Series],
    config: &PlotConfig,
    with_text: bool,
) -> HarnessResult<()> {
    if series.is_empty() {
        return Err(HarnessError::Plot(format!("no data for {title}")));
    }
    let ((x_lo, x_hi), (y_lo, y_hi)) = axis_ranges(series);

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if with_text {
        builder
            .caption(title, ("sans-serif", 28))
            .x_label_area_size(50)
            .y_label_area_size(90);
    }
    let mut chart = builder
        .build_cartesian_2d(
            (x_lo..x_hi).log_scale().base(2.0),
            (y_lo..y_hi).log_scale(),
        )
        .map_err(plot_err)?;

    if with_text {
        chart
            .configure_mesh()
            .x_desc("Threads")
            .y_desc(y_desc)
            .x_label_formatter(&|x: &f64| format!("{}", x.round() as u64))
            .y_label_formatter(&|y: &f64| format!("{y:.1e}"))
            .draw()
            .map_err(plot_err)?;
    }

    for (idx, s) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let style = color.stroke_width(2);

        let anno = if s.reference {
            let level = s.points[0].1;
            let anno = chart
                .draw_series(DashedLineSeries::new(
                    vec![(x_lo, level), (x_hi, level)],
                    10,
                    6,
                    style,
                ))
                .map_err(plot_err)?;
            if with_text {
                anno.label(s.label.as_str()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], style)
                });
            }
            chart
                .draw_series(s.points.iter().map(|&p| Circle::new(p, 5, color.filled())))
                .map_err(plot_err)?
        } else {
            chart
                .draw_series(LineSeries::new(s.points.iter().copied(), style).point_size(4))
                .map_err(plot_err)?
        };

        if with_text && !s.reference {
            anno.label(s.label.as_str()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], style)
            });
        }
    }

    if with_text {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .draw()
            .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Render every chart for `report` into `plots_dir`.
///
/// Produces exactly one scaling chart per distinct size, plus one speedup
/// chart per size when `config.speedup` is set. Returns the written paths.
pub fn plot_report(
    report: &BenchmarkReport,
    variants: &[Variant],
    plots_dir: &Path,
    timestamp: &str,
    config: &PlotConfig,
) -> HarnessResult<Vec<PathBuf>> {
    std::fs::create_dir_all(plots_dir).map_err(|e| {
        HarnessError::Io(format!("Failed to create {}: {}", plots_dir.display(), e))
    })?;

    let with_text = ensure_font(config);
    let grouped = report.rows_by_size();
    let mut written = Vec::new();

    for size in report.sizes() {
        let rows = grouped.get(&size).map(Vec::as_slice).unwrap_or_default();
        let series = scaling_series(rows, variants);
        if series.is_empty() {
            return Err(HarnessError::Plot(format!("no plottable data for size {size}")));
        }

        let path = plots_dir.join(scaling_file_name(timestamp, size));
        draw_chart(
            &path,
            &format!("Array sum, n = {size}"),
            "Mean time (s)",
            &series,
            config,
            with_text,
        )?;
        info!("Wrote {}", path.display());
        written.push(path);

        if config.speedup {
            let speedups = speedup_series(&series, variants);
            if speedups.is_empty() {
                warn!("No speedup baseline for size {}; skipping speedup chart", size);
                continue;
            }
            let path = plots_dir.join(speedup_file_name(timestamp, size));
            draw_chart(
                &path,
                &format!("Speedup, n = {size}"),
                "Speedup (x)",
                &speedups,
                config,
                with_text,
            )?;
            info!("Wrote {}", path.display());
            written.push(path);
        }
    }

    Ok(written)
}
