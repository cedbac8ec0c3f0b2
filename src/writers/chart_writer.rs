use chrono::DateTime;
use plotters::coord::combinators::WithKeyPoints;
use plotters::coord::ranged1d::{KeyPointHint, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::ops::Range;
use std::path::Path;
use std::process::Command;
use tracing::{info, warn};

use crate::error::{ProcessingError, Result};
use crate::models::{ArrivalKind, ArrivalSet, Observer, PulseEvent, ResidualSeries, SampleSeries};
use crate::processors::Baseline;
use crate::settings::PlotSettings;

const RAW_COLOR: RGBColor = RGBColor(175, 238, 238); // paleturquoise
const BASELINE_COLOR: RGBColor = RGBColor(0, 0, 0);
const RESIDUAL_COLOR: RGBColor = RGBColor(0, 128, 0);
const HIGHLIGHT_COLOR: RGBColor = RGBColor(211, 211, 211);
const TICK_HOURS: i64 = 4;

/// `WithKeyPoints<RangedCoordf64>` does not forward the inner
/// `ValueFormatter`, which `configure_mesh` requires; this delegates both.
struct KeyPointAxis(WithKeyPoints<RangedCoordf64>);

impl Ranged for KeyPointAxis {
    type FormatOption = plotters::coord::ranged1d::NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.0.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        self.0.key_points(hint)
    }

    fn range(&self) -> Range<f64> {
        self.0.range()
    }

    fn axis_pixel_range(&self, limit: (i32, i32)) -> Range<i32> {
        self.0.axis_pixel_range(limit)
    }
}

impl ValueFormatter<f64> for KeyPointAxis {
    fn format(value: &f64) -> String {
        RangedCoordf64::format(value)
    }

    fn format_ext(&self, value: &f64) -> String {
        RangedCoordf64::format(value)
    }
}

/// Everything drawn on the pressure chart.
pub struct PulseChart<'a> {
    pub series: &'a SampleSeries,
    pub baseline: &'a dyn Baseline,
    pub residuals: &'a ResidualSeries,
    pub arrivals: &'a ArrivalSet,
    pub observer: &'a Observer,
    pub event: &'a PulseEvent,
}

/// Renders the raw trace, fitted baseline and extracted feature to PNG.
pub struct ChartWriter {
    width: u32,
    height: u32,
    highlight_hours: f64,
}

impl ChartWriter {
    pub fn new() -> Self {
        Self::from_settings(&PlotSettings::default())
    }

    pub fn from_settings(settings: &PlotSettings) -> Self {
        Self {
            width: settings.width,
            height: settings.height,
            highlight_hours: settings.highlight_hours,
        }
    }

    pub fn write_png(&self, chart: &PulseChart<'_>, path: &Path) -> Result<()> {
        if chart.series.is_empty() {
            return Err(ProcessingError::Render("no samples to plot".to_string()));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        self.draw(&root, chart)?;
        root.present().map_err(render_error)?;

        info!("Chart written to {}", path.display());
        Ok(())
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, input: &PulseChart<'_>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let (first, last) = input.series.time_span().ok_or_else(|| {
            ProcessingError::Render("no samples to plot".to_string())
        })?;
        let x_range = padded_range(first as f64, last as f64, 0.0, 1800.0);
        let (p_lo, p_hi) = input.series.pressure_range().unwrap_or((1013.0, 1013.0));
        let y_range = padded_range(p_lo, p_hi, 0.0, 0.5);
        let (r_lo, r_hi) = input.residuals.residual_range().unwrap_or((0.0, 0.0));
        let residual_range = padded_range(r_lo, r_hi, 0.05, 0.1);
        let residual_decimals = label_decimals(residual_range.end - residual_range.start);
        let ticks = hour_ticks(&x_range, TICK_HOURS);

        root.fill(&WHITE).map_err(render_error)?;

        let caption = format!(
            "location: {} speed {:.0} m/s",
            input.observer.location(),
            input.event.speed_km_s * 1000.0
        );
        let mut chart = ChartBuilder::on(root)
            .caption(caption, ("sans-serif", 18))
            .margin(15)
            .x_label_area_size(90)
            .y_label_area_size(70)
            .right_y_label_area_size(70)
            .build_cartesian_2d(
                KeyPointAxis(x_range.clone().with_key_points(ticks)),
                y_range.clone(),
            )
            .map_err(render_error)?
            .set_secondary_coord(x_range.clone(), residual_range);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|t| format_tick(*t))
            .x_label_style(
                ("sans-serif", 12)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .y_desc("barometric pressure (hPa)")
            .y_label_formatter(&|p| format!("{:.1}", p))
            .draw()
            .map_err(render_error)?;
        chart
            .configure_secondary_axes()
            .y_desc("extracted feature (hPa)")
            .y_label_formatter(&|r| format!("{:.*}", residual_decimals, r))
            .draw()
            .map_err(render_error)?;

        // arrival bars sit behind the data
        let half_width = self.highlight_hours * 1800.0;
        let visible = visible_arrivals(input.arrivals, &x_range);
        chart
            .draw_series(visible.iter().map(|(_, t)| {
                Rectangle::new(
                    [(t - half_width, y_range.start), (t + half_width, y_range.end)],
                    HIGHLIGHT_COLOR.filled(),
                )
            }))
            .map_err(render_error)?;
        let label_y = y_range.start + 0.05 * (y_range.end - y_range.start);
        chart
            .draw_series(visible.iter().map(|(kind, t)| {
                Text::new(
                    kind.label(),
                    (*t, label_y),
                    ("sans-serif", 14).into_font().color(&BLACK),
                )
            }))
            .map_err(render_error)?;

        chart
            .draw_series(input.series.samples().iter().map(|s| {
                Circle::new(
                    (s.timestamp as f64, s.pressure_hpa),
                    2,
                    RAW_COLOR.stroke_width(1),
                )
            }))
            .map_err(render_error)?;
        chart
            .draw_series(LineSeries::new(
                input
                    .series
                    .timestamps()
                    .zip(input.residuals.baseline.iter().copied()),
                BASELINE_COLOR.stroke_width(1),
            ))
            .map_err(render_error)?;
        chart
            .draw_series(input.baseline.knots().iter().map(|&k| {
                Cross::new(
                    (k, input.baseline.value_at(k)),
                    10,
                    BASELINE_COLOR.stroke_width(1),
                )
            }))
            .map_err(render_error)?;

        chart
            .draw_secondary_series(LineSeries::new(
                input
                    .series
                    .timestamps()
                    .zip(input.residuals.residual.iter().copied()),
                RESIDUAL_COLOR.stroke_width(1),
            ))
            .map_err(render_error)?;

        Ok(())
    }
}

impl Default for ChartWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn render_error<E: std::error::Error>(err: E) -> ProcessingError {
    ProcessingError::Render(err.to_string())
}

/// `[lo, hi]` widened by `fraction` of its span, or by `min_pad` on each side
/// when the span is degenerate.
fn padded_range(lo: f64, hi: f64, fraction: f64, min_pad: f64) -> Range<f64> {
    let span = hi - lo;
    if span <= f64::EPSILON * hi.abs().max(1.0) {
        return (lo - min_pad)..(hi + min_pad);
    }
    let pad = span * fraction;
    (lo - pad)..(hi + pad)
}

/// Arrivals that fall inside the plotted time axis.
fn visible_arrivals(arrivals: &ArrivalSet, x_range: &Range<f64>) -> Vec<(ArrivalKind, f64)> {
    arrivals
        .iter()
        .filter(|(_, t)| x_range.contains(t))
        .collect()
}

/// Epoch times inside `range` that sit on whole `step_hours` UTC boundaries.
fn hour_ticks(range: &Range<f64>, step_hours: i64) -> Vec<f64> {
    let step = step_hours * 3600;
    let first = (range.start / step as f64).ceil() as i64;
    let last = (range.end / step as f64).floor() as i64;
    (first..=last).map(|n| (n * step) as f64).collect()
}

/// Decimal places that resolve roughly five labels across `span`.
fn label_decimals(span: f64) -> usize {
    if span.is_nan() || span <= 0.0 {
        return 2;
    }
    (-(span / 5.0).log10()).ceil().clamp(0.0, 6.0) as usize
}

/// Tick label in UTC, e.g. `01-15 14:00`.
fn format_tick(timestamp: f64) -> String {
    DateTime::from_timestamp(timestamp.round() as i64, 0)
        .map(|dt| dt.format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Hand the saved chart to the desktop image viewer and wait for it to exit.
pub fn open_in_viewer(path: &Path) -> Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };

    let status = command.arg(path).status()?;
    if !status.success() {
        warn!("Image viewer exited with {}", status);
    }
    Ok(())
}
