use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{ArrivalSet, SampleSeries, TimeWindow};
use crate::processors::{ArrivalCalculator, Detrended, Detrender, KnotPlan, WindowSelector};
use crate::readers::{describe_query, ArchiveReader, ArchiveStore};
use crate::settings::{DetrendMethod, Settings};
use crate::utils::progress::ProgressReporter;
use crate::writers::{open_in_viewer, ChartWriter, CsvWriter, PulseChart};

/// What one analysis run produced.
#[derive(Debug, Clone)]
pub struct PulseReport {
    pub arrivals: ArrivalSet,
    pub window: TimeWindow,
    pub method: DetrendMethod,
    pub sample_count: usize,
    pub knot_count: usize,
    /// Timestamp and signed value of the largest residual
    pub peak: Option<(i64, f64)>,
    pub residual_rms: f64,
    pub chart_path: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
}

impl PulseReport {
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Analysis complete".to_string(),
            format!(
                "  window: {} .. {} UTC ({:.0} h)",
                ArrivalSet::format_timestamp(self.window.start as f64),
                ArrivalSet::format_timestamp(self.window.stop as f64),
                self.window.duration_hours()
            ),
            format!(
                "  samples: {}, baseline: {:?} with {} knots",
                self.sample_count, self.method, self.knot_count
            ),
            format!("  residual rms: {:.3} hPa", self.residual_rms),
        ];
        if let Some((timestamp, value)) = self.peak {
            lines.push(format!(
                "  largest feature: {:+.3} hPa at {} UTC",
                value,
                ArrivalSet::format_timestamp(timestamp as f64)
            ));
        }
        if let Some(ref path) = self.chart_path {
            lines.push(format!("  chart: {}", path.display()));
        }
        if let Some(ref path) = self.csv_path {
            lines.push(format!("  residuals: {}", path.display()));
        }
        lines.join("\n")
    }
}

/// Runs prediction, window selection, the archive query, detrending and
/// output for one observer and one event.
pub struct PulseAnalyzer {
    settings: Settings,
    csv_output: Option<PathBuf>,
    render_chart: bool,
    silent: bool,
}

impl PulseAnalyzer {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            csv_output: None,
            render_chart: true,
            silent: false,
        }
    }

    pub fn with_csv_output(mut self, path: Option<PathBuf>) -> Self {
        self.csv_output = path;
        self
    }

    pub fn with_chart(mut self, render: bool) -> Self {
        self.render_chart = render;
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn predict(&self) -> ArrivalSet {
        ArrivalCalculator::new().predict(&self.settings.observer, &self.settings.event)
    }

    pub fn select_window(&self, arrivals: &ArrivalSet) -> Result<TimeWindow> {
        WindowSelector::from_settings(&self.settings.window).select(arrivals)
    }

    pub async fn run(&self) -> Result<PulseReport> {
        let arrivals = self.predict();
        self.say(&arrivals.summary());

        let window = self.select_window(&arrivals)?;
        let detrender = Detrender::from_settings(&self.settings.detrend);
        let plan = detrender.knot_plan(&window)?;
        debug!(
            start = window.start,
            stop = window.stop,
            knots = plan.count(),
            "Window selected"
        );

        let series = self.fetch(&window).await?;
        let detrended = detrender.detrend(&series, &window)?;

        let csv_path = match self.csv_output {
            Some(ref path) => {
                CsvWriter::new().write_residuals(&series, &detrended.residuals, path)?;
                Some(path.clone())
            }
            None => None,
        };

        let chart_path = if self.render_chart {
            Some(self.render(&series, &detrended, &arrivals)?)
        } else {
            None
        };

        Ok(self.report(arrivals, window, &series, &detrended, &plan, chart_path, csv_path))
    }

    async fn fetch(&self, window: &TimeWindow) -> Result<SampleSeries> {
        let store = ArchiveStore::from_settings(&self.settings.storage);
        self.say(&describe_query(window));

        let progress =
            ProgressReporter::new_spinner(&format!("Querying {}", store.describe()), self.silent);
        let series = store.read_range(window).await?;
        progress.finish_with_message(&format!("Read {} samples", series.len()));
        drop(progress);

        self.say(&format!("query returned {} data points", series.len()));
        Ok(series)
    }

    fn render(
        &self,
        series: &SampleSeries,
        detrended: &Detrended,
        arrivals: &ArrivalSet,
    ) -> Result<PathBuf> {
        let path = self.settings.plot.output.clone();
        let chart = PulseChart {
            series,
            baseline: detrended.baseline.as_ref(),
            residuals: &detrended.residuals,
            arrivals,
            observer: &self.settings.observer,
            event: &self.settings.event,
        };
        ChartWriter::from_settings(&self.settings.plot).write_png(&chart, &path)?;

        if self.settings.plot.show {
            info!("Opening {}", path.display());
            // the chart is already on disk, so a missing viewer is not fatal
            if let Err(e) = open_in_viewer(&path) {
                warn!("Could not open an image viewer: {}", e);
            }
        }
        Ok(path)
    }

    #[allow(clippy::too_many_arguments)]
    fn report(
        &self,
        arrivals: ArrivalSet,
        window: TimeWindow,
        series: &SampleSeries,
        detrended: &Detrended,
        plan: &KnotPlan,
        chart_path: Option<PathBuf>,
        csv_path: Option<PathBuf>,
    ) -> PulseReport {
        let residuals = &detrended.residuals;
        let residual_rms = if residuals.is_empty() {
            0.0
        } else {
            (residuals.sum_of_squares() / residuals.len() as f64).sqrt()
        };

        PulseReport {
            arrivals,
            window,
            method: detrended.baseline.method(),
            sample_count: series.len(),
            knot_count: plan.interior_count(),
            peak: residuals
                .peak()
                .map(|(index, value)| (series.samples()[index].timestamp, value)),
            residual_rms,
            chart_path,
            csv_path,
        }
    }

    fn say(&self, message: &str) {
        if !self.silent {
            println!("{}", message);
        }
    }
}
