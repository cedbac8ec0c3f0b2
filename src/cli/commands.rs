use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::analyzers::PulseAnalyzer;
use crate::cli::args::{Cli, Commands, EventArgs, OutputFormat};
use crate::error::Result;
use crate::models::{ArrivalSet, GeoPoint};
use crate::settings::{Settings, SettingsOverrides};
use crate::utils::filename::default_residual_csv_path;

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Analyze {
            event,
            sqlite,
            lead_hours,
            lag_hours,
            scope,
            method,
            smoothing_hours,
            highlight_hours,
            output,
            csv,
            no_plot,
            show,
            no_show,
        } => {
            let overrides = SettingsOverrides {
                sqlite_path: sqlite,
                lead_hours,
                lag_hours,
                scope,
                method,
                smoothing_hours,
                highlight_hours,
                output,
                show: show_override(show, no_show),
                ..event_overrides(&event)?
            };
            let settings = Settings::load(cli.config.as_deref(), &overrides)?;

            println!("Analyzing {}", settings.event.name);
            println!("Observer: {}", settings.observer.location());
            println!("Archive: {}", settings.storage.describe());

            let csv_path = csv.map(|path| {
                path.unwrap_or_else(|| default_residual_csv_path(&settings.plot.output))
            });

            let analyzer = PulseAnalyzer::new(settings)
                .with_csv_output(csv_path)
                .with_chart(!no_plot);
            let report = analyzer.run().await?;

            println!("\n{}", report.summary());
        }

        Commands::Predict { event, format } => {
            let settings = Settings::load(cli.config.as_deref(), &event_overrides(&event)?)?;
            let analyzer = PulseAnalyzer::new(settings);
            let arrivals = analyzer.predict();
            let window = analyzer.select_window(&arrivals)?;

            match format {
                OutputFormat::Text => {
                    println!("{}", arrivals.summary());
                    println!(
                        "query window {} .. {} UTC",
                        ArrivalSet::format_timestamp(window.start as f64),
                        ArrivalSet::format_timestamp(window.stop as f64)
                    );
                }
                OutputFormat::Json => {
                    let document = serde_json::json!({
                        "event": analyzer.settings().event,
                        "observer": analyzer.settings().observer,
                        "arrivals": arrivals,
                        "window": window,
                    });
                    println!("{}", serde_json::to_string_pretty(&document)?);
                }
            }
        }
    }

    Ok(())
}

fn event_overrides(event: &EventArgs) -> Result<SettingsOverrides> {
    let observer = match event.observer {
        Some(ref pair) => Some(GeoPoint::parse_pair(pair)?),
        None => None,
    };

    Ok(SettingsOverrides {
        observer,
        event_time: event.event_time,
        speed_km_s: event.speed,
        ..SettingsOverrides::default()
    })
}

fn show_override(show: bool, no_show: bool) -> Option<bool> {
    match (show, no_show) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// `RUST_LOG` wins; otherwise `--verbose` selects debug for this crate.
fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default_directive = if verbose { "baro_pulse=debug" } else { "baro_pulse=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let installed = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    // a subscriber may already be installed when run is called twice
    if installed.is_err() {
        debug!("Tracing subscriber already installed");
    } else if let Some(path) = log_file {
        info!("Logging to {}", path.display());
    }
    Ok(())
}
