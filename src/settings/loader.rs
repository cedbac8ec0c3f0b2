use config::{Config, Environment, File};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;
use crate::models::{ArrivalScope, GeoPoint};
use crate::settings::{DetrendMethod, Settings};
use crate::utils::constants::*;

/// Command-line values that win over the file and the environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub observer: Option<GeoPoint>,
    pub event_time: Option<i64>,
    pub speed_km_s: Option<f64>,
    pub lead_hours: Option<f64>,
    pub lag_hours: Option<f64>,
    pub scope: Option<ArrivalScope>,
    pub method: Option<DetrendMethod>,
    pub smoothing_hours: Option<f64>,
    pub highlight_hours: Option<f64>,
    pub output: Option<PathBuf>,
    pub sqlite_path: Option<PathBuf>,
    pub show: Option<bool>,
}

impl Settings {
    /// Layer defaults, an optional TOML file, `BARO_PULSE__*` environment
    /// variables and command-line overrides, then validate the result.
    pub fn load(file: Option<&Path>, overrides: &SettingsOverrides) -> Result<Settings> {
        let mut builder = Config::builder()
            .set_default("observer.latitude", DEFAULT_OBSERVER_LAT)?
            .set_default("observer.longitude", DEFAULT_OBSERVER_LON)?
            .set_default("event.name", DEFAULT_EVENT_NAME)?
            .set_default("event.latitude", DEFAULT_EVENT_LAT)?
            .set_default("event.longitude", DEFAULT_EVENT_LON)?
            .set_default("event.time", DEFAULT_EVENT_TIME)?
            .set_default("event.speed_km_s", DEFAULT_SPEED_KM_S)?
            .set_default("event.earth_circumference_km", DEFAULT_EARTH_CIRCUMFERENCE_KM)?
            .set_default("window.lead_hours", DEFAULT_LEAD_HOURS)?
            .set_default("window.lag_hours", DEFAULT_LAG_HOURS)?
            .set_default("window.scope", "all")?
            .set_default("detrend.method", "spline")?
            .set_default("detrend.smoothing_hours", DEFAULT_SMOOTHING_HOURS)?
            .set_default("detrend.polynomial_degree", DEFAULT_POLYNOMIAL_DEGREE as i64)?
            .set_default("plot.output", DEFAULT_CHART_PATH)?
            .set_default("plot.highlight_hours", DEFAULT_HIGHLIGHT_HOURS)?
            .set_default("plot.width", i64::from(DEFAULT_CHART_WIDTH))?
            .set_default("plot.height", i64::from(DEFAULT_CHART_HEIGHT))?
            .set_default("plot.show", true)?
            .set_default("storage.backend", "sqlite")?
            .set_default("storage.path", DEFAULT_SQLITE_PATH)?
            .set_default("storage.host", DEFAULT_MYSQL_HOST)?
            .set_default("storage.port", i64::from(DEFAULT_MYSQL_PORT))?
            .set_default("storage.user", DEFAULT_MYSQL_USER)?
            .set_default("storage.password", "")?
            .set_default("storage.database", DEFAULT_MYSQL_DATABASE)?;

        if let Some(path) = file {
            debug!("Reading configuration from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(point) = overrides.observer {
            builder = builder
                .set_override("observer.latitude", point.latitude)?
                .set_override("observer.longitude", point.longitude)?;
        }
        builder = builder
            .set_override_option("event.time", overrides.event_time)?
            .set_override_option("event.speed_km_s", overrides.speed_km_s)?
            .set_override_option("window.lead_hours", overrides.lead_hours)?
            .set_override_option("window.lag_hours", overrides.lag_hours)?
            .set_override_option("detrend.smoothing_hours", overrides.smoothing_hours)?
            .set_override_option("plot.highlight_hours", overrides.highlight_hours)?
            .set_override_option("plot.show", overrides.show)?
            .set_override_option(
                "plot.output",
                overrides.output.as_ref().map(|p| p.to_string_lossy().into_owned()),
            )?;

        if let Some(scope) = overrides.scope {
            let name = match scope {
                ArrivalScope::All => "all",
                ArrivalScope::Direct => "direct",
            };
            builder = builder.set_override("window.scope", name)?;
        }

        if let Some(method) = overrides.method {
            let name = match method {
                DetrendMethod::Spline => "spline",
                DetrendMethod::Polynomial => "polynomial",
            };
            builder = builder.set_override("detrend.method", name)?;
        }

        if let Some(ref path) = overrides.sqlite_path {
            builder = builder
                .set_override("storage.backend", "sqlite")?
                .set_override("storage.path", path.to_string_lossy().into_owned())?;
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.check()?;

        debug!(?settings, "Configuration loaded");
        Ok(settings)
    }
}
