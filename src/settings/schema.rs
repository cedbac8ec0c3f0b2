use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::{ArrivalScope, GeoPoint, Observer, PulseEvent};
use crate::utils::constants::*;

/// Immutable run configuration, handed to each pipeline step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub observer: Observer,

    #[validate(nested)]
    pub event: PulseEvent,

    #[validate(nested)]
    pub window: WindowSettings,

    #[validate(nested)]
    pub detrend: DetrendSettings,

    #[validate(nested)]
    pub plot: PlotSettings,

    pub storage: StorageSettings,
}

impl Settings {
    /// Field ranges plus the checks that span more than one field.
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if self.window.lead_hours + self.window.lag_hours <= 0.0 {
            return Err(ProcessingError::InvalidParameter {
                parameter: "window.lead_hours",
                message: "lead_hours + lag_hours must be greater than zero".to_string(),
            });
        }

        if let StorageSettings::Mysql(ref mysql) = self.storage {
            mysql.validate()?;
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            observer: Observer::new(DEFAULT_OBSERVER_LAT, DEFAULT_OBSERVER_LON),
            event: PulseEvent::new(
                DEFAULT_EVENT_NAME,
                GeoPoint::new(DEFAULT_EVENT_LAT, DEFAULT_EVENT_LON),
                DEFAULT_EVENT_TIME,
                DEFAULT_SPEED_KM_S,
            ),
            window: WindowSettings::default(),
            detrend: DetrendSettings::default(),
            plot: PlotSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct WindowSettings {
    #[validate(range(min = 0.0))]
    pub lead_hours: f64,

    #[validate(range(min = 0.0))]
    pub lag_hours: f64,

    #[serde(default)]
    pub scope: ArrivalScope,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            lead_hours: DEFAULT_LEAD_HOURS,
            lag_hours: DEFAULT_LAG_HOURS,
            scope: ArrivalScope::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetrendMethod {
    #[default]
    Spline,
    Polynomial,
}

impl std::str::FromStr for DetrendMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spline" => Ok(DetrendMethod::Spline),
            "polynomial" | "poly" => Ok(DetrendMethod::Polynomial),
            other => Err(format!("unknown detrend method '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DetrendSettings {
    #[serde(default)]
    pub method: DetrendMethod,

    /// Spacing between spline knots
    #[validate(range(exclusive_min = 0.0))]
    pub smoothing_hours: f64,

    #[validate(range(min = 1, max = 8))]
    pub polynomial_degree: usize,
}

impl Default for DetrendSettings {
    fn default() -> Self {
        Self {
            method: DetrendMethod::Spline,
            smoothing_hours: DEFAULT_SMOOTHING_HOURS,
            polynomial_degree: DEFAULT_POLYNOMIAL_DEGREE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PlotSettings {
    pub output: PathBuf,

    /// Width of the grey bar behind each predicted arrival
    #[validate(range(exclusive_min = 0.0))]
    pub highlight_hours: f64,

    #[validate(range(min = 320, max = 8000))]
    pub width: u32,

    #[validate(range(min = 240, max = 8000))]
    pub height: u32,

    /// Open the saved chart in the platform image viewer
    #[serde(default = "default_show")]
    pub show: bool,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_CHART_PATH),
            highlight_hours: DEFAULT_HIGHLIGHT_HOURS,
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
            show: true,
        }
    }
}

fn default_show() -> bool {
    true
}

/// Which archive database to read, chosen once at configuration time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageSettings {
    Sqlite { path: PathBuf },
    Mysql(MySqlSettings),
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings::Sqlite {
            path: PathBuf::from(DEFAULT_SQLITE_PATH),
        }
    }
}

impl StorageSettings {
    pub fn describe(&self) -> String {
        match self {
            StorageSettings::Sqlite { path } => format!("sqlite:{}", path.display()),
            StorageSettings::Mysql(m) => {
                format!("mysql://{}@{}:{}/{}", m.user, m.host, m.port, m.database)
            }
        }
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MySqlSettings {
    #[validate(length(min = 1))]
    pub host: String,

    pub port: u16,

    #[validate(length(min = 1))]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[validate(length(min = 1))]
    pub database: String,
}

// Keep the password out of debug logs
impl std::fmt::Debug for MySqlSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

impl Default for MySqlSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_MYSQL_HOST.to_string(),
            port: DEFAULT_MYSQL_PORT,
            user: DEFAULT_MYSQL_USER.to_string(),
            password: String::new(),
            database: DEFAULT_MYSQL_DATABASE.to_string(),
        }
    }
}
