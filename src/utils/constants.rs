/// Hunga Tonga-Hunga Ha'apai eruption, 2022-01-15 04:14:45 UTC
pub const DEFAULT_EVENT_NAME: &str = "Hunga Tonga-Hunga Ha'apai";
pub const DEFAULT_EVENT_LAT: f64 = -20.5452074472518;
pub const DEFAULT_EVENT_LON: f64 = -175.38715105641674;
pub const DEFAULT_EVENT_TIME: i64 = 1_642_220_085;

/// Default observer (Halifax, Nova Scotia)
pub const DEFAULT_OBSERVER_LAT: f64 = 44.80321621050904;
pub const DEFAULT_OBSERVER_LON: f64 = -63.62038361172844;

/// Wave propagation
pub const DEFAULT_SPEED_KM_S: f64 = 0.32;
pub const DEFAULT_EARTH_CIRCUMFERENCE_KM: f64 = 40040.0;

/// WGS-84 ellipsoid
pub const WGS84_A_M: f64 = 6_378_137.0;
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
pub const MEAN_EARTH_RADIUS_KM: f64 = 6371.0088;

/// Window and fit defaults
pub const DEFAULT_LEAD_HOURS: f64 = 4.0;
pub const DEFAULT_LAG_HOURS: f64 = 4.0;
pub const DEFAULT_SMOOTHING_HOURS: f64 = 10.0;
pub const DEFAULT_POLYNOMIAL_DEGREE: usize = 2;
pub const SPLINE_DEGREE: usize = 3;
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Chart defaults
pub const DEFAULT_CHART_PATH: &str = "./hunga_tonga.png";
pub const DEFAULT_HIGHLIGHT_HOURS: f64 = 1.0;
pub const DEFAULT_CHART_WIDTH: u32 = 1000;
pub const DEFAULT_CHART_HEIGHT: u32 = 500;

/// weewx archive defaults
pub const DEFAULT_SQLITE_PATH: &str = "weewx.sdb";
pub const DEFAULT_MYSQL_HOST: &str = "127.0.0.1";
pub const DEFAULT_MYSQL_PORT: u16 = 3306;
pub const DEFAULT_MYSQL_USER: &str = "weewx";
pub const DEFAULT_MYSQL_DATABASE: &str = "weewx";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "BARO_PULSE";
