pub mod loader;
pub mod schema;

pub use loader::SettingsOverrides;
pub use schema::{
    DetrendMethod, DetrendSettings, MySqlSettings, PlotSettings, Settings, StorageSettings,
    WindowSettings,
};
