pub mod mysql_reader;
pub mod sqlite_reader;

pub use mysql_reader::MySqlArchiveReader;
pub use sqlite_reader::SqliteArchiveReader;

use std::future::Future;

use crate::error::{ProcessingError, Result};
use crate::models::{SampleSeries, TimeWindow};
use crate::settings::StorageSettings;

/// Barometer readings in `[start, stop)`, oldest first, nulls skipped.
/// Both weewx backends accept `?` placeholders.
pub const RANGE_QUERY: &str = "SELECT dateTime, barometer FROM archive \
     WHERE dateTime >= ? AND dateTime < ? AND barometer IS NOT NULL \
     ORDER BY dateTime";

/// The query as it runs for `window`, for the console log.
pub fn describe_query(window: &TimeWindow) -> String {
    RANGE_QUERY
        .replacen('?', &window.start.to_string(), 1)
        .replacen('?', &window.stop.to_string(), 1)
}

/// A weather-station archive that can answer one range query.
///
/// Implementations open their connection inside `read_range` and close it
/// before returning, so no handle outlives the query.
pub trait ArchiveReader {
    fn describe(&self) -> String;

    fn read_range(&self, window: &TimeWindow)
        -> impl Future<Output = Result<SampleSeries>> + Send;
}

/// Backend picked from the storage settings.
pub enum ArchiveStore {
    Sqlite(SqliteArchiveReader),
    Mysql(MySqlArchiveReader),
}

impl ArchiveStore {
    pub fn from_settings(settings: &StorageSettings) -> Self {
        match settings {
            StorageSettings::Sqlite { path } => {
                ArchiveStore::Sqlite(SqliteArchiveReader::new(path.clone()))
            }
            StorageSettings::Mysql(mysql) => {
                ArchiveStore::Mysql(MySqlArchiveReader::new(mysql.clone()))
            }
        }
    }
}

impl ArchiveReader for ArchiveStore {
    fn describe(&self) -> String {
        match self {
            ArchiveStore::Sqlite(reader) => reader.describe(),
            ArchiveStore::Mysql(reader) => reader.describe(),
        }
    }

    async fn read_range(&self, window: &TimeWindow) -> Result<SampleSeries> {
        match self {
            ArchiveStore::Sqlite(reader) => reader.read_range(window).await,
            ArchiveStore::Mysql(reader) => reader.read_range(window).await,
        }
    }
}

/// Zero rows is a hard stop: there is nothing to fit.
pub(crate) fn require_rows(rows: Vec<(i64, f64)>, window: &TimeWindow) -> Result<SampleSeries> {
    if rows.is_empty() {
        return Err(ProcessingError::NoData {
            start: window.start,
            stop: window.stop,
        });
    }
    Ok(SampleSeries::from(rows))
}
