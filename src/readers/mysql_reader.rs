use sqlx::mysql::{MySqlConnectOptions, MySqlDatabaseError};
use sqlx::{Connection, MySqlConnection};
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{SampleSeries, TimeWindow};
use crate::readers::{require_rows, ArchiveReader, RANGE_QUERY};
use crate::settings::MySqlSettings;

/// Server error numbers worth a specific diagnostic
const ER_ACCESS_DENIED_ERROR: u16 = 1045;
const ER_BAD_DB_ERROR: u16 = 1049;

/// weewx archive on a MySQL / MariaDB server.
pub struct MySqlArchiveReader {
    settings: MySqlSettings,
}

impl MySqlArchiveReader {
    pub fn new(settings: MySqlSettings) -> Self {
        Self { settings }
    }

    fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.settings.host)
            .port(self.settings.port)
            .username(&self.settings.user)
            .password(&self.settings.password)
            .database(&self.settings.database)
    }

    async fn connect(&self) -> Result<MySqlConnection> {
        MySqlConnection::connect_with(&self.connect_options())
            .await
            .map_err(|e| classify_connect_error(e, &self.settings))
    }
}

/// Map server rejections onto the errors the user can act on.
fn classify_connect_error(err: sqlx::Error, settings: &MySqlSettings) -> ProcessingError {
    let number = match err {
        sqlx::Error::Database(ref db) => db
            .try_downcast_ref::<MySqlDatabaseError>()
            .map(|e| e.number()),
        _ => None,
    };

    match number {
        Some(ER_ACCESS_DENIED_ERROR) => ProcessingError::AccessDenied {
            user: settings.user.clone(),
        },
        Some(ER_BAD_DB_ERROR) => ProcessingError::DatabaseMissing {
            database: settings.database.clone(),
        },
        _ => ProcessingError::Storage(err),
    }
}

impl ArchiveReader for MySqlArchiveReader {
    fn describe(&self) -> String {
        format!(
            "mysql://{}@{}:{}/{}",
            self.settings.user, self.settings.host, self.settings.port, self.settings.database
        )
    }

    async fn read_range(&self, window: &TimeWindow) -> Result<SampleSeries> {
        let mut conn = self.connect().await?;
        debug!("Connected to {}", self.describe());

        let fetched: sqlx::Result<Vec<(i64, f64)>> = sqlx::query_as(RANGE_QUERY)
            .bind(window.start)
            .bind(window.stop)
            .fetch_all(&mut conn)
            .await;
        // release the connection before reporting either outcome
        let closed = conn.close().await;
        let rows = fetched?;
        closed?;

        debug!(rows = rows.len(), "Archive query complete");
        require_rows(rows, window)
    }
}
