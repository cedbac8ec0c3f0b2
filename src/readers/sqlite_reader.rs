use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, SqliteConnection};
use std::path::PathBuf;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{SampleSeries, TimeWindow};
use crate::readers::{require_rows, ArchiveReader, RANGE_QUERY};

/// weewx archive kept in a local SQLite file, opened read-only.
pub struct SqliteArchiveReader {
    path: PathBuf,
}

impl SqliteArchiveReader {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn connect(&self) -> Result<SqliteConnection> {
        // sqlite reports a missing file as a generic open failure
        if !self.path.is_file() {
            return Err(ProcessingError::DatabaseMissing {
                database: self.path.display().to_string(),
            });
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .read_only(true)
            .create_if_missing(false);
        Ok(SqliteConnection::connect_with(&options).await?)
    }
}

impl ArchiveReader for SqliteArchiveReader {
    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_archive(path: &std::path::Path, rows: &[(i64, Option<f64>)]) -> Result<()> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let mut conn = SqliteConnection::connect_with(&options).await?;
        sqlx::query(
            "CREATE TABLE archive (dateTime INTEGER NOT NULL UNIQUE PRIMARY KEY, \
             usUnits INTEGER NOT NULL, interval INTEGER NOT NULL, barometer REAL)",
        )
        .execute(&mut conn)
        .await?;
        for (timestamp, barometer) in rows {
            sqlx::query(
                "INSERT INTO archive (dateTime, usUnits, interval, barometer) VALUES (?, 16, 5, ?)",
            )
            .bind(*timestamp)
            .bind(*barometer)
            .execute(&mut conn)
            .await?;
        }
        conn.close().await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_read_range_filters_and_orders() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("weewx.sdb");
        create_archive(
            &path,
            &[
                (7200, Some(1012.5)),
                (3600, Some(1012.0)),
                (5400, None),
                (10800, Some(1013.0)),
                (0, Some(1011.0)),
            ],
        )
        .await?;

        let reader = SqliteArchiveReader::new(path);
        let series = reader
            .read_range(&TimeWindow {
                start: 3600,
                stop: 10800,
            })
            .await?;

        let rows: Vec<(i64, f64)> = series
            .samples()
            .iter()
            .map(|s| (s.timestamp, s.pressure_hpa))
            .collect();
        assert_eq!(rows, vec![(3600, 1012.0), (7200, 1012.5)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_range_is_no_data() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("weewx.sdb");
        create_archive(&path, &[(100, Some(1010.0))]).await?;

        let reader = SqliteArchiveReader::new(path);
        let result = reader
            .read_range(&TimeWindow {
                start: 3600,
                stop: 7200,
            })
            .await;
        assert!(matches!(
            result,
            Err(ProcessingError::NoData {
                start: 3600,
                stop: 7200
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_query_still_releases_archive() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("weewx.sdb");
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let mut conn = SqliteConnection::connect_with(&options).await?;
        sqlx::query("CREATE TABLE archive (dateTime INTEGER NOT NULL PRIMARY KEY)")
            .execute(&mut conn)
            .await?;
        conn.close().await?;

        let reader = SqliteArchiveReader::new(path.clone());
        let window = TimeWindow { start: 0, stop: 3600 };
        // no barometer column, so the range query fails
        let result = reader.read_range(&window).await;
        assert!(matches!(result, Err(ProcessingError::Storage(_))));

        // the archive is free for a writer once the failed read returns
        let mut writer = SqliteConnection::connect_with(&options).await?;
        sqlx::query("ALTER TABLE archive ADD COLUMN barometer REAL")
            .execute(&mut writer)
            .await?;
        sqlx::query("INSERT INTO archive (dateTime, barometer) VALUES (60, 1013.0)")
            .execute(&mut writer)
            .await?;
        writer.close().await?;

        assert_eq!(reader.read_range(&window).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file() {
        let reader = SqliteArchiveReader::new(PathBuf::from("/nonexistent/weewx.sdb"));
        let result = reader.read_range(&TimeWindow { start: 0, stop: 1 }).await;
        assert!(matches!(
            result,
            Err(ProcessingError::DatabaseMissing { .. })
        ));
    }
}
