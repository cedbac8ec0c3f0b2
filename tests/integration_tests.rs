use baro_pulse::analyzers::PulseAnalyzer;
use baro_pulse::models::ArrivalScope;
use baro_pulse::settings::{DetrendMethod, Settings, StorageSettings};
use baro_pulse::ProcessingError;
use pretty_assertions::assert_eq;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, SqliteConnection};
use std::f64::consts::PI;
use std::path::Path;
use tempfile::TempDir;

/// Write a weewx-shaped archive table holding `rows`.
async fn create_archive(path: &Path, rows: &[(i64, f64)]) {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&options)
        .await
        .expect("Failed to create archive");
    sqlx::query(
        "CREATE TABLE archive (dateTime INTEGER NOT NULL UNIQUE PRIMARY KEY, \
         usUnits INTEGER NOT NULL, interval INTEGER NOT NULL, barometer REAL)",
    )
    .execute(&mut conn)
    .await
    .unwrap();

    let mut tx = conn.begin().await.unwrap();
    for (timestamp, barometer) in rows {
        sqlx::query("INSERT INTO archive VALUES (?, 16, 5, ?)")
            .bind(*timestamp)
            .bind(*barometer)
            .execute(&mut *tx)
            .await
            .unwrap();
    }
    tx.commit().await.unwrap();
    conn.close().await.unwrap();
}

/// Slow synoptic swing plus a half-hour pulse centred on `pulse_at`.
fn synthetic_pressure(timestamp: i64, origin: i64, pulse_at: f64) -> f64 {
    let hours = (timestamp - origin) as f64 / 3600.0;
    let pulse_hours = (timestamp as f64 - pulse_at) / 3600.0;
    1013.0
        + 3.0 * (2.0 * PI * hours / 60.0).sin()
        + 1.5 * (-0.5 * (pulse_hours / 0.5).powi(2)).exp()
}

fn settings_for(dir: &TempDir, archive: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.storage = StorageSettings::Sqlite {
        path: archive.to_path_buf(),
    };
    settings.plot.output = dir.path().join("chart.png");
    settings.plot.show = false;
    settings
}

#[tokio::test]
async fn test_pipeline_recovers_pulse_at_direct_arrival() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let archive = dir.path().join("weewx.sdb");
    let settings = settings_for(&dir, &archive);

    let planner = PulseAnalyzer::new(settings.clone());
    let arrivals = planner.predict();
    let window = planner.select_window(&arrivals).unwrap();

    // five-minute records from a day before the window to a day after
    let rows: Vec<(i64, f64)> = (window.start - 86_400..window.stop + 86_400)
        .step_by(300)
        .map(|t| (t, synthetic_pressure(t, window.start, arrivals.direct)))
        .collect();
    create_archive(&archive, &rows).await;
    let in_window = rows.iter().filter(|(t, _)| window.contains(*t as f64)).count();

    let csv_path = dir.path().join("residual.csv");
    let report = PulseAnalyzer::new(settings)
        .with_csv_output(Some(csv_path.clone()))
        .with_chart(false)
        .silent(true)
        .run()
        .await
        .unwrap();

    assert_eq!(report.window, window);
    assert_eq!(report.sample_count, in_window);
    assert_eq!(report.method, DetrendMethod::Spline);
    assert!(report.chart_path.is_none());

    let (peak_time, peak_value) = report.peak.unwrap();
    assert!(
        (peak_time as f64 - arrivals.direct).abs() <= 1800.0,
        "peak at {} but direct arrival at {}",
        peak_time,
        arrivals.direct
    );
    assert!(peak_value > 1.0);

    let contents = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(contents.lines().count(), in_window + 1);
    assert!(contents.starts_with("timestamp,datetime,pressure,baseline,residual"));
}

#[tokio::test]
async fn test_polynomial_variant_uses_direct_window() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let archive = dir.path().join("weewx.sdb");
    let mut settings = settings_for(&dir, &archive);
    settings.detrend.method = DetrendMethod::Polynomial;
    settings.window.scope = ArrivalScope::Direct;

    let planner = PulseAnalyzer::new(settings.clone());
    let arrivals = planner.predict();
    let window = planner.select_window(&arrivals).unwrap();
    assert!(window.stop as f64 <= arrivals.opposite);

    let rows: Vec<(i64, f64)> = (window.start..window.stop)
        .step_by(300)
        .map(|t| (t, synthetic_pressure(t, window.start, arrivals.direct)))
        .collect();
    create_archive(&archive, &rows).await;

    let report = PulseAnalyzer::new(settings)
        .with_chart(false)
        .silent(true)
        .run()
        .await
        .unwrap();

    assert_eq!(report.method, DetrendMethod::Polynomial);
    assert_eq!(report.sample_count, rows.len());
    let (peak_time, _) = report.peak.unwrap();
    assert!((peak_time as f64 - arrivals.direct).abs() <= 1800.0);
}

#[tokio::test]
async fn test_chart_written_to_configured_path() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let archive = dir.path().join("weewx.sdb");
    let mut settings = settings_for(&dir, &archive);
    settings.plot.output = dir.path().join("plots").join("pulse.png");
    settings.plot.width = 800;
    settings.plot.height = 600;

    let analyzer = PulseAnalyzer::new(settings.clone());
    let arrivals = analyzer.predict();
    let window = analyzer.select_window(&arrivals).unwrap();

    let rows: Vec<(i64, f64)> = (window.start..window.stop)
        .step_by(600)
        .map(|t| (t, synthetic_pressure(t, window.start, arrivals.direct)))
        .collect();
    create_archive(&archive, &rows).await;

    let report = PulseAnalyzer::new(settings.clone())
        .with_chart(true)
        .silent(true)
        .run()
        .await
        .unwrap();

    assert_eq!(report.chart_path.as_ref(), Some(&settings.plot.output));
    let metadata = std::fs::metadata(&settings.plot.output).expect("chart not written");
    assert!(metadata.len() > 0);
}

#[tokio::test]
async fn test_empty_range_aborts_with_no_data() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let archive = dir.path().join("weewx.sdb");
    let settings = settings_for(&dir, &archive);

    // readings from a year earlier only
    let rows: Vec<(i64, f64)> = (0..288)
        .map(|i| (1_610_000_000 + i * 300, 1012.0))
        .collect();
    create_archive(&archive, &rows).await;

    let result = PulseAnalyzer::new(settings)
        .with_chart(false)
        .silent(true)
        .run()
        .await;

    assert!(matches!(result, Err(ProcessingError::NoData { .. })));
}

#[tokio::test]
async fn test_coarse_smoothing_fails_before_query() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    // never created: reaching the reader would report DatabaseMissing instead
    let archive = dir.path().join("missing.sdb");
    let mut settings = settings_for(&dir, &archive);
    settings.detrend.smoothing_hours = 100.0;

    let result = PulseAnalyzer::new(settings).silent(true).run().await;

    match result {
        Err(ProcessingError::InvalidParameter { parameter, message }) => {
            assert_eq!(parameter, "detrend.smoothing_hours");
            assert!(message.contains("hours or less"));
        }
        other => panic!("expected a smoothing error, got {:?}", other.map(|r| r.window)),
    }
    assert!(!archive.exists());
}

#[tokio::test]
async fn test_missing_archive_is_reported() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let archive = dir.path().join("missing.sdb");
    let result = PulseAnalyzer::new(settings_for(&dir, &archive))
        .silent(true)
        .run()
        .await;

    assert!(matches!(
        result,
        Err(ProcessingError::DatabaseMissing { .. })
    ));
}
