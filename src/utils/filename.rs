use std::path::{Path, PathBuf};

/// Residual export path next to the chart: `hunga_tonga.png` becomes
/// `hunga_tonga-residual.csv`.
pub fn default_residual_csv_path(chart_path: &Path) -> PathBuf {
    let stem = chart_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pressure".to_string());

    chart_path.with_file_name(format!("{}-residual.csv", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_residual_csv_path() {
        let path = default_residual_csv_path(Path::new("./hunga_tonga.png"));
        assert_eq!(path, PathBuf::from("./hunga_tonga-residual.csv"));

        let nested = default_residual_csv_path(Path::new("output/charts/event.png"));
        assert_eq!(nested, PathBuf::from("output/charts/event-residual.csv"));
    }
}
