pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::{dms_to_decimal, geodesic_distance, parse_coordinate};
pub use filename::default_residual_csv_path;
pub use progress::ProgressReporter;
