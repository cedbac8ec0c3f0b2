pub mod chart_writer;
pub mod csv_writer;

pub use chart_writer::{open_in_viewer, ChartWriter, PulseChart};
pub use csv_writer::CsvWriter;
