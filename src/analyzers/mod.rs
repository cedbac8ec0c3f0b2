pub mod pulse_analyzer;

pub use pulse_analyzer::{PulseAnalyzer, PulseReport};
