pub mod arrival_calculator;
pub mod bspline;
pub mod detrender;
pub mod knots;
pub mod polynomial;
pub mod window_selector;

pub use arrival_calculator::ArrivalCalculator;
pub use detrender::{Baseline, Detrended, Detrender};
pub use knots::KnotPlan;
pub use window_selector::WindowSelector;
