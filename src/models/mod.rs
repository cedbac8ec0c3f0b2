pub mod arrival;
pub mod event;
pub mod location;
pub mod series;
pub mod window;

pub use arrival::{ArrivalKind, ArrivalSet};
pub use event::PulseEvent;
pub use location::{GeoPoint, Observer};
pub use series::{PressureSample, ResidualSeries, SampleSeries};
pub use window::{ArrivalScope, TimeWindow};
