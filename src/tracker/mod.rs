pub mod controller;
pub mod state;
pub mod summary;

pub use controller::{EngineConfig, SummarySink, TrackingEngine};
pub use state::{TrackerSnapshot, TrackerStatus};
