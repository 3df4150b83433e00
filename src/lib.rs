pub mod analytics;
pub mod db;
pub mod error;
pub mod export;
pub mod live;
pub mod metrics;
pub mod sampling;
pub mod settings;
pub mod tracker;
pub mod utils;

pub use db::{Database, FocusSession, SeedMode};
pub use error::{TrackerError, TrackerResult};
pub use live::{LiveSessionSnapshot, SlidingWindowBuffer};
pub use sampling::{MetricSample, MetricSynthesizer, NoiseSource, RandomNoise};
pub use settings::{Settings, SettingsStore};
pub use tracker::{EngineConfig, SummarySink, TrackerSnapshot, TrackerStatus, TrackingEngine};
pub use utils::logging::init_logging;
