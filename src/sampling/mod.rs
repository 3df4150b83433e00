pub mod controller;
pub mod loop_worker;
pub mod synthesizer;

pub use controller::SamplingController;
pub use synthesizer::{MetricSample, MetricSynthesizer, NoiseSource, RandomNoise};
