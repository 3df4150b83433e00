use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};

const FOCUS_BASE: f64 = 85.0;
const FOCUS_AMPLITUDE: f64 = 10.0;
const FOCUS_PERIOD_DIVISOR: f64 = 60.0;
const FOCUS_NOISE_STD_DEV: f64 = 5.0;
pub const FOCUS_MIN: f64 = 20.0;

const PRODUCTIVITY_BASE: f64 = 88.0;
const PRODUCTIVITY_AMPLITUDE: f64 = 8.0;
const PRODUCTIVITY_PERIOD_DIVISOR: f64 = 45.0;
const PRODUCTIVITY_NOISE_STD_DEV: f64 = 4.0;
pub const PRODUCTIVITY_MIN: f64 = 30.0;

pub const SCORE_MAX: f64 = 100.0;

/// Typing and mouse bursts are drawn from these half-open ranges.
const TYPING_BURST: (u32, u32) = (5, 15);
const MOUSE_BURST: (u32, u32) = (2, 8);

/// Randomness used by the synthesizer. Swappable so tests can pin the sequence.
pub trait NoiseSource: Send + 'static {
    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64;

    /// Uniform integer in `low..high`.
    fn int_range(&mut self, low: u32, high: u32) -> u32;
}

pub struct RandomNoise {
    rng: StdRng,
}

impl RandomNoise {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl NoiseSource for RandomNoise {
    /// NaN for an invalid standard deviation, which the synthesizer rejects.
    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        match Normal::new(mean, std_dev) {
            Ok(normal) => normal.sample(&mut self.rng),
            Err(_) => f64::NAN,
        }
    }

    fn int_range(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..high)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    pub focus: f64,
    pub productivity: f64,
}

/// Maps elapsed session time to a bounded (focus, productivity) pair.
///
/// Focus oscillates around 85 with a ~6.3 minute period and productivity around
/// 88 with a ~4.7 minute period, each with gaussian noise, then clamped.
pub struct MetricSynthesizer {
    noise: Box<dyn NoiseSource>,
}

impl MetricSynthesizer {
    pub fn new(noise: impl NoiseSource) -> Self {
        Self {
            noise: Box::new(noise),
        }
    }

    pub fn with_entropy() -> Self {
        Self::new(RandomNoise::new())
    }

    pub fn sample(&mut self, elapsed_secs: f64) -> TrackerResult<MetricSample> {
        if !elapsed_secs.is_finite() || elapsed_secs < 0.0 {
            return Err(TrackerError::Synthesis(format!(
                "elapsed time must be a non-negative finite number, got {elapsed_secs}"
            )));
        }

        let focus_noise = self.noise.gaussian(0.0, FOCUS_NOISE_STD_DEV);
        let productivity_noise = self.noise.gaussian(0.0, PRODUCTIVITY_NOISE_STD_DEV);

        let focus = FOCUS_BASE + FOCUS_AMPLITUDE * (elapsed_secs / FOCUS_PERIOD_DIVISOR).sin() + focus_noise;
        let productivity = PRODUCTIVITY_BASE
            + PRODUCTIVITY_AMPLITUDE * (elapsed_secs / PRODUCTIVITY_PERIOD_DIVISOR).cos()
            + productivity_noise;

        if !focus.is_finite() || !productivity.is_finite() {
            return Err(TrackerError::Synthesis(format!(
                "non-finite sample at {elapsed_secs}s (focus={focus}, productivity={productivity})"
            )));
        }

        Ok(MetricSample {
            focus: focus.clamp(FOCUS_MIN, SCORE_MAX),
            productivity: productivity.clamp(PRODUCTIVITY_MIN, SCORE_MAX),
        })
    }

    /// Draws one (typing, mouse) activity burst.
    pub fn activity_burst(&mut self) -> (u32, u32) {
        let typing = self.noise.int_range(TYPING_BURST.0, TYPING_BURST.1);
        let mouse = self.noise.int_range(MOUSE_BURST.0, MOUSE_BURST.1);
        (typing, mouse)
    }
}
