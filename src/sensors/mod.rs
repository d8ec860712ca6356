//! Simulated sensors and the [`SensorHub`] that owns them.
//!
//! Every simulated reading is a [`BoundedWalk`]: a value nudged by a
//! uniform random delta each sample and clamped to its physical range.
//! The hub owns the walks plus the RNG that drives them.

pub mod environment;
pub mod moisture;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use environment::{EnvironmentSensors, EnvironmentSnapshot};
use moisture::SoilMoistureSensor;

use crate::config::SystemConfig;

/// A reading that drifts by at most `step` per sample within `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedWalk {
    value: f32,
    min: f32,
    max: f32,
    step: f32,
}

impl BoundedWalk {
    /// `initial` is clamped into range.
    pub fn new(initial: f32, min: f32, max: f32, step: f32) -> Self {
        debug_assert!(min <= max, "inverted bounds {min}..{max}");
        Self {
            value: initial.clamp(min, max),
            min,
            max,
            step: step.abs(),
        }
    }

    /// Draw a delta uniformly from `[-step, step]` and apply it.
    pub fn sample(&mut self, rng: &mut impl Rng) -> f32 {
        let delta = if self.step > 0.0 {
            rng.gen_range(-self.step..=self.step)
        } else {
            0.0
        };
        self.apply(delta)
    }

    /// Apply an explicit delta and clamp.
    pub fn apply(&mut self, delta: f32) -> f32 {
        self.value = (self.value + delta).clamp(self.min, self.max);
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

/// Aggregates the simulated sensors and the RNG that drives them.
pub struct SensorHub {
    pub soil: SoilMoistureSensor,
    pub environment: EnvironmentSensors,
    rng: StdRng,
}

impl SensorHub {
    /// Seeded from `config.rng_seed` when set, from OS entropy otherwise.
    pub fn new(config: &SystemConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            soil: SoilMoistureSensor::new(config),
            environment: EnvironmentSensors::new(),
            rng,
        }
    }

    /// Take one irrigation moisture sample (%).
    pub fn read_moisture(&mut self) -> f32 {
        self.soil.sample(&mut self.rng)
    }

    /// Refresh every dashboard reading.
    pub fn read_environment(&mut self) -> EnvironmentSnapshot {
        self.environment.sample(&mut self.rng)
    }

    /// Shared RNG for other simulated services (chatbot delays, fallbacks).
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}
