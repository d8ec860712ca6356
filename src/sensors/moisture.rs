//! Simulated soil moisture probe for the irrigation loop.
//!
//! No watering response is modelled: the pump running does not raise the
//! reading.  The walk alone decides when auto mode fires.

use rand::Rng;
use serde::Serialize;

use super::BoundedWalk;
use crate::config::SystemConfig;

/// Display band for a moisture percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoistureStatus {
    Low,
    Moderate,
    Good,
}

impl MoistureStatus {
    pub fn classify(percent: f32) -> Self {
        if percent < 30.0 {
            Self::Low
        } else if percent < 60.0 {
            Self::Moderate
        } else {
            Self::Good
        }
    }
}

pub struct SoilMoistureSensor {
    walk: BoundedWalk,
}

impl SoilMoistureSensor {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            walk: BoundedWalk::new(
                config.initial_moisture_percent,
                config.moisture_min_percent,
                config.moisture_max_percent,
                config.moisture_step_percent,
            ),
        }
    }

    pub fn sample(&mut self, rng: &mut impl Rng) -> f32 {
        self.walk.sample(rng)
    }

    /// Test hook: force the reading (still clamped).
    pub fn set(&mut self, percent: f32) -> f32 {
        let delta = percent - self.walk.value();
        self.walk.apply(delta)
    }

    pub fn last(&self) -> f32 {
        self.walk.value()
    }
}
