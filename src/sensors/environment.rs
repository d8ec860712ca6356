//! Dashboard environment readings: soil moisture, air temperature,
//! humidity and an overall plant-health score, each a bounded walk.

use rand::Rng;
use serde::Serialize;

use super::BoundedWalk;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnvironmentSnapshot {
    pub soil_moisture_percent: f32,
    pub temperature_c: f32,
    pub humidity_percent: f32,
    pub plant_health_percent: f32,
}

pub struct EnvironmentSensors {
    soil: BoundedWalk,
    temperature: BoundedWalk,
    humidity: BoundedWalk,
    health: BoundedWalk,
}

impl Default for EnvironmentSensors {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentSensors {
    pub fn new() -> Self {
        Self {
            soil: BoundedWalk::new(65.0, 20.0, 100.0, 2.0),
            temperature: BoundedWalk::new(22.0, 18.0, 28.0, 1.0),
            humidity: BoundedWalk::new(58.0, 40.0, 80.0, 1.5),
            health: BoundedWalk::new(92.0, 80.0, 100.0, 0.5),
        }
    }

    pub fn sample(&mut self, rng: &mut impl Rng) -> EnvironmentSnapshot {
        self.soil.sample(rng);
        self.temperature.sample(rng);
        self.humidity.sample(rng);
        self.health.sample(rng);
        self.snapshot()
    }

    pub fn snapshot(&self) -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            soil_moisture_percent: self.soil.value(),
            temperature_c: self.temperature.value(),
            humidity_percent: self.humidity.value(),
            plant_health_percent: self.health.value(),
        }
    }
}
