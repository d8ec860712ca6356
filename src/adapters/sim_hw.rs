//! Simulated hardware behind the sensor and actuator ports.
//!
//! Owns the [`SensorHub`] and the [`PumpDriver`], exposing them through
//! [`SensorPort`] and [`ActuatorPort`].  This is the only module that
//! touches the simulated peripherals directly.

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::config::SystemConfig;
use crate::drivers::pump::PumpDriver;
use crate::sensors::SensorHub;
use crate::sensors::environment::EnvironmentSnapshot;

/// Concrete adapter that combines the simulators behind port traits.
pub struct SimHardware {
    sensor_hub: SensorHub,
    pump: PumpDriver,
}

impl SimHardware {
    pub fn new(sensor_hub: SensorHub, pump: PumpDriver) -> Self {
        Self { sensor_hub, pump }
    }

    /// Build from configuration with a default pump.
    pub fn from_config(config: &SystemConfig) -> Self {
        Self::new(SensorHub::new(config), PumpDriver::new())
    }

    pub fn sensors(&mut self) -> &mut SensorHub {
        &mut self.sensor_hub
    }

    pub fn pump(&self) -> &PumpDriver {
        &self.pump
    }

    /// Account pump run time for the water-usage estimate.
    pub fn accumulate(&mut self, elapsed_ms: u64) {
        self.pump.accumulate(elapsed_ms);
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for SimHardware {
    fn read_moisture(&mut self) -> f32 {
        self.sensor_hub.read_moisture()
    }

    fn read_environment(&mut self) -> EnvironmentSnapshot {
        self.sensor_hub.read_environment()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for SimHardware {
    fn start_pump(&mut self) {
        self.pump.start();
    }

    fn stop_pump(&mut self) {
        self.pump.stop();
    }

    fn is_pump_on(&self) -> bool {
        self.pump.is_running()
    }

    fn all_off(&mut self) {
        self.pump.stop();
    }
}
