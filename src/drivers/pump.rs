//! Simulated irrigation pump actuator.
//!
//! A dumb on/off actuator: the FSM decides when it runs, this driver
//! only tracks its output and keeps activation statistics for the
//! status card ("daily usage").
//!
//! ## Safety contract
//!
//! `start` is idempotent: restarting a running pump does not count as a
//! second activation.

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    Stopped,
    Running,
}

pub struct PumpDriver {
    state: PumpState,
    activations: u32,
    /// Simulated flow rate used for the water-usage estimate.
    flow_ml_per_sec: u32,
    run_ms: u64,
}

impl Default for PumpDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl PumpDriver {
    /// ~2 L/min, a small garden pump.
    pub const DEFAULT_FLOW_ML_PER_SEC: u32 = 35;

    pub fn new() -> Self {
        Self::with_flow(Self::DEFAULT_FLOW_ML_PER_SEC)
    }

    pub fn with_flow(flow_ml_per_sec: u32) -> Self {
        Self {
            state: PumpState::Stopped,
            activations: 0,
            flow_ml_per_sec,
            run_ms: 0,
        }
    }

    pub fn start(&mut self) {
        if self.state == PumpState::Running {
            return;
        }
        self.state = PumpState::Running;
        self.activations += 1;
        debug!("pump: on (activation #{})", self.activations);
    }

    pub fn stop(&mut self) {
        if self.state == PumpState::Stopped {
            return;
        }
        self.state = PumpState::Stopped;
        debug!("pump: off");
    }

    /// Account run time.  Call from the loop with the elapsed interval.
    pub fn accumulate(&mut self, elapsed_ms: u64) {
        if self.is_running() {
            self.run_ms += elapsed_ms;
        }
    }

    pub fn state(&self) -> PumpState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PumpState::Running
    }

    pub fn activations(&self) -> u32 {
        self.activations
    }

    /// Estimated water delivered so far, in millilitres.
    pub fn water_used_ml(&self) -> u64 {
        self.run_ms * u64::from(self.flow_ml_per_sec) / 1000
    }
}
