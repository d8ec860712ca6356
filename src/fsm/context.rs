//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to: the latest moisture reading, the operator mode, the pump
//! countdown, actuator command outputs and configuration.

use serde::{Deserialize, Serialize};

use crate::config::SystemConfig;

// ---------------------------------------------------------------------------
// Operator-facing enums
// ---------------------------------------------------------------------------

/// Operating mode.  Auto lets low moisture start the pump on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Auto,
    Manual,
}

/// What started the current pump run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PumpTrigger {
    Auto,
    Manual,
}

/// Which timer woke the FSM.  Handlers react only to their own stimulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stimulus {
    /// A fresh moisture sample was taken.
    MoistureSample,
    /// One countdown period elapsed.
    Countdown,
}

/// A pending request to start the pump, consumed by `Active`'s `on_enter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpRequest {
    pub trigger: PumpTrigger,
    pub secs: u16,
}

// ---------------------------------------------------------------------------
// Actuator commands (written by state handlers; consumed by the service)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorCommands {
    /// Desired pump output.
    pub pump_on: bool,
}

impl ActuatorCommands {
    /// Everything off.
    pub fn all_off() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

pub struct FsmContext {
    /// Timer that produced the current tick.
    pub stimulus: Stimulus,

    // -- Inputs --
    /// Latest simulated soil moisture (%).
    pub moisture_percent: f32,
    /// Operator mode.
    pub mode: Mode,
    /// Start request awaiting `Active`'s `on_enter`.
    pub requested: Option<PumpRequest>,

    // -- Pump run --
    /// Whole seconds left on the current run; zero whenever idle.
    pub remaining_secs: u16,
    /// Trigger of the current run, `None` when idle.
    pub trigger: Option<PumpTrigger>,

    // -- Outputs --
    pub commands: ActuatorCommands,

    // -- Configuration --
    pub config: SystemConfig,
}

impl FsmContext {
    /// Create a new context with the given configuration.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            stimulus: Stimulus::MoistureSample,
            moisture_percent: config.initial_moisture_percent,
            mode: config.initial_mode,
            requested: None,
            remaining_secs: 0,
            trigger: None,
            commands: ActuatorCommands::all_off(),
            config,
        }
    }

    /// Whether the auto-trigger rule holds for the current reading.
    pub fn auto_trigger_due(&self) -> bool {
        self.mode == Mode::Auto && self.moisture_percent < self.config.auto_trigger_below_percent
    }
}
