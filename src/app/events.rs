//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log lines, a history table, a test
//! recorder.

use serde::Serialize;

use crate::error::Rejection;
use crate::fsm::StateId;
use crate::fsm::context::{Mode, PumpTrigger};
use crate::sensors::moisture::MoistureStatus;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// The pump was switched on for `secs` seconds.
    PumpStarted { trigger: PumpTrigger, secs: u16 },

    /// A pump run ended (countdown expired or operator stop).
    PumpFinished(WateringRun),

    /// The operator switched mode.
    ModeChanged(Mode),

    /// An operator command was refused.
    CommandRejected(Rejection),

    /// The application service has started (carries initial state).
    Started(StateId),
}

/// How a pump run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunOutcome {
    /// The countdown reached zero.
    Completed,
    /// The operator stopped the pump early.
    Stopped,
}

/// One finished pump run, as kept in the watering log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WateringRun {
    pub id: u32,
    pub trigger: PumpTrigger,
    /// Simulation time of activation (ms since start).
    pub started_at_ms: u64,
    /// Countdown periods the pump actually ran.
    pub run_secs: u16,
    pub moisture_before: f32,
    pub moisture_after: f32,
    pub outcome: RunOutcome,
}

/// A point-in-time telemetry snapshot suitable for logging or display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryData {
    pub state: StateId,
    pub moisture_percent: f32,
    pub status: MoistureStatus,
    pub mode: Mode,
    pub remaining_secs: u16,
    /// Simulation time of the most recent activation, `None` before the first.
    pub last_watering_ms: Option<u64>,
    pub activations: u32,
    /// Estimated water delivered, when the pump adapter can tell.
    pub water_used_ml: Option<u64>,
}
