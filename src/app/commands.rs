//! Inbound commands to the application service.
//!
//! These represent operator actions (console, tests) that the
//! [`AppService`](super::service::AppService) interprets and acts upon.

use crate::fsm::context::Mode;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Switch between Auto and Manual.  Never stops a running pump.
    SetMode(Mode),

    /// Manual pump start.  Refused unless Idle and in Manual mode.
    StartWatering,

    /// Stop the pump now.  Accepted in any state.
    StopPump,
}
