//! Irrigation application service.
//!
//! [`AppService`] owns the FSM, the shared context and the watering log.
//! It exposes a clean, simulator-agnostic API.  All I/O flows through
//! port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │      AppService        │
//! ActuatorPort ◀──│  FSM · Watering log    │
//!                 └────────────────────────┘
//! ```

use heapless::HistoryBuffer;
use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::error::Rejection;
use crate::fsm::context::{FsmContext, Mode, PumpRequest, PumpTrigger, Stimulus};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::sensors::moisture::MoistureStatus;

use super::commands::AppCommand;
use super::events::{AppEvent, RunOutcome, TelemetryData, WateringRun};
use super::ports::{ActuatorPort, EventSink, SensorPort};

/// Finished runs kept in memory; the oldest fall off.
pub const WATERING_LOG_CAP: usize = 32;

/// Bookkeeping for the run currently in progress.
#[derive(Debug, Clone, Copy)]
struct RunInProgress {
    id: u32,
    trigger: PumpTrigger,
    started_at_ms: u64,
    elapsed_secs: u16,
    moisture_before: f32,
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all irrigation logic.
pub struct AppService {
    fsm: Fsm,
    ctx: FsmContext,
    log: HistoryBuffer<WateringRun, WATERING_LOG_CAP>,
    run: Option<RunInProgress>,
    /// Simulation clock, advanced by the runtime.
    now_ms: u64,
    next_run_id: u32,
    activations: u32,
    last_watering_ms: Option<u64>,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let ctx = FsmContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Idle);

        Self {
            fsm,
            ctx,
            log: HistoryBuffer::new(),
            run: None,
            now_ms: 0,
            next_run_id: 1,
            activations: 0,
            last_watering_ms: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in its initial state (Idle).
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!(
            "AppService started in {:?} ({:?} mode, moisture {:.1}%)",
            self.fsm.current_state(),
            self.ctx.mode,
            self.ctx.moisture_percent
        );
    }

    /// Stop any running pump and switch every actuator off.
    pub fn shutdown(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        if self.fsm.current_state() == StateId::Active {
            self.fsm.force_transition(StateId::Idle, &mut self.ctx);
            self.after_step(StateId::Active, RunOutcome::Stopped, hw, sink);
        }
        hw.all_off();
        info!("AppService shut down");
    }

    /// Move the simulation clock forward.
    pub fn advance_time(&mut self, elapsed_ms: u64) {
        self.now_ms += elapsed_ms;
    }

    // ── Timer handlers ────────────────────────────────────────

    /// Moisture timer fired: sample, then let the FSM apply the auto rule.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], so one adapter serves both without a double
    /// mutable borrow.
    pub fn moisture_tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        let prev = self.fsm.current_state();
        self.ctx.moisture_percent = hw.read_moisture();
        debug!("moisture {:.1}%", self.ctx.moisture_percent);

        self.fsm.tick(Stimulus::MoistureSample, &mut self.ctx);
        self.after_step(prev, RunOutcome::Completed, hw, sink);
    }

    /// Countdown timer fired.  Ignored unless the pump is running.
    pub fn countdown_tick(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        let prev = self.fsm.current_state();
        if prev != StateId::Active {
            debug!("countdown tick while {:?}, ignored", prev);
            return;
        }
        if let Some(run) = self.run.as_mut() {
            run.elapsed_secs = run.elapsed_secs.saturating_add(1);
        }

        self.fsm.tick(Stimulus::Countdown, &mut self.ctx);
        self.after_step(prev, RunOutcome::Completed, hw, sink);
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an operator command.  Refusals are also emitted as
    /// [`AppEvent::CommandRejected`].
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Result<(), Rejection> {
        let prev = self.fsm.current_state();
        match cmd {
            AppCommand::SetMode(mode) => {
                if mode != self.ctx.mode {
                    self.ctx.mode = mode;
                    info!("mode set to {:?}", mode);
                    sink.emit(&AppEvent::ModeChanged(mode));
                }
                Ok(())
            }
            AppCommand::StartWatering => {
                let refusal = if prev == StateId::Active {
                    Some(Rejection::PumpBusy)
                } else if self.ctx.mode == Mode::Auto {
                    Some(Rejection::AutoModeActive)
                } else {
                    None
                };
                if let Some(r) = refusal {
                    warn!("manual start refused: {}", r);
                    sink.emit(&AppEvent::CommandRejected(r));
                    return Err(r);
                }

                self.ctx.requested = Some(PumpRequest {
                    trigger: PumpTrigger::Manual,
                    secs: self.ctx.config.manual_pump_secs,
                });
                self.fsm.force_transition(StateId::Active, &mut self.ctx);
                self.after_step(prev, RunOutcome::Completed, hw, sink);
                Ok(())
            }
            AppCommand::StopPump => {
                if prev == StateId::Active {
                    info!("operator stop");
                    self.fsm.force_transition(StateId::Idle, &mut self.ctx);
                    self.after_step(prev, RunOutcome::Stopped, hw, sink);
                }
                Ok(())
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current context.
    /// `water_used_ml`: delivered volume when the pump adapter tracks it.
    pub fn build_telemetry(&self, water_used_ml: Option<u64>) -> TelemetryData {
        TelemetryData {
            state: self.fsm.current_state(),
            moisture_percent: self.ctx.moisture_percent,
            status: self.moisture_status(),
            mode: self.ctx.mode,
            remaining_secs: self.ctx.remaining_secs,
            last_watering_ms: self.last_watering_ms,
            activations: self.activations,
            water_used_ml,
        }
    }

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn mode(&self) -> Mode {
        self.ctx.mode
    }

    pub fn moisture_percent(&self) -> f32 {
        self.ctx.moisture_percent
    }

    pub fn moisture_status(&self) -> MoistureStatus {
        MoistureStatus::classify(self.ctx.moisture_percent)
    }

    /// Whole seconds left on the current run; zero when idle.
    pub fn remaining_secs(&self) -> u16 {
        self.ctx.remaining_secs
    }

    /// Trigger of the current run, `None` when idle.
    pub fn trigger(&self) -> Option<PumpTrigger> {
        self.ctx.trigger
    }

    /// Identity of the run in progress, if any.
    pub fn current_run_id(&self) -> Option<u32> {
        self.run.map(|r| r.id)
    }

    pub fn last_watering_ms(&self) -> Option<u64> {
        self.last_watering_ms
    }

    /// Total pump activations since startup.
    pub fn activations(&self) -> u32 {
        self.activations
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Finished runs, oldest first.
    pub fn watering_log(&self) -> impl Iterator<Item = &WateringRun> {
        self.log.oldest_ordered()
    }

    // ── Internal ──────────────────────────────────────────────

    /// Apply actuator commands and report whatever the FSM just did.
    fn after_step(
        &mut self,
        prev: StateId,
        outcome: RunOutcome,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        self.apply_actuators(hw);

        let next = self.fsm.current_state();
        if next == prev {
            return;
        }
        sink.emit(&AppEvent::StateChanged {
            from: prev,
            to: next,
        });

        match next {
            StateId::Active => self.begin_run(sink),
            StateId::Idle => self.finish_run(outcome, sink),
        }
    }

    fn begin_run(&mut self, sink: &mut impl EventSink) {
        let trigger = self.ctx.trigger.unwrap_or(PumpTrigger::Manual);
        let run = RunInProgress {
            id: self.next_run_id,
            trigger,
            started_at_ms: self.now_ms,
            elapsed_secs: 0,
            moisture_before: self.ctx.moisture_percent,
        };
        self.next_run_id += 1;
        self.activations += 1;
        self.last_watering_ms = Some(self.now_ms);
        self.run = Some(run);

        sink.emit(&AppEvent::PumpStarted {
            trigger,
            secs: self.ctx.remaining_secs,
        });
    }

    fn finish_run(&mut self, outcome: RunOutcome, sink: &mut impl EventSink) {
        let Some(run) = self.run.take() else {
            return;
        };
        let record = WateringRun {
            id: run.id,
            trigger: run.trigger,
            started_at_ms: run.started_at_ms,
            run_secs: run.elapsed_secs,
            moisture_before: run.moisture_before,
            moisture_after: self.ctx.moisture_percent,
            outcome,
        };
        self.log.write(record);
        sink.emit(&AppEvent::PumpFinished(record));
    }

    /// Translate FSM actuator commands into port calls.
    fn apply_actuators(&self, hw: &mut impl ActuatorPort) {
        match (self.ctx.commands.pump_on, hw.is_pump_on()) {
            (true, false) => hw.start_pump(),
            (false, true) => hw.stop_pump(),
            _ => {}
        }
    }
}
