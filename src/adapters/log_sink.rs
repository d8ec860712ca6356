//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (stderr via `env_logger` in the console binary).
//! The history view and the test recorder implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] as a one-line record.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | state={:?} | moisture={:.1}% ({:?}) | mode={:?} | \
                     remaining={}s | last_watering={} | activations={} | water={}",
                    t.state,
                    t.moisture_percent,
                    t.status,
                    t.mode,
                    t.remaining_secs,
                    t.last_watering_ms
                        .map_or_else(|| "never".to_string(), |ms| format!("{:.1}s", ms as f64 / 1000.0)),
                    t.activations,
                    t.water_used_ml
                        .map_or_else(|| "n/a".to_string(), |ml| format!("{ml}mL")),
                );
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::PumpStarted { trigger, secs } => {
                info!("PUMP  | on ({:?}) for {}s", trigger, secs);
            }
            AppEvent::PumpFinished(run) => {
                info!(
                    "PUMP  | off after {}s ({:?}) | run #{} | moisture {:.1}% -> {:.1}%",
                    run.run_secs, run.outcome, run.id, run.moisture_before, run.moisture_after
                );
            }
            AppEvent::ModeChanged(mode) => {
                info!("MODE  | {:?}", mode);
            }
            AppEvent::CommandRejected(reason) => {
                warn!("CMD   | rejected: {}", reason);
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
        }
    }
}
