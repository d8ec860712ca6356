//! Cooperative runtime: the timer loop behind every page.
//!
//! ```text
//!  advance(ms) ──▶ Scheduler ──▶ EventQueue ──▶ dispatch
//!                                                 │
//!        ┌───────────────┬───────────────┬────────┴──────┬──────────────┐
//!        ▼               ▼               ▼               ▼              ▼
//!   AppService      Dashboard      Conversation   DiseaseDetector   Telemetry
//!   (irrigation)    (env walk)     (chat reply)   (analysis)        (EventSink)
//! ```
//!
//! Time only moves when [`Runtime::advance`] is called, so tests drive the
//! whole system deterministically.  The loop steps from one due timer to
//! the next, keeping timers that share a deadline in arming order.

use log::{debug, info};

use crate::adapters::sim_hw::SimHardware;
use crate::app::commands::AppCommand;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::app::service::AppService;
use crate::chat::{Conversation, SendOutcome};
use crate::config::SystemConfig;
use crate::dashboard::Dashboard;
use crate::detection::{DiseaseDetector, Diagnosis};
use crate::error::{DetectionError, Rejection};
use crate::events::{Event, EventQueue};
use crate::history::History;
use crate::scheduler::{Scheduler, TimerId, TimerKind};

/// Forwards every event to the caller's sink and to the history table.
struct FanOut<'a, S: EventSink> {
    primary: &'a mut S,
    history: &'a mut History,
}

impl<S: EventSink> EventSink for FanOut<'_, S> {
    fn emit(&mut self, event: &AppEvent) {
        self.primary.emit(event);
        self.history.emit(event);
    }
}

pub struct Runtime {
    config: SystemConfig,
    app: AppService,
    hw: SimHardware,
    scheduler: Scheduler,
    queue: EventQueue,
    dashboard: Dashboard,
    conversation: Conversation,
    detector: DiseaseDetector,
    history: History,
    /// Run the countdown timer is currently armed for.
    countdown_run: Option<u32>,
}

impl Runtime {
    pub fn new(config: SystemConfig) -> Self {
        let mut hw = SimHardware::from_config(&config);
        let dashboard = Dashboard::new(hw.sensors().environment.snapshot());
        Self {
            app: AppService::new(config.clone()),
            hw,
            scheduler: Scheduler::new(),
            queue: EventQueue::new(),
            dashboard,
            conversation: Conversation::new(0),
            detector: DiseaseDetector::new(),
            history: History::with_fixtures(),
            countdown_run: None,
            config,
        }
    }

    /// Start the irrigation FSM and arm the periodic timers.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.app.start(&mut FanOut {
            primary: sink,
            history: &mut self.history,
        });

        let periodic = |ms: u32| TimerKind::Periodic {
            interval_ms: u64::from(ms),
        };
        self.scheduler
            .arm(TimerId::MoistureSample, periodic(self.config.moisture_tick_ms));
        self.scheduler
            .arm(TimerId::DashboardRefresh, periodic(self.config.dashboard_refresh_ms));
        if self.config.telemetry_interval_secs > 0 {
            self.scheduler.arm(
                TimerId::Telemetry,
                periodic(self.config.telemetry_interval_secs.saturating_mul(1000)),
            );
        }
        info!("runtime started, {} timer(s) armed", self.scheduler.active_count());
    }

    /// Tear down: clear every timer and switch the pump off.
    pub fn shutdown(&mut self, sink: &mut impl EventSink) {
        self.scheduler.clear();
        self.countdown_run = None;
        self.app.shutdown(
            &mut self.hw,
            &mut FanOut {
                primary: sink,
                history: &mut self.history,
            },
        );
    }

    /// Move simulated time forward, firing timers in deadline order.
    pub fn advance(&mut self, elapsed_ms: u64, sink: &mut impl EventSink) {
        let mut remaining = elapsed_ms;
        while remaining > 0 {
            let step = self
                .scheduler
                .next_due_in()
                .map_or(remaining, |due| due.clamp(1, remaining));
            self.step(step, sink);
            remaining -= step;
        }
    }

    fn step(&mut self, elapsed_ms: u64, sink: &mut impl EventSink) {
        self.app.advance_time(elapsed_ms);
        self.hw.accumulate(elapsed_ms);
        self.scheduler.advance(elapsed_ms, &mut self.queue);
        while let Some(event) = self.queue.pop() {
            self.dispatch(event, sink);
        }
    }

    fn dispatch(&mut self, event: Event, sink: &mut impl EventSink) {
        let mut out = FanOut {
            primary: sink,
            history: &mut self.history,
        };
        match event {
            Event::MoistureTick => self.app.moisture_tick(&mut self.hw, &mut out),
            Event::CountdownTick => self.app.countdown_tick(&mut self.hw, &mut out),
            Event::DashboardRefresh => {
                self.dashboard.refresh(&mut self.hw);
            }
            Event::ChatReplyDue => {
                let now = self.app.now_ms();
                self.conversation.deliver_reply(now, self.hw.sensors().rng());
            }
            Event::AnalysisDue => {
                self.detector.complete();
            }
            Event::TelemetryTick => {
                let telemetry = self.app.build_telemetry(Some(self.hw.pump().water_used_ml()));
                out.emit(&AppEvent::Telemetry(telemetry));
            }
        }
        self.sync_countdown();
    }

    /// Arm the countdown fresh for every new run; cancel it once idle.
    fn sync_countdown(&mut self) {
        match self.app.current_run_id() {
            Some(id) if self.countdown_run != Some(id) => {
                self.scheduler.arm(
                    TimerId::PumpCountdown,
                    TimerKind::Periodic {
                        interval_ms: u64::from(self.config.countdown_tick_ms),
                    },
                );
                self.countdown_run = Some(id);
            }
            None if self.countdown_run.is_some() => {
                self.scheduler.cancel(TimerId::PumpCountdown);
                self.countdown_run = None;
            }
            _ => {}
        }
    }

    // ── Operator actions ──────────────────────────────────────

    pub fn command(&mut self, cmd: AppCommand, sink: &mut impl EventSink) -> Result<(), Rejection> {
        let result = self.app.handle_command(
            cmd,
            &mut self.hw,
            &mut FanOut {
                primary: sink,
                history: &mut self.history,
            },
        );
        self.sync_countdown();
        result
    }

    pub fn send_chat(&mut self, text: &str) -> SendOutcome {
        let now = self.app.now_ms();
        let range = u64::from(self.config.chat_reply_min_ms)..u64::from(self.config.chat_reply_max_ms);
        let outcome = self
            .conversation
            .send(text, now, range, self.hw.sensors().rng());
        if let SendOutcome::Scheduled { delay_ms } = outcome {
            self.scheduler
                .arm(TimerId::ChatReply, TimerKind::OneShot { delay_ms });
        }
        outcome
    }

    pub fn select_image(&mut self, file_name: &str, mime_type: &str) -> Result<(), DetectionError> {
        self.detector.select(file_name, mime_type)
    }

    pub fn analyze(&mut self) -> Result<(), DetectionError> {
        self.detector.analyze()?;
        self.scheduler.arm(
            TimerId::DetectionAnalysis,
            TimerKind::OneShot {
                delay_ms: u64::from(self.config.detection_analysis_ms),
            },
        );
        Ok(())
    }

    pub fn clear_image(&mut self) {
        self.detector.clear();
        if self.scheduler.cancel(TimerId::DetectionAnalysis) {
            debug!("pending analysis cancelled");
        }
    }

    // ── Views ─────────────────────────────────────────────────

    pub fn app(&self) -> &AppService {
        &self.app
    }

    pub fn hardware(&self) -> &SimHardware {
        &self.hw
    }

    /// Direct access to the simulators (tests pin readings through this).
    pub fn hardware_mut(&mut self) -> &mut SimHardware {
        &mut self.hw
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn detector(&self) -> &DiseaseDetector {
        &self.detector
    }

    pub fn diagnosis(&self) -> Option<&Diagnosis> {
        self.detector.result()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_timer_armed(&self, id: TimerId) -> bool {
        self.scheduler.is_armed(id)
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }
}
