//! Timer/scheduler engine.
//!
//! Replaces browser `setInterval` / `setTimeout` with explicit slots
//! advanced by elapsed milliseconds.  The scheduler notifies a
//! [`SchedulerDelegate`] when timers fire; the main loop implements the
//! delegate to push events into its queue.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Timer slots                              │
//! │                                                              │
//! │  ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌──────────┐   │
//! │  │ Moisture  │  │ Countdown │  │ Dashboard │  │ One-Shot │   │
//! │  │ (2 s)     │  │ (1 s)     │  │ (3 s)     │  │ (chat..) │   │
//! │  └─────┬─────┘  └─────┬─────┘  └─────┬─────┘  └─────┬────┘   │
//! │        ▼              ▼              ▼              ▼        │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              SchedulerDelegate                         │  │
//! │  └───────────────────────┬────────────────────────────────┘  │
//! │                          ▼                                   │
//! │                    Runtime event loop                        │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use crate::app::ports::SchedulerDelegate;
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════
//  Timer types
// ═══════════════════════════════════════════════════════════════

/// Identity of every timer in the system.  At most one slot per id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    MoistureSample,
    PumpCountdown,
    DashboardRefresh,
    ChatReply,
    DetectionAnalysis,
    Telemetry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fire every `interval_ms`, forever.
    Periodic { interval_ms: u64 },
    /// Fire once after `delay_ms`, then free the slot.
    OneShot { delay_ms: u64 },
}

impl TimerKind {
    fn period(self) -> u64 {
        match self {
            Self::Periodic { interval_ms } => interval_ms,
            Self::OneShot { delay_ms } => delay_ms,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Maximum number of concurrent timers (stack-allocated).
const MAX_TIMERS: usize = 8;

#[derive(Debug, Clone, Copy)]
struct TimerEntry {
    id: TimerId,
    kind: TimerKind,
    /// Milliseconds since the last fire (or since arming).
    elapsed_ms: u64,
}

impl TimerEntry {
    fn due_in(&self) -> u64 {
        self.kind.period().saturating_sub(self.elapsed_ms)
    }
}

pub struct Scheduler {
    slots: [Option<TimerEntry>; MAX_TIMERS],
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            slots: [None; MAX_TIMERS],
        }
    }

    /// Arm a timer.  An existing timer with the same id is replaced, which
    /// restarts its phase.  Returns the slot index, or `None` if full.
    pub fn arm(&mut self, id: TimerId, kind: TimerKind) -> Option<usize> {
        debug_assert!(kind.period() > 0, "zero-length timer {id:?}");
        let slot = self
            .slots
            .iter()
            .position(|s| s.is_some_and(|e| e.id == id))
            .or_else(|| self.slots.iter().position(Option::is_none))?;

        debug!("Scheduler: armed {:?} ({:?}) at slot {}", id, kind, slot);
        self.slots[slot] = Some(TimerEntry {
            id,
            kind,
            elapsed_ms: 0,
        });
        Some(slot)
    }

    /// Disarm a timer.  Returns whether it was armed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        for slot in &mut self.slots {
            if slot.is_some_and(|e| e.id == id) {
                debug!("Scheduler: cancelled {:?}", id);
                *slot = None;
                return true;
            }
        }
        false
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.slots.iter().flatten().any(|e| e.id == id)
    }

    /// Drop every timer (the view was torn down).
    pub fn clear(&mut self) {
        info!("Scheduler: clearing {} timer(s)", self.active_count());
        self.slots = [None; MAX_TIMERS];
    }

    /// Milliseconds until the earliest timer fires, `None` if none are armed.
    pub fn next_due_in(&self) -> Option<u64> {
        self.slots.iter().flatten().map(TimerEntry::due_in).min()
    }

    /// Advance every timer by `elapsed_ms`.
    ///
    /// Timers fire in slot order.  A periodic timer whose interval fits
    /// more than once into `elapsed_ms` fires once per interval; callers
    /// that need strict interleaving between timers step by
    /// [`next_due_in`](Self::next_due_in) instead.
    pub fn advance(&mut self, elapsed_ms: u64, delegate: &mut dyn SchedulerDelegate) {
        for slot in &mut self.slots {
            let Some(entry) = slot else { continue };

            entry.elapsed_ms += elapsed_ms;

            match entry.kind {
                TimerKind::Periodic { interval_ms } => {
                    while entry.elapsed_ms >= interval_ms {
                        entry.elapsed_ms -= interval_ms;
                        delegate.on_timer_fired(entry.id);
                    }
                }
                TimerKind::OneShot { delay_ms } => {
                    if entry.elapsed_ms >= delay_ms {
                        let id = entry.id;
                        *slot = None;
                        delegate.on_timer_fired(id);
                    }
                }
            }
        }
    }

    /// Number of armed timers.
    pub fn active_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
