//! Timer-driven event queue.
//!
//! Events are produced by the scheduler delegate when a timer fires and
//! consumed by the main loop in FIFO order.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Scheduler   │────▶│  Event Queue │────▶│  Main Loop   │
//! │ (delegate)  │     │  (bounded)   │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use heapless::Deque;
use log::warn;

use crate::app::ports::SchedulerDelegate;
use crate::scheduler::TimerId;

/// Maximum number of pending events.
const EVENT_QUEUE_CAP: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Irrigation moisture sample is due.
    MoistureTick,
    /// One pump countdown period elapsed.
    CountdownTick,
    /// Dashboard environment refresh is due.
    DashboardRefresh,
    /// The chatbot finished "thinking".
    ChatReplyDue,
    /// The mock disease analysis finished.
    AnalysisDue,
    /// Telemetry report timer fired.
    TelemetryTick,
}

impl From<TimerId> for Event {
    fn from(id: TimerId) -> Self {
        match id {
            TimerId::MoistureSample => Self::MoistureTick,
            TimerId::PumpCountdown => Self::CountdownTick,
            TimerId::DashboardRefresh => Self::DashboardRefresh,
            TimerId::ChatReply => Self::ChatReplyDue,
            TimerId::DetectionAnalysis => Self::AnalysisDue,
            TimerId::Telemetry => Self::TelemetryTick,
        }
    }
}

/// Bounded FIFO owned by the loop thread.
#[derive(Default)]
pub struct EventQueue {
    inner: Deque<Event, EVENT_QUEUE_CAP>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { inner: Deque::new() }
    }

    /// Returns `false` if the queue is full (event dropped).
    pub fn push(&mut self, event: Event) -> bool {
        if self.inner.push_back(event).is_err() {
            warn!("event queue full, dropping {:?}", event);
            return false;
        }
        true
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.inner.pop_front()
    }

    /// Drain all pending events into a callback, in FIFO order.
    pub fn drain(&mut self, mut handler: impl FnMut(Event)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

// Bridges the scheduler (which knows nothing about events) to the queue.
impl SchedulerDelegate for EventQueue {
    fn on_timer_fired(&mut self, id: TimerId) {
        self.push(Event::from(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let mut q = EventQueue::new();
        q.push(Event::MoistureTick);
        q.push(Event::CountdownTick);
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop(), Some(Event::MoistureTick));
        assert_eq!(q.pop(), Some(Event::CountdownTick));
        assert!(q.is_empty());
    }

    #[test]
    fn full_queue_drops() {
        let mut q = EventQueue::new();
        for _ in 0..EVENT_QUEUE_CAP {
            assert!(q.push(Event::TelemetryTick));
        }
        assert!(!q.push(Event::TelemetryTick));
        assert_eq!(q.len(), EVENT_QUEUE_CAP);
    }

    #[test]
    fn delegate_maps_timer_ids() {
        let mut q = EventQueue::new();
        q.on_timer_fired(TimerId::PumpCountdown);
        q.on_timer_fired(TimerId::DetectionAnalysis);
        let mut seen = Vec::new();
        q.drain(|e| seen.push(e));
        assert_eq!(seen, vec![Event::CountdownTick, Event::AnalysisDue]);
    }
}
