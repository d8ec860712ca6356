//! Pump state machine driven by a table of plain function pointers.
//!
//! ```text
//!   stimulus ──▶ table[current].on_update(ctx) ──▶ Some(next)?
//!                                                    │
//!                       table[current].on_exit(ctx) ◀┘
//!                       table[next].on_enter(ctx)
//! ```
//!
//! Handlers own all behavior; the engine only routes.  Operator starts
//! and stops bypass `on_update` through [`Fsm::force_transition`], which
//! still runs the exit/enter hooks so actuator outputs stay consistent.

pub mod context;
pub mod states;

use context::{FsmContext, Stimulus};
use log::info;
use serde::Serialize;

/// Pump state.  Table order in [`states::build_state_table`] follows the
/// discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum StateId {
    Idle = 0,
    Active = 1,
}

impl StateId {
    pub const COUNT: usize = 2;

    fn index(self) -> usize {
        self as usize
    }
}

/// `on_enter` / `on_exit` hook.
pub type StateActionFn = fn(&mut FsmContext);

/// Reacts to the current stimulus; `Some(next)` requests a transition.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<StateId>;

pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

pub struct Fsm {
    table: [StateDescriptor; StateId::COUNT],
    current: StateId,
    /// Completed transitions since construction.
    transitions: u32,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.id.index() == i),
            "state table out of order"
        );
        Self {
            table,
            current: initial,
            transitions: 0,
        }
    }

    /// Enter the initial state.  Call once before the first `tick`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        let desc = &self.table[self.current.index()];
        info!("pump FSM up in {}", desc.name);
        if let Some(enter) = desc.on_enter {
            enter(ctx);
        }
    }

    /// Feed one timer stimulus to the current state.
    pub fn tick(&mut self, stimulus: Stimulus, ctx: &mut FsmContext) {
        ctx.stimulus = stimulus;
        if let Some(next) = (self.table[self.current.index()].on_update)(ctx) {
            self.transition(next, ctx);
        }
    }

    /// Jump straight to `next`.  Nothing happens when already there.
    pub fn force_transition(&mut self, next: StateId, ctx: &mut FsmContext) {
        if next != self.current {
            self.transition(next, ctx);
        }
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    fn transition(&mut self, next: StateId, ctx: &mut FsmContext) {
        let from = &self.table[self.current.index()];
        let to = &self.table[next.index()];
        info!("pump FSM: {} -> {}", from.name, to.name);

        if let Some(exit) = from.on_exit {
            exit(ctx);
        }
        if let Some(enter) = to.on_enter {
            enter(ctx);
        }
        self.current = next;
        self.transitions = self.transitions.wrapping_add(1);
    }
}
