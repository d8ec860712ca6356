//! Concrete state handler functions and table builder.
//!
//! ```text
//!          [auto && moisture < threshold]      (moisture sample)
//!  IDLE ───────────────────────────────────▶ ACTIVE
//!    ▲        manual start (service)             │
//!    │                                           │ countdown: remaining -= 1
//!    └──────[remaining == 0 | operator stop]─────┘
//! ```

use super::context::{FsmContext, PumpRequest, PumpTrigger, Stimulus};
use super::{StateDescriptor, StateId};
use log::{debug, info};

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1: Active
        StateDescriptor {
            id: StateId::Active,
            name: "Active",
            on_enter: Some(active_enter),
            on_exit: Some(active_exit),
            on_update: active_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut FsmContext) {
    ctx.commands.pump_on = false;
    ctx.remaining_secs = 0;
    ctx.trigger = None;
    info!("IDLE: pump off, moisture {:.1}%", ctx.moisture_percent);
}

fn idle_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.stimulus != Stimulus::MoistureSample {
        return None;
    }

    if ctx.auto_trigger_due() {
        info!(
            "IDLE: moisture {:.1}% below {:.1}%, auto-watering",
            ctx.moisture_percent, ctx.config.auto_trigger_below_percent
        );
        ctx.requested = Some(PumpRequest {
            trigger: PumpTrigger::Auto,
            secs: ctx.config.auto_pump_secs,
        });
        return Some(StateId::Active);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ACTIVE state: pump running, counting down
// ═══════════════════════════════════════════════════════════════════════════

fn active_enter(ctx: &mut FsmContext) {
    let request = ctx.requested.take().unwrap_or(PumpRequest {
        trigger: PumpTrigger::Manual,
        secs: ctx.config.manual_pump_secs,
    });
    // Zero would break the Active-iff-remaining invariant.
    ctx.remaining_secs = request.secs.max(1);
    ctx.trigger = Some(request.trigger);
    ctx.commands.pump_on = true;
    info!(
        "ACTIVE: pump on for {}s ({:?})",
        ctx.remaining_secs, request.trigger
    );
}

fn active_exit(ctx: &mut FsmContext) {
    ctx.commands.pump_on = false;
    ctx.remaining_secs = 0;
}

fn active_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.stimulus != Stimulus::Countdown {
        return None;
    }

    ctx.remaining_secs = ctx.remaining_secs.saturating_sub(1);
    debug!("ACTIVE: {}s remaining", ctx.remaining_secs);

    if ctx.remaining_secs == 0 {
        info!("ACTIVE: run complete");
        return Some(StateId::Idle);
    }

    None
}
