//! Integration tests for the AppService → FSM → actuators pipeline.
//!
//! Moisture readings are scripted through [`MockHardware`], so every
//! auto-trigger decision is deterministic.

use crate::mock_hw::{ActuatorCall, MockHardware, RecordingSink};

use plantcare::app::commands::AppCommand;
use plantcare::app::events::{AppEvent, RunOutcome};
use plantcare::app::service::AppService;
use plantcare::config::SystemConfig;
use plantcare::error::Rejection;
use plantcare::fsm::StateId;
use plantcare::fsm::context::{Mode, PumpTrigger};
use plantcare::sensors::moisture::MoistureStatus;

fn make_app(mode: Mode) -> (AppService, RecordingSink) {
    let config = SystemConfig {
        initial_mode: mode,
        ..SystemConfig::default()
    };
    let mut app = AppService::new(config);
    let mut sink = RecordingSink::new();
    app.start(&mut sink);
    (app, sink)
}

// ── Auto-trigger ──────────────────────────────────────────────

#[test]
fn low_moisture_in_auto_starts_a_ten_second_run() {
    let (mut app, mut sink) = make_app(Mode::Auto);
    let mut hw = MockHardware::with_readings(&[34.9]);

    app.moisture_tick(&mut hw, &mut sink);

    assert_eq!(app.state(), StateId::Active);
    assert_eq!(app.remaining_secs(), 10);
    assert_eq!(app.trigger(), Some(PumpTrigger::Auto));
    assert_eq!(hw.calls, vec![ActuatorCall::StartPump]);
    assert!(sink.events.contains(&AppEvent::PumpStarted {
        trigger: PumpTrigger::Auto,
        secs: 10
    }));
    assert_eq!(sink.transitions(), vec![(StateId::Idle, StateId::Active)]);
}

#[test]
fn threshold_is_strict() {
    let (mut app, mut sink) = make_app(Mode::Auto);
    let mut hw = MockHardware::with_readings(&[35.0, 50.0, 99.0]);
    for _ in 0..3 {
        app.moisture_tick(&mut hw, &mut sink);
        assert_eq!(app.state(), StateId::Idle);
    }
    assert!(hw.calls.is_empty());
}

#[test]
fn manual_mode_never_auto_triggers() {
    let (mut app, mut sink) = make_app(Mode::Manual);
    let mut hw = MockHardware::with_readings(&[20.0]);
    for _ in 0..5 {
        app.moisture_tick(&mut hw, &mut sink);
    }
    assert_eq!(app.state(), StateId::Idle);
    assert_eq!(app.moisture_status(), MoistureStatus::Low);
}

#[test]
fn low_readings_while_active_do_not_extend_the_run() {
    let (mut app, mut sink) = make_app(Mode::Auto);
    let mut hw = MockHardware::with_readings(&[30.0]);

    app.moisture_tick(&mut hw, &mut sink);
    app.countdown_tick(&mut hw, &mut sink);
    app.countdown_tick(&mut hw, &mut sink);
    assert_eq!(app.remaining_secs(), 8);

    app.moisture_tick(&mut hw, &mut sink);
    assert_eq!(app.remaining_secs(), 8);
    assert_eq!(hw.calls, vec![ActuatorCall::StartPump]);
}

// ── Manual start ──────────────────────────────────────────────

#[test]
fn manual_start_refused_in_auto_mode() {
    let (mut app, mut sink) = make_app(Mode::Auto);
    let mut hw = MockHardware::new();

    let result = app.handle_command(AppCommand::StartWatering, &mut hw, &mut sink);

    assert_eq!(result, Err(Rejection::AutoModeActive));
    assert_eq!(sink.rejections(), vec![Rejection::AutoModeActive]);
    assert_eq!(app.state(), StateId::Idle);
    assert!(hw.calls.is_empty());
}

#[test]
fn manual_start_runs_fifteen_seconds() {
    let (mut app, mut sink) = make_app(Mode::Manual);
    let mut hw = MockHardware::new();

    app.handle_command(AppCommand::StartWatering, &mut hw, &mut sink)
        .unwrap();

    assert_eq!(app.state(), StateId::Active);
    assert_eq!(app.remaining_secs(), 15);
    assert_eq!(app.trigger(), Some(PumpTrigger::Manual));
    assert!(hw.pump_on());
}

#[test]
fn manual_start_while_active_is_a_no_op() {
    let (mut app, mut sink) = make_app(Mode::Manual);
    let mut hw = MockHardware::new();
    app.handle_command(AppCommand::StartWatering, &mut hw, &mut sink)
        .unwrap();
    app.countdown_tick(&mut hw, &mut sink);

    let result = app.handle_command(AppCommand::StartWatering, &mut hw, &mut sink);

    assert_eq!(result, Err(Rejection::PumpBusy));
    assert_eq!(app.remaining_secs(), 14);
    assert_eq!(app.activations(), 1);
}

// ── Countdown ─────────────────────────────────────────────────

#[test]
fn countdown_strictly_decreases_then_returns_to_idle() {
    let (mut app, mut sink) = make_app(Mode::Manual);
    let mut hw = MockHardware::with_readings(&[40.0]);
    app.moisture_tick(&mut hw, &mut sink);
    app.handle_command(AppCommand::StartWatering, &mut hw, &mut sink)
        .unwrap();

    let mut last = app.remaining_secs();
    for _ in 0..14 {
        app.countdown_tick(&mut hw, &mut sink);
        assert_eq!(app.state(), StateId::Active);
        assert!(app.remaining_secs() < last);
        last = app.remaining_secs();
    }
    assert_eq!(last, 1);

    app.countdown_tick(&mut hw, &mut sink);
    assert_eq!(app.state(), StateId::Idle);
    assert_eq!(app.remaining_secs(), 0);
    assert_eq!(app.trigger(), None);
    assert_eq!(hw.last_call(), Some(&ActuatorCall::StopPump));

    let run = *app.watering_log().last().unwrap();
    assert_eq!(run.outcome, RunOutcome::Completed);
    assert_eq!(run.run_secs, 15);
    assert_eq!(run.trigger, PumpTrigger::Manual);
    assert!((run.moisture_before - 40.0).abs() < f32::EPSILON);
}

#[test]
fn countdown_while_idle_is_ignored() {
    let (mut app, mut sink) = make_app(Mode::Manual);
    let mut hw = MockHardware::new();
    let before = sink.events.len();
    app.countdown_tick(&mut hw, &mut sink);
    assert_eq!(app.state(), StateId::Idle);
    assert_eq!(sink.events.len(), before);
}

// ── Stop and mode ─────────────────────────────────────────────

#[test]
fn stop_is_accepted_any_time() {
    let (mut app, mut sink) = make_app(Mode::Auto);
    let mut hw = MockHardware::with_readings(&[25.0]);

    // Idle: nothing to do, nothing emitted.
    let before = sink.events.len();
    assert!(app.handle_command(AppCommand::StopPump, &mut hw, &mut sink).is_ok());
    assert_eq!(sink.events.len(), before);

    // Active (auto run): forced back to Idle.
    app.moisture_tick(&mut hw, &mut sink);
    assert_eq!(app.state(), StateId::Active);
    app.handle_command(AppCommand::StopPump, &mut hw, &mut sink)
        .unwrap();
    assert_eq!(app.state(), StateId::Idle);
    assert_eq!(app.remaining_secs(), 0);
    assert!(!hw.pump_on());
    assert_eq!(
        app.watering_log().last().map(|r| r.outcome),
        Some(RunOutcome::Stopped)
    );
}

#[test]
fn switching_mode_keeps_the_pump_running() {
    let (mut app, mut sink) = make_app(Mode::Manual);
    let mut hw = MockHardware::new();
    app.handle_command(AppCommand::StartWatering, &mut hw, &mut sink)
        .unwrap();

    app.handle_command(AppCommand::SetMode(Mode::Auto), &mut hw, &mut sink)
        .unwrap();

    assert_eq!(app.mode(), Mode::Auto);
    assert_eq!(app.state(), StateId::Active);
    assert_eq!(app.remaining_secs(), 15);
    assert!(sink.events.contains(&AppEvent::ModeChanged(Mode::Auto)));
}

#[test]
fn setting_the_same_mode_emits_nothing() {
    let (mut app, mut sink) = make_app(Mode::Auto);
    let mut hw = MockHardware::new();
    app.handle_command(AppCommand::SetMode(Mode::Auto), &mut hw, &mut sink)
        .unwrap();
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::ModeChanged(_))),
        0
    );
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn telemetry_tracks_last_watering_and_activations() {
    let (mut app, mut sink) = make_app(Mode::Manual);
    let mut hw = MockHardware::with_readings(&[62.0]);
    app.moisture_tick(&mut hw, &mut sink);
    app.advance_time(6_000);
    app.handle_command(AppCommand::StartWatering, &mut hw, &mut sink)
        .unwrap();

    let t = app.build_telemetry(None);
    assert_eq!(t.state, StateId::Active);
    assert_eq!(t.status, MoistureStatus::Good);
    assert_eq!(t.mode, Mode::Manual);
    assert_eq!(t.remaining_secs, 15);
    assert_eq!(t.last_watering_ms, Some(6_000));
    assert_eq!(t.activations, 1);
}
