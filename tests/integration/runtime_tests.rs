//! End-to-end tests through the runtime: scheduler, event queue,
//! simulated hardware and every page model.

use crate::mock_hw::RecordingSink;

use plantcare::app::commands::AppCommand;
use plantcare::app::events::{AppEvent, RunOutcome};
use plantcare::chat::{RULES, SendOutcome};
use plantcare::config::SystemConfig;
use plantcare::detection::{DetectionState, POWDERY_MILDEW};
use plantcare::error::DetectionError;
use plantcare::fsm::StateId;
use plantcare::fsm::context::Mode;
use plantcare::history::HistoryFilter;
use plantcare::runtime::Runtime;
use plantcare::scheduler::TimerId;

fn make_runtime(mode: Mode) -> (Runtime, RecordingSink) {
    let config = SystemConfig {
        initial_mode: mode,
        rng_seed: Some(42),
        ..SystemConfig::default()
    };
    let mut rt = Runtime::new(config);
    let mut sink = RecordingSink::new();
    rt.start(&mut sink);
    (rt, sink)
}

#[test]
fn auto_run_completes_after_ten_countdown_ticks() {
    let (mut rt, mut sink) = make_runtime(Mode::Auto);
    rt.hardware_mut().sensors().soil.set(21.0);

    rt.advance(2_000, &mut sink);
    assert_eq!(rt.app().state(), StateId::Active);
    assert_eq!(rt.app().remaining_secs(), 10);
    assert!(rt.is_timer_armed(TimerId::PumpCountdown));

    rt.advance(9_999, &mut sink);
    assert_eq!(rt.app().state(), StateId::Active);
    assert_eq!(rt.app().remaining_secs(), 1);

    rt.advance(1, &mut sink);
    assert_eq!(rt.app().state(), StateId::Idle);
    assert!(!rt.is_timer_armed(TimerId::PumpCountdown));
    assert!(!rt.hardware().pump().is_running());
    assert_eq!(rt.hardware().pump().activations(), 1);
}

#[test]
fn moisture_is_sampled_every_two_seconds() {
    let (mut rt, mut sink) = make_runtime(Mode::Manual);
    rt.hardware_mut().sensors().soil.set(50.0);

    rt.advance(1_999, &mut sink);
    assert!((rt.app().moisture_percent() - 45.0).abs() < f32::EPSILON);

    rt.advance(1, &mut sink);
    let m = rt.app().moisture_percent();
    assert!((48.5..=51.5).contains(&m), "sampled {m}");
}

#[test]
fn countdown_phase_restarts_at_each_pump_start() {
    let (mut rt, mut sink) = make_runtime(Mode::Manual);
    rt.advance(500, &mut sink);
    rt.command(AppCommand::StartWatering, &mut sink).unwrap();

    rt.advance(999, &mut sink);
    assert_eq!(rt.app().remaining_secs(), 15);
    rt.advance(1, &mut sink);
    assert_eq!(rt.app().remaining_secs(), 14);

    // Stop and restart mid-period: the first decrement is a full second away.
    rt.advance(300, &mut sink);
    rt.command(AppCommand::StopPump, &mut sink).unwrap();
    rt.command(AppCommand::StartWatering, &mut sink).unwrap();
    rt.advance(999, &mut sink);
    assert_eq!(rt.app().remaining_secs(), 15);
    rt.advance(1, &mut sink);
    assert_eq!(rt.app().remaining_secs(), 14);
}

#[test]
fn manual_run_appears_in_history() {
    let (mut rt, mut sink) = make_runtime(Mode::Manual);
    rt.command(AppCommand::StartWatering, &mut sink).unwrap();
    rt.advance(15_000, &mut sink);

    assert_eq!(rt.app().state(), StateId::Idle);
    let finished: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::PumpFinished(run) => Some(*run),
            _ => None,
        })
        .collect();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].outcome, RunOutcome::Completed);
    assert_eq!(finished[0].run_secs, 15);

    let filter = HistoryFilter::default();
    let newest = rt.history().watering(&filter).next().unwrap();
    assert_eq!(newest.id, "sim-1");
    assert_eq!(newest.trigger, "Manual");
    assert_eq!(rt.history().watering(&filter).count(), 6);
}

#[test]
fn mode_switch_mid_run_does_not_stop_the_pump() {
    let (mut rt, mut sink) = make_runtime(Mode::Manual);
    rt.command(AppCommand::StartWatering, &mut sink).unwrap();
    rt.advance(3_000, &mut sink);
    rt.command(AppCommand::SetMode(Mode::Auto), &mut sink).unwrap();
    rt.advance(1_000, &mut sink);

    assert_eq!(rt.app().state(), StateId::Active);
    assert_eq!(rt.app().remaining_secs(), 11);
}

#[test]
fn dashboard_refreshes_every_three_seconds() {
    let (mut rt, mut sink) = make_runtime(Mode::Auto);
    rt.advance(9_000, &mut sink);
    assert_eq!(rt.dashboard().refreshes(), 3);

    rt.advance(300_000, &mut sink);
    let s = rt.dashboard().snapshot();
    assert!((20.0..=100.0).contains(&s.soil_moisture_percent));
    assert!((18.0..=28.0).contains(&s.temperature_c));
    assert!((40.0..=80.0).contains(&s.humidity_percent));
    assert!((80.0..=100.0).contains(&s.plant_health_percent));
}

#[test]
fn telemetry_is_emitted_on_its_interval() {
    let (mut rt, mut sink) = make_runtime(Mode::Manual);
    rt.advance(29_999, &mut sink);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Telemetry(_))), 0);
    rt.advance(1, &mut sink);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Telemetry(_))), 1);
}

#[test]
fn chat_reply_arrives_after_the_thinking_delay() {
    let (mut rt, mut sink) = make_runtime(Mode::Manual);
    assert_eq!(rt.conversation().quick_questions().len(), 4);

    let SendOutcome::Scheduled { delay_ms } = rt.send_chat("When should I water?") else {
        panic!("expected a scheduled reply");
    };
    assert!((1_000..3_000).contains(&delay_ms));
    assert!(rt.conversation().is_typing());
    assert_eq!(rt.send_chat("hello?"), SendOutcome::Busy);

    rt.advance(delay_ms - 1, &mut sink);
    assert!(rt.conversation().is_typing());
    rt.advance(1, &mut sink);
    assert!(!rt.conversation().is_typing());

    let last = rt.conversation().messages().last().unwrap();
    assert_eq!(last.text, RULES[1].response);
    assert_eq!(rt.conversation().messages().len(), 3);
    assert!(rt.conversation().quick_questions().is_empty());
}

#[test]
fn detection_completes_after_three_seconds() {
    let (mut rt, mut sink) = make_runtime(Mode::Auto);
    assert_eq!(rt.analyze(), Err(DetectionError::NoImageSelected));
    assert_eq!(
        rt.select_image("report.txt", "text/plain"),
        Err(DetectionError::NotAnImage)
    );

    rt.select_image("leaf.png", "image/png").unwrap();
    rt.analyze().unwrap();
    rt.advance(2_999, &mut sink);
    assert_eq!(rt.detector().state(), DetectionState::Analyzing);
    rt.advance(1, &mut sink);
    assert_eq!(rt.detector().state(), DetectionState::Complete);
    assert_eq!(rt.diagnosis(), Some(&POWDERY_MILDEW));
}

#[test]
fn clearing_cancels_a_pending_analysis() {
    let (mut rt, mut sink) = make_runtime(Mode::Auto);
    rt.select_image("leaf.png", "image/png").unwrap();
    rt.analyze().unwrap();
    rt.advance(1_000, &mut sink);
    rt.clear_image();
    assert!(!rt.is_timer_armed(TimerId::DetectionAnalysis));

    rt.advance(5_000, &mut sink);
    assert_eq!(rt.detector().state(), DetectionState::Empty);
    assert!(rt.diagnosis().is_none());
}

#[test]
fn shutdown_clears_every_timer_and_stops_the_pump() {
    let (mut rt, mut sink) = make_runtime(Mode::Manual);
    rt.command(AppCommand::StartWatering, &mut sink).unwrap();
    rt.shutdown(&mut sink);

    for id in [
        TimerId::MoistureSample,
        TimerId::PumpCountdown,
        TimerId::DashboardRefresh,
        TimerId::Telemetry,
    ] {
        assert!(!rt.is_timer_armed(id), "{id:?} still armed");
    }
    assert_eq!(rt.app().state(), StateId::Idle);
    assert!(!rt.hardware().pump().is_running());

    let moisture = rt.app().moisture_percent();
    rt.advance(60_000, &mut sink);
    assert!((rt.app().moisture_percent() - moisture).abs() < f32::EPSILON);
}
