//! PlantCare simulator console.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SimHardware        LogEventSink   FileStore / MemStore        │
//! │  (Sensor+Actuator)  (EventSink)    (Config+Storage)            │
//! │  stdin reader thread ──mpsc──▶ console commands                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Irrigation FSM · Watering log                         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Runtime: Scheduler (delegate-driven) · pages                  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;
use std::{env, fs, thread};

use anyhow::{Context, Result};
use log::{info, warn};

use plantcare::adapters::log_sink::LogEventSink;
use plantcare::adapters::storage::{FileStore, MemStore};
use plantcare::adapters::time::MonotonicClock;
use plantcare::app::commands::AppCommand;
use plantcare::app::ports::{ConfigPort, StoragePort};
use plantcare::chat::SendOutcome;
use plantcare::config::SystemConfig;
use plantcare::console::{self, ConsoleCommand};
use plantcare::detection::DetectionState;
use plantcare::error::Error;
use plantcare::runtime::Runtime;
use plantcare::session::{self, Landing};

/// JSON config override.
const CONFIG_ENV: &str = "PLANTCARE_CONFIG";
/// Path of the JSON key/value store; in-memory when unset.
const STORE_ENV: &str = "PLANTCARE_STORE";

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  PlantCare v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Storage backend ────────────────────────────────────
    match env::var(STORE_ENV) {
        Ok(path) => {
            let store = FileStore::open(&path)
                .map_err(Error::from)
                .with_context(|| format!("opening store {path}"))?;
            run(store)
        }
        Err(_) => {
            info!("{} not set, nothing persists past this session", STORE_ENV);
            run(MemStore::new())
        }
    }
}

/// Config precedence: JSON override file, then the stored blob, then defaults.
fn load_config(store: &impl ConfigPort) -> SystemConfig {
    if let Ok(path) = env::var(CONFIG_ENV) {
        let parsed = fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|text| SystemConfig::from_json(&text).map_err(|e| e.to_string()));
        match parsed {
            Ok(cfg) => {
                info!("Config loaded from {}", path);
                return cfg;
            }
            Err(e) => warn!("Config file {} rejected ({}), trying stored config", path, e),
        }
    }
    match store.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Stored config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
    }
}

fn save_config(store: &mut impl ConfigPort, config: &SystemConfig) -> plantcare::error::Result<()> {
    store.save(config)?;
    info!("Config persisted");
    Ok(())
}

/// Forward stdin lines to the loop thread.  The channel closes on EOF.
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn run<S: StoragePort + ConfigPort>(mut store: S) -> Result<()> {
    let config = load_config(&store);
    let loop_interval = Duration::from_millis(u64::from(config.loop_interval_ms));

    match session::landing(&store) {
        Landing::Dashboard => info!("Session found, opening dashboard"),
        Landing::Welcome => info!("No session, type 'login' to sign in"),
    }

    let mut sink = LogEventSink::new();
    let mut runtime = Runtime::new(config);
    runtime.start(&mut sink);
    println!("{}", console::HELP);

    let rx = spawn_stdin_reader();
    let mut clock = MonotonicClock::new();
    let mut chat_seen = runtime.conversation().messages().len();
    let mut detection_state = runtime.detector().state();

    // ── Main loop ─────────────────────────────────────────────
    'main: loop {
        thread::sleep(loop_interval);
        runtime.advance(clock.lap_ms(), &mut sink);

        loop {
            let line = match rx.try_recv() {
                Ok(line) => line,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break 'main,
            };
            let cmd = match console::parse(&line) {
                Ok(cmd) => cmd,
                Err(console::ParseError::Empty) => continue,
                Err(e) => {
                    println!("{e}");
                    continue;
                }
            };
            if cmd == ConsoleCommand::Quit {
                break 'main;
            }
            execute(cmd, &mut runtime, &mut store, &mut sink);
        }

        // Late output from timers: chat replies and finished analyses.
        for line in console::render_chat_since(&runtime, chat_seen) {
            println!("{line}");
        }
        chat_seen = runtime.conversation().messages().len();

        let state = runtime.detector().state();
        if state != detection_state {
            if let Some(d) = runtime.diagnosis().filter(|_| state == DetectionState::Complete) {
                println!(
                    "diagnosis: {} ({}% confidence, {} severity)\n  {}",
                    d.disease, d.confidence, d.severity, d.description
                );
                println!("  treatment: {}", d.treatment.join("; "));
                println!("  prevention: {}", d.prevention.join("; "));
            }
            detection_state = state;
        }
    }

    runtime.shutdown(&mut sink);
    info!("PlantCare stopped after {}s", clock.uptime_secs());
    Ok(())
}

fn execute<S: StoragePort + ConfigPort>(
    cmd: ConsoleCommand,
    runtime: &mut Runtime,
    store: &mut S,
    sink: &mut LogEventSink,
) {
    match cmd {
        ConsoleCommand::Mode(mode) => {
            // Mode changes are never refused.
            let _ = runtime.command(AppCommand::SetMode(mode), sink);
        }
        ConsoleCommand::Water => {
            if let Err(r) = runtime.command(AppCommand::StartWatering, sink) {
                println!("cannot water: {r}");
            }
        }
        ConsoleCommand::Stop => {
            let _ = runtime.command(AppCommand::StopPump, sink);
        }
        ConsoleCommand::Status => println!("{}", console::render_status(runtime)),
        ConsoleCommand::Dashboard => println!("{}", console::render_dashboard(runtime)),
        ConsoleCommand::Chat(text) => match runtime.send_chat(&text) {
            SendOutcome::Busy => println!("assistant is still typing"),
            SendOutcome::Ignored | SendOutcome::Scheduled { .. } => {}
        },
        ConsoleCommand::Scan {
            file_name,
            mime_type,
        } => match runtime.select_image(&file_name, &mime_type) {
            Ok(()) => println!("selected {file_name}, type 'analyze'"),
            Err(e) => println!("cannot select: {e}"),
        },
        ConsoleCommand::Analyze => match runtime.analyze() {
            Ok(()) => println!("analyzing..."),
            Err(e) => println!("cannot analyze: {e}"),
        },
        ConsoleCommand::Clear => runtime.clear_image(),
        ConsoleCommand::History(search) => {
            println!("{}", console::render_history(runtime, search.as_deref()))
        }
        ConsoleCommand::Login => match session::login(store) {
            Ok(()) => println!("logged in"),
            Err(e) => println!("login failed: {e}"),
        },
        ConsoleCommand::Logout => match session::logout(store) {
            Ok(()) => println!("logged out"),
            Err(e) => println!("logout failed: {e}"),
        },
        ConsoleCommand::SaveConfig => match save_config(store, runtime.config()) {
            Ok(()) => println!("config saved"),
            Err(e) => println!("save failed: {e}"),
        },
        ConsoleCommand::Help => println!("{}", console::HELP),
        ConsoleCommand::Quit => {}
    }
}
