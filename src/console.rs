//! Line-oriented operator console.
//!
//! Parses one command per line and renders the page views as plain text.
//! The binary owns stdin/stdout; everything here is pure so it can be
//! tested without a terminal.

use core::fmt::Write as _;

use crate::app::events::RunOutcome;
use crate::chat::Sender;
use crate::fsm::StateId;
use crate::fsm::context::Mode;
use crate::history::{HistoryFilter, severity_tone, status_tone};
use crate::runtime::Runtime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Mode(Mode),
    Water,
    Stop,
    Status,
    Dashboard,
    Chat(String),
    Scan { file_name: String, mime_type: String },
    Analyze,
    Clear,
    History(Option<String>),
    Login,
    Logout,
    SaveConfig,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Unknown(String),
    MissingArgument(&'static str),
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::Unknown(word) => write!(f, "unknown command '{}' (try 'help')", word),
            Self::MissingArgument(usage) => write!(f, "usage: {}", usage),
        }
    }
}

pub const HELP: &str = "\
commands:
  auto | manual          switch irrigation mode
  water                  start a manual watering run
  stop                   stop the pump
  status                 irrigation status card
  dashboard              environment overview
  chat <text>            ask the plant assistant
  scan <file> <mime>     select an image for disease detection
  analyze | clear        run or reset the detector
  history [search]       detection and watering history
  login | logout         toggle the stored login flag
  save                   persist the running config
  quit";

pub fn parse(line: &str) -> Result<ConsoleCommand, ParseError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let cmd = match word.to_lowercase().as_str() {
        "" => return Err(ParseError::Empty),
        "auto" => ConsoleCommand::Mode(Mode::Auto),
        "manual" => ConsoleCommand::Mode(Mode::Manual),
        "water" => ConsoleCommand::Water,
        "stop" => ConsoleCommand::Stop,
        "status" => ConsoleCommand::Status,
        "dashboard" => ConsoleCommand::Dashboard,
        "chat" => {
            if rest.is_empty() {
                return Err(ParseError::MissingArgument("chat <text>"));
            }
            ConsoleCommand::Chat(rest.to_string())
        }
        "scan" => {
            let mut args = rest.split_whitespace();
            match (args.next(), args.next()) {
                (Some(file), Some(mime)) => ConsoleCommand::Scan {
                    file_name: file.to_string(),
                    mime_type: mime.to_string(),
                },
                _ => return Err(ParseError::MissingArgument("scan <file> <mime>")),
            }
        }
        "analyze" => ConsoleCommand::Analyze,
        "clear" => ConsoleCommand::Clear,
        "history" => ConsoleCommand::History((!rest.is_empty()).then(|| rest.to_string())),
        "login" => ConsoleCommand::Login,
        "logout" => ConsoleCommand::Logout,
        "save" => ConsoleCommand::SaveConfig,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(cmd)
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

pub fn render_status(rt: &Runtime) -> String {
    let app = rt.app();
    let mut out = String::new();
    let pump = match app.state() {
        StateId::Active => match app.trigger() {
            Some(trigger) => format!("ACTIVE ({}s left, {:?})", app.remaining_secs(), trigger),
            None => format!("ACTIVE ({}s left)", app.remaining_secs()),
        },
        StateId::Idle => "idle".to_string(),
    };
    let _ = writeln!(out, "soil moisture : {:.1}% ({:?})", app.moisture_percent(), app.moisture_status());
    let _ = writeln!(out, "mode          : {:?}", app.mode());
    let _ = writeln!(out, "pump          : {}", pump);
    let _ = writeln!(
        out,
        "last watering : {}",
        app.last_watering_ms()
            .map_or_else(|| "never".to_string(), |ms| format!("T+{:.1}s", ms as f64 / 1000.0))
    );
    let _ = write!(
        out,
        "usage         : {} activation(s), {} mL",
        app.activations(),
        rt.hardware().pump().water_used_ml()
    );
    for run in app.watering_log() {
        let outcome = match run.outcome {
            RunOutcome::Completed => "completed",
            RunOutcome::Stopped => "stopped",
        };
        let _ = write!(
            out,
            "\n  run #{:<3} {:?} {:>3}s {:.1}% -> {:.1}% {}",
            run.id, run.trigger, run.run_secs, run.moisture_before, run.moisture_after, outcome
        );
    }
    out
}

pub fn render_dashboard(rt: &Runtime) -> String {
    let d = rt.dashboard();
    let s = d.snapshot();
    let mut out = String::new();
    let _ = writeln!(out, "soil moisture : {:.0}% ({:?})", s.soil_moisture_percent, d.soil_status());
    let _ = writeln!(out, "temperature   : {:.1}°C", s.temperature_c);
    let _ = writeln!(out, "humidity      : {:.0}%", s.humidity_percent);
    let _ = writeln!(out, "plant health  : {:.0}%", s.plant_health_percent);
    let _ = writeln!(out, "quick actions :");
    for a in d.quick_actions() {
        let _ = writeln!(out, "  {:<18} {:<11} {}", a.title, a.route, a.description);
    }
    let _ = write!(out, "recent activity:");
    for a in d.recent_activities() {
        let _ = write!(out, "\n  {} - {} ({}) [{}]", a.action, a.plant, a.time, a.status);
    }
    out
}

pub fn render_history(rt: &Runtime, search: Option<&str>) -> String {
    let filter = search.map_or_else(HistoryFilter::default, HistoryFilter::search);
    let h = rt.history();
    let mut out = String::from("detections:");
    for r in h.detections(&filter) {
        let _ = write!(
            out,
            "\n  {} {:<16} {:<18} {:>3}% {:<9}({:?}) {} ({:?})",
            r.date,
            r.plant_name,
            r.disease,
            r.confidence,
            r.severity,
            severity_tone(&r.severity),
            r.status,
            status_tone(&r.status)
        );
    }
    out.push_str("\nwatering:");
    for r in h.watering(&filter) {
        let _ = write!(
            out,
            "\n  {:<16} {:<17} {:<9} {:<8} {:.0}% -> {:.0}% {} ({:?})",
            r.date,
            r.plant_zone,
            r.trigger,
            r.duration,
            r.moisture_before,
            r.moisture_after,
            r.status,
            status_tone(&r.status)
        );
    }
    out
}

/// Lines for chat messages from index `from` onwards.
pub fn render_chat_since(rt: &Runtime, from: usize) -> Vec<String> {
    rt.conversation()
        .messages()
        .iter()
        .skip(from)
        .map(|m| match m.sender {
            Sender::User => format!("you > {}", m.text),
            Sender::Bot => format!("bot > {}", m.text),
        })
        .collect()
}
