//! Activity history: detection and watering records.
//!
//! Starts from fixture data and grows with every pump run the irrigation
//! simulator finishes.  Only the newest [`WATERING_LOG_CAP`] live runs are
//! kept, matching the service's own log.  Both tables support a case-insensitive search and
//! a status filter.

use std::collections::VecDeque;

use serde::Serialize;

use crate::app::events::{AppEvent, RunOutcome, WateringRun};
use crate::app::ports::EventSink;
use crate::app::service::WATERING_LOG_CAP;
use crate::fsm::context::PumpTrigger;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionRecord {
    pub id: String,
    pub date: String,
    pub plant_name: String,
    pub disease: String,
    pub confidence: u8,
    pub severity: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WateringRecord {
    pub id: String,
    pub date: String,
    pub duration: String,
    pub trigger: String,
    pub plant_zone: String,
    pub moisture_before: f32,
    pub moisture_after: f32,
    pub status: String,
}

/// Display tone for status and severity badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tone {
    Good,
    Caution,
    Elevated,
    Critical,
    Neutral,
}

pub fn status_tone(status: &str) -> Tone {
    match status.to_lowercase().as_str() {
        "healthy" | "completed" | "treated" => Tone::Good,
        "in progress" | "monitoring" => Tone::Caution,
        "error" => Tone::Critical,
        _ => Tone::Neutral,
    }
}

pub fn severity_tone(severity: &str) -> Tone {
    match severity.to_lowercase().as_str() {
        "none" => Tone::Good,
        "mild" => Tone::Caution,
        "moderate" => Tone::Elevated,
        "severe" => Tone::Critical,
        _ => Tone::Neutral,
    }
}

/// Search text plus status (`"all"` or an exact status, any case).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryFilter {
    pub search: String,
    pub status: String,
}

impl Default for HistoryFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: "all".to_string(),
        }
    }
}

impl HistoryFilter {
    pub fn search(text: &str) -> Self {
        Self {
            search: text.to_string(),
            ..Self::default()
        }
    }

    fn status_matches(&self, status: &str) -> bool {
        self.status.eq_ignore_ascii_case("all") || self.status.eq_ignore_ascii_case(status)
    }

    fn text_matches(&self, fields: &[&str]) -> bool {
        let needle = self.search.trim().to_lowercase();
        needle.is_empty() || fields.iter().any(|f| f.to_lowercase().contains(&needle))
    }

    pub fn matches_detection(&self, r: &DetectionRecord) -> bool {
        self.status_matches(&r.status) && self.text_matches(&[r.plant_name.as_str(), r.disease.as_str()])
    }

    pub fn matches_watering(&self, r: &WateringRecord) -> bool {
        self.status_matches(&r.status) && self.text_matches(&[r.plant_zone.as_str(), r.trigger.as_str()])
    }
}

/// Zone name used for runs recorded by the simulator.
pub const SIMULATOR_ZONE: &str = "Main Garden Bed";

pub struct History {
    detections: Vec<DetectionRecord>,
    /// Simulator runs, newest first.
    live: VecDeque<WateringRecord>,
    watering: Vec<WateringRecord>,
}

impl Default for History {
    fn default() -> Self {
        Self::with_fixtures()
    }
}

impl History {
    pub fn empty() -> Self {
        Self {
            detections: Vec::new(),
            live: VecDeque::new(),
            watering: Vec::new(),
        }
    }

    pub fn with_fixtures() -> Self {
        let detection = |id: &str, date: &str, plant: &str, disease: &str, confidence, severity: &str, status: &str| {
            DetectionRecord {
                id: id.into(),
                date: date.into(),
                plant_name: plant.into(),
                disease: disease.into(),
                confidence,
                severity: severity.into(),
                status: status.into(),
            }
        };
        let watering = |id: &str, date: &str, duration: &str, trigger: &str, zone: &str, before, after, status: &str| {
            WateringRecord {
                id: id.into(),
                date: date.into(),
                duration: duration.into(),
                trigger: trigger.into(),
                plant_zone: zone.into(),
                moisture_before: before,
                moisture_after: after,
                status: status.into(),
            }
        };

        Self {
            detections: vec![
                detection("1", "2024-01-15 14:30", "Tomato Plant #1", "Powdery Mildew", 87, "Moderate", "Treated"),
                detection("2", "2024-01-14 09:15", "Rose Bush", "Black Spot", 92, "Severe", "In Progress"),
                detection("3", "2024-01-13 16:45", "Basil Plant", "Healthy", 95, "None", "Healthy"),
                detection("4", "2024-01-12 11:20", "Pepper Plant #2", "Leaf Curl", 78, "Mild", "Monitoring"),
                detection("5", "2024-01-11 13:10", "Lettuce Bed", "Aphid Infestation", 89, "Moderate", "Treated"),
            ],
            live: VecDeque::new(),
            watering: vec![
                watering("1", "2024-01-15 08:00", "15 min", "Auto", "Herb Garden", 28.0, 65.0, "Completed"),
                watering("2", "2024-01-15 06:30", "12 min", "Scheduled", "Vegetable Patch", 35.0, 70.0, "Completed"),
                watering("3", "2024-01-14 18:45", "20 min", "Manual", "Flower Bed", 22.0, 68.0, "Completed"),
                watering("4", "2024-01-14 07:00", "8 min", "Auto", "Succulent Corner", 15.0, 45.0, "Completed"),
                watering("5", "2024-01-13 16:20", "5 min", "Manual", "Indoor Plants", 30.0, 55.0, "Error"),
            ],
        }
    }

    /// Prepend a finished simulator run (newest first, like the fixtures).
    pub fn record_run(&mut self, run: &WateringRun) {
        let trigger = match run.trigger {
            PumpTrigger::Auto => "Auto",
            PumpTrigger::Manual => "Manual",
        };
        let status = match run.outcome {
            RunOutcome::Completed => "Completed",
            RunOutcome::Stopped => "Stopped",
        };
        if self.live.len() == WATERING_LOG_CAP {
            self.live.pop_back();
        }
        self.live.push_front(WateringRecord {
            id: format!("sim-{}", run.id),
            date: format!("T+{:.1}s", run.started_at_ms as f64 / 1000.0),
            duration: format!("{} s", run.run_secs),
            trigger: trigger.to_string(),
            plant_zone: SIMULATOR_ZONE.to_string(),
            moisture_before: run.moisture_before,
            moisture_after: run.moisture_after,
            status: status.to_string(),
        });
    }

    pub fn detections<'a>(&'a self, filter: &'a HistoryFilter) -> impl Iterator<Item = &'a DetectionRecord> {
        self.detections.iter().filter(move |r| filter.matches_detection(r))
    }

    pub fn watering<'a>(&'a self, filter: &'a HistoryFilter) -> impl Iterator<Item = &'a WateringRecord> {
        self.live
            .iter()
            .chain(&self.watering)
            .filter(move |r| filter.matches_watering(r))
    }
}

// Finished pump runs land in the watering table.
impl EventSink for History {
    fn emit(&mut self, event: &AppEvent) {
        if let AppEvent::PumpFinished(run) = event {
            self.record_run(run);
        }
    }
}
