//! System configuration parameters
//!
//! All tunable parameters for the PlantCare simulator.
//! Values can be overridden from a JSON file or persisted through the
//! config port.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::fsm::context::Mode;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Soil moisture ---
    /// Lower clamp for the simulated moisture reading (%)
    pub moisture_min_percent: f32,
    /// Upper clamp for the simulated moisture reading (%)
    pub moisture_max_percent: f32,
    /// Maximum per-tick perturbation, sampled uniformly from [-step, step]
    pub moisture_step_percent: f32,
    /// Reading at startup (%)
    pub initial_moisture_percent: f32,

    // --- Irrigation ---
    /// Auto mode waters when moisture drops strictly below this (%)
    pub auto_trigger_below_percent: f32,
    /// Pump run time when triggered automatically (seconds)
    pub auto_pump_secs: u16,
    /// Pump run time for a manual start (seconds)
    pub manual_pump_secs: u16,
    /// Operating mode at startup
    pub initial_mode: Mode,

    // --- Timing ---
    /// Moisture sample interval (milliseconds)
    pub moisture_tick_ms: u32,
    /// Pump countdown interval (milliseconds)
    pub countdown_tick_ms: u32,
    /// Dashboard environment refresh interval (milliseconds)
    pub dashboard_refresh_ms: u32,
    /// Main loop granularity (milliseconds)
    pub loop_interval_ms: u32,
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,

    // --- Simulated services ---
    /// Shortest chatbot "thinking" delay (milliseconds)
    pub chat_reply_min_ms: u32,
    /// Longest chatbot "thinking" delay, exclusive (milliseconds)
    pub chat_reply_max_ms: u32,
    /// Mock disease analysis duration (milliseconds)
    pub detection_analysis_ms: u32,

    /// Fixed RNG seed for reproducible runs; entropy-seeded when `None`
    pub rng_seed: Option<u64>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Soil moisture
            moisture_min_percent: 20.0,
            moisture_max_percent: 100.0,
            moisture_step_percent: 1.5,
            initial_moisture_percent: 45.0,

            // Irrigation
            auto_trigger_below_percent: 35.0,
            auto_pump_secs: 10,
            manual_pump_secs: 15,
            initial_mode: Mode::Auto,

            // Timing
            moisture_tick_ms: 2000,    // 0.5 Hz
            countdown_tick_ms: 1000,   // 1 Hz
            dashboard_refresh_ms: 3000,
            loop_interval_ms: 100,     // 10 Hz
            telemetry_interval_secs: 30,

            // Simulated services
            chat_reply_min_ms: 1000,
            chat_reply_max_ms: 3000,
            detection_analysis_ms: 3000,

            rng_seed: None,
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.moisture_min_percent.is_finite() || !self.moisture_max_percent.is_finite() {
            return Err(ConfigError::ValidationFailed("moisture bounds must be finite"));
        }
        if self.moisture_min_percent < 0.0 || self.moisture_max_percent > 100.0 {
            return Err(ConfigError::ValidationFailed("moisture bounds must lie in 0..=100"));
        }
        if self.moisture_min_percent >= self.moisture_max_percent {
            return Err(ConfigError::ValidationFailed("moisture_min must be below moisture_max"));
        }
        if !self.moisture_step_percent.is_finite() || self.moisture_step_percent <= 0.0 {
            return Err(ConfigError::ValidationFailed("moisture_step must be positive"));
        }
        let in_bounds = |v: f32| {
            v.is_finite() && v >= self.moisture_min_percent && v <= self.moisture_max_percent
        };
        if !in_bounds(self.initial_moisture_percent) {
            return Err(ConfigError::ValidationFailed("initial_moisture outside bounds"));
        }
        if !in_bounds(self.auto_trigger_below_percent) {
            return Err(ConfigError::ValidationFailed("auto_trigger_below outside moisture bounds"));
        }
        if self.auto_pump_secs == 0 || self.manual_pump_secs == 0 {
            return Err(ConfigError::ValidationFailed("pump durations must be non-zero"));
        }
        if self.moisture_tick_ms == 0
            || self.countdown_tick_ms == 0
            || self.dashboard_refresh_ms == 0
            || self.loop_interval_ms == 0
        {
            return Err(ConfigError::ValidationFailed("timer intervals must be non-zero"));
        }
        if self.detection_analysis_ms == 0 {
            return Err(ConfigError::ValidationFailed("detection_analysis must be non-zero"));
        }
        if self.chat_reply_min_ms == 0 {
            return Err(ConfigError::ValidationFailed("chat_reply_min must be non-zero"));
        }
        if self.chat_reply_min_ms >= self.chat_reply_max_ms {
            return Err(ConfigError::ValidationFailed("chat_reply_min must be below chat_reply_max"));
        }
        Ok(())
    }

    /// Parse a JSON override.  Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
