//! Mock hardware adapter for integration tests.
//!
//! Replays a scripted list of moisture readings and records every
//! actuator call so tests can assert on the full command history.

use std::collections::{HashMap, VecDeque};

use plantcare::app::events::AppEvent;
use plantcare::app::ports::{
    ActuatorPort, ConfigError, ConfigPort, EventSink, SensorPort, StorageError, StoragePort,
};
use plantcare::config::SystemConfig;
use plantcare::error::Rejection;
use plantcare::fsm::StateId;
use plantcare::sensors::environment::EnvironmentSnapshot;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    StartPump,
    StopPump,
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    readings: VecDeque<f32>,
    last_reading: f32,
    pump_on: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::with_readings(&[])
    }

    /// Readings are returned in order; the last one repeats forever.
    pub fn with_readings(readings: &[f32]) -> Self {
        Self {
            calls: Vec::new(),
            readings: readings.iter().copied().collect(),
            last_reading: 45.0,
            pump_on: false,
        }
    }

    pub fn last_call(&self) -> Option<&ActuatorCall> {
        self.calls.last()
    }

    pub fn pump_on(&self) -> bool {
        self.pump_on
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_moisture(&mut self) -> f32 {
        if let Some(r) = self.readings.pop_front() {
            self.last_reading = r;
        }
        self.last_reading
    }

    fn read_environment(&mut self) -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            soil_moisture_percent: self.last_reading,
            temperature_c: 22.0,
            humidity_percent: 58.0,
            plant_health_percent: 92.0,
        }
    }
}

impl ActuatorPort for MockHardware {
    fn start_pump(&mut self) {
        self.pump_on = true;
        self.calls.push(ActuatorCall::StartPump);
    }

    fn stop_pump(&mut self) {
        self.pump_on = false;
        self.calls.push(ActuatorCall::StopPump);
    }

    fn is_pump_on(&self) -> bool {
        self.pump_on
    }

    fn all_off(&mut self) {
        self.pump_on = false;
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── MockStore ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockStore {
    pub store: HashMap<String, Vec<u8>>,
    pub fail_writes: bool,
}

impl StoragePort for MockStore {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let k = format!("{}::{}", namespace, key);
        match self.store.get(&k) {
            Some(v) => {
                let n = v.len().min(buf.len());
                buf[..n].copy_from_slice(&v[..n]);
                Ok(n)
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::IoError);
        }
        self.store.insert(format!("{}::{}", namespace, key), data.to_vec());
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        self.store.remove(&format!("{}::{}", namespace, key));
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.store.contains_key(&format!("{}::{}", namespace, key))
    }
}

impl ConfigPort for MockStore {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        Ok(SystemConfig::default())
    }

    fn save(&mut self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transitions(&self) -> Vec<(StateId, StateId)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::StateChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn rejections(&self) -> Vec<Rejection> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::CommandRejected(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
