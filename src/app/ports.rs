//! Ports: the traits `AppService` and the runtime are written against.
//!
//! ```text
//!   SimHardware ─┐                        ┌─ LogEventSink / History
//!                ├─▶ Sensor/Actuator ─▶ AppService ─▶ EventSink
//!   MockHardware ┘                        └─ RecordingSink (tests)
//!   MemStore / FileStore ─▶ StoragePort + ConfigPort ◀─ session, main
//! ```
//!
//! Nothing in the domain names a concrete simulator; tests swap in
//! recording mocks through the same traits.

use crate::config::SystemConfig;
use crate::scheduler::TimerId;
use crate::sensors::environment::EnvironmentSnapshot;

// ───────────────────────────────────────────────────────────────
// Sensor port
// ───────────────────────────────────────────────────────────────

pub trait SensorPort {
    /// Take one soil moisture sample for the irrigation loop (%).
    fn read_moisture(&mut self) -> f32;

    /// Refresh the dashboard environment readings.
    fn read_environment(&mut self) -> EnvironmentSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Actuator port
// ───────────────────────────────────────────────────────────────

pub trait ActuatorPort {
    fn start_pump(&mut self);

    fn stop_pump(&mut self);

    fn is_pump_on(&self) -> bool;

    /// Switch every actuator off.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port
// ───────────────────────────────────────────────────────────────

/// Receives every [`AppEvent`](super::events::AppEvent): the log, the
/// history table, or a test recorder.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Where `SystemConfig` lives between runs.
///
/// Implementations MUST validate before persisting.  Invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    fn save(&mut self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage (login flag, config blob).
///
/// Keys are namespaced to prevent collisions between subsystems.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate
// ───────────────────────────────────────────────────────────────

/// Callback trait that the scheduler invokes when a timer fires.
///
/// The main loop implements this by pushing into its event queue; the
/// scheduler itself knows nothing about events.
pub trait SchedulerDelegate {
    fn on_timer_fired(&mut self, id: TimerId);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage.
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// The backing store failed.
    IoError,
}

#[derive(Debug)]
pub enum StorageError {
    NotFound,
    /// Storage is full.
    Full,
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl From<StorageError> for ConfigError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound => Self::NotFound,
            StorageError::Full | StorageError::IoError => Self::IoError,
        }
    }
}
