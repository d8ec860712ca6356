//! Unified error types for the PlantCare simulator.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level loop's error handling uniform.  The irrigation core itself
//! never fails; these cover configuration, storage, the mock detector and
//! refused operator commands.

use core::fmt;

use crate::app::ports::{ConfigError, StorageError};

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum Error {
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// The key/value store failed.
    Storage(StorageError),
    /// The mock disease detector refused an operation.
    Detection(DetectionError),
    /// An operator command was refused by the irrigation simulator.
    Rejected(Rejection),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Detection(e) => write!(f, "detection: {e}"),
            Self::Rejected(e) => write!(f, "rejected: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Detection errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionError {
    /// The uploaded file's MIME type does not start with `image/`.
    NotAnImage,
    /// Analysis requested with nothing selected.
    NoImageSelected,
    /// A second analysis was requested while one is running.
    AlreadyAnalyzing,
}

impl fmt::Display for DetectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnImage => write!(f, "file is not an image"),
            Self::NoImageSelected => write!(f, "no image selected"),
            Self::AlreadyAnalyzing => write!(f, "analysis already in progress"),
        }
    }
}

impl From<DetectionError> for Error {
    fn from(e: DetectionError) -> Self {
        Self::Detection(e)
    }
}

// ---------------------------------------------------------------------------
// Command rejections
// ---------------------------------------------------------------------------

/// Why the irrigation simulator ignored an operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The pump is already running.
    PumpBusy,
    /// Manual watering is disabled while auto mode is on.
    AutoModeActive,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PumpBusy => write!(f, "pump already active"),
            Self::AutoModeActive => write!(f, "manual watering disabled in auto mode"),
        }
    }
}

impl From<Rejection> for Error {
    fn from(e: Rejection) -> Self {
        Self::Rejected(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_subsystem() {
        let e: Error = DetectionError::NotAnImage.into();
        assert_eq!(e.to_string(), "detection: file is not an image");

        let e: Error = Rejection::AutoModeActive.into();
        assert_eq!(e.to_string(), "rejected: manual watering disabled in auto mode");

        let e: Error = ConfigError::ValidationFailed("bad").into();
        assert_eq!(e.to_string(), "config: validation failed: bad");

        let e: Error = StorageError::IoError.into();
        assert_eq!(e.to_string(), "storage: I/O error");
    }

    #[test]
    fn wraps_into_anyhow_with_context() {
        let r: Result<()> = Err(StorageError::Full.into());
        let e = anyhow::Context::context(r, "opening store").unwrap_err();
        assert_eq!(e.to_string(), "opening store");
        assert_eq!(e.root_cause().to_string(), "storage: storage full");
    }
}
