//! Application core: pure irrigation logic with no I/O.
//!
//! This module contains the irrigation rules for the PlantCare simulator:
//! FSM orchestration, operator commands and the watering log.
//! All interaction with the simulated sensor and pump happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! with mock adapters.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
