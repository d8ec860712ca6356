//! Simulated actuator drivers.

pub mod pump;
