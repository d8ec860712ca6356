//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters or the simulated hardware.  Time is always
//! driven explicitly, so nothing here sleeps.

mod app_service_tests;
mod mock_hw;
mod runtime_tests;
mod session_tests;
