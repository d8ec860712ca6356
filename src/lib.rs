//! PlantCare simulator library.
//!
//! Exposes the simulation core (irrigation FSM, scheduler, runtime) and
//! the page models (dashboard, chat, detection, history, session) for the
//! console binary and integration tests.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod chat;
pub mod config;
pub mod console;
pub mod dashboard;
pub mod detection;
pub mod drivers;
pub mod error;
pub mod events;
pub mod fsm;
pub mod history;
pub mod runtime;
pub mod scheduler;
pub mod sensors;
pub mod session;
