//! Capybara virtual pet: hourly stat decay with offline catch-up, a sticky
//! run-away state, and a projected alert schedule.
//!
//! Every operation takes `now` explicitly. Persistence and notification
//! delivery sit behind [`storage::PetStore`] and [`notify::AlertScheduler`].

pub mod alerts;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod notify;
pub mod sim;
pub mod storage;
pub mod telemetry;

pub use engine::PetEngine;
pub use error::{ActionError, ResetError};
pub use model::{
    ActionKind, PetEvent, PetPhase, PetState, ReconcileOutcome, ScheduledAlert, Severity,
    StatKind,
};
