//! Game engine shared by every campusquiz minigame.
//!
//! This crate owns the persistent profile store, the question bank, the timed
//! quiz session state machine and the leaderboards built on top of them.

pub mod bank;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod leaderboard;
pub mod model;
pub mod progress;
pub mod session;
pub mod store;

pub use error::{Error, Result};
