//! Release Ledger - Backend Library
//!
//! Tracks release versions for clients through a forward-only lifecycle
//! (draft -> ready -> published) with an append-only audit trail.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, Result};
