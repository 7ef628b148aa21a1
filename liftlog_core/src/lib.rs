#![forbid(unsafe_code)]

//! Core domain model and business logic for the liftlog workout log.
//!
//! This crate provides:
//! - Domain types (workout records, sets, statistics report)
//! - Submission validation
//! - Statistics engine (rolling volume, best estimated 1RM)
//! - CSV export
//! - Persistence (locked JSON store with atomic replacement)
//! - A transport-agnostic request router

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod validation;
pub mod stats;
pub mod export;
pub mod store;
pub mod api;

// Re-export commonly used types
pub use error::{Error, Result, ValidationError};
pub use types::*;
pub use config::Config;
pub use validation::{validate, WorkoutDraft, SetDraft};
pub use stats::compute;
pub use export::format_csv;
pub use store::{JsonFileStore, MemoryStore, WorkoutStore};
pub use api::{Api, Method, Request, Response};
