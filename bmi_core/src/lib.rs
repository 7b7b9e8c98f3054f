#![forbid(unsafe_code)]

//! Core domain model and business logic for the BMI Fit system.
//!
//! This crate provides:
//! - Domain types (goals, BMI categories, workout plans, measurements)
//! - BMI classifier
//! - Workout plan builder
//! - Goal resolution
//! - Persistence (measurement history, profiles, CSV export)

pub mod types;
pub mod error;
pub mod classifier;
pub mod plan;
pub mod goal;
pub mod config;
pub mod validation;
pub mod logging;
pub mod history;
pub mod profile;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use classifier::{assess, calculate_bmi, classify, round1};
pub use plan::build_plan;
pub use goal::{resolve_goal, suggest_goal};
pub use config::{Config, Limits};
pub use history::{HistoryStore, JsonlHistoryStore};
pub use profile::profile_path;
pub use export::export_csv;
