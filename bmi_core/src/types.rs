//! Core domain types for the BMI Fit system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Training goals and the user's goal selection
//! - BMI categories and readings
//! - Workout plans and their weekly session template
//! - Persisted measurement records and user profiles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Goal Types
// ============================================================================

/// Training goal driving the plan builder
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Lose,
    Gain,
    Fit,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::Lose, Goal::Gain, Goal::Fit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Lose => "lose",
            Goal::Gain => "gain",
            Goal::Fit => "fit",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lose" => Ok(Goal::Lose),
            "gain" => Ok(Goal::Gain),
            "fit" => Ok(Goal::Fit),
            other => Err(crate::Error::Validation(format!(
                "unknown goal '{}' (expected lose, gain or fit)",
                other
            ))),
        }
    }
}

/// What the user has chosen as their goal
///
/// `Unset` and `Explicit(Goal::Fit)` are distinct states: only `Unset` is
/// ever replaced by a goal inferred from the latest BMI.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", content = "goal", rename_all = "snake_case")]
pub enum GoalSelection {
    #[default]
    Unset,
    Explicit(Goal),
}

impl fmt::Display for GoalSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalSelection::Unset => f.write_str("auto"),
            GoalSelection::Explicit(goal) => write!(f, "{}", goal),
        }
    }
}

impl FromStr for GoalSelection {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" | "unset" | "none" => Ok(GoalSelection::Unset),
            other => other
                .parse::<Goal>()
                .map(GoalSelection::Explicit)
                .map_err(|_| {
                    crate::Error::Validation(format!(
                        "unknown goal '{}' (expected lose, gain, fit or auto)",
                        other
                    ))
                }),
        }
    }
}

// ============================================================================
// BMI Types
// ============================================================================

/// WHO adult BMI category, ordered from lightest to most severe
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    ObesityClassI,
    ObesityClassII,
    ObesityClassIII,
}

impl BmiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::ObesityClassI => "Obesity class I",
            BmiCategory::ObesityClassII => "Obesity class II",
            BmiCategory::ObesityClassIII => "Obesity class III",
        }
    }

    /// Advisory text paired with the category
    pub fn note(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => {
                "Consider discussing your diet with a physician or dietitian."
            }
            BmiCategory::Normal => "Keep up your current activity level and diet.",
            BmiCategory::Overweight => {
                "Moderate physical activity and a diet adjustment would be beneficial."
            }
            BmiCategory::ObesityClassI => {
                "A specialist consultation and a weight-loss plan are recommended."
            }
            BmiCategory::ObesityClassII => {
                "Medical supervision and lifestyle correction are recommended."
            }
            BmiCategory::ObesityClassIII => {
                "Seek medical consultation urgently; comprehensive treatment is recommended."
            }
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A BMI value together with its category
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct BmiReading {
    pub bmi: f64,
    pub category: BmiCategory,
}

// ============================================================================
// Plan Types
// ============================================================================

/// Weekly gym schedule
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GymPlan {
    pub strength_sessions_per_week: u32,
    pub strength_minutes_per_session: u32,
    pub cardio_sessions_per_week: u32,
    pub cardio_minutes_per_session: u32,
    pub steps_per_day: u32,
}

/// A complete recommendation derived from one measurement and one goal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutPlan {
    pub goal: Goal,
    pub target_bmi: f64,
    pub current_weight_kg: f64,
    pub target_weight_kg: f64,
    pub delta_kg: f64,
    pub estimated_weeks: u32,
    pub summary: String,
    pub gym_plan: GymPlan,
    pub notes: Vec<String>,
}

// ============================================================================
// Persistence Types
// ============================================================================

/// A recorded body measurement
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MeasurementRecord {
    pub id: Uuid,
    pub user: String,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub bmi: f64,
    pub category: BmiCategory,
    pub recorded_at: DateTime<Utc>,
}

/// Per-user settings persisted between runs
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct UserProfile {
    #[serde(default)]
    pub goal: GoalSelection,
}
