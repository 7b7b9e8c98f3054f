//! Workout plan builder.
//!
//! Maps a measurement and a goal to a [`WorkoutPlan`]:
//! - Target BMI and weekly schedule come from a fixed per-goal template
//! - Target weight inverts the BMI formula at the user's height
//! - Duration depends on the goal (weight-driven for lose/gain, a bounded
//!   recomposition window for fit)
//!
//! The builder is pure. It does not validate its input and does not call the
//! classifier.

use crate::classifier::round1;
use crate::{Goal, GymPlan, WorkoutPlan};

/// How the estimated duration is derived for a goal
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WeeksModel {
    /// Lose the difference down to the target weight
    Deficit {
        rate_kg_per_week: f64,
        /// Faster rate used once the current BMI reaches `high_bmi`
        high_bmi: f64,
        high_bmi_rate_kg_per_week: f64,
    },
    /// Gain the difference up to the target weight
    Surplus { rate_kg_per_week: f64 },
    /// Fixed window that widens with distance from the target BMI
    Recomposition {
        base_weeks: f64,
        weeks_per_bmi_unit: f64,
        min_weeks: u32,
        max_weeks: u32,
    },
}

/// Everything about a plan that is fixed by the goal alone
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GoalTemplate {
    pub target_bmi: f64,
    pub weeks: WeeksModel,
    pub gym_plan: GymPlan,
    pub notes: &'static [&'static str],
}

const LOSE: GoalTemplate = GoalTemplate {
    target_bmi: 24.0,
    weeks: WeeksModel::Deficit {
        rate_kg_per_week: 0.5,
        high_bmi: 30.0,
        high_bmi_rate_kg_per_week: 0.75,
    },
    gym_plan: GymPlan {
        strength_sessions_per_week: 3,
        strength_minutes_per_session: 45,
        cardio_sessions_per_week: 3,
        cardio_minutes_per_session: 35,
        steps_per_day: 8000,
    },
    notes: &[
        "Consistency beats intensity: keep up the strength sessions to preserve muscle while you lose fat.",
        "If you have joint, heart or other health conditions, check with a doctor before starting.",
    ],
};

const GAIN: GoalTemplate = GoalTemplate {
    target_bmi: 20.0,
    weeks: WeeksModel::Surplus {
        rate_kg_per_week: 0.35,
    },
    gym_plan: GymPlan {
        strength_sessions_per_week: 4,
        strength_minutes_per_session: 55,
        cardio_sessions_per_week: 2,
        cardio_minutes_per_session: 20,
        steps_per_day: 6000,
    },
    notes: &[
        "Use progressive overload and eat enough protein and total calories to support growth.",
        "Keep cardio short so you hold on to your endurance without burning the surplus.",
    ],
};

const FIT: GoalTemplate = GoalTemplate {
    target_bmi: 22.0,
    weeks: WeeksModel::Recomposition {
        base_weeks: 8.0,
        weeks_per_bmi_unit: 2.0,
        min_weeks: 8,
        max_weeks: 12,
    },
    gym_plan: GymPlan {
        strength_sessions_per_week: 3,
        strength_minutes_per_session: 50,
        cardio_sessions_per_week: 2,
        cardio_minutes_per_session: 25,
        steps_per_day: 7000,
    },
    notes: &[
        "BMI does not tell muscle from fat; track waist circumference or body-fat percentage as well.",
    ],
};

/// The fixed template for a goal
pub fn template(goal: Goal) -> &'static GoalTemplate {
    match goal {
        Goal::Lose => &LOSE,
        Goal::Gain => &GAIN,
        Goal::Fit => &FIT,
    }
}

/// Build a workout plan for one measurement and goal
///
/// `bmi` is expected to be `calculate_bmi(weight_kg, height_cm)`.
pub fn build_plan(weight_kg: f64, height_cm: f64, bmi: f64, goal: Goal) -> WorkoutPlan {
    let template = template(goal);

    let height_m = height_cm / 100.0;
    let target_weight_kg = round1(template.target_bmi * (height_m * height_m));

    // Displayed delta is rounded; the estimate below works from the raw difference.
    let delta_kg = round1(target_weight_kg - weight_kg);
    let estimated_weeks = estimate_weeks(template, weight_kg, target_weight_kg, bmi);

    tracing::debug!(
        "Built {} plan: target {} kg, {} weeks",
        goal,
        target_weight_kg,
        estimated_weeks
    );

    WorkoutPlan {
        goal,
        target_bmi: template.target_bmi,
        current_weight_kg: round1(weight_kg),
        target_weight_kg,
        delta_kg,
        estimated_weeks,
        summary: summary(goal, target_weight_kg, template.target_bmi),
        gym_plan: template.gym_plan,
        notes: template.notes.iter().map(|n| n.to_string()).collect(),
    }
}

fn estimate_weeks(template: &GoalTemplate, weight_kg: f64, target_weight_kg: f64, bmi: f64) -> u32 {
    match template.weeks {
        WeeksModel::Deficit {
            rate_kg_per_week,
            high_bmi,
            high_bmi_rate_kg_per_week,
        } => {
            let rate = if bmi >= high_bmi {
                high_bmi_rate_kg_per_week
            } else {
                rate_kg_per_week
            };
            weeks_to_cover(weight_kg - target_weight_kg, rate)
        }
        WeeksModel::Surplus { rate_kg_per_week } => {
            weeks_to_cover(target_weight_kg - weight_kg, rate_kg_per_week)
        }
        WeeksModel::Recomposition {
            base_weeks,
            weeks_per_bmi_unit,
            min_weeks,
            max_weeks,
        } => {
            let weeks = (base_weeks + (template.target_bmi - bmi).abs() * weeks_per_bmi_unit)
                .round()
                .clamp(f64::from(min_weeks), f64::from(max_weeks));
            weeks as u32
        }
    }
}

/// Whole weeks needed to move `needed_kg` at `rate` per week; zero if already there
fn weeks_to_cover(needed_kg: f64, rate: f64) -> u32 {
    let needed_kg = needed_kg.max(0.0);
    if needed_kg > 0.0 {
        (needed_kg / rate).ceil() as u32
    } else {
        0
    }
}

fn summary(goal: Goal, target_weight_kg: f64, target_bmi: f64) -> String {
    match goal {
        Goal::Lose => format!(
            "Goal: lose weight down to about {:.1} kg (BMI {:.1}) with a steady calorie deficit and regular training.",
            target_weight_kg, target_bmi
        ),
        Goal::Gain => format!(
            "Goal: build up to about {:.1} kg (BMI {:.1}) with strength training and a calorie surplus.",
            target_weight_kg, target_bmi
        ),
        Goal::Fit => format!(
            "Goal: keep your form around BMI {:.1} (about {:.1} kg) with strength work and moderate cardio.",
            target_bmi, target_weight_kg
        ),
    }
}
