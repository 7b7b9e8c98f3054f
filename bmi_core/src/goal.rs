//! Goal resolution.
//!
//! The plan builder takes a goal as a plain parameter. This module decides
//! which goal to pass when the user has not picked one:
//! - An explicit choice always wins
//! - Otherwise the goal is inferred from the latest BMI
//! - With no BMI on record, default to `Fit`

use crate::{Goal, GoalSelection};

/// Suggest a goal from a BMI value
pub fn suggest_goal(bmi: f64) -> Goal {
    if bmi >= 25.0 {
        Goal::Lose
    } else if bmi < 18.5 {
        Goal::Gain
    } else {
        Goal::Fit
    }
}

/// Resolve the goal to plan for
pub fn resolve_goal(selection: GoalSelection, latest_bmi: Option<f64>) -> Goal {
    match selection {
        GoalSelection::Explicit(goal) => goal,
        GoalSelection::Unset => match latest_bmi {
            Some(bmi) => {
                let goal = suggest_goal(bmi);
                tracing::debug!("No goal selected, inferred {} from BMI {:.1}", goal, bmi);
                goal
            }
            None => Goal::Fit,
        },
    }
}
