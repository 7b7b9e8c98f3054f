//! BMI calculation and WHO category classification.
//!
//! Pure functions with no state. Input validation happens in
//! [`crate::validation`] before values reach this layer.

use crate::{BmiCategory, BmiReading};

/// Category thresholds, checked in order; the first one `bmi` is below wins
const THRESHOLDS: [(f64, BmiCategory); 5] = [
    (18.5, BmiCategory::Underweight),
    (25.0, BmiCategory::Normal),
    (30.0, BmiCategory::Overweight),
    (35.0, BmiCategory::ObesityClassI),
    (40.0, BmiCategory::ObesityClassII),
];

/// Compute BMI as `weight_kg / (height_cm / 100)^2`
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Map a BMI value to its category
///
/// Boundary values belong to the heavier category. Anything at or above 40
/// (and, in practice, anything that fails every comparison) is class III.
pub fn classify(bmi: f64) -> BmiCategory {
    THRESHOLDS
        .iter()
        .find(|(upper, _)| bmi < *upper)
        .map(|(_, category)| *category)
        .unwrap_or(BmiCategory::ObesityClassIII)
}

/// Calculate and classify in one step
pub fn assess(weight_kg: f64, height_cm: f64) -> BmiReading {
    let bmi = calculate_bmi(weight_kg, height_cm);
    BmiReading {
        bmi,
        category: classify(bmi),
    }
}

/// Round to one decimal place, halves away from zero
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
