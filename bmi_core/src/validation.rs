//! Input validation applied before values reach the calculation layer.

use crate::config::Limits;
use crate::{Error, Result};

impl Limits {
    /// Reject non-finite or out-of-range weight/height
    pub fn validate(&self, weight_kg: f64, height_cm: f64) -> Result<()> {
        if !weight_kg.is_finite() || weight_kg < self.min_weight_kg || weight_kg > self.max_weight_kg {
            return Err(Error::Validation(format!(
                "weight must be between {} and {} kg, got {}",
                self.min_weight_kg, self.max_weight_kg, weight_kg
            )));
        }

        if !height_cm.is_finite() || height_cm < self.min_height_cm || height_cm > self.max_height_cm {
            return Err(Error::Validation(format!(
                "height must be between {} and {} cm, got {}",
                self.min_height_cm, self.max_height_cm, height_cm
            )));
        }

        Ok(())
    }
}

/// Check that a user id is safe to use as a file name
pub fn validate_user_id(user: &str) -> Result<()> {
    let valid_chars = user
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if user.is_empty() || user.len() > 64 || !valid_chars {
        return Err(Error::Validation(format!(
            "user id '{}' must be 1-64 characters of letters, digits, '_' or '-'",
            user
        )));
    }

    Ok(())
}
