//! Configuration file support for BMI Fit.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/bmifit/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub limits: Limits,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Which user commands act on when `--user` is not given
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_user")]
    pub default_user: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            default_user: default_user(),
        }
    }
}

/// Accepted measurement ranges
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Limits {
    #[serde(default = "default_min_weight_kg")]
    pub min_weight_kg: f64,

    #[serde(default = "default_max_weight_kg")]
    pub max_weight_kg: f64,

    #[serde(default = "default_min_height_cm")]
    pub min_height_cm: f64,

    #[serde(default = "default_max_height_cm")]
    pub max_height_cm: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_weight_kg: default_min_weight_kg(),
            max_weight_kg: default_max_weight_kg(),
            min_height_cm: default_min_height_cm(),
            max_height_cm: default_max_height_cm(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("bmifit")
}

fn default_user() -> String {
    "default".into()
}

fn default_min_weight_kg() -> f64 {
    20.0
}

fn default_max_weight_kg() -> f64 {
    300.0
}

fn default_min_height_cm() -> f64 {
    80.0
}

fn default_max_height_cm() -> f64 {
    250.0
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.check()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("bmifit").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    fn check(&self) -> Result<()> {
        let limits = &self.limits;
        if limits.min_weight_kg <= 0.0 || limits.min_weight_kg >= limits.max_weight_kg {
            return Err(Error::Config(format!(
                "invalid weight limits {}..{}",
                limits.min_weight_kg, limits.max_weight_kg
            )));
        }
        if limits.min_height_cm <= 0.0 || limits.min_height_cm >= limits.max_height_cm {
            return Err(Error::Config(format!(
                "invalid height limits {}..{}",
                limits.min_height_cm, limits.max_height_cm
            )));
        }
        crate::validation::validate_user_id(&self.profile.default_user)
            .map_err(|e| Error::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.profile.default_user, "default");
        assert_eq!(config.limits.min_weight_kg, 20.0);
        assert_eq!(config.limits.max_weight_kg, 300.0);
        assert_eq!(config.limits.min_height_cm, 80.0);
        assert_eq!(config.limits.max_height_cm, 250.0);
        assert!(config.data.data_dir.ends_with("bmifit"));
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.profile.default_user = "sam".into();
        config.save_to(&path).unwrap();

        let parsed = Config::load_from(&path).unwrap();
        assert_eq!(parsed.profile.default_user, "sam");
        assert_eq!(parsed.limits, config.limits);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[limits]
max_weight_kg = 250.0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.limits.max_weight_kg, 250.0);
        assert_eq!(config.limits.min_weight_kg, 20.0); // default
        assert_eq!(config.profile.default_user, "default");
    }

    #[test]
    fn test_inverted_limits_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[limits]\nmin_height_cm = 260.0\n").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
