use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::drones::MAX_FUEL_CAPACITY;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tunables for one simulation run. Missing JSON fields take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub starting_fuel: f32,
    /// Map units per second.
    pub drone_speed: f32,
    pub arrival_epsilon: f32,
    pub fuel_per_unit_distance: f32,
    pub weather_refresh_secs: f32,
    pub weather_seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            starting_fuel: MAX_FUEL_CAPACITY,
            drone_speed: 4.0,
            arrival_epsilon: 0.05,
            fuel_per_unit_distance: 0.05,
            weather_refresh_secs: 30.0,
            weather_seed: 7,
        }
    }
}

impl SimConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: SimConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=MAX_FUEL_CAPACITY).contains(&self.starting_fuel) {
            return Err(ConfigError::Invalid(format!(
                "starting_fuel {} outside 0..={MAX_FUEL_CAPACITY}",
                self.starting_fuel
            )));
        }
        if !(self.drone_speed > 0.0) {
            return Err(ConfigError::Invalid("drone_speed must be positive".into()));
        }
        if !(self.arrival_epsilon > 0.0) {
            return Err(ConfigError::Invalid("arrival_epsilon must be positive".into()));
        }
        if !(self.fuel_per_unit_distance >= 0.0) {
            return Err(ConfigError::Invalid("fuel_per_unit_distance must not be negative".into()));
        }
        if !(self.weather_refresh_secs > 0.0) {
            return Err(ConfigError::Invalid("weather_refresh_secs must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = SimConfig::from_json_str(r#"{ "starting_fuel": 15.0, "drone_speed": 8.0 }"#).unwrap();
        assert_eq!(cfg.starting_fuel, 15.0);
        assert_eq!(cfg.drone_speed, 8.0);
        assert_eq!(cfg.arrival_epsilon, SimConfig::default().arrival_epsilon);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(matches!(
            SimConfig::from_json_str(r#"{ "starting_fuel": 140.0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SimConfig::from_json_str(r#"{ "drone_speed": 0.0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SimConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
