//! Tunable parameters of the simulation loaded from TOML.

use std::time::Duration;

use serde::Deserialize;
use waypoint_defence_core::SetupError;

/// Tunable parameters consumed when constructing or resetting a world.
///
/// Every field has a default, so partial TOML documents are accepted.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Currency granted at construction and after a reset.
    pub starting_currency: i64,
    /// Life points granted at construction and after a reset.
    pub starting_life_points: u32,
    /// Delay between two consecutive spawns, in milliseconds.
    pub spawn_delay_ms: u64,
    /// Number of waves in the campaign.
    pub final_wave: u32,
    /// Side length of a map tile in world units.
    pub tile_length: f32,
    /// Travel speed of projectiles in world units per second.
    pub projectile_speed: f32,
    /// Distance below which a projectile resolves against its target.
    pub projectile_arrival_threshold: f32,
    /// Half side of the square hit box used when picking critters.
    pub critter_half_extent: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            starting_currency: 1_000,
            starting_life_points: 10,
            spawn_delay_ms: 1_000,
            final_wave: 3,
            tile_length: 64.0,
            projectile_speed: 200.0,
            projectile_arrival_threshold: 15.0,
            critter_half_extent: 16.0,
        }
    }
}

impl Config {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, SetupError> {
        let config: Self =
            toml::from_str(contents).map_err(|error| SetupError::InvalidConfig(error.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.final_wave == 0 {
            return Err(SetupError::InvalidConfig(
                "final_wave must be at least 1".to_owned(),
            ));
        }
        if self.starting_life_points == 0 {
            return Err(SetupError::InvalidConfig(
                "starting_life_points must be at least 1".to_owned(),
            ));
        }

        let lengths = [
            ("tile_length", self.tile_length),
            ("projectile_speed", self.projectile_speed),
            ("projectile_arrival_threshold", self.projectile_arrival_threshold),
            ("critter_half_extent", self.critter_half_extent),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value <= 0.0 {
                return Err(SetupError::InvalidConfig(format!(
                    "{name} must be positive and finite (received {value})"
                )));
            }
        }
        Ok(())
    }

    /// Delay between two consecutive spawns.
    #[must_use]
    pub fn spawn_delay(&self) -> Duration {
        Duration::from_millis(self.spawn_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_keep_defaults() {
        let config = Config::from_toml_str("starting_currency = 250\n").expect("valid config");
        assert_eq!(config.starting_currency, 250);
        assert_eq!(config.starting_life_points, 10);
        assert_eq!(config.spawn_delay(), Duration::from_secs(1));
    }

    #[test]
    fn rejects_unknown_fields_and_bad_values() {
        assert!(matches!(
            Config::from_toml_str("lives = 3"),
            Err(SetupError::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::from_toml_str("projectile_speed = -1.0"),
            Err(SetupError::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::from_toml_str("final_wave = 0"),
            Err(SetupError::InvalidConfig(_))
        ));
    }
}
