//! Game settings
//!
//! Built once at session start and handed to the simulation by reference.
//! Nothing reads tuning from ambient global state.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::SpawnToken;

/// Game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    // === Game ===
    /// Lives at session start
    pub number_of_lives: u8,
    /// Popup interval multiplier applied after each batch (< 1)
    pub popup_time_reduction: f32,
    /// Chain delay multiplier applied after each batch (< 1)
    pub chain_delay_reduction: f32,
    /// Physics speed multiplier applied after each batch (> 1)
    pub physics_speed_increase: f32,
    /// Normal-to-bomb ratio for unconstrained slots
    pub bomb_ratio: u32,

    // === Sequence ===
    /// Delay before re-arming once the scene is clear (seconds)
    pub popup_time: f32,
    /// Total span of a chain batch (seconds)
    pub chain_delay: f32,
    /// Opening tokens, played before the random tail
    pub predefined_sequence: Vec<SpawnToken>,
    /// Number of random tokens appended after the opening
    pub random_tail_length: usize,
    /// Delay before the very first batch (seconds)
    pub first_spawn_delay: f32,

    // === World ===
    /// Initial physics speed multiplier
    pub physics_speed: f32,
    /// Vertical gravity (world units/s², negative is down)
    pub gravity: f32,
    /// Objects below this height have left the scene
    pub world_bottom: f32,
    /// Horizontal spawn band
    pub spawn_min_x: f32,
    pub spawn_max_x: f32,
    /// Spawn height (below the visible scene)
    pub spawn_y: f32,
    /// Hit radius for normal and fast objects
    pub object_hit_radius: f32,
    /// Hit radius of the bomb sub-part
    pub bomb_hit_radius: f32,

    // === Slice ===
    /// Touch samples kept for the ribbon
    pub slice_path_capacity: usize,
    /// Length of the swoosh cue; further swooshes are suppressed meanwhile
    pub swoosh_duration: f32,
    /// Ribbon fade after the finger lifts (seconds)
    pub ribbon_fade: f32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            number_of_lives: 3,
            popup_time_reduction: 0.991,
            chain_delay_reduction: 0.99,
            physics_speed_increase: 1.02,
            bomb_ratio: 6,

            popup_time: 0.9,
            chain_delay: 3.0,
            predefined_sequence: vec![
                SpawnToken::SingleSafe,
                SpawnToken::SingleSafe,
                SpawnToken::DoubleOneBomb,
                SpawnToken::DoubleOneBomb,
                SpawnToken::Triple,
                SpawnToken::SingleAny,
                SpawnToken::Chain,
            ],
            random_tail_length: 1000,
            first_spawn_delay: 2.0,

            physics_speed: 0.85,
            gravity: -900.0,
            world_bottom: -140.0,
            spawn_min_x: 64.0,
            spawn_max_x: 960.0,
            spawn_y: -128.0,
            object_hit_radius: 64.0,
            bomb_hit_radius: 48.0,

            slice_path_capacity: 12,
            swoosh_duration: 0.35,
            ribbon_fade: 0.25,
        }
    }
}

impl GameSettings {
    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Check every value is usable by the simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        let reals = [
            self.popup_time_reduction,
            self.chain_delay_reduction,
            self.physics_speed_increase,
            self.popup_time,
            self.chain_delay,
            self.first_spawn_delay,
            self.physics_speed,
            self.gravity,
            self.world_bottom,
            self.spawn_min_x,
            self.spawn_max_x,
            self.spawn_y,
            self.object_hit_radius,
            self.bomb_hit_radius,
            self.swoosh_duration,
            self.ribbon_fade,
        ];
        if !reals.iter().all(|v| v.is_finite()) {
            return Err(ConfigError::Invalid("settings must be finite numbers"));
        }
        if self.number_of_lives == 0 {
            return Err(ConfigError::Invalid("number_of_lives must be at least 1"));
        }
        if self.bomb_ratio == 0 {
            return Err(ConfigError::Invalid("bomb_ratio must be at least 1"));
        }
        if !(self.popup_time > 0.0 && self.chain_delay > 0.0 && self.physics_speed > 0.0) {
            return Err(ConfigError::Invalid(
                "popup_time, chain_delay and physics_speed must be positive",
            ));
        }
        let is_reduction = |f: f32| f > 0.0 && f < 1.0;
        if !is_reduction(self.popup_time_reduction) || !is_reduction(self.chain_delay_reduction) {
            return Err(ConfigError::Invalid("reduction factors must be in (0, 1)"));
        }
        if self.physics_speed_increase <= 1.0 {
            return Err(ConfigError::Invalid("physics_speed_increase must be above 1"));
        }
        if self.first_spawn_delay < 0.0 {
            return Err(ConfigError::Invalid("first_spawn_delay must not be negative"));
        }
        if self.spawn_min_x > self.spawn_max_x {
            return Err(ConfigError::Invalid("spawn band is empty"));
        }
        if self.spawn_y <= self.world_bottom {
            return Err(ConfigError::Invalid("spawn_y must be above world_bottom"));
        }
        if self.object_hit_radius <= 0.0 || self.bomb_hit_radius <= 0.0 {
            return Err(ConfigError::Invalid("hit radii must be positive"));
        }
        if self.slice_path_capacity == 0 {
            return Err(ConfigError::Invalid("slice_path_capacity must be at least 1"));
        }
        if self.predefined_sequence.is_empty() && self.random_tail_length == 0 {
            return Err(ConfigError::Invalid("spawn sequence would be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = GameSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.predefined_sequence.len(), 7);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = GameSettings::from_json_str(r#"{ "number_of_lives": 5 }"#).unwrap();
        assert_eq!(settings.number_of_lives, 5);
        assert_eq!(settings.bomb_ratio, 6);
        assert_eq!(settings.chain_delay, 3.0);
    }

    #[test]
    fn test_sequence_from_json() {
        let settings =
            GameSettings::from_json_str(r#"{ "predefined_sequence": ["Chain", "FastChain"] }"#)
                .unwrap();
        assert_eq!(
            settings.predefined_sequence,
            vec![SpawnToken::Chain, SpawnToken::FastChain]
        );
    }

    #[test]
    fn test_rejects_bad_factors() {
        let err = GameSettings::from_json_str(r#"{ "popup_time_reduction": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = GameSettings::from_json_str(r#"{ "physics_speed_increase": 0.9 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_non_finite_values() {
        // 1e39 overflows f32 to infinity
        let err = GameSettings::from_json_str(
            r#"{ "spawn_min_x": 1e39, "spawn_max_x": 1e39, "first_spawn_delay": 0.0 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let settings = GameSettings {
            gravity: f32::NAN,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = GameSettings {
            swoosh_duration: f32::INFINITY,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_spawn_below_world_bottom() {
        let err = GameSettings::from_json_str(r#"{ "spawn_y": -500.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let settings = GameSettings {
            spawn_y: -140.0,
            world_bottom: -140.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_lives() {
        let settings = GameSettings {
            number_of_lives: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        let err = GameSettings::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = GameSettings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
