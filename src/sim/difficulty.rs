//! Difficulty ramp
//!
//! After every batch the popup interval and chain delay shrink and the fall
//! speed grows. Applied once per batch, never per object.

use serde::{Deserialize, Serialize};

use crate::settings::GameSettings;

/// Current pacing values. All strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Delay before re-arming once the scene is clear (seconds)
    pub popup_interval: f32,
    /// Total span of a chain batch (seconds)
    pub chain_delay: f32,
    /// Physics speed multiplier
    pub fall_speed_multiplier: f32,
}

impl DifficultyParams {
    pub fn from_settings(settings: &GameSettings) -> Self {
        Self {
            popup_interval: settings.popup_time,
            chain_delay: settings.chain_delay,
            fall_speed_multiplier: settings.physics_speed,
        }
    }
}

/// Fixed per-batch factors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyRamp {
    pub popup_reduction: f32,
    pub chain_reduction: f32,
    pub speed_growth: f32,
}

impl DifficultyRamp {
    pub fn from_settings(settings: &GameSettings) -> Self {
        Self {
            popup_reduction: settings.popup_time_reduction,
            chain_reduction: settings.chain_delay_reduction,
            speed_growth: settings.physics_speed_increase,
        }
    }

    /// Pacing for the next batch
    pub fn after_batch(&self, params: DifficultyParams) -> DifficultyParams {
        DifficultyParams {
            popup_interval: params.popup_interval * self.popup_reduction,
            chain_delay: params.chain_delay * self.chain_reduction,
            fall_speed_multiplier: params.fall_speed_multiplier * self.speed_growth,
        }
    }
}
