//! Slice Dash - slice the falling objects, dodge the bombs
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawn sequencing, slicing, game state)
//! - `settings`: Immutable game tuning, loaded once per session
//! - `audio`: Sound catalogue and the backend seam the host plugs into

pub mod audio;
pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::GameSettings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Scene dimensions (world units, origin bottom-left)
    pub const SCENE_WIDTH: f32 = 1024.0;
    pub const SCENE_HEIGHT: f32 = 768.0;

    /// Horizontal quadrant boundaries used to aim launches back across the scene
    pub const QUADRANT_WIDTH: f32 = SCENE_WIDTH / 4.0;

    /// Background ribbon stroke
    pub const RIBBON_BG_WIDTH: f32 = 9.0;
    pub const RIBBON_BG_COLOR: [f32; 4] = [1.0, 0.9, 0.0, 1.0];
    /// Foreground ribbon stroke
    pub const RIBBON_FG_WIDTH: f32 = 5.0;
    pub const RIBBON_FG_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

/// True if `point` lies inside (or on) the circle
#[inline]
pub fn circle_contains(center: Vec2, radius: f32, point: Vec2) -> bool {
    (point - center).length_squared() <= radius * radius
}

/// Rotate a local offset by `angle` radians
#[inline]
pub fn rotate_offset(offset: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(offset)
}
