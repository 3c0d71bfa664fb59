//! Reference physics step
//!
//! Plain Newtonian integration under constant gravity, scaled by a global
//! speed multiplier. Objects never collide with each other.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::object::GameObject;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsWorld {
    pub gravity: Vec2,
    /// Time scale applied to every step
    pub speed: f32,
    /// Frozen worlds do not advance (game over)
    pub frozen: bool,
}

impl PhysicsWorld {
    pub fn new(gravity_y: f32, speed: f32) -> Self {
        Self {
            gravity: Vec2::new(0.0, gravity_y),
            speed,
            frozen: false,
        }
    }

    /// Advance all objects by `dt` seconds of wall time
    pub fn step<'a>(&self, objects: impl Iterator<Item = &'a mut GameObject>, dt: f32) {
        if self.frozen {
            return;
        }
        let dt = dt * self.speed;
        for object in objects {
            // Semi-implicit Euler
            object.vel += self.gravity * dt;
            object.pos += object.vel * dt;
            object.angle += object.angular_vel * dt;
        }
    }
}
