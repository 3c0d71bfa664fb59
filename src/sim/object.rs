//! Spawned objects and their hit regions

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{circle_contains, rotate_offset};

/// The separately hittable part of a bomb, relative to its container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BombSubpart {
    /// Offset from the container centre (container-local, unrotated)
    pub offset: Vec2,
    pub radius: f32,
}

/// What an object is, with kind-specific payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    Normal { radius: f32 },
    /// Launches faster, worth more
    Fast { radius: f32 },
    /// Composite: a container that is only hittable through its sub-part
    Bomb { subpart: BombSubpart },
}

/// Which part of an object a slice touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitKind {
    Normal,
    Fast,
    BombSubpart,
}

/// Launch speed multiplier for fast objects
pub const FAST_VELOCITY_MULTIPLIER: f32 = 50.0;
/// Launch speed multiplier for everything else
pub const BASE_VELOCITY_MULTIPLIER: f32 = 40.0;

impl ObjectKind {
    pub fn is_bomb(&self) -> bool {
        matches!(self, ObjectKind::Bomb { .. })
    }

    /// Score awarded when sliced
    pub fn points(&self) -> u64 {
        match self {
            ObjectKind::Normal { .. } => 1,
            ObjectKind::Fast { .. } => 3,
            ObjectKind::Bomb { .. } => 0,
        }
    }

    pub fn velocity_multiplier(&self) -> f32 {
        match self {
            ObjectKind::Fast { .. } => FAST_VELOCITY_MULTIPLIER,
            _ => BASE_VELOCITY_MULTIPLIER,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Normal { .. } => "normal",
            ObjectKind::Fast { .. } => "fast",
            ObjectKind::Bomb { .. } => "bomb",
        }
    }
}

/// A live spawned object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameObject {
    pub id: u32,
    pub kind: ObjectKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Radians per second
    pub angular_vel: f32,
    /// Current orientation (radians)
    pub angle: f32,
    /// Marked for removal; compacted away by the registry
    #[serde(default)]
    pub removed: bool,
}

impl GameObject {
    pub fn new(id: u32, kind: ObjectKind, pos: Vec2, vel: Vec2, angular_vel: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            angular_vel,
            angle: 0.0,
            removed: false,
        }
    }

    /// Test a touch point against this object's hit region
    pub fn hit_test(&self, point: Vec2) -> Option<HitKind> {
        match self.kind {
            ObjectKind::Normal { radius } => {
                circle_contains(self.pos, radius, point).then_some(HitKind::Normal)
            }
            ObjectKind::Fast { radius } => {
                circle_contains(self.pos, radius, point).then_some(HitKind::Fast)
            }
            ObjectKind::Bomb { subpart } => {
                let center = self.pos + rotate_offset(subpart.offset, self.angle);
                circle_contains(center, subpart.radius, point).then_some(HitKind::BombSubpart)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal_at(pos: Vec2) -> GameObject {
        GameObject::new(1, ObjectKind::Normal { radius: 64.0 }, pos, Vec2::ZERO, 0.0)
    }

    #[test]
    fn test_points() {
        assert_eq!(ObjectKind::Normal { radius: 1.0 }.points(), 1);
        assert_eq!(ObjectKind::Fast { radius: 1.0 }.points(), 3);
    }

    #[test]
    fn test_fast_launches_faster() {
        assert!(
            ObjectKind::Fast { radius: 1.0 }.velocity_multiplier()
                > ObjectKind::Normal { radius: 1.0 }.velocity_multiplier()
        );
    }

    #[test]
    fn test_normal_hit_region() {
        let obj = normal_at(Vec2::new(100.0, 100.0));
        assert_eq!(obj.hit_test(Vec2::new(140.0, 100.0)), Some(HitKind::Normal));
        assert_eq!(obj.hit_test(Vec2::new(200.0, 100.0)), None);
    }

    #[test]
    fn test_bomb_only_hit_through_subpart() {
        let subpart = BombSubpart {
            offset: Vec2::new(50.0, 0.0),
            radius: 10.0,
        };
        let mut bomb = GameObject::new(
            2,
            ObjectKind::Bomb { subpart },
            Vec2::ZERO,
            Vec2::ZERO,
            0.0,
        );
        // Container centre is not itself a target
        assert_eq!(bomb.hit_test(Vec2::ZERO), None);
        assert_eq!(bomb.hit_test(Vec2::new(50.0, 0.0)), Some(HitKind::BombSubpart));

        // Sub-part follows the container's rotation
        bomb.angle = std::f32::consts::FRAC_PI_2;
        assert_eq!(bomb.hit_test(Vec2::new(50.0, 0.0)), None);
        assert_eq!(bomb.hit_test(Vec2::new(0.0, 50.0)), Some(HitKind::BombSubpart));
    }
}
