//! Spawn scheduler
//!
//! Turns spawn tokens into timed object creation. Same-tick patterns spawn
//! everything at once; chains spawn their first object immediately and the
//! rest at even offsets across the chain delay.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::{DifficultyParams, DifficultyRamp};
use super::object::{BombSubpart, GameObject, ObjectKind};
use super::sequence::{SequencePlanner, SpawnSlot, SpawnToken};
use super::state::GamePhase;
use crate::consts::QUADRANT_WIDTH;
use crate::settings::GameSettings;

/// Kind rolled for a slot, before geometry is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RolledKind {
    Normal,
    Fast,
    Bomb,
}

impl RolledKind {
    /// 0 is a bomb, 1 is fast, anything above is normal
    fn from_roll(roll: u32) -> Self {
        match roll {
            0 => RolledKind::Bomb,
            1 => RolledKind::Fast,
            _ => RolledKind::Normal,
        }
    }
}

/// Roll an object kind for a slot
pub fn roll_kind<R: Rng>(slot: SpawnSlot, bomb_ratio: u32, rng: &mut R) -> RolledKind {
    let roll = match slot {
        SpawnSlot::ForceBomb => 0,
        SpawnSlot::NoBomb => rng.random_range(1..=bomb_ratio),
        SpawnSlot::Any => rng.random_range(0..=bomb_ratio),
    };
    RolledKind::from_roll(roll)
}

/// Launch position, velocity and spin for a new object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angular_vel: f32,
}

/// A batch as issued: what spawns now and what spawns later
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub token: SpawnToken,
    /// Slots to spawn on this tick
    pub immediate: Vec<SpawnSlot>,
    /// Slots to spawn later, with their delay in seconds
    pub deferred: Vec<(f32, SpawnSlot)>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.immediate.len() + self.deferred.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnScheduler {
    pub planner: SequencePlanner,
    pub params: DifficultyParams,
    pub ramp: DifficultyRamp,
    pub bomb_ratio: u32,
    /// A re-arm timer is pending; at most one at a time
    pub rearm_queued: bool,
    pub batches_issued: u32,
    spawn_min_x: f32,
    spawn_max_x: f32,
    spawn_y: f32,
    object_radius: f32,
    bomb_radius: f32,
}

impl SpawnScheduler {
    pub fn new(settings: &GameSettings, planner: SequencePlanner) -> Self {
        Self {
            planner,
            params: DifficultyParams::from_settings(settings),
            ramp: DifficultyRamp::from_settings(settings),
            bomb_ratio: settings.bomb_ratio,
            // The opening batch is already on a timer when a session starts
            rearm_queued: true,
            batches_issued: 0,
            spawn_min_x: settings.spawn_min_x,
            spawn_max_x: settings.spawn_max_x,
            spawn_y: settings.spawn_y,
            object_radius: settings.object_hit_radius,
            bomb_radius: settings.bomb_hit_radius,
        }
    }

    /// Consume the next token and lay out its batch.
    ///
    /// Applies the difficulty ramp once and clears the re-arm flag. Returns
    /// `None` when the run has ended or the sequence is exhausted.
    pub fn toss_next(&mut self, phase: GamePhase) -> Option<Batch> {
        if phase == GamePhase::Ended {
            return None;
        }
        // An exhausted sequence keeps the flag set so nothing re-arms again
        let token = self.planner.next_token()?;
        self.rearm_queued = false;

        let offsets = token.slot_offsets(self.params.chain_delay);
        let mut batch = Batch {
            token,
            immediate: Vec::new(),
            deferred: Vec::new(),
        };
        for (&slot, offset) in token.slots().iter().zip(offsets) {
            if offset > 0.0 {
                batch.deferred.push((offset, slot));
            } else {
                batch.immediate.push(slot);
            }
        }

        self.params = self.ramp.after_batch(self.params);
        self.batches_issued += 1;
        log::debug!(
            "Batch {} {:?}: popup {:.3}s, chain {:.3}s, speed {:.3}",
            self.batches_issued,
            token,
            self.params.popup_interval,
            self.params.chain_delay,
            self.params.fall_speed_multiplier
        );
        Some(batch)
    }

    /// Ask for a re-arm. Returns true if the caller should start the timer.
    pub fn request_rearm(&mut self) -> bool {
        if self.rearm_queued {
            return false;
        }
        self.rearm_queued = true;
        true
    }

    /// Build the object for one slot
    pub fn spawn<R: Rng>(&self, id: u32, slot: SpawnSlot, rng: &mut R) -> GameObject {
        let kind = match roll_kind(slot, self.bomb_ratio, rng) {
            RolledKind::Normal => ObjectKind::Normal {
                radius: self.object_radius,
            },
            RolledKind::Fast => ObjectKind::Fast {
                radius: self.object_radius,
            },
            RolledKind::Bomb => ObjectKind::Bomb {
                subpart: BombSubpart {
                    offset: Vec2::ZERO,
                    radius: self.bomb_radius,
                },
            },
        };
        let launch = self.launch(&kind, rng);
        GameObject::new(id, kind, launch.pos, launch.vel, launch.angular_vel)
    }

    /// Pick a launch below the scene, aimed back across it
    pub fn launch<R: Rng>(&self, kind: &ObjectKind, rng: &mut R) -> Launch {
        let x = rng.random_range(self.spawn_min_x..=self.spawn_max_x);
        let pos = Vec2::new(x, self.spawn_y);

        // Outer quadrants push hard, inner ones gently, always toward the far side
        let vx: i32 = if x < QUADRANT_WIDTH {
            rng.random_range(8..=15)
        } else if x < QUADRANT_WIDTH * 2.0 {
            rng.random_range(3..=5)
        } else if x < QUADRANT_WIDTH * 3.0 {
            -rng.random_range(3..=5)
        } else {
            -rng.random_range(8..=15)
        };
        let vy: i32 = rng.random_range(24..=32);

        let multiplier = kind.velocity_multiplier();
        Launch {
            pos,
            vel: Vec2::new(vx as f32, vy as f32) * multiplier,
            angular_vel: rng.random_range(-3.0f32..=3.0),
        }
    }
}
