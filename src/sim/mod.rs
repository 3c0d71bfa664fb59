//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by object ID)
//! - Deferred work goes through the timer queue, never wall-clock callbacks
//! - No rendering or platform dependencies

pub mod difficulty;
pub mod object;
pub mod physics;
pub mod registry;
pub mod scheduler;
pub mod sequence;
pub mod slice;
pub mod state;
pub mod tick;
pub mod timers;

pub use difficulty::{DifficultyParams, DifficultyRamp};
pub use object::{BombSubpart, GameObject, HitKind, ObjectKind};
pub use physics::PhysicsWorld;
pub use registry::ObjectRegistry;
pub use scheduler::{Batch, Launch, RolledKind, SpawnScheduler, roll_kind};
pub use sequence::{CHAIN_LENGTH, SequencePlanner, SpawnSlot, SpawnToken};
pub use slice::{Ribbon, RibbonStroke, SliceDetector, SlicePath};
pub use state::{GameEvent, GamePhase, GameState, RemovalReason};
pub use tick::{Game, SessionSummary, TickInput, TouchInput, tick};
pub use timers::{Deferred, TimerEntry, TimerQueue};
