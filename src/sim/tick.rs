//! Per-frame simulation tick
//!
//! One logical thread drives everything: the frame tick plus deferred timers
//! that fire from inside it. Within a frame the order is fixed so an object
//! leaving the scene is penalised before the same frame's touch can cut it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::object::{GameObject, HitKind};
use super::physics::PhysicsWorld;
use super::registry::ObjectRegistry;
use super::scheduler::SpawnScheduler;
use super::sequence::{SequencePlanner, SpawnSlot};
use super::slice::SliceDetector;
use super::state::{GameEvent, GamePhase, GameState, RemovalReason};
use super::timers::{Deferred, TimerQueue};
use crate::audio::SoundEffect;
use crate::error::ConfigError;
use crate::settings::GameSettings;

/// One raw touch event, in the order the host received it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TouchInput {
    Began(Vec2),
    Moved(Vec2),
    Ended,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    pub touches: Vec<TouchInput>,
}

/// End-of-run numbers for the HUD or a log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub seed: u64,
    pub score: u64,
    pub lives: u8,
    pub phase: GamePhase,
    pub triggered_by_bomb: Option<bool>,
    pub batches_issued: u32,
    pub objects_spawned: u32,
    pub elapsed_secs: f64,
}

/// A play session
#[derive(Debug, Clone)]
pub struct Game {
    pub settings: GameSettings,
    pub seed: u64,
    rng: Pcg32,
    /// Incremented on teardown; timers from older sessions are dropped
    pub session: u64,
    /// Seconds since the session started (keeps running after game over)
    pub time: f64,
    pub time_ticks: u64,
    pub state: GameState,
    pub scheduler: SpawnScheduler,
    pub registry: ObjectRegistry,
    pub slice: SliceDetector,
    pub physics: PhysicsWorld,
    /// Host-side timers; outlive a session so stale ones can be seen and dropped
    pub timers: TimerQueue,
    pub warning_cue_active: bool,
    pub objects_spawned: u32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl Game {
    /// Start a session with the opening sequence plus a random tail
    pub fn new(settings: GameSettings, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let planner = SequencePlanner::new(
            &settings.predefined_sequence,
            settings.random_tail_length,
            &mut rng,
        );
        Ok(Self::start(settings, seed, rng, planner, TimerQueue::new(), 1, 0.0))
    }

    /// Start a session that plays an explicit token sequence
    pub fn with_planner(
        settings: GameSettings,
        seed: u64,
        planner: SequencePlanner,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let rng = Pcg32::seed_from_u64(seed);
        Ok(Self::start(settings, seed, rng, planner, TimerQueue::new(), 1, 0.0))
    }

    fn start(
        settings: GameSettings,
        seed: u64,
        rng: Pcg32,
        planner: SequencePlanner,
        mut timers: TimerQueue,
        session: u64,
        now: f64,
    ) -> Self {
        // The opening batch waits for the scene to settle
        timers.schedule(
            now + settings.first_spawn_delay as f64,
            session,
            Deferred::Rearm,
        );
        log::info!(
            "Session {} started with seed {} ({} tokens prepared)",
            session,
            seed,
            planner.len()
        );

        Self {
            seed,
            rng,
            session,
            time: now,
            time_ticks: 0,
            state: GameState::new(settings.number_of_lives),
            scheduler: SpawnScheduler::new(&settings, planner),
            registry: ObjectRegistry::new(),
            slice: SliceDetector::new(settings.slice_path_capacity, settings.ribbon_fade),
            physics: PhysicsWorld::new(settings.gravity, settings.physics_speed),
            timers,
            warning_cue_active: false,
            objects_spawned: 0,
            events: Vec::new(),
            next_id: 1,
            settings,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take every side effect produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Issue the next batch now
    pub fn toss_next(&mut self) {
        let Some(batch) = self.scheduler.toss_next(self.state.phase) else {
            return;
        };
        for &slot in &batch.immediate {
            self.spawn_slot(slot);
        }
        for &(delay, slot) in &batch.deferred {
            self.timers.schedule(
                self.time + delay as f64,
                self.session,
                Deferred::ChainSpawn { slot },
            );
        }
        self.physics.speed = self.scheduler.params.fall_speed_multiplier;
    }

    fn spawn_slot(&mut self, slot: SpawnSlot) {
        let id = self.next_entity_id();
        let object = self.scheduler.spawn(id, slot, &mut self.rng);
        self.add_object(object);
    }

    /// Put a spawned object into play
    pub fn add_object(&mut self, object: GameObject) {
        self.events.push(GameEvent::ObjectSpawned {
            id: object.id,
            kind: object.kind,
        });
        if object.kind.is_bomb() {
            // Each new bomb restarts the fuse loop
            self.warning_cue_active = true;
            self.events.push(GameEvent::WarningCue { active: true });
        } else {
            self.events.push(GameEvent::Sound(SoundEffect::Launch));
        }
        self.objects_spawned += 1;
        self.registry.insert(object);
    }

    fn fire_timers(&mut self) {
        while let Some(entry) = self.timers.pop_due(self.time) {
            if entry.session != self.session {
                log::debug!(
                    "Dropping {:?} from torn-down session {}",
                    entry.action,
                    entry.session
                );
                continue;
            }
            match entry.action {
                Deferred::Rearm | Deferred::ChainSpawn { .. } if self.state.is_ended() => {
                    log::debug!("Dropping {:?} after game over", entry.action);
                }
                Deferred::Rearm => self.toss_next(),
                Deferred::ChainSpawn { slot } => self.spawn_slot(slot),
                Deferred::SwooshFinished => self.slice.swoosh_finished(),
            }
        }
    }

    fn expire_offscreen(&mut self) {
        if self.registry.is_empty() {
            return;
        }
        let expired = self.registry.expire_offscreen(self.settings.world_bottom);
        for object in expired {
            self.events.push(GameEvent::ObjectRemoved {
                id: object.id,
                reason: RemovalReason::OffScreen,
            });
            if !object.kind.is_bomb() && self.state.on_missed(&mut self.events) {
                self.enter_ended();
            }
        }
    }

    fn rearm_if_clear(&mut self) {
        if self.state.is_playing() && self.registry.is_empty() && self.scheduler.request_rearm() {
            let due = self.time + self.scheduler.params.popup_interval as f64;
            self.timers.schedule(due, self.session, Deferred::Rearm);
        }
    }

    fn handle_touch(&mut self, touch: TouchInput) {
        match touch {
            TouchInput::Began(point) => self.slice.begin_path(point),
            TouchInput::Moved(point) => {
                self.slice.extend_path(point);
                if self.slice.try_start_swoosh() {
                    let variant = self.rng.random_range(1..=3u8);
                    self.events.push(GameEvent::Sound(SoundEffect::Swoosh(variant)));
                    let due = self.time + self.settings.swoosh_duration as f64;
                    self.timers
                        .schedule(due, self.session, Deferred::SwooshFinished);
                }
                self.resolve_slice(point);
            }
            TouchInput::Ended => self.slice.end_path(),
        }
    }

    fn resolve_slice(&mut self, point: Vec2) {
        let hits = self.slice.test_intersections(point, &self.registry);
        for (object, hit) in hits {
            if self.state.is_ended() {
                break;
            }
            // Membership is the gate: already gone means already credited
            let Some(object) = self.registry.remove_on_hit(object.id) else {
                continue;
            };
            self.events.push(GameEvent::SliceHit {
                id: object.id,
                kind: object.kind,
                pos: object.pos,
            });
            self.events.push(GameEvent::ObjectRemoved {
                id: object.id,
                reason: RemovalReason::Sliced,
            });
            match hit {
                HitKind::Normal | HitKind::Fast => {
                    self.state.on_scored(object.kind.points(), &mut self.events);
                    self.events.push(GameEvent::Sound(SoundEffect::Whack));
                }
                HitKind::BombSubpart => {
                    self.events.push(GameEvent::Sound(SoundEffect::Explosion));
                    if self.state.on_bomb_hit(&mut self.events) {
                        self.enter_ended();
                    }
                }
            }
        }
    }

    /// Stop the fuse loop once no bomb is left
    fn reconcile_warning_cue(&mut self) {
        if self.warning_cue_active && !self.registry.has_bomb() {
            self.stop_warning_cue();
        }
    }

    fn stop_warning_cue(&mut self) {
        if self.warning_cue_active {
            self.warning_cue_active = false;
            self.events.push(GameEvent::WarningCue { active: false });
        }
    }

    /// Freeze the world once the state machine has ended the run
    fn enter_ended(&mut self) {
        self.physics.frozen = true;
        self.stop_warning_cue();
    }

    /// Remove everything still in play and invalidate pending timers
    pub fn teardown(&mut self) {
        for object in self.registry.drain_all() {
            self.events.push(GameEvent::ObjectRemoved {
                id: object.id,
                reason: RemovalReason::GameEnd,
            });
        }
        self.stop_warning_cue();
        self.physics.frozen = true;
        self.session += 1;
        log::info!(
            "Session torn down ({} timers orphaned)",
            self.timers.len()
        );
    }

    /// Tear down and begin a fresh session with a new seed
    pub fn restart(&mut self, seed: u64) {
        self.teardown();
        let mut rng = Pcg32::seed_from_u64(seed);
        let planner = SequencePlanner::new(
            &self.settings.predefined_sequence,
            self.settings.random_tail_length,
            &mut rng,
        );
        let mut fresh = Self::start(
            self.settings.clone(),
            seed,
            rng,
            planner,
            std::mem::take(&mut self.timers),
            self.session,
            self.time,
        );
        // Keep the teardown removals for the host
        fresh.events = std::mem::take(&mut self.events);
        *self = fresh;
    }

    pub fn snapshot(&self) -> SessionSummary {
        SessionSummary {
            seed: self.seed,
            score: self.state.score,
            lives: self.state.lives,
            phase: self.state.phase,
            triggered_by_bomb: self.state.triggered_by_bomb,
            batches_issued: self.scheduler.batches_issued,
            objects_spawned: self.objects_spawned,
            elapsed_secs: self.time,
        }
    }
}

/// Advance the session by one frame
pub fn tick(game: &mut Game, input: &TickInput, dt: f32) {
    game.time += dt as f64;
    game.time_ticks += 1;

    // Chain spawns and re-arms that came due
    game.fire_timers();

    game.physics.step(game.registry.iter_mut(), dt);

    // Expiry strictly before this frame's touches
    game.expire_offscreen();
    game.reconcile_warning_cue();
    game.rearm_if_clear();

    if game.state.is_ended() {
        if !input.touches.is_empty() {
            log::trace!("Ignoring {} touches after game over", input.touches.len());
        }
    } else {
        for &touch in &input.touches {
            game.handle_touch(touch);
            if game.state.is_ended() {
                break;
            }
        }
        game.reconcile_warning_cue();
    }

    game.slice.update(dt);
}
