//! Game state and the Playing → Ended state machine
//!
//! Score only grows and lives only shrink while Playing. Once Ended the
//! state is frozen; every further transition attempt is a no-op.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::object::ObjectKind;
use crate::audio::SoundEffect;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended (terminal)
    Ended,
}

/// Why an object left the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Fell below the world bottom
    OffScreen,
    /// Cut by the player
    Sliced,
    /// Session torn down
    GameEnd,
}

/// Side effects for the host (scene, audio, HUD), in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ObjectSpawned { id: u32, kind: ObjectKind },
    ObjectRemoved { id: u32, reason: RemovalReason },
    Sound(SoundEffect),
    /// Bomb warning loop started (restarted) or stopped
    WarningCue { active: bool },
    /// Slice landed; hosts play the hit effect at `pos`
    SliceHit { id: u32, kind: ObjectKind, pos: Vec2 },
    ScoreChanged { score: u64 },
    LifeLost { slot: usize },
    GameOver { triggered_by_bomb: bool },
}

/// Score, lives and phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    pub lives: u8,
    pub phase: GamePhase,
    /// One indicator per starting life; `true` once lost
    pub life_slots: Vec<bool>,
    /// Set when the run ends
    pub triggered_by_bomb: Option<bool>,
}

impl GameState {
    pub fn new(lives: u8) -> Self {
        Self {
            score: 0,
            lives,
            phase: GamePhase::Playing,
            life_slots: vec![false; lives as usize],
            triggered_by_bomb: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_ended(&self) -> bool {
        self.phase == GamePhase::Ended
    }

    /// A normal or fast object escaped. Returns true if this ended the run.
    pub fn on_missed(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if !self.is_playing() || self.lives == 0 {
            return false;
        }
        self.lives -= 1;
        events.push(GameEvent::Sound(SoundEffect::Wrong));

        let slot = self.life_slots.len() - self.lives as usize - 1;
        self.life_slots[slot] = true;
        events.push(GameEvent::LifeLost { slot });

        if self.lives == 0 {
            self.mark_all_lives_lost();
            return self.end(false, events);
        }
        false
    }

    /// A bomb was sliced: the run ends whatever the life count
    pub fn on_bomb_hit(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.mark_all_lives_lost();
        self.end(true, events)
    }

    pub fn on_scored(&mut self, delta: u64, events: &mut Vec<GameEvent>) {
        if !self.is_playing() {
            return;
        }
        self.score += delta;
        events.push(GameEvent::ScoreChanged { score: self.score });
    }

    pub fn lost_slots(&self) -> usize {
        self.life_slots.iter().filter(|lost| **lost).count()
    }

    fn mark_all_lives_lost(&mut self) {
        self.life_slots.iter_mut().for_each(|lost| *lost = true);
    }

    /// Playing → Ended, surfacing game over exactly once
    fn end(&mut self, triggered_by_bomb: bool, events: &mut Vec<GameEvent>) -> bool {
        if self.is_ended() {
            return false;
        }
        self.phase = GamePhase::Ended;
        self.triggered_by_bomb = Some(triggered_by_bomb);
        events.push(GameEvent::GameOver { triggered_by_bomb });
        log::info!(
            "Game over (bomb: {}) with score {}",
            triggered_by_bomb,
            self.score
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_overs(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count()
    }

    #[test]
    fn test_third_miss_ends_the_run() {
        let mut state = GameState::new(3);
        let mut events = Vec::new();

        assert!(!state.on_missed(&mut events));
        assert_eq!(state.lives, 2);
        assert_eq!(state.life_slots, vec![true, false, false]);
        assert!(!state.on_missed(&mut events));
        assert_eq!(state.phase, GamePhase::Playing);

        assert!(state.on_missed(&mut events));
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.triggered_by_bomb, Some(false));
        assert_eq!(state.lost_slots(), 3);
        assert_eq!(game_overs(&events), 1);

        // Further misses change nothing
        assert!(!state.on_missed(&mut events));
        assert_eq!(state.lives, 0);
        assert_eq!(game_overs(&events), 1);
    }

    #[test]
    fn test_bomb_hit_ends_with_full_lives() {
        let mut state = GameState::new(3);
        let mut events = Vec::new();

        assert!(state.on_bomb_hit(&mut events));
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.lives, 3);
        assert_eq!(state.lost_slots(), 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.triggered_by_bomb, Some(true));

        // Second transition attempt is a no-op
        assert!(!state.on_bomb_hit(&mut events));
        assert_eq!(game_overs(&events), 1);
    }

    #[test]
    fn test_score_frozen_after_end() {
        let mut state = GameState::new(1);
        let mut events = Vec::new();

        state.on_scored(1, &mut events);
        state.on_scored(3, &mut events);
        assert_eq!(state.score, 4);

        state.on_missed(&mut events);
        assert!(state.is_ended());
        state.on_scored(3, &mut events);
        assert_eq!(state.score, 4);
    }

    #[test]
    fn test_miss_plays_wrong_cue() {
        let mut state = GameState::new(3);
        let mut events = Vec::new();
        state.on_missed(&mut events);
        assert_eq!(
            events,
            vec![
                GameEvent::Sound(SoundEffect::Wrong),
                GameEvent::LifeLost { slot: 0 }
            ]
        );
    }
}
