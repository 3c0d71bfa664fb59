//! Audio routing
//!
//! The simulation only emits `GameEvent`s. `AudioManager` turns the sound
//! related ones into calls on whatever backend the host provides.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Normal or fast object launched
    Launch,
    /// Object sliced
    Whack,
    /// Bomb sliced
    Explosion,
    /// Object escaped off the bottom
    Wrong,
    /// Blade swipe, one of three variants (1..=3)
    Swoosh(u8),
}

/// Looping fuse sound while a bomb is live
pub const WARNING_CUE: &str = "sliceBombFuse.caf";

impl SoundEffect {
    /// Asset name for this effect
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundEffect::Launch => "launch.caf",
            SoundEffect::Whack => "whack.caf",
            SoundEffect::Explosion => "explosion.caf",
            SoundEffect::Wrong => "wrong.caf",
            SoundEffect::Swoosh(1) => "swoosh1.caf",
            SoundEffect::Swoosh(2) => "swoosh2.caf",
            SoundEffect::Swoosh(_) => "swoosh3.caf",
        }
    }
}

/// What a platform audio layer has to provide
pub trait AudioBackend {
    /// Fire-and-forget one-shot
    fn play(&mut self, name: &str, volume: f32);
    /// Start a looping sound, replacing any current loop
    fn start_loop(&mut self, name: &str, volume: f32);
    fn stop_loop(&mut self);
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    loop_active: bool,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            loop_active: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.backend.play(effect.file_name(), vol);
    }

    pub fn is_loop_active(&self) -> bool {
        self.loop_active
    }

    /// Route one simulation event
    pub fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Sound(effect) => self.play(*effect),
            GameEvent::WarningCue { active: true } => {
                // Restarting replaces the previous fuse loop
                if self.loop_active {
                    self.backend.stop_loop();
                }
                let vol = self.effective_volume();
                self.backend.start_loop(WARNING_CUE, vol);
                self.loop_active = true;
            }
            GameEvent::WarningCue { active: false } => {
                if self.loop_active {
                    self.backend.stop_loop();
                    self.loop_active = false;
                }
            }
            _ => {}
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// Backend that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogAudio {
    /// Every call made, for inspection
    pub calls: Vec<String>,
}

impl AudioBackend for LogAudio {
    fn play(&mut self, name: &str, volume: f32) {
        log::debug!("play {} at {:.2}", name, volume);
        self.calls.push(format!("play {name}"));
    }

    fn start_loop(&mut self, name: &str, volume: f32) {
        log::debug!("loop {} at {:.2}", name, volume);
        self.calls.push(format!("loop {name}"));
    }

    fn stop_loop(&mut self) {
        log::debug!("stop loop");
        self.calls.push("stop".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swoosh_variants() {
        assert_eq!(SoundEffect::Swoosh(1).file_name(), "swoosh1.caf");
        assert_eq!(SoundEffect::Swoosh(2).file_name(), "swoosh2.caf");
        assert_eq!(SoundEffect::Swoosh(3).file_name(), "swoosh3.caf");
    }

    #[test]
    fn test_routes_events() {
        let mut audio = AudioManager::new(LogAudio::default());
        audio.handle(&GameEvent::Sound(SoundEffect::Whack));
        audio.handle(&GameEvent::WarningCue { active: true });
        audio.handle(&GameEvent::WarningCue { active: true });
        audio.handle(&GameEvent::WarningCue { active: false });
        audio.handle(&GameEvent::WarningCue { active: false });
        audio.handle(&GameEvent::ScoreChanged { score: 1 });

        assert_eq!(
            audio.backend().calls,
            vec![
                "play whack.caf",
                "loop sliceBombFuse.caf",
                "stop",
                "loop sliceBombFuse.caf",
                "stop",
            ]
        );
        assert!(!audio.is_loop_active());
    }

    #[test]
    fn test_muted_skips_one_shots() {
        let mut audio = AudioManager::new(LogAudio::default());
        audio.set_muted(true);
        audio.play(SoundEffect::Explosion);
        assert!(audio.backend().calls.is_empty());
    }
}
