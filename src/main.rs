//! Slice Dash entry point
//!
//! Runs a headless session with a simple autoplay bot, routing sound events
//! to a logging audio backend. Usage: `slice-dash [settings.json] [seed]`

use glam::Vec2;

use slice_dash::GameSettings;
use slice_dash::audio::{AudioManager, LogAudio};
use slice_dash::consts::*;
use slice_dash::sim::{Game, GamePhase, GameEvent, TickInput, TouchInput, tick};

/// Rendered frame time the host would deliver (60 Hz)
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after ten minutes of play
const MAX_FRAMES: u32 = 60 * 60 * 10;
/// Bot refuses cuts this close to a bomb
const BOMB_CAUTION: f32 = 140.0;

/// Swipes at the lowest falling target that is not near a bomb
#[derive(Default)]
struct AutoPlayer {
    touching: bool,
}

impl AutoPlayer {
    fn input(&mut self, game: &Game) -> TickInput {
        let bombs: Vec<Vec2> = game
            .registry
            .iter()
            .filter(|o| o.kind.is_bomb())
            .map(|o| o.pos)
            .collect();

        let target = game
            .registry
            .iter()
            .filter(|o| !o.kind.is_bomb() && o.vel.y < 0.0 && o.pos.y > 0.0)
            .filter(|o| bombs.iter().all(|b| b.distance(o.pos) > BOMB_CAUTION))
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|o| o.pos);

        let mut touches = Vec::new();
        match target {
            Some(pos) => {
                if !self.touching {
                    touches.push(TouchInput::Began(pos + Vec2::new(-20.0, 0.0)));
                    self.touching = true;
                }
                touches.push(TouchInput::Moved(pos));
            }
            None if self.touching => {
                touches.push(TouchInput::Ended);
                self.touching = false;
            }
            None => {}
        }
        TickInput { touches }
    }
}

fn seed_from_clock() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Slice Dash (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => GameSettings::load(&path)?,
        None => GameSettings::default(),
    };
    let seed = match args.next() {
        Some(seed) => seed.parse()?,
        None => seed_from_clock(),
    };

    let mut game = Game::new(settings, seed)?;
    let mut audio = AudioManager::new(LogAudio::default());
    let mut bot = AutoPlayer::default();
    let mut accumulator = 0.0f32;

    for _ in 0..MAX_FRAMES {
        // Touch events arrive once per rendered frame
        let mut input = bot.input(&game);

        accumulator += FRAME_DT;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut game, &input, SIM_DT);
            input.touches.clear();
            accumulator -= SIM_DT;
            substeps += 1;
        }

        for event in game.drain_events() {
            audio.handle(&event);
            if let GameEvent::GameOver { triggered_by_bomb } = event {
                log::info!("Game over (bomb: {})", triggered_by_bomb);
            }
        }

        if game.phase() == GamePhase::Ended {
            break;
        }
    }

    if game.phase() == GamePhase::Playing {
        log::warn!("Stopped after {} frames without a game over", MAX_FRAMES);
    }
    game.teardown();
    for event in game.drain_events() {
        audio.handle(&event);
    }

    println!("{}", serde_json::to_string_pretty(&game.snapshot())?);
    Ok(())
}
