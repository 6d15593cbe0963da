//! Scroll Brawler entry point
//!
//! Runs a headless scripted session: the player walks right, swinging at
//! whatever is in reach and jumping now and then, until the frame budget
//! runs out or the session ends. Draw calls go to a recording surface and
//! audio to the log.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use scroll_brawler::audio::{AudioBank, AudioCue, Unavailable};
use scroll_brawler::platform::InputState;
use scroll_brawler::renderer::{ImageId, RecordingSurface, SpriteAtlas};
use scroll_brawler::sim::{GameEvent, Phase};
use scroll_brawler::{Game, Settings, Tuning};

/// Target frame time of the scripted host
const FRAME_MS: f64 = 1000.0 / 60.0;

/// Image sizes of the shipped assets
struct FixedAtlas;

impl SpriteAtlas for FixedAtlas {
    fn dimensions(&self, image: ImageId) -> Option<(u32, u32)> {
        match image {
            ImageId::Foreground => Some((2048, 224)),
            ImageId::Background | ImageId::Ending => Some((256, 224)),
            ImageId::MessageBoard => Some((186, 80)),
            ImageId::Player | ImageId::Enemies | ImageId::Boss => Some((512, 512)),
        }
    }
}

/// Audio bank that only logs
struct LogBank;

impl AudioBank for LogBank {
    fn play(&mut self, cue: AudioCue) -> Result<(), Unavailable> {
        log::debug!("audio: play {}", cue.as_str());
        Ok(())
    }

    fn pause(&mut self, cue: AudioCue) -> Result<(), Unavailable> {
        log::debug!("audio: pause {}", cue.as_str());
        Ok(())
    }

    fn set_loop(&mut self, cue: AudioCue, looping: bool) -> Result<(), Unavailable> {
        log::debug!("audio: loop {} {}", cue.as_str(), looping);
        Ok(())
    }

    fn set_volume(&mut self, cue: AudioCue, volume: f32) -> Result<(), Unavailable> {
        log::debug!("audio: volume {} {:.2}", cue.as_str(), volume);
        Ok(())
    }

    fn rewind(&mut self, cue: AudioCue) -> Result<(), Unavailable> {
        log::debug!("audio: rewind {}", cue.as_str());
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    frames: u64,
    phase: Phase,
    distance: f32,
    lives: u32,
    health: i32,
    minions: usize,
    boss_spawned: bool,
    draw_calls: usize,
    events: usize,
}

struct Args {
    tuning: Option<PathBuf>,
    frames: u64,
    seed: u64,
    settings: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1);
    let tuning = args.next().filter(|a| a != "-").map(PathBuf::from);
    let frames = match args.next() {
        Some(a) => a.parse().with_context(|| format!("frame count `{a}`"))?,
        None => 3600,
    };
    let seed = match args.next() {
        Some(a) => a.parse().with_context(|| format!("seed `{a}`"))?,
        None => 0x5eed,
    };
    let settings = args.next().map(PathBuf::from);
    Ok(Args {
        tuning,
        frames,
        seed,
        settings,
    })
}

/// Scripted input for frame `n`
fn script(n: u64) -> InputState {
    InputState {
        right: true,
        up: n % 240 < 30,
        down: (120..150).contains(&(n % 240)),
        attack: n % 20 < 10,
        jump: n % 300 == 299,
        ..Default::default()
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args()?;
    let tuning = match &args.tuning {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Tuning::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => Tuning::default(),
    };

    let settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };

    log::info!("Scroll Brawler (headless) starting, seed {}", args.seed);
    let mut game = Game::init(tuning, settings, args.seed, &FixedAtlas)?;
    let mut surface = RecordingSurface::new();
    let mut bank = LogBank;

    let mut events = 0;
    let mut draw_calls = 0;
    let mut messages = 0;
    for n in 0..=args.frames {
        surface.clear();
        let frame_events = game.tick(n as f64 * FRAME_MS, &script(n), &mut surface, &mut bank);
        draw_calls += surface.calls.len();
        events += frame_events.len();

        let mut defeated = false;
        for event in &frame_events {
            match event {
                GameEvent::PhaseChanged { to: Phase::GameOver, .. } => defeated = true,
                GameEvent::MessageComplete => messages += 1,
                _ => {}
            }
        }
        // both ending messages shown
        if defeated || messages >= 2 {
            log::info!("session over at frame {}", n);
            break;
        }
    }

    let world = &game.world;
    let summary = Summary {
        seed: args.seed,
        frames: game.frames(),
        phase: world.phase,
        distance: world.level.distance(),
        lives: world.cast.player.lives,
        health: world.cast.player.health,
        minions: world.cast.minions.len(),
        boss_spawned: world.director.boss_spawned(),
        draw_calls,
        events,
    };
    log::info!("{}", serde_json::to_string(&summary)?);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
