//! Host entry pair
//!
//! The host calls [`Game::init`] once and [`Game::tick`] from its frame
//! callback with a monotonic timestamp.

use crate::audio::{AudioBank, Mixer};
use crate::error::Result;
use crate::platform::{FrameClock, InputState};
use crate::renderer::{SpriteAtlas, Surface};
use crate::settings::Settings;
use crate::sim::{self, GameEvent, World};
use crate::tuning::Tuning;

pub struct Game {
    pub world: World,
    pub settings: Settings,
    mixer: Mixer,
    clock: FrameClock,
    frames: u64,
}

impl Game {
    pub fn init(tuning: Tuning, settings: Settings, seed: u64, atlas: &dyn SpriteAtlas) -> Result<Self> {
        let clock = FrameClock::new(tuning.timing.max_frame_ms);
        let mut world = World::new(tuning, seed, atlas)?;
        world.set_debug_overlay(settings.debug_overlay);
        log::info!("game started");

        Ok(Self {
            world,
            settings,
            mixer: Mixer::new(),
            clock,
            frames: 0,
        })
    }

    /// Frames actually simulated
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame; returns the frame's events after forwarding audio
    ///
    /// The first call and any call without forward progress of `now_ms`
    /// only record the timestamp.
    pub fn tick(
        &mut self,
        now_ms: f64,
        input: &InputState,
        surface: &mut dyn Surface,
        bank: &mut dyn AudioBank,
    ) -> Vec<GameEvent> {
        let Some(elapsed_ms) = self.clock.delta(now_ms) else {
            return Vec::new();
        };
        self.frames += 1;

        sim::tick(&mut self.world, input, elapsed_ms, surface);

        let events = self.world.drain_events();
        for event in &events {
            if let GameEvent::Audio(command) = event {
                self.mixer.dispatch(bank, &self.settings, *command);
            }
        }
        events
    }

    /// Change preferences mid-session; volumes reach the bank at once
    pub fn apply_settings(&mut self, settings: Settings, bank: &mut dyn AudioBank) {
        self.world.set_debug_overlay(settings.debug_overlay);
        self.mixer.apply(bank, &settings);
        self.settings = settings;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCommand, AudioCue, Unavailable};
    use crate::renderer::RecordingSurface;
    use crate::sim::Phase;
    use crate::sim::world::tests::FixedAtlas;

    #[derive(Default)]
    struct Plays(Vec<AudioCue>);

    impl AudioBank for Plays {
        fn play(&mut self, cue: AudioCue) -> std::result::Result<(), Unavailable> {
            self.0.push(cue);
            Ok(())
        }
        fn pause(&mut self, _cue: AudioCue) -> std::result::Result<(), Unavailable> {
            Ok(())
        }
        fn set_loop(&mut self, _cue: AudioCue, _looping: bool) -> std::result::Result<(), Unavailable> {
            Ok(())
        }
        fn set_volume(&mut self, _cue: AudioCue, _volume: f32) -> std::result::Result<(), Unavailable> {
            Ok(())
        }
        fn rewind(&mut self, cue: AudioCue) -> std::result::Result<(), Unavailable> {
            Err(Unavailable(cue))
        }
    }

    /// Every bank call as text
    #[derive(Default)]
    struct Calls(Vec<String>);

    impl AudioBank for Calls {
        fn play(&mut self, cue: AudioCue) -> std::result::Result<(), Unavailable> {
            self.0.push(format!("play {}", cue.as_str()));
            Ok(())
        }
        fn pause(&mut self, cue: AudioCue) -> std::result::Result<(), Unavailable> {
            self.0.push(format!("pause {}", cue.as_str()));
            Ok(())
        }
        fn set_loop(&mut self, cue: AudioCue, looping: bool) -> std::result::Result<(), Unavailable> {
            self.0.push(format!("loop {} {}", cue.as_str(), looping));
            Ok(())
        }
        fn set_volume(&mut self, cue: AudioCue, volume: f32) -> std::result::Result<(), Unavailable> {
            self.0.push(format!("volume {} {:.2}", cue.as_str(), volume));
            Ok(())
        }
        fn rewind(&mut self, cue: AudioCue) -> std::result::Result<(), Unavailable> {
            self.0.push(format!("rewind {}", cue.as_str()));
            Ok(())
        }
    }

    fn game(settings: Settings) -> Game {
        Game::init(Tuning::default(), settings, 3, &FixedAtlas(Some((256, 224)))).unwrap()
    }

    #[test]
    fn test_first_frame_only_records_time() {
        let mut game = game(Settings::default());
        let mut surface = RecordingSurface::new();
        let events = game.tick(5000.0, &InputState::default(), &mut surface, &mut Plays::default());
        assert!(events.is_empty());
        assert!(surface.calls.is_empty());
        assert_eq!(game.frames(), 0);

        game.tick(5000.0, &InputState::default(), &mut surface, &mut Plays::default());
        assert_eq!(game.frames(), 0);
    }

    #[test]
    fn test_audio_forwarded_to_bank() {
        let mut game = game(Settings::default());
        let mut bank = Plays::default();
        let mut surface = RecordingSurface::new();

        let mut now = 0.0;
        let mut events = Vec::new();
        for _ in 0..8 {
            events.extend(game.tick(now, &InputState::default(), &mut surface, &mut bank));
            now += 200.0;
        }
        assert_eq!(game.world.phase, Phase::Playing);
        assert!(events.contains(&GameEvent::Audio(AudioCommand::Play(AudioCue::Bgm))));
        assert_eq!(bank.0, vec![AudioCue::Bgm]);
    }

    #[test]
    fn test_muted_settings_silence_bank() {
        let mut game = game(Settings {
            muted: true,
            ..Default::default()
        });
        let mut bank = Plays::default();
        let mut surface = RecordingSurface::new();
        for i in 0..8 {
            game.tick(i as f64 * 200.0, &InputState::default(), &mut surface, &mut bank);
        }
        assert!(bank.0.is_empty());
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut game = game(Settings::default());
        let mut surface = RecordingSurface::new();
        let mut bank = Plays::default();
        game.tick(0.0, &InputState::default(), &mut surface, &mut bank);
        game.tick(10_000.0, &InputState::default(), &mut surface, &mut bank);
        assert_eq!(game.world.phase, Phase::Start);
        assert!((game.world.overlay.alpha - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_music_volume_reaches_bank() {
        let mut game = game(Settings {
            music_volume: 0.0,
            ..Default::default()
        });
        let mut bank = Calls::default();
        let mut surface = RecordingSurface::new();
        for i in 0..8 {
            game.tick(i as f64 * 200.0, &InputState::default(), &mut surface, &mut bank);
        }
        assert_eq!(game.world.phase, Phase::Playing);
        assert_eq!(bank.0, vec!["loop bgm true", "volume bgm 0.00", "play bgm"]);
    }

    #[test]
    fn test_apply_settings_updates_volumes() {
        let mut game = game(Settings::default());
        let mut bank = Calls::default();
        game.apply_settings(
            Settings {
                master_volume: 0.5,
                debug_overlay: true,
                ..Default::default()
            },
            &mut bank,
        );
        assert!(game.world.debug_overlay());
        assert!(bank.0.contains(&"volume bgm 0.50".to_string()));
        assert!(bank.0.contains(&"volume bgm-boss 0.50".to_string()));
    }
}
