//! Audio cues and the audio collaborator interface
//!
//! The simulation only emits [`AudioCommand`]s. The host owns the actual
//! audio elements behind an [`AudioBank`]; a missing cue is tolerated.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::Settings;

/// Audio cues by asset id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    /// Stage music
    Bgm,
    /// Boss music
    BgmBoss,
    /// Explosion when an enemy is finished off
    ExplosionSmall,
    /// Boss ground fire
    FireBurning,
    /// Player lands a hit on a minion
    Hit,
    /// Player lands a hit on the boss
    BossHit,
}

impl AudioCue {
    pub const ALL: [AudioCue; 6] = [
        AudioCue::Bgm,
        AudioCue::BgmBoss,
        AudioCue::ExplosionSmall,
        AudioCue::FireBurning,
        AudioCue::Hit,
        AudioCue::BossHit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCue::Bgm => "bgm",
            AudioCue::BgmBoss => "bgm-boss",
            AudioCue::ExplosionSmall => "explosion-sm",
            AudioCue::FireBurning => "fire-burning",
            AudioCue::Hit => "hit",
            AudioCue::BossHit => "shredder-hit",
        }
    }

    pub fn is_music(&self) -> bool {
        matches!(self, AudioCue::Bgm | AudioCue::BgmBoss)
    }
}

/// Something the core wants the audio collaborator to do
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AudioCommand {
    Play(AudioCue),
    Pause(AudioCue),
    SetLoop(AudioCue, bool),
    /// Volume in [0, 1] before user settings are applied
    SetVolume(AudioCue, f32),
    Rewind(AudioCue),
}

impl AudioCommand {
    pub fn cue(&self) -> AudioCue {
        match *self {
            AudioCommand::Play(cue)
            | AudioCommand::Pause(cue)
            | AudioCommand::SetLoop(cue, _)
            | AudioCommand::SetVolume(cue, _)
            | AudioCommand::Rewind(cue) => cue,
        }
    }
}

/// The host could not perform an audio operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("audio cue `{}` unavailable", .0.as_str())]
pub struct Unavailable(pub AudioCue);

/// Audio collaborator supplied by the host
pub trait AudioBank {
    fn play(&mut self, cue: AudioCue) -> Result<(), Unavailable>;
    fn pause(&mut self, cue: AudioCue) -> Result<(), Unavailable>;
    fn set_loop(&mut self, cue: AudioCue, looping: bool) -> Result<(), Unavailable>;
    fn set_volume(&mut self, cue: AudioCue, volume: f32) -> Result<(), Unavailable>;
    fn rewind(&mut self, cue: AudioCue) -> Result<(), Unavailable>;
}

/// Volume the bank should actually use for `cue`
pub fn effective_volume(settings: &Settings, cue: AudioCue, requested: f32) -> f32 {
    if settings.muted {
        return 0.0;
    }
    let channel = if cue.is_music() {
        settings.music_volume
    } else {
        settings.sfx_volume
    };
    (requested * channel * settings.master_volume).clamp(0.0, 1.0)
}

/// Forwards commands to the bank, honouring settings
///
/// Remembers the volume the simulation asked for per cue, so the user's
/// channel volumes apply to every play and can be reapplied when they change.
/// Failures are logged and swallowed; audio never halts the simulation.
#[derive(Debug, Clone, Default)]
pub struct Mixer {
    requested: HashMap<AudioCue, f32>,
}

impl Mixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Volume the simulation last asked for, full volume if never set
    pub fn requested(&self, cue: AudioCue) -> f32 {
        self.requested.get(&cue).copied().unwrap_or(1.0)
    }

    pub fn dispatch(&mut self, bank: &mut dyn AudioBank, settings: &Settings, command: AudioCommand) {
        let result = match command {
            AudioCommand::Play(_) if settings.muted => Ok(()),
            AudioCommand::Play(cue) => {
                let volume = effective_volume(settings, cue, self.requested(cue));
                if let Err(e) = bank.set_volume(cue, volume) {
                    log::warn!("Skipping volume of {}: {}", cue.as_str(), e);
                }
                bank.play(cue)
            }
            AudioCommand::Pause(cue) => bank.pause(cue),
            AudioCommand::SetLoop(cue, looping) => bank.set_loop(cue, looping),
            AudioCommand::SetVolume(cue, volume) => {
                self.requested.insert(cue, volume);
                bank.set_volume(cue, effective_volume(settings, cue, volume))
            }
            AudioCommand::Rewind(cue) => bank.rewind(cue),
        };

        if let Err(e) = result {
            log::warn!("Skipping {:?}: {}", command, e);
        }
    }

    /// Push the volume of every cue after a settings change
    pub fn apply(&self, bank: &mut dyn AudioBank, settings: &Settings) {
        for cue in AudioCue::ALL {
            let volume = effective_volume(settings, cue, self.requested(cue));
            if let Err(e) = bank.set_volume(cue, volume) {
                log::warn!("Skipping volume of {}: {}", cue.as_str(), e);
            }
        }
    }
}

/// Bank that has nothing loaded
#[derive(Debug, Default)]
pub struct SilentBank;

impl AudioBank for SilentBank {
    fn play(&mut self, cue: AudioCue) -> Result<(), Unavailable> {
        Err(Unavailable(cue))
    }

    fn pause(&mut self, cue: AudioCue) -> Result<(), Unavailable> {
        Err(Unavailable(cue))
    }

    fn set_loop(&mut self, cue: AudioCue, _looping: bool) -> Result<(), Unavailable> {
        Err(Unavailable(cue))
    }

    fn set_volume(&mut self, cue: AudioCue, _volume: f32) -> Result<(), Unavailable> {
        Err(Unavailable(cue))
    }

    fn rewind(&mut self, cue: AudioCue) -> Result<(), Unavailable> {
        Err(Unavailable(cue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log(Vec<String>);

    impl AudioBank for Log {
        fn play(&mut self, cue: AudioCue) -> Result<(), Unavailable> {
            self.0.push(format!("play {}", cue.as_str()));
            Ok(())
        }
        fn pause(&mut self, cue: AudioCue) -> Result<(), Unavailable> {
            self.0.push(format!("pause {}", cue.as_str()));
            Ok(())
        }
        fn set_loop(&mut self, cue: AudioCue, looping: bool) -> Result<(), Unavailable> {
            self.0.push(format!("loop {} {}", cue.as_str(), looping));
            Ok(())
        }
        fn set_volume(&mut self, cue: AudioCue, volume: f32) -> Result<(), Unavailable> {
            self.0.push(format!("volume {} {:.2}", cue.as_str(), volume));
            Ok(())
        }
        fn rewind(&mut self, _cue: AudioCue) -> Result<(), Unavailable> {
            Ok(())
        }
    }

    #[test]
    fn test_muted_skips_play() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        let mut bank = Log::default();
        let mut mixer = Mixer::new();
        mixer.dispatch(&mut bank, &settings, AudioCommand::Play(AudioCue::Hit));
        mixer.dispatch(&mut bank, &settings, AudioCommand::Pause(AudioCue::Bgm));
        assert_eq!(bank.0, vec!["pause bgm".to_string()]);
    }

    #[test]
    fn test_volume_scales_by_channel() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 1.0,
            ..Default::default()
        };
        let mut bank = Log::default();
        Mixer::new().dispatch(&mut bank, &settings, AudioCommand::SetVolume(AudioCue::FireBurning, 0.5));
        assert_eq!(bank.0, vec!["volume fire-burning 0.25".to_string()]);
    }

    #[test]
    fn test_play_applies_channel_volume() {
        let settings = Settings {
            master_volume: 0.5,
            music_volume: 0.5,
            sfx_volume: 1.0,
            ..Default::default()
        };
        let mut bank = Log::default();
        let mut mixer = Mixer::new();
        mixer.dispatch(&mut bank, &settings, AudioCommand::Play(AudioCue::Bgm));
        mixer.dispatch(&mut bank, &settings, AudioCommand::SetVolume(AudioCue::FireBurning, 0.5));
        mixer.dispatch(&mut bank, &settings, AudioCommand::Play(AudioCue::FireBurning));
        assert_eq!(
            bank.0,
            vec![
                "volume bgm 0.25",
                "play bgm",
                "volume fire-burning 0.25",
                "volume fire-burning 0.25",
                "play fire-burning",
            ]
        );
    }

    #[test]
    fn test_apply_reaches_every_cue() {
        let mut bank = Log::default();
        let mut mixer = Mixer::new();
        let quiet = Settings {
            music_volume: 0.0,
            ..Default::default()
        };
        mixer.dispatch(&mut bank, &Settings::default(), AudioCommand::SetVolume(AudioCue::FireBurning, 0.5));
        bank.0.clear();

        mixer.apply(&mut bank, &quiet);
        assert_eq!(bank.0.len(), AudioCue::ALL.len());
        assert!(bank.0.contains(&"volume bgm 0.00".to_string()));
        assert!(bank.0.contains(&"volume fire-burning 0.50".to_string()));
    }

    #[test]
    fn test_unavailable_is_tolerated() {
        let mut bank = SilentBank;
        Mixer::new().dispatch(&mut bank, &Settings::default(), AudioCommand::Play(AudioCue::BgmBoss));
    }
}
