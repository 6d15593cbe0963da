//! Data-driven game balance
//!
//! Every constant the stage plays by. Defaults reproduce the shipped values;
//! a JSON file can override any subset of them.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for ScreenTuning {
    fn default() -> Self {
        Self {
            width: 256.0,
            height: 224.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub start_x: f32,
    pub start_y: f32,
    pub width: f32,
    pub depth: f32,
    /// Pixels per update
    pub speed: f32,
    pub health: i32,
    pub damage: i32,
    pub lives: u32,
    pub fps: f32,
    /// Updates of hurt stun
    pub hurt_ticks: u32,
    /// Sprite steps an attack plays for
    pub attack_steps: u32,
    /// Melee reach beyond the footprint, facing side
    pub reach_x: f32,
    /// Vertical slack of the melee footprint
    pub reach_y: f32,
    /// Right bound while the stage can still scroll
    pub max_x_scrolling: f32,
    /// Right bound once the stage has stopped
    pub max_x_locked: f32,
    pub min_y: f32,
    pub jump_height: f32,
    pub jump_up_ms: f32,
    pub jump_down_ms: f32,
    pub celebrate_ms: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            start_x: 30.0,
            start_y: 195.0,
            width: 40.0,
            depth: 10.0,
            speed: 2.0,
            health: 16,
            damage: 2,
            lives: 3,
            fps: 12.5,
            hurt_ticks: 30,
            attack_steps: 3,
            reach_x: 16.0,
            reach_y: 4.0,
            max_x_scrolling: 135.0,
            max_x_locked: 170.0,
            min_y: 135.0,
            jump_height: 50.0,
            jump_up_ms: 400.0,
            jump_down_ms: 300.0,
            celebrate_ms: 1500.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MinionTuning {
    pub width: f32,
    pub depth: f32,
    pub speed: f32,
    pub health: i32,
    pub damage: i32,
    pub fps: f32,
    pub think_ticks_min: u32,
    /// Extra think ticks drawn from 0..spread
    pub think_ticks_spread: u32,
    /// Chance per update of stopping to think while travelling
    pub think_chance: f64,
    pub proximity_x: f32,
    pub proximity_y: f32,
    pub reach_x: f32,
    pub reach_y: f32,
    pub hurt_recovery_ms: f32,
    /// Horizontal distance thrown when killed
    pub knockback: f32,
    pub fall_ms: f32,
    pub bounce_delay_ms: f32,
    pub bounce_from: f32,
    pub bounce_to: f32,
    pub rest_ms: f32,
}

impl Default for MinionTuning {
    fn default() -> Self {
        Self {
            width: 40.0,
            depth: 10.0,
            speed: 1.0,
            health: 6,
            damage: 2,
            fps: 6.0,
            think_ticks_min: 15,
            think_ticks_spread: 10,
            think_chance: 0.002,
            proximity_x: 50.0,
            proximity_y: 15.0,
            reach_x: 16.0,
            reach_y: 4.0,
            hurt_recovery_ms: 1000.0,
            knockback: 50.0,
            fall_ms: 800.0,
            bounce_delay_ms: 100.0,
            bounce_from: -20.0,
            bounce_to: 10.0,
            rest_ms: 200.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    pub start_x: f32,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub health: i32,
    /// Hits accepted per hurt-recovery window
    pub max_hits: u32,
    pub fps: f32,
    pub enter_ms: f32,
    pub enter_y: f32,
    pub charge_ticks: u32,
    pub attack_ticks: u32,
    pub hurt_ticks: u32,
    /// Chance of the forward projectile over the ground fire
    pub forward_chance: f64,
    pub float_lift: f32,
    pub float_step_ms: f32,
    pub recoil: f32,
    pub recoil_ms: f32,
    pub floor_top: f32,
    pub floor_range: f32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            start_x: 165.0,
            width: 64.0,
            height: 96.0,
            depth: 20.0,
            health: 32,
            max_hits: 4,
            fps: 12.5,
            enter_ms: 6300.0,
            enter_y: 180.0,
            charge_ticks: 50,
            attack_ticks: 50,
            hurt_ticks: 30,
            forward_chance: 0.35,
            float_lift: 20.0,
            float_step_ms: 1000.0,
            recoil: 5.0,
            recoil_ms: 100.0,
            floor_top: 140.0,
            floor_range: 80.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    pub projectile_speed: f32,
    pub max_flames: u32,
    pub flame_fps: f32,
    pub flame_spacing: f32,
    pub flame_damage: i32,
    pub flame_volume: f32,
    pub explosion_fps: f32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            projectile_speed: 5.0,
            max_flames: 9,
            flame_fps: 12.0,
            flame_spacing: 16.0,
            flame_damage: 2,
            flame_volume: 0.5,
            explosion_fps: 7.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    pub scroll_speed: f32,
    /// Scrollable width when the atlas cannot report the foreground
    pub fallback_width: f32,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            scroll_speed: 2.0,
            fallback_width: 1792.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Distances at which waves arrive, ascending
    pub thresholds: Vec<f32>,
    /// One extra minion per this much distance of the threshold
    pub batch_divisor: f32,
    pub ahead_offset: f32,
    pub ahead_y_min: f32,
    pub ahead_y_range: f32,
    pub side_margin: f32,
    pub side_jitter: f32,
    pub y_min: f32,
    pub y_range: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            thresholds: vec![100.0, 350.0, 650.0, 980.0, 1200.0, 1350.0, 1650.0, 1850.0],
            batch_divisor: 500.0,
            ahead_offset: 42.0,
            ahead_y_min: 125.0,
            ahead_y_range: 120.0,
            side_margin: 40.0,
            side_jitter: 15.0,
            y_min: 112.0,
            y_range: 112.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingTuning {
    pub fade_in_ms: f32,
    pub fade_out_ms: f32,
    pub message_fade_ms: f32,
    /// Overlay opacity behind the final message
    pub message_dim: f32,
    pub message_chars_per_sec: f32,
    pub final_chars_per_sec: f32,
    /// Longest frame the clock will report
    pub max_frame_ms: f32,
}

impl Default for TimingTuning {
    fn default() -> Self {
        Self {
            fade_in_ms: 1000.0,
            fade_out_ms: 1000.0,
            message_fade_ms: 1500.0,
            message_dim: 0.85,
            message_chars_per_sec: 12.0,
            final_chars_per_sec: 16.0,
            max_frame_ms: 250.0,
        }
    }
}

/// All balance values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub screen: ScreenTuning,
    pub player: PlayerTuning,
    pub minion: MinionTuning,
    pub boss: BossTuning,
    pub hazards: HazardTuning,
    pub level: LevelTuning,
    pub spawn: SpawnTuning,
    pub timing: TimingTuning,
    pub messages: Messages,
}

/// Ending texts; `|` forces a line break
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub ending: String,
    pub final_message: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            ending: "Thank you for helping Raphael beat Shredder. But there is someone else who needs you."
                .to_string(),
            final_message: "The city sleeps safely tonight. | |Thanks for playing!".to_string(),
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the simulation
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("screen.width", self.screen.width),
            ("screen.height", self.screen.height),
            ("player.fps", self.player.fps),
            ("minion.fps", self.minion.fps),
            ("boss.fps", self.boss.fps),
            ("hazards.flame_fps", self.hazards.flame_fps),
            ("hazards.explosion_fps", self.hazards.explosion_fps),
            ("spawn.batch_divisor", self.spawn.batch_divisor),
            ("timing.message_chars_per_sec", self.timing.message_chars_per_sec),
            ("timing.final_chars_per_sec", self.timing.final_chars_per_sec),
            ("timing.max_frame_ms", self.timing.max_frame_ms),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidTuning(format!("{name} must be positive, got {value}")));
            }
        }

        let chances = [
            ("minion.think_chance", self.minion.think_chance),
            ("boss.forward_chance", self.boss.forward_chance),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidTuning(format!("{name} must be within [0, 1], got {value}")));
            }
        }

        if self.boss.max_hits == 0 {
            return Err(Error::InvalidTuning("boss.max_hits must be at least 1".into()));
        }
        if self.player.attack_steps == 0 {
            return Err(Error::InvalidTuning("player.attack_steps must be at least 1".into()));
        }

        let thresholds = &self.spawn.thresholds;
        if thresholds.iter().any(|t| !t.is_finite()) || thresholds.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::InvalidTuning(format!(
                "spawn.thresholds must be finite and ascending, got {thresholds:?}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn test_partial_override() {
        let tuning = Tuning::from_json(r#"{ "minion": { "health": 10 }, "spawn": { "thresholds": [50] } }"#).unwrap();
        assert_eq!(tuning.minion.health, 10);
        assert_eq!(tuning.minion.damage, 2);
        assert_eq!(tuning.spawn.thresholds, vec![50.0]);
        assert_eq!(tuning.spawn.batch_divisor, 500.0);
    }

    #[test]
    fn test_rejects_descending_thresholds() {
        let err = Tuning::from_json(r#"{ "spawn": { "thresholds": [300, 100] } }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidTuning(_)));
    }

    #[test]
    fn test_rejects_zero_fps() {
        let err = Tuning::from_json(r#"{ "player": { "fps": 0 } }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidTuning(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(Tuning::from_json("{"), Err(Error::Json(_))));
    }
}
