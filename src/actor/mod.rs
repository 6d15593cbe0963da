//! Simulated entities
//!
//! One state-owning struct per role, all behind the [`Actor`] capability
//! trait:
//! - `player`: the controllable brawler
//! - `minion`: foot soldiers spawned by distance
//! - `boss`: the end-of-stage encounter
//! - `projectile`: boss hazards (forward bolt, ground fire)
//! - `effect`: one-shot visual effects
//!
//! Actors never touch the world directly. Side effects (spawns, damage to
//! the player, scroll requests, audio) are pushed as [`Command`]s and applied
//! by the frame orchestrator once every actor has updated.

pub mod boss;
pub mod effect;
pub mod minion;
pub mod player;
pub mod projectile;
pub mod sequence;
pub mod sprite;

use glam::Vec2;
use rand_pcg::Pcg32;

pub use boss::{Boss, BossState};
pub use effect::Explosion;
pub use minion::{Minion, MinionState};
pub use player::{Heading, Player, PlayerState};
pub use projectile::{Flame, FlameStream, Hazard, Projectile};
pub use sequence::{SequenceStep, Sequencer};
pub use sprite::{AnimKey, Clip, Facing, SpriteSheet};

use crate::anim::{Animatable, Field};
use crate::audio::AudioCommand;
use crate::error::Result;
use crate::renderer::{ImageId, Rect, Surface};
use crate::tuning::Tuning;

/// Floor-anchored position shared by every walking role
///
/// `pos` is the top-left of the footprint. The sprite is drawn centred on
/// the footprint centre with its bottom edge there, displaced by
/// `sprite_offset` (jumps, floats and bounces move only the sprite).
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub width: f32,
    pub depth: f32,
    pub sprite_offset: Vec2,
    pub facing: Facing,
}

impl Body {
    pub fn new(pos: Vec2, width: f32, depth: f32, facing: Facing) -> Self {
        Self {
            pos,
            width,
            depth,
            sprite_offset: Vec2::ZERO,
            facing,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width / 2.0, self.depth / 2.0)
    }

    pub fn footprint(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.depth)
    }

    /// Turn toward `x`
    pub fn face(&mut self, x: f32) {
        self.facing = if x < self.center().x {
            Facing::Left
        } else {
            Facing::Right
        };
    }

    /// Destination of a `width`×`height` sprite
    pub fn sprite_dst(&self, width: f32, height: f32) -> Rect {
        let c = self.center();
        Rect::new(
            c.x - width / 2.0 + self.sprite_offset.x,
            c.y - height + self.sprite_offset.y,
            width,
            height,
        )
    }

    /// Blit the sequencer's current frame
    pub fn draw_sprite(&self, surface: &mut dyn Surface, sheet: &SpriteSheet, seq: &Sequencer) {
        match seq.frame(sheet) {
            Some((clip, src)) => {
                surface.blit(sheet.image, src, self.sprite_dst(clip.width, clip.height), 1.0);
            }
            None => log::warn!("{}: nothing to draw for `{}`", sheet.name, seq.key()),
        }
    }

    /// 26×12 shadow centred on the footprint
    pub fn draw_shadow(&self, surface: &mut dyn Surface, image: ImageId, sx: f32, sy: f32) {
        let c = self.center();
        surface.blit(
            image,
            Rect::new(sx, sy, 26.0, 12.0),
            Rect::new(c.x - 13.0, c.y - 6.0, 26.0, 12.0),
            1.0,
        );
    }
}

impl Animatable for Body {
    fn field(&self, field: Field) -> f32 {
        match field {
            Field::X => self.pos.x,
            Field::Y => self.pos.y,
            Field::SpriteX => self.sprite_offset.x,
            Field::SpriteY => self.sprite_offset.y,
            Field::Alpha => 1.0,
        }
    }

    fn set_field(&mut self, field: Field, value: f32) {
        match field {
            Field::X => self.pos.x = value,
            Field::Y => self.pos.y = value,
            Field::SpriteX => self.sprite_offset.x = value,
            Field::SpriteY => self.sprite_offset.y = value,
            Field::Alpha => {}
        }
    }
}

/// What other actors may know about the player during a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub footprint: Rect,
    pub center: Vec2,
}

/// Side effects requested by actors
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    DamagePlayer(i32),
    /// Explosion centred on a point
    SpawnExplosion(Vec2),
    SpawnProjectile { pos: Vec2, facing: Facing },
    SpawnFlames { pos: Vec2, facing: Facing },
    /// Player pushed past the right bound
    ScrollStage,
    /// Boss finished its entrance
    BossArrived,
    /// Boss hurt window over; nudge it to `to`, then let it float
    BossRecoil { to: Vec2 },
    /// Player's celebration finished
    StageCleared,
    Audio(AudioCommand),
}

/// Everything an actor can see and use while updating
pub struct ActorCtx<'a> {
    pub player: PlayerView,
    pub can_scroll: bool,
    pub rng: &'a mut Pcg32,
    pub tuning: &'a Tuning,
    pub sheets: &'a Sheets,
    pub commands: &'a mut Vec<Command>,
}

/// Shared capability of every role
pub trait Actor {
    /// Advance behaviour and animation by one frame
    fn update(&mut self, elapsed_ms: f32, ctx: &mut ActorCtx<'_>);

    fn draw(&self, surface: &mut dyn Surface, sheets: &Sheets);

    /// Gameplay collision rectangle
    fn footprint(&self) -> Rect;

    /// Draw-order key; larger draws later (nearer the camera)
    fn depth_key(&self) -> f32;

    /// Ready to be removed from its collection
    fn is_terminal(&self) -> bool;

    /// Move with the stage when it scrolls
    fn scroll(&mut self, _dx: f32) {}
}

/// Sprite sheets of every animated role
#[derive(Debug, Clone)]
pub struct Sheets {
    pub player: SpriteSheet,
    pub minion: SpriteSheet,
    pub boss: SpriteSheet,
}

impl Sheets {
    pub fn standard() -> Self {
        Self {
            player: player::sheet(),
            minion: minion::sheet(),
            boss: boss::sheet(),
        }
    }

    /// Every pose a role can select must exist for both facings
    pub fn validate(&self) -> Result<()> {
        self.player.require(player::POSES)?;
        self.minion.require(minion::POSES)?;
        self.boss.require(boss::POSES)?;
        Ok(())
    }
}

impl Default for Sheets {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;
    use rand::SeedableRng;

    /// Owned pieces an [`ActorCtx`] borrows from
    pub struct Harness {
        pub rng: Pcg32,
        pub tuning: Tuning,
        pub sheets: Sheets,
        pub commands: Vec<Command>,
        pub player: PlayerView,
        pub can_scroll: bool,
    }

    impl Harness {
        pub fn new() -> Self {
            Self {
                rng: Pcg32::seed_from_u64(7),
                tuning: Tuning::default(),
                sheets: Sheets::standard(),
                commands: Vec::new(),
                player: PlayerView {
                    footprint: Rect::new(30.0, 195.0, 40.0, 10.0),
                    center: Vec2::new(50.0, 200.0),
                },
                can_scroll: true,
            }
        }

        pub fn ctx(&mut self) -> ActorCtx<'_> {
            ActorCtx {
                player: self.player,
                can_scroll: self.can_scroll,
                rng: &mut self.rng,
                tuning: &self.tuning,
                sheets: &self.sheets,
                commands: &mut self.commands,
            }
        }

        pub fn place_player(&mut self, pos: Vec2) {
            let body = Body::new(pos, 40.0, 10.0, Facing::Right);
            self.player = PlayerView {
                footprint: body.footprint(),
                center: body.center(),
            };
        }
    }

    #[test]
    fn test_standard_sheets_are_complete() {
        Sheets::standard().validate().unwrap();
    }

    #[test]
    fn test_body_anchor() {
        let mut body = Body::new(Vec2::new(10.0, 100.0), 40.0, 10.0, Facing::Left);
        assert_eq!(body.center(), Vec2::new(30.0, 105.0));

        body.sprite_offset = Vec2::new(0.0, -20.0);
        assert_eq!(body.sprite_dst(40.0, 64.0), Rect::new(10.0, 21.0, 40.0, 64.0));
    }

    #[test]
    fn test_body_fields() {
        let mut body = Body::new(Vec2::ZERO, 40.0, 10.0, Facing::Left);
        body.set_field(Field::X, 3.0);
        body.set_field(Field::SpriteY, -7.0);
        body.set_field(Field::Alpha, 0.2);
        assert_eq!(body.pos.x, 3.0);
        assert_eq!(body.field(Field::SpriteY), -7.0);
        assert_eq!(body.field(Field::Alpha), 1.0);
    }

    #[test]
    fn test_shadow_under_center() {
        let body = Body::new(Vec2::new(0.0, 100.0), 40.0, 10.0, Facing::Left);
        let mut surface = RecordingSurface::new();
        body.draw_shadow(&mut surface, ImageId::Player, 400.0, 16.0);
        assert_eq!(
            surface.blits_of(ImageId::Player),
            vec![(Rect::new(400.0, 16.0, 26.0, 12.0), Rect::new(7.0, 99.0, 26.0, 12.0))]
        );
    }
}
