//! End-of-stage boss
//!
//! Loop: `Entering` → `Charging(n)` → `Attacking(n)` → `Floating` →
//! `Charging(n)` … Hits are accepted while charging, attacking or hurt, up
//! to `max_hits` per recovery window. When the hurt countdown ends the boss
//! recoils (a free-standing motion owned by the world) and then floats,
//! which reopens the window.

use glam::Vec2;
use rand::Rng;

use super::sequence::Sequencer;
use super::sprite::{AnimKey, Clip, Facing, SpriteSheet};
use super::{Actor, ActorCtx, Body, Command, Sheets};
use crate::anim::{Field, Timeline, Tween, TweenStep};
use crate::audio::{AudioCommand, AudioCue};
use crate::renderer::{ImageId, Rect, Surface};
use crate::tuning::{BossTuning, Tuning};

pub const POSES: &[&str] = &["float", "charge", "attack-down", "attack-forward", "hurt"];

pub fn sheet() -> SpriteSheet {
    SpriteSheet::new("boss", ImageId::Boss)
        .clip("float", Facing::Left, Clip::new(48.0, 112.0, 0.0, 223.0, &[0]))
        .clip("float", Facing::Right, Clip::new(48.0, 112.0, 0.0, 0.0, &[0]))
        .clip("charge", Facing::Left, Clip::new(72.0, 96.0, 183.0, 232.0, &[0, 1, 2]))
        .clip("charge", Facing::Right, Clip::new(72.0, 96.0, 175.0, 7.0, &[0, 1, 2]))
        .clip("attack-down", Facing::Left, Clip::new(72.0, 96.0, 168.0, 344.0, &[0]))
        .clip("attack-down", Facing::Right, Clip::new(72.0, 96.0, 0.0, 120.0, &[0]))
        .clip("attack-forward", Facing::Left, Clip::new(72.0, 96.0, 80.0, 344.0, &[0]))
        .clip("attack-forward", Facing::Right, Clip::new(72.0, 96.0, 80.0, 120.0, &[0]))
        .clip("hurt", Facing::Left, Clip::new(64.0, 96.0, 304.0, 344.0, &[0]))
        .clip("hurt", Facing::Right, Clip::new(64.0, 96.0, 240.0, 119.0, &[0]))
}

/// Which attack the boss chose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossAttack {
    /// Projectile flying overhead
    Forward,
    /// Fire stream along the ground
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossState {
    /// Descending onto the stage
    Entering,
    Charging { ticks: u32 },
    Attacking { attack: BossAttack, ticks: u32 },
    /// Relocating; cannot be hit
    Floating,
    Hurt { ticks: u32 },
    /// Waiting for the recoil motion to finish
    Recoiling,
    Dying,
    /// Terminal
    Dead,
}

/// Result of a hit on the boss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossHit {
    Ignored,
    Hurt,
    Killed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BossCue {
    Arrived,
    Landed,
}

#[derive(Debug, Clone)]
pub struct Boss {
    pub body: Body,
    /// Sprite height, used to aim the forward projectile
    pub height: f32,
    pub health: i32,
    /// Hits taken in the current recovery window
    hits: u32,
    state: BossState,
    seq: Sequencer,
    entrance: Option<Tween<BossCue>>,
    float: Option<Timeline<BossCue>>,
}

impl Boss {
    pub fn new(tuning: &BossTuning) -> Self {
        let pos = Vec2::new(tuning.start_x, -tuning.height);
        log::info!("boss enters");
        Self {
            body: Body::new(pos, tuning.width, tuning.depth, Facing::Left),
            height: tuning.height,
            health: tuning.health,
            hits: 0,
            state: BossState::Entering,
            seq: Sequencer::new(AnimKey::new("float", Facing::Left), tuning.fps),
            entrance: Some(
                Tween::new(tuning.enter_ms)
                    .field(Field::Y, pos.y, tuning.enter_y)
                    .on_complete(BossCue::Arrived),
            ),
            float: None,
        }
    }

    pub fn state(&self) -> BossState {
        self.state
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn is_hittable(&self) -> bool {
        matches!(
            self.state,
            BossState::Charging { .. } | BossState::Attacking { .. } | BossState::Hurt { .. }
        )
    }

    pub fn hurt(&mut self, amount: i32, tuning: &BossTuning) -> BossHit {
        if !self.is_hittable() || self.hits >= tuning.max_hits {
            return BossHit::Ignored;
        }

        self.hits += 1;
        self.health -= amount;
        if self.health <= 0 {
            self.health = 0;
            self.state = BossState::Dying;
            log::info!("boss dying");
            return BossHit::Killed;
        }

        self.state = BossState::Hurt {
            ticks: tuning.hurt_ticks.max(1),
        };
        log::debug!("boss hurt ({} / {})", self.hits, tuning.max_hits);
        BossHit::Hurt
    }

    /// The recoil motion finished; reopen the hit window and relocate
    pub fn recovered(&mut self, rng: &mut impl Rng, tuning: &Tuning) {
        if self.state != BossState::Recoiling {
            return;
        }
        self.hits = 0;
        self.start_float(rng, tuning);
    }

    fn start_float(&mut self, rng: &mut impl Rng, tuning: &Tuning) {
        let boss = &tuning.boss;
        let to = Vec2::new(
            (rng.random::<f32>() * tuning.screen.width).floor() - self.body.width / 2.0,
            boss.floor_top + (rng.random::<f32>() * boss.floor_range).floor() - self.body.depth,
        );
        let from = self.body.pos;
        log::debug!("boss floats to ({}, {})", to.x, to.y);

        self.state = BossState::Floating;
        self.float = Some(
            Timeline::new()
                .then(Tween::new(boss.float_step_ms).field(Field::SpriteY, 0.0, -boss.float_lift))
                .then(
                    Tween::new(boss.float_step_ms)
                        .field(Field::X, from.x, to.x)
                        .field(Field::Y, from.y, to.y),
                )
                .then(Tween::new(boss.float_step_ms).field(Field::SpriteY, -boss.float_lift, 0.0))
                .on_complete(BossCue::Landed),
        );
    }

    fn launch_attack(&mut self, ctx: &mut ActorCtx<'_>) {
        let tuning: &Tuning = ctx.tuning;
        let body = &self.body;
        let attack = if ctx.rng.random_bool(tuning.boss.forward_chance) {
            let x = match body.facing {
                Facing::Left => body.pos.x,
                Facing::Right => body.pos.x + body.width,
            };
            ctx.commands.push(Command::SpawnProjectile {
                pos: Vec2::new(x, body.pos.y - self.height + 20.0),
                facing: body.facing,
            });
            BossAttack::Forward
        } else {
            let x = match body.facing {
                Facing::Left => body.pos.x - 10.0,
                Facing::Right => body.pos.x + body.width + 10.0,
            };
            ctx.commands.push(Command::SpawnFlames {
                pos: Vec2::new(x, body.center().y),
                facing: body.facing,
            });
            BossAttack::Down
        };
        log::debug!("boss attacks: {:?}", attack);
        self.state = BossState::Attacking {
            attack,
            ticks: tuning.boss.attack_ticks.max(1),
        };
    }

    fn pose(&self) -> &'static str {
        match self.state {
            BossState::Entering | BossState::Floating => "float",
            BossState::Charging { .. } => "charge",
            BossState::Attacking {
                attack: BossAttack::Forward,
                ..
            } => "attack-forward",
            BossState::Attacking {
                attack: BossAttack::Down,
                ..
            } => "attack-down",
            BossState::Hurt { .. } | BossState::Recoiling | BossState::Dying | BossState::Dead => "hurt",
        }
    }
}

impl Actor for Boss {
    fn update(&mut self, elapsed_ms: f32, ctx: &mut ActorCtx<'_>) {
        let tuning: &Tuning = ctx.tuning;
        if self.state != BossState::Dead {
            self.body.face(ctx.player.center.x);
        }

        match self.state {
            BossState::Entering => {
                let step = self
                    .entrance
                    .as_mut()
                    .map(|tween| tween.advance(elapsed_ms, &mut self.body));
                if let Some(TweenStep::Completed(_)) = step {
                    self.entrance = None;
                    self.state = BossState::Charging {
                        ticks: tuning.boss.charge_ticks.max(1),
                    };
                    ctx.commands.push(Command::BossArrived);
                    log::info!("boss arrived");
                }
            }
            BossState::Charging { ticks } if ticks <= 1 => self.launch_attack(ctx),
            BossState::Charging { ticks } => {
                self.state = BossState::Charging { ticks: ticks - 1 };
            }
            BossState::Attacking { ticks, .. } if ticks <= 1 => self.start_float(ctx.rng, tuning),
            BossState::Attacking { attack, ticks } => {
                self.state = BossState::Attacking {
                    attack,
                    ticks: ticks - 1,
                };
            }
            BossState::Floating => {
                let advance = self
                    .float
                    .as_mut()
                    .map(|timeline| timeline.advance(elapsed_ms, &mut self.body));
                if advance.is_none_or(|a| a.finished) {
                    self.float = None;
                    self.body.sprite_offset = Vec2::ZERO;
                    self.state = BossState::Charging {
                        ticks: tuning.boss.charge_ticks.max(1),
                    };
                }
            }
            BossState::Hurt { ticks } if ticks <= 1 => {
                let pos = self.body.pos;
                let recoil = tuning.boss.recoil;
                let x = match self.body.facing {
                    Facing::Left => pos.x + recoil,
                    Facing::Right => pos.x - recoil,
                };
                let y = if ctx.rng.random_bool(0.5) {
                    pos.y - recoil
                } else {
                    pos.y + recoil
                };
                self.state = BossState::Recoiling;
                ctx.commands.push(Command::BossRecoil { to: Vec2::new(x, y) });
            }
            BossState::Hurt { ticks } => {
                self.state = BossState::Hurt { ticks: ticks - 1 };
            }
            BossState::Dying => {
                self.state = BossState::Dead;
                ctx.commands
                    .push(Command::Audio(AudioCommand::Pause(AudioCue::BgmBoss)));
                log::info!("boss dead");
            }
            BossState::Recoiling | BossState::Dead => {}
        }

        self.seq.set_key(AnimKey::new(self.pose(), self.body.facing));
        self.seq.advance(elapsed_ms, &ctx.sheets.boss);
    }

    fn draw(&self, surface: &mut dyn Surface, sheets: &Sheets) {
        if self.state == BossState::Floating {
            self.body.draw_shadow(surface, ImageId::Boss, 416.0, 16.0);
        }
        self.body.draw_sprite(surface, &sheets.boss, &self.seq);
    }

    fn footprint(&self) -> Rect {
        self.body.footprint()
    }

    fn depth_key(&self) -> f32 {
        self.body.center().y
    }

    fn is_terminal(&self) -> bool {
        self.state == BossState::Dead
    }
}
