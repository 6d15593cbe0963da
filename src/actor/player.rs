//! The player character
//!
//! Input is applied in two halves: `handle_input` (frame step 1) records the
//! heading and starts attacks or jumps, `update` (step 7) moves, clamps and
//! animates. An attack leaves a pending strike that the collision step
//! resolves in between.

use std::f32::consts::FRAC_PI_8;

use glam::Vec2;

use super::sequence::{SequenceStep, Sequencer};
use super::sprite::{AnimKey, Clip, Facing, SpriteSheet};
use super::{Actor, ActorCtx, Body, Command, PlayerView, Sheets};
use crate::anim::{Easing, Field, Timeline, Tween, TweenStep};
use crate::platform::InputState;
use crate::renderer::{ImageId, Rect, Surface};
use crate::tuning::{PlayerTuning, Tuning};

/// Poses the player can select
pub const POSES: &[&str] = &["stand", "walk", "jump", "attack1", "hurt", "cowabunga"];

pub fn sheet() -> SpriteSheet {
    let mut sheet = SpriteSheet::new("player", ImageId::Player);
    let table: [(&'static str, Facing, Clip); 12] = [
        ("stand", Facing::Left, Clip::new(72.0, 56.0, 0.0, 184.0, &[0, 0, 0, 0, 0, 0, 0, 2, 1, 4, 3, 2, 1, 4, 3, 2])),
        ("stand", Facing::Right, Clip::new(72.0, 56.0, 0.0, 128.0, &[0, 0, 0, 0, 0, 0, 0, 3, 4, 1, 2, 3, 4, 1, 2, 3])),
        ("walk", Facing::Left, Clip::new(40.0, 64.0, 0.0, 64.0, &[1, 1, 2, 2, 1, 1, 0, 0])),
        ("walk", Facing::Right, Clip::new(40.0, 64.0, 0.0, 0.0, &[1, 1, 2, 2, 1, 1, 0, 0])),
        ("jump", Facing::Left, Clip::new(32.0, 72.0, 176.0, 248.0, &[0, 0, 0, 0, 0, 1, 2, 3, 4])),
        ("jump", Facing::Right, Clip::new(32.0, 72.0, 0.0, 248.0, &[0, 0, 0, 0, 0, 1, 2, 3, 4])),
        ("attack1", Facing::Left, Clip::new(72.0, 72.0, 0.0, 528.0, &[0, 0, 1, 2])),
        ("attack1", Facing::Right, Clip::new(72.0, 72.0, 0.0, 448.0, &[0, 0, 1, 2])),
        ("hurt", Facing::Left, Clip::new(72.0, 64.0, 0.0, 384.0, &[0])),
        ("hurt", Facing::Right, Clip::new(72.0, 64.0, 0.0, 320.0, &[0])),
        ("cowabunga", Facing::Left, Clip::new(32.0, 80.0, 0.0, 608.0, &[0])),
        ("cowabunga", Facing::Right, Clip::new(32.0, 80.0, 0.0, 608.0, &[0])),
    ];
    for (pose, facing, clip) in table {
        sheet = sheet.clip(pose, facing, clip);
    }
    sheet
}

/// One of the eight compass directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl Heading {
    /// Combine the direction flags; diagonals win over single axes and
    /// vertical flags over horizontal ones
    pub fn from_input(input: &InputState) -> Option<Heading> {
        let heading = match (input.up, input.down, input.left, input.right) {
            (true, _, true, _) => Heading::UpLeft,
            (true, _, _, true) => Heading::UpRight,
            (_, true, true, _) => Heading::DownLeft,
            (_, true, _, true) => Heading::DownRight,
            (true, _, _, _) => Heading::Up,
            (_, true, _, _) => Heading::Down,
            (_, _, true, _) => Heading::Left,
            (_, _, _, true) => Heading::Right,
            _ => return None,
        };
        Some(heading)
    }

    /// Per-update displacement; diagonals use the π/8 compass split
    pub fn delta(self, speed: f32) -> Vec2 {
        let (c, s) = (FRAC_PI_8.cos() * speed, FRAC_PI_8.sin() * speed);
        match self {
            Heading::Up => Vec2::new(0.0, -speed),
            Heading::Down => Vec2::new(0.0, speed),
            Heading::Left => Vec2::new(-speed, 0.0),
            Heading::Right => Vec2::new(speed, 0.0),
            Heading::UpLeft => Vec2::new(-c, -s),
            Heading::UpRight => Vec2::new(c, -s),
            Heading::DownLeft => Vec2::new(-c, s),
            Heading::DownRight => Vec2::new(c, s),
        }
    }

    /// Facing implied by the heading; pure vertical keeps the current one
    pub fn facing(self) -> Option<Facing> {
        match self {
            Heading::Left | Heading::UpLeft | Heading::DownLeft => Some(Facing::Left),
            Heading::Right | Heading::UpRight | Heading::DownRight => Some(Facing::Right),
            Heading::Up | Heading::Down => None,
        }
    }

    pub fn is_rightward(self) -> bool {
        self.facing() == Some(Facing::Right)
    }
}

/// Player behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// Standing or walking
    Idle,
    Attacking,
    Jumping,
    /// Stunned for the remaining updates
    Hurt { ticks: u32 },
    /// Stage cleared, waiting for the ending
    Celebrating,
    /// Out of lives (terminal)
    Defeated,
}

/// Result of damage dealt to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerHurt {
    Ignored,
    Hurt,
    /// Health ran out; a life was spent and health restored
    LifeLost,
    /// Health ran out with no lives left
    Defeated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayerCue {
    Landed,
    Celebrated,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub health: i32,
    pub lives: u32,
    state: PlayerState,
    seq: Sequencer,
    heading: Option<Heading>,
    /// Attack button released since the last attack
    attack_armed: bool,
    /// Jump button released since the last jump
    jump_armed: bool,
    pending_strike: bool,
    jump: Option<Timeline<PlayerCue>>,
    celebration: Option<Tween<PlayerCue>>,
}

impl Player {
    pub fn new(tuning: &PlayerTuning) -> Self {
        Self {
            body: Body::new(
                Vec2::new(tuning.start_x, tuning.start_y),
                tuning.width,
                tuning.depth,
                Facing::Right,
            ),
            health: tuning.health,
            lives: tuning.lives,
            state: PlayerState::Idle,
            seq: Sequencer::new(AnimKey::new("stand", Facing::Right), tuning.fps),
            heading: None,
            attack_armed: true,
            jump_armed: true,
            pending_strike: false,
            jump: None,
            celebration: None,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn heading(&self) -> Option<Heading> {
        self.heading
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            footprint: self.body.footprint(),
            center: self.body.center(),
        }
    }

    /// Frame step 1
    pub fn handle_input(&mut self, input: &InputState, tuning: &PlayerTuning) {
        if matches!(self.state, PlayerState::Celebrating | PlayerState::Defeated) {
            self.heading = None;
            return;
        }

        self.heading = Heading::from_input(input);
        if let Some(facing) = self.heading.and_then(Heading::facing) {
            self.body.facing = facing;
        }

        if input.jump {
            self.jump(tuning);
        } else {
            self.jump_armed = true;
        }

        if input.attack {
            self.attack(tuning);
        } else {
            self.attack_armed = true;
        }
    }

    fn attack(&mut self, tuning: &PlayerTuning) {
        if !self.attack_armed || self.state != PlayerState::Idle {
            return;
        }
        self.attack_armed = false;
        self.state = PlayerState::Attacking;
        self.pending_strike = true;
        self.seq
            .play_once(AnimKey::new("attack1", self.body.facing), tuning.attack_steps);
        log::debug!("player attacks {}", self.body.facing.as_str());
    }

    fn jump(&mut self, tuning: &PlayerTuning) {
        if !self.jump_armed || self.state != PlayerState::Idle {
            return;
        }
        self.jump_armed = false;
        self.state = PlayerState::Jumping;

        let height = tuning.jump_height;
        self.jump = Some(
            Timeline::new()
                .then(
                    Tween::new(tuning.jump_up_ms)
                        .field(Field::SpriteY, 0.0, -height)
                        .easing(Easing::EaseOutQuad),
                )
                .then(
                    Tween::new(tuning.jump_down_ms)
                        .field(Field::SpriteY, -height, 0.0)
                        .easing(Easing::EaseInQuad),
                )
                .on_complete(PlayerCue::Landed),
        );
    }

    /// Hit footprint of a strike started this frame, consumed on read
    pub fn take_strike(&mut self, tuning: &PlayerTuning) -> Option<Rect> {
        if !std::mem::take(&mut self.pending_strike) {
            return None;
        }
        Some(
            self.body
                .footprint()
                .reach(self.body.facing, tuning.reach_x, tuning.reach_y),
        )
    }

    pub fn hurt(&mut self, amount: i32, tuning: &PlayerTuning) -> PlayerHurt {
        if matches!(
            self.state,
            PlayerState::Hurt { .. } | PlayerState::Jumping | PlayerState::Celebrating | PlayerState::Defeated
        ) {
            return PlayerHurt::Ignored;
        }

        self.health -= amount;
        if self.health <= 0 {
            self.lives = self.lives.saturating_sub(1);
            if self.lives == 0 {
                self.health = 0;
                self.state = PlayerState::Defeated;
                self.pending_strike = false;
                self.seq.cancel_one_shot();
                log::info!("player defeated");
                return PlayerHurt::Defeated;
            }
            self.health = tuning.health;
            log::info!("player lost a life, {} left", self.lives);
            return PlayerHurt::LifeLost;
        }

        self.state = PlayerState::Hurt {
            ticks: tuning.hurt_ticks.max(1),
        };
        self.pending_strike = false;
        self.seq.cancel_one_shot();
        PlayerHurt::Hurt
    }

    /// Start the stage-clear celebration; repeated calls do nothing
    pub fn celebrate(&mut self, tuning: &PlayerTuning) {
        if matches!(self.state, PlayerState::Celebrating | PlayerState::Defeated) {
            return;
        }
        log::info!("stage clear");
        self.state = PlayerState::Celebrating;
        self.heading = None;
        self.pending_strike = false;
        self.jump = None;
        self.body.sprite_offset = Vec2::ZERO;
        self.seq.cancel_one_shot();
        self.celebration = Some(Tween::new(tuning.celebrate_ms).on_complete(PlayerCue::Celebrated));
    }

    fn pose(&self) -> &'static str {
        match self.state {
            PlayerState::Attacking => "attack1",
            PlayerState::Hurt { .. } | PlayerState::Defeated => "hurt",
            PlayerState::Celebrating => "cowabunga",
            PlayerState::Jumping => "jump",
            PlayerState::Idle if self.heading.is_some() => "walk",
            PlayerState::Idle => "stand",
        }
    }

    fn clamp(&mut self, ctx: &mut ActorCtx<'_>) {
        let all: &Tuning = ctx.tuning;
        let tuning = &all.player;
        let max_x = if ctx.can_scroll {
            tuning.max_x_scrolling
        } else {
            tuning.max_x_locked
        };
        let pos = &mut self.body.pos;

        if pos.x < 0.0 {
            pos.x = 0.0;
        }
        if pos.x > max_x {
            pos.x = max_x;
            if self.heading.is_some_and(Heading::is_rightward) {
                ctx.commands.push(Command::ScrollStage);
            }
        }
        if pos.y < tuning.min_y {
            pos.y = tuning.min_y;
        }
        let floor = all.screen.height - self.body.depth;
        if pos.y > floor {
            pos.y = floor;
        }
    }
}

impl Actor for Player {
    fn update(&mut self, elapsed_ms: f32, ctx: &mut ActorCtx<'_>) {
        match self.state {
            PlayerState::Hurt { ticks } => {
                self.state = if ticks <= 1 {
                    PlayerState::Idle
                } else {
                    PlayerState::Hurt { ticks: ticks - 1 }
                };
            }
            PlayerState::Idle | PlayerState::Jumping => {
                if let Some(heading) = self.heading {
                    self.body.pos += heading.delta(ctx.tuning.player.speed);
                }
            }
            PlayerState::Celebrating => {
                if let Some(tween) = self.celebration.as_mut() {
                    if let TweenStep::Completed(Some(PlayerCue::Celebrated)) =
                        tween.advance(elapsed_ms, &mut self.body)
                    {
                        ctx.commands.push(Command::StageCleared);
                    }
                }
            }
            PlayerState::Attacking | PlayerState::Defeated => {}
        }

        if let Some(jump) = self.jump.as_mut() {
            let advance = jump.advance(elapsed_ms, &mut self.body);
            if advance.finished || advance.events.contains(&PlayerCue::Landed) {
                self.jump = None;
                self.body.sprite_offset.y = 0.0;
                if self.state == PlayerState::Jumping {
                    self.state = PlayerState::Idle;
                }
            }
        }

        self.clamp(ctx);

        if !self.seq.is_one_shot() {
            self.seq.set_key(AnimKey::new(self.pose(), self.body.facing));
        }
        if self.seq.advance(elapsed_ms, &ctx.sheets.player) == SequenceStep::Finished
            && self.state == PlayerState::Attacking
        {
            self.state = PlayerState::Idle;
        }

        self.heading = None;
    }

    fn draw(&self, surface: &mut dyn Surface, sheets: &Sheets) {
        if self.state == PlayerState::Jumping {
            self.body.draw_shadow(surface, ImageId::Player, 400.0, 16.0);
        }
        self.body.draw_sprite(surface, &sheets.player, &self.seq);
    }

    fn footprint(&self) -> Rect {
        self.body.footprint()
    }

    fn depth_key(&self) -> f32 {
        self.body.center().y
    }

    fn is_terminal(&self) -> bool {
        self.state == PlayerState::Defeated
    }
}
