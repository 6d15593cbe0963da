//! Foot-soldier enemy
//!
//! Transition table:
//!
//! | from         | to               | when                                        |
//! |--------------|------------------|---------------------------------------------|
//! | `Travelling` | `Thinking(n)`    | close to the player, or a random pause      |
//! | `Thinking(n)`| `Attacking`      | countdown over and the player is in reach   |
//! | `Thinking(n)`| `Travelling`     | countdown over, player out of reach         |
//! | `Attacking`  | `Thinking(n)`    | attack animation done (damage if in reach)  |
//! | any live     | `Hurt`           | hit with health left                        |
//! | `Hurt`       | `Travelling`     | recovery timer done                         |
//! | any live     | `Dying`          | hit with no health left                     |
//! | `Dying`      | `Dead`           | death timeline done                         |

use glam::Vec2;
use rand::Rng;

use super::sequence::{SequenceStep, Sequencer};
use super::sprite::{AnimKey, Clip, Facing, SpriteSheet};
use super::{Actor, ActorCtx, Body, Command, PlayerView, Sheets};
use crate::anim::{Easing, Field, Timeline, Tween, TweenStep};
use crate::renderer::{ImageId, Rect, Surface};
use crate::sim::collision::in_range;
use crate::tuning::{MinionTuning, Tuning};

pub const POSES: &[&str] = &["stand", "walk", "attack", "hurt", "dying", "dead"];

pub fn sheet() -> SpriteSheet {
    SpriteSheet::new("minion", ImageId::Enemies)
        .clip("stand", Facing::Left, Clip::new(40.0, 64.0, 0.0, 64.0, &[0]))
        .clip("stand", Facing::Right, Clip::new(40.0, 64.0, 0.0, 0.0, &[0]))
        .clip("walk", Facing::Left, Clip::new(40.0, 64.0, 40.0, 64.0, &[0, 1, 2, 3]))
        .clip("walk", Facing::Right, Clip::new(40.0, 64.0, 40.0, 0.0, &[0, 1, 2, 3]))
        .clip("attack", Facing::Left, Clip::new(56.0, 64.0, 0.0, 224.0, &[0, 0, 1, 1]))
        .clip("attack", Facing::Right, Clip::new(56.0, 64.0, 0.0, 145.0, &[0, 0, 1, 1]))
        .clip("hurt", Facing::Left, Clip::new(48.0, 48.0, 0.0, 336.0, &[0]))
        .clip("hurt", Facing::Right, Clip::new(48.0, 48.0, 0.0, 288.0, &[0]))
        .clip("dying", Facing::Left, Clip::new(40.0, 40.0, 160.0, 344.0, &[0]))
        .clip("dying", Facing::Right, Clip::new(40.0, 40.0, 104.0, 296.0, &[0]))
        .clip("dead", Facing::Left, Clip::new(56.0, 32.0, 96.0, 352.0, &[0]))
        .clip("dead", Facing::Right, Clip::new(56.0, 32.0, 152.0, 304.0, &[0]))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinionState {
    Travelling,
    /// Standing still for the remaining updates
    Thinking { ticks: u32 },
    Attacking,
    Hurt,
    Dying,
    /// Terminal
    Dead,
}

/// Result of a hit on a minion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinionHit {
    /// Already dying or dead
    Ignored,
    Hurt,
    Dying,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MinionCue {
    Recovered,
    /// Knockback over; switch to the lying pose
    Fallen,
    Expired,
}

#[derive(Debug, Clone)]
pub struct Minion {
    pub body: Body,
    pub health: i32,
    state: MinionState,
    seq: Sequencer,
    fallen: bool,
    recovery: Option<Tween<MinionCue>>,
    death: Option<Timeline<MinionCue>>,
}

impl Minion {
    pub fn new(pos: Vec2, tuning: &MinionTuning) -> Self {
        Self {
            body: Body::new(pos, tuning.width, tuning.depth, Facing::Left),
            health: tuning.health,
            state: MinionState::Travelling,
            seq: Sequencer::new(AnimKey::new("stand", Facing::Left), tuning.fps),
            fallen: false,
            recovery: None,
            death: None,
        }
    }

    pub fn state(&self) -> MinionState {
        self.state
    }

    /// Can a strike still land?
    pub fn is_hittable(&self) -> bool {
        !matches!(self.state, MinionState::Dying | MinionState::Dead)
    }

    fn hit_box(&self, tuning: &MinionTuning) -> Rect {
        self.body
            .footprint()
            .reach(self.body.facing, tuning.reach_x, tuning.reach_y)
    }

    fn think(&mut self, rng: &mut impl Rng, tuning: &MinionTuning) {
        let extra = if tuning.think_ticks_spread > 0 {
            rng.random_range(0..tuning.think_ticks_spread)
        } else {
            0
        };
        let ticks = (tuning.think_ticks_min + extra).max(1);
        self.state = MinionState::Thinking { ticks };
        log::debug!("minion thinks for {} ticks", ticks);
    }

    fn decide(&mut self, player: &PlayerView, sheets: &Sheets, tuning: &MinionTuning) {
        if in_range(&self.hit_box(tuning), &player.footprint) {
            let key = AnimKey::new("attack", self.body.facing);
            let steps = sheets.minion.get(key).map_or(1, |clip| clip.len() as u32);
            self.state = MinionState::Attacking;
            self.seq.play_once(key, steps);
            log::debug!("minion attacks");
        } else {
            self.state = MinionState::Travelling;
        }
    }

    /// Step toward the player's footprint; returns true once close enough to stop
    fn travel(&mut self, player: &PlayerView, tuning: &MinionTuning) -> bool {
        let me = self.body.footprint();
        let target = player.footprint;

        if me.x > target.right() {
            self.body.pos.x -= tuning.speed;
        } else if me.right() < target.x {
            self.body.pos.x += tuning.speed;
        }
        if me.bottom() < target.y {
            self.body.pos.y += tuning.speed / 2.0;
        } else if me.y > target.bottom() {
            self.body.pos.y -= tuning.speed / 2.0;
        }

        let gap = (player.center - self.body.center()).abs();
        gap.x < tuning.proximity_x && gap.y < tuning.proximity_y
    }

    pub fn hurt(&mut self, amount: i32, tuning: &MinionTuning) -> MinionHit {
        if !self.is_hittable() {
            return MinionHit::Ignored;
        }

        self.health -= amount;
        self.seq.cancel_one_shot();
        if self.health <= 0 {
            self.kill(tuning);
            return MinionHit::Dying;
        }

        self.state = MinionState::Hurt;
        self.recovery = Some(Tween::new(tuning.hurt_recovery_ms).on_complete(MinionCue::Recovered));
        MinionHit::Hurt
    }

    fn kill(&mut self, tuning: &MinionTuning) {
        log::debug!("minion dying");
        self.state = MinionState::Dying;
        self.recovery = None;

        let x = self.body.pos.x;
        let final_x = match self.body.facing {
            Facing::Left => x + tuning.knockback,
            Facing::Right => x - tuning.knockback,
        };
        self.death = Some(
            Timeline::new()
                .then(
                    Tween::new(tuning.fall_ms)
                        .field(Field::X, x, final_x)
                        .on_complete(MinionCue::Fallen),
                )
                .at(
                    tuning.bounce_delay_ms,
                    Tween::new(tuning.fall_ms)
                        .field(Field::SpriteY, tuning.bounce_from, tuning.bounce_to)
                        .easing(Easing::EaseOutBounce),
                )
                .then(Tween::hold(tuning.rest_ms, Field::X, final_x))
                .on_complete(MinionCue::Expired),
        );
    }

    fn pose(&self) -> &'static str {
        match self.state {
            MinionState::Travelling => "walk",
            MinionState::Thinking { .. } => "stand",
            MinionState::Attacking => "attack",
            MinionState::Hurt => "hurt",
            MinionState::Dying if self.fallen => "dead",
            MinionState::Dying => "dying",
            MinionState::Dead => "dead",
        }
    }
}

impl Actor for Minion {
    fn update(&mut self, elapsed_ms: f32, ctx: &mut ActorCtx<'_>) {
        let all: &Tuning = ctx.tuning;
        let tuning = &all.minion;

        if self.is_hittable() {
            self.body.face(ctx.player.center.x);
        }

        match self.state {
            MinionState::Thinking { ticks } if ticks <= 1 => {
                self.decide(&ctx.player, ctx.sheets, tuning);
            }
            MinionState::Thinking { ticks } => {
                self.state = MinionState::Thinking { ticks: ticks - 1 };
            }
            MinionState::Travelling => {
                if self.travel(&ctx.player, tuning) {
                    self.think(ctx.rng, tuning);
                }
            }
            _ => {}
        }

        if self.state == MinionState::Travelling && ctx.rng.random_bool(tuning.think_chance) {
            self.think(ctx.rng, tuning);
        }

        let recovered = self
            .recovery
            .as_mut()
            .map(|tween| tween.advance(elapsed_ms, &mut self.body));
        if let Some(TweenStep::Completed(_)) = recovered {
            self.recovery = None;
            if self.state == MinionState::Hurt {
                self.state = MinionState::Travelling;
            }
        }

        let death = self
            .death
            .as_mut()
            .map(|timeline| timeline.advance(elapsed_ms, &mut self.body));
        if let Some(advance) = death {
            if advance.events.contains(&MinionCue::Fallen) {
                self.fallen = true;
            }
            if advance.finished {
                self.death = None;
                self.state = MinionState::Dead;
                ctx.commands.push(Command::SpawnExplosion(self.body.center()));
                log::debug!("minion dead");
            }
        }

        if !self.seq.is_one_shot() {
            self.seq.set_key(AnimKey::new(self.pose(), self.body.facing));
        }
        if self.seq.advance(elapsed_ms, &ctx.sheets.minion) == SequenceStep::Finished
            && self.state == MinionState::Attacking
        {
            if in_range(&self.hit_box(tuning), &ctx.player.footprint) {
                ctx.commands.push(Command::DamagePlayer(tuning.damage));
            }
            self.think(ctx.rng, tuning);
        }
    }

    fn draw(&self, surface: &mut dyn Surface, sheets: &Sheets) {
        self.body.draw_sprite(surface, &sheets.minion, &self.seq);
    }

    fn footprint(&self) -> Rect {
        self.body.footprint()
    }

    fn depth_key(&self) -> f32 {
        self.body.center().y
    }

    fn is_terminal(&self) -> bool {
        self.state == MinionState::Dead
    }

    fn scroll(&mut self, dx: f32) {
        self.body.pos.x += dx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::tests::Harness;

    fn near_player(h: &mut Harness) -> Minion {
        h.place_player(Vec2::new(30.0, 195.0));
        let mut minion = Minion::new(Vec2::new(75.0, 195.0), &h.tuning.minion);
        minion.body.facing = Facing::Left;
        minion
    }

    fn run(minion: &mut Minion, h: &mut Harness, frames: usize, elapsed: f32) {
        for _ in 0..frames {
            minion.update(elapsed, &mut h.ctx());
        }
    }

    #[test]
    fn test_three_hits_to_die() {
        let mut h = Harness::new();
        let mut minion = near_player(&mut h);
        let damage = h.tuning.player.damage;

        assert_eq!(minion.hurt(damage, &h.tuning.minion), MinionHit::Hurt);
        assert_eq!(minion.hurt(damage, &h.tuning.minion), MinionHit::Hurt);
        assert_eq!(minion.hurt(damage, &h.tuning.minion), MinionHit::Dying);
        assert_eq!(minion.state(), MinionState::Dying);
        assert_eq!(minion.health, 0);

        run(&mut minion, &mut h, 20, 100.0);
        assert_eq!(minion.state(), MinionState::Dead);
        assert!(minion.is_terminal());

        assert_eq!(minion.hurt(damage, &h.tuning.minion), MinionHit::Ignored);
        assert_eq!(minion.health, 0);
    }

    #[test]
    fn test_death_knocks_back_and_explodes_once() {
        let mut h = Harness::new();
        let mut minion = near_player(&mut h);
        minion.hurt(6, &h.tuning.minion);

        run(&mut minion, &mut h, 24, 50.0);

        assert_eq!(minion.body.pos.x, 125.0);
        assert_eq!(minion.body.sprite_offset.y, 10.0);
        let explosions: Vec<_> = h
            .commands
            .iter()
            .filter(|c| matches!(c, Command::SpawnExplosion(_)))
            .collect();
        assert_eq!(explosions, vec![&Command::SpawnExplosion(Vec2::new(145.0, 200.0))]);
    }

    #[test]
    fn test_hurt_recovers_to_travelling() {
        let mut h = Harness::new();
        let mut minion = near_player(&mut h);
        minion.hurt(2, &h.tuning.minion);
        assert_eq!(minion.state(), MinionState::Hurt);

        run(&mut minion, &mut h, 9, 100.0);
        assert_eq!(minion.state(), MinionState::Hurt);
        run(&mut minion, &mut h, 2, 100.0);
        assert_ne!(minion.state(), MinionState::Hurt);
    }

    #[test]
    fn test_walks_toward_player() {
        let mut h = Harness::new();
        h.tuning.minion.think_chance = 0.0;
        h.place_player(Vec2::new(30.0, 195.0));
        let mut minion = Minion::new(Vec2::new(200.0, 150.0), &h.tuning.minion);

        run(&mut minion, &mut h, 1, 16.0);
        assert_eq!(minion.body.pos, Vec2::new(199.0, 150.5));
        assert_eq!(minion.body.facing, Facing::Left);
        assert_eq!(minion.state(), MinionState::Travelling);
    }

    #[test]
    fn test_stops_to_think_when_close() {
        let mut h = Harness::new();
        h.tuning.minion.think_chance = 0.0;
        let mut minion = near_player(&mut h);

        run(&mut minion, &mut h, 1, 16.0);
        match minion.state() {
            MinionState::Thinking { ticks } => assert!((15..=24).contains(&ticks)),
            other => panic!("expected thinking, got {other:?}"),
        }
    }

    #[test]
    fn test_random_think_while_travelling() {
        let mut h = Harness::new();
        h.tuning.minion.think_chance = 1.0;
        h.place_player(Vec2::new(30.0, 195.0));
        let mut minion = Minion::new(Vec2::new(200.0, 150.0), &h.tuning.minion);

        run(&mut minion, &mut h, 1, 16.0);
        assert_eq!(minion.body.pos, Vec2::new(199.0, 150.5));
        match minion.state() {
            MinionState::Thinking { ticks } => assert!((15..=24).contains(&ticks)),
            other => panic!("expected thinking, got {other:?}"),
        }
    }

    #[test]
    fn test_hurt_minion_never_rolls_to_think() {
        let mut h = Harness::new();
        h.tuning.minion.think_chance = 1.0;
        h.place_player(Vec2::new(30.0, 195.0));
        let mut minion = Minion::new(Vec2::new(200.0, 150.0), &h.tuning.minion);
        minion.hurt(2, &h.tuning.minion);

        run(&mut minion, &mut h, 5, 16.0);
        assert_eq!(minion.state(), MinionState::Hurt);
    }

    #[test]
    fn test_attack_lands_when_animation_ends() {
        let mut h = Harness::new();
        h.tuning.minion.think_chance = 0.0;
        let mut minion = near_player(&mut h);
        minion.body.pos.x = 72.0;

        // Think, decide, then play the four-step attack
        run(&mut minion, &mut h, 30, 16.0);
        assert!(
            matches!(minion.state(), MinionState::Attacking),
            "got {:?}",
            minion.state()
        );
        assert!(h.commands.is_empty());

        run(&mut minion, &mut h, 4, 170.0);
        assert_eq!(h.commands, vec![Command::DamagePlayer(2)]);
        assert!(matches!(minion.state(), MinionState::Thinking { .. }));
    }

    #[test]
    fn test_attack_misses_if_player_left() {
        let mut h = Harness::new();
        h.tuning.minion.think_chance = 0.0;
        let mut minion = near_player(&mut h);
        minion.body.pos.x = 72.0;
        run(&mut minion, &mut h, 30, 16.0);
        assert_eq!(minion.state(), MinionState::Attacking);

        h.place_player(Vec2::new(0.0, 140.0));
        run(&mut minion, &mut h, 4, 170.0);
        assert!(h.commands.is_empty());
    }
}
