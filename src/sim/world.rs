//! Session state
//!
//! Everything one play session owns, passed by reference into the frame
//! orchestrator. Nothing here is global.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::director::Director;
use super::level::Level;
use super::message::MessageBoard;
use crate::actor::{Actor, Boss, Command, Explosion, Hazard, Minion, Player, Sheets};
use crate::anim::{Animatable, Field, Timeline, Tween, TweenStep};
use crate::audio::AudioCommand;
use crate::error::Result;
use crate::renderer::{ImageId, Rect, Rgba, SpriteAtlas, Surface, TextStyle};
use crate::tuning::Tuning;

/// Outer phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Fading in from black
    Start,
    Playing,
    Paused,
    /// Stage cleared, fading out
    GameEnding,
    /// Ending image with the first message
    End,
    /// Dimmed ending image with the closing message
    FinalMessage,
    /// Player defeated
    GameOver,
}

/// Host-facing notifications, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Audio(AudioCommand),
    PhaseChanged { from: Phase, to: Phase },
    /// The boss finished its entrance; show its health bar
    BossHealthShown,
    /// A message board revealed its last character
    MessageComplete,
}

/// Where an actor lives in the [`Cast`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Player,
    Minion(usize),
    Boss,
    Hazard(usize),
    Effect(usize),
}

/// Every live actor, one collection per role
#[derive(Debug, Clone)]
pub struct Cast {
    pub player: Player,
    pub minions: Vec<Minion>,
    pub boss: Option<Boss>,
    pub hazards: Vec<Hazard>,
    pub effects: Vec<Explosion>,
}

impl Cast {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            minions: Vec::new(),
            boss: None,
            hazards: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn get(&self, slot: Slot) -> Option<&dyn Actor> {
        match slot {
            Slot::Player => Some(&self.player),
            Slot::Minion(i) => self.minions.get(i).map(|a| a as &dyn Actor),
            Slot::Boss => self.boss.as_ref().map(|a| a as &dyn Actor),
            Slot::Hazard(i) => self.hazards.get(i).map(|a| a as &dyn Actor),
            Slot::Effect(i) => self.effects.get(i).map(|a| a as &dyn Actor),
        }
    }

    pub fn get_mut(&mut self, slot: Slot) -> Option<&mut dyn Actor> {
        match slot {
            Slot::Player => Some(&mut self.player),
            Slot::Minion(i) => self.minions.get_mut(i).map(|a| a as &mut dyn Actor),
            Slot::Boss => self.boss.as_mut().map(|a| a as &mut dyn Actor),
            Slot::Hazard(i) => self.hazards.get_mut(i).map(|a| a as &mut dyn Actor),
            Slot::Effect(i) => self.effects.get_mut(i).map(|a| a as &mut dyn Actor),
        }
    }

    /// Every live actor, farthest from the camera first
    ///
    /// Ties keep collection order: minions, hazards, effects, player, boss.
    pub fn draw_order(&self) -> Vec<Slot> {
        let mut keyed: Vec<(f32, Slot)> = Vec::with_capacity(
            self.minions.len() + self.hazards.len() + self.effects.len() + 2,
        );
        keyed.extend(self.minions.iter().enumerate().map(|(i, a)| (a.depth_key(), Slot::Minion(i))));
        keyed.extend(self.hazards.iter().enumerate().map(|(i, a)| (a.depth_key(), Slot::Hazard(i))));
        keyed.extend(self.effects.iter().enumerate().map(|(i, a)| (a.depth_key(), Slot::Effect(i))));
        keyed.push((self.player.depth_key(), Slot::Player));
        if let Some(boss) = &self.boss {
            keyed.push((boss.depth_key(), Slot::Boss));
        }

        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        keyed.into_iter().map(|(_, slot)| slot).collect()
    }

    /// Shift everything that moves with the stage
    pub fn scroll(&mut self, dx: f32) {
        for minion in &mut self.minions {
            minion.scroll(dx);
        }
        for hazard in &mut self.hazards {
            hazard.scroll(dx);
        }
        for effect in &mut self.effects {
            effect.scroll(dx);
        }
    }
}

/// Full-screen black overlay used for fades
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Overlay {
    pub alpha: f32,
}

impl Overlay {
    pub fn draw(&self, surface: &mut dyn Surface, width: f32, height: f32) {
        if self.alpha > 0.0 {
            surface.fill_rect(Rect::new(0.0, 0.0, width, height), Rgba::black(self.alpha));
        }
    }
}

impl Animatable for Overlay {
    fn field(&self, field: Field) -> f32 {
        match field {
            Field::Alpha => self.alpha,
            _ => 0.0,
        }
    }

    fn set_field(&mut self, field: Field, value: f32) {
        if field == Field::Alpha {
            self.alpha = value;
        }
    }
}

/// What a free-standing motion animates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Overlay,
    Boss,
}

/// Completion events of free-standing motions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    FadedIn,
    FadedOut,
    /// Ending image dimmed behind the closing message
    Dimmed,
    BossRecovered,
}

/// What drives a free-standing motion
#[derive(Debug, Clone)]
pub enum Script {
    Tween(Tween<Cue>),
    Timeline(Timeline<Cue>),
}

impl Script {
    /// Advance and collect completion cues in order
    fn advance<T: Animatable + ?Sized>(&mut self, elapsed_ms: f32, target: &mut T, cues: &mut Vec<Cue>) {
        match self {
            Script::Tween(tween) => {
                if let TweenStep::Completed(Some(cue)) = tween.advance(elapsed_ms, target) {
                    cues.push(cue);
                }
            }
            Script::Timeline(timeline) => cues.extend(timeline.advance(elapsed_ms, target).events),
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Script::Tween(tween) => tween.is_active(),
            Script::Timeline(timeline) => !timeline.is_finished(),
        }
    }
}

impl From<Tween<Cue>> for Script {
    fn from(tween: Tween<Cue>) -> Self {
        Script::Tween(tween)
    }
}

impl From<Timeline<Cue>> for Script {
    fn from(timeline: Timeline<Cue>) -> Self {
        Script::Timeline(timeline)
    }
}

/// A tween or timeline not owned by any actor
#[derive(Debug, Clone)]
pub struct Motion {
    pub target: Target,
    pub script: Script,
}

/// One play session
pub struct World {
    pub tuning: Tuning,
    pub phase: Phase,
    pub level: Level,
    pub director: Director,
    pub cast: Cast,
    pub sheets: Sheets,
    pub overlay: Overlay,
    pub(crate) motions: Vec<Motion>,
    pub(crate) commands: Vec<Command>,
    pub(crate) rng: Pcg32,
    pub(crate) ending: MessageBoard,
    pub(crate) final_message: Option<MessageBoard>,
    events: Vec<GameEvent>,
    debug_overlay: bool,
    boss_health_shown: bool,
}

impl World {
    /// Validate the data and set up a session that starts black
    pub fn new(tuning: Tuning, seed: u64, atlas: &dyn SpriteAtlas) -> Result<Self> {
        tuning.validate()?;
        let sheets = Sheets::standard();
        sheets.validate()?;

        let level = Level::new(&tuning, atlas);
        let director = Director::new(&tuning.spawn.thresholds);
        let player = Player::new(&tuning.player);
        let ending = MessageBoard::new(
            &tuning.messages.ending,
            tuning.timing.message_chars_per_sec,
            TextStyle::Board,
        )
        .with_backdrop(atlas.dimensions(ImageId::MessageBoard));

        let mut world = Self {
            phase: Phase::Start,
            level,
            director,
            cast: Cast::new(player),
            sheets,
            overlay: Overlay { alpha: 1.0 },
            motions: Vec::new(),
            commands: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            ending,
            final_message: None,
            events: Vec::new(),
            debug_overlay: false,
            boss_health_shown: false,
            tuning,
        };
        world.fade(1.0, 0.0, world.tuning.timing.fade_in_ms, Cue::FadedIn);

        log::info!(
            "world ready: seed {}, level width {}, {} spawn thresholds",
            seed,
            world.level.width,
            world.tuning.spawn.thresholds.len()
        );
        Ok(world)
    }

    pub fn debug_overlay(&self) -> bool {
        self.debug_overlay
    }

    pub fn set_debug_overlay(&mut self, on: bool) {
        self.debug_overlay = on;
    }

    /// Everything emitted since the last drain, in order
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn motions(&self) -> &[Motion] {
        &self.motions
    }

    pub fn set_phase(&mut self, to: Phase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("phase {:?} -> {:?}", from, to);
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    pub fn emit_audio(&mut self, command: AudioCommand) {
        self.events.push(GameEvent::Audio(command));
    }

    /// Show the boss health bar; only the first call emits
    pub fn show_boss_health(&mut self) {
        if !self.boss_health_shown {
            self.boss_health_shown = true;
            self.events.push(GameEvent::BossHealthShown);
        }
    }

    pub(crate) fn message_complete(&mut self) {
        self.events.push(GameEvent::MessageComplete);
    }

    /// Scroll the stage one step, dragging the cast along
    pub fn scroll_stage(&mut self) {
        if let Some(dx) = self.level.scroll() {
            self.cast.scroll(dx);
        }
    }

    pub fn add_motion(&mut self, target: Target, script: impl Into<Script>) {
        self.motions.push(Motion {
            target,
            script: script.into(),
        });
    }

    /// Animate the overlay from `from` to `to`
    pub fn fade(&mut self, from: f32, to: f32, duration_ms: f32, cue: Cue) {
        self.overlay.alpha = from;
        self.add_motion(
            Target::Overlay,
            Tween::new(duration_ms).field(Field::Alpha, from, to).on_complete(cue),
        );
    }

    /// Advance free-standing motions, dropping finished ones and those whose
    /// target is gone; returns completion cues in order
    pub fn advance_motions(&mut self, elapsed_ms: f32) -> Vec<Cue> {
        let overlay = &mut self.overlay;
        let boss = &mut self.cast.boss;
        let mut cues = Vec::new();

        self.motions.retain_mut(|motion| {
            match motion.target {
                Target::Overlay => motion.script.advance(elapsed_ms, &mut *overlay, &mut cues),
                Target::Boss => match boss.as_mut() {
                    Some(boss) => motion.script.advance(elapsed_ms, &mut boss.body, &mut cues),
                    None => {
                        log::debug!("dropping motion, boss is gone");
                        return false;
                    }
                },
            }
            motion.script.is_active()
        });
        cues
    }

    /// Draw every live actor in depth order without advancing it
    pub fn draw_cast(&self, surface: &mut dyn Surface) {
        for slot in self.cast.draw_order() {
            if let Some(actor) = self.cast.get(slot) {
                actor.draw(surface, &self.sheets);
            }
        }
    }

    pub fn draw_overlay(&self, surface: &mut dyn Surface) {
        let screen = &self.tuning.screen;
        self.overlay.draw(surface, screen.width, screen.height);
    }
}
