//! Frame orchestrator
//!
//! One call per rendered frame. The outer phase decides what runs; while
//! playing, the steps run in a fixed order:
//!
//! 1. player input
//! 2. contact collisions (strikes, flames)
//! 3. cleanup of terminal actors
//! 4. spawn director
//! 5. free-standing motions
//! 6. draw order by depth
//! 7. update then draw each actor in that order
//!
//! Commands the actors pushed during step 7 are applied last.

use super::collision::in_range;
use super::message::MessageBoard;
use super::world::{Cue, Phase, Target, World};
use crate::actor::boss::BossHit;
use crate::actor::minion::MinionHit;
use crate::actor::player::PlayerHurt;
use crate::actor::{Actor, ActorCtx, Boss, Command, Explosion, FlameStream, Hazard, Minion, Projectile};
use crate::anim::{Field, Tween};
use crate::audio::{AudioCommand, AudioCue};
use crate::platform::InputState;
use crate::renderer::{FOOTPRINT_COLOR, ImageId, Rect, Surface, TextStyle};

/// Advance the session by one frame of `elapsed_ms` and draw it
pub fn tick(world: &mut World, input: &InputState, elapsed_ms: f32, surface: &mut dyn Surface) {
    // Handle pause toggle
    if input.pause {
        match world.phase {
            Phase::Playing => world.set_phase(Phase::Paused),
            Phase::Paused => world.set_phase(Phase::Playing),
            _ => {}
        }
    }

    world.level.draw(surface);

    match world.phase {
        Phase::Start => {
            run_motions(world, elapsed_ms);
            world.draw_overlay(surface);
        }
        Phase::Playing => play(world, input, elapsed_ms, surface),
        Phase::Paused => world.draw_cast(surface),
        Phase::GameEnding => {
            world.cast.player.draw(surface, &world.sheets);
            run_motions(world, elapsed_ms);
            world.draw_overlay(surface);
        }
        Phase::End => {
            draw_ending(world, surface);
            if world.ending.update(elapsed_ms) {
                world.message_complete();
                let timing = &world.tuning.timing;
                let (duration, dim) = (timing.message_fade_ms, timing.message_dim);
                world.set_phase(Phase::FinalMessage);
                world.fade(0.0, dim, duration, Cue::Dimmed);
            }
            world.ending.draw(surface);
        }
        Phase::FinalMessage => {
            draw_ending(world, surface);
            run_motions(world, elapsed_ms);
            let done = world
                .final_message
                .as_mut()
                .is_some_and(|board| board.update(elapsed_ms));

            // the first message stays up until the dim finishes
            if world.final_message.is_none() {
                world.ending.draw(surface);
            }
            world.draw_overlay(surface);
            if let Some(board) = &world.final_message {
                board.draw(surface);
            }
            if done {
                world.message_complete();
            }
        }
        Phase::GameOver => {
            world.draw_cast(surface);
            run_motions(world, elapsed_ms);
            world.draw_overlay(surface);
        }
    }
}

/// Steps 1-7 plus command application
fn play(world: &mut World, input: &InputState, elapsed_ms: f32, surface: &mut dyn Surface) {
    // 1. input
    world.cast.player.handle_input(input, &world.tuning.player);

    // 2. collisions
    resolve_strikes(world);
    resolve_burns(world);

    // 3. cleanup
    clean_up(world);

    // 4. spawns
    spawn(world);

    // 5. free-standing motions
    run_motions(world, elapsed_ms);

    // 6. draw order
    let order = world.cast.draw_order();

    // 7. update and draw
    let debug = world.debug_overlay();
    let mut commands = std::mem::take(&mut world.commands);
    {
        let mut ctx = ActorCtx {
            player: world.cast.player.view(),
            can_scroll: world.level.can_scroll(),
            rng: &mut world.rng,
            tuning: &world.tuning,
            sheets: &world.sheets,
            commands: &mut commands,
        };
        for slot in order {
            let Some(actor) = world.cast.get_mut(slot) else {
                continue;
            };
            actor.update(elapsed_ms, &mut ctx);
            actor.draw(surface, &world.sheets);
            if debug {
                surface.fill_rect(actor.footprint(), FOOTPRINT_COLOR);
            }
        }
    }

    for command in commands.drain(..) {
        apply(world, command);
    }
    world.commands = commands;
}

/// The player's strike lands on everything its reach covers
fn resolve_strikes(world: &mut World) {
    let Some(strike) = world.cast.player.take_strike(&world.tuning.player) else {
        return;
    };
    let damage = world.tuning.player.damage;

    let mut hits = 0;
    for minion in &mut world.cast.minions {
        if minion.is_hittable()
            && in_range(&strike, &minion.body.footprint())
            && minion.hurt(damage, &world.tuning.minion) != MinionHit::Ignored
        {
            hits += 1;
        }
    }
    for _ in 0..hits {
        world.emit_audio(AudioCommand::Play(AudioCue::Hit));
    }

    let boss_hit = world.cast.boss.as_mut().is_some_and(|boss| {
        in_range(&strike, &boss.body.footprint())
            && boss.hurt(damage, &world.tuning.boss) != BossHit::Ignored
    });
    if boss_hit {
        world.emit_audio(AudioCommand::Play(AudioCue::BossHit));
    }
}

/// Flames burn the player on footprint overlap
fn resolve_burns(world: &mut World) {
    let player = world.cast.player.body.footprint();
    let burns = world
        .cast
        .hazards
        .iter()
        .flat_map(Hazard::burning)
        .filter(|flame| in_range(&player, flame))
        .count();

    for _ in 0..burns {
        let damage = world.tuning.hazards.flame_damage;
        hurt_player(world, damage);
    }
}

fn hurt_player(world: &mut World, damage: i32) {
    if world.cast.player.hurt(damage, &world.tuning.player) == PlayerHurt::Defeated {
        game_over(world);
    }
}

fn game_over(world: &mut World) {
    if world.phase != Phase::Playing {
        return;
    }
    world.set_phase(Phase::GameOver);
    world.emit_audio(AudioCommand::Pause(AudioCue::Bgm));
    world.emit_audio(AudioCommand::Pause(AudioCue::BgmBoss));
    let duration = world.tuning.timing.fade_out_ms;
    world.fade(0.0, 1.0, duration, Cue::FadedOut);
}

/// Remove terminal actors; a dead boss ends the stage
fn clean_up(world: &mut World) {
    let width = world.tuning.screen.width;
    let cast = &mut world.cast;

    cast.minions.retain(|minion| !minion.is_terminal());
    for hazard in &mut cast.hazards {
        hazard.cull(width);
    }
    cast.hazards.retain(|hazard| !hazard.is_terminal());
    cast.effects.retain(|effect| !effect.is_terminal());

    if cast.boss.as_ref().is_some_and(Boss::is_terminal) {
        cast.boss = None;
        cast.player.celebrate(&world.tuning.player);
    }
}

fn spawn(world: &mut World) {
    let plan = world.director.plan(
        world.level.distance(),
        world.level.at_end(),
        &mut world.rng,
        &world.tuning,
    );

    for pos in plan.minions {
        world.cast.minions.push(Minion::new(pos, &world.tuning.minion));
    }

    if plan.boss {
        world.cast.boss = Some(Boss::new(&world.tuning.boss));
        world.emit_audio(AudioCommand::Pause(AudioCue::Bgm));
        world.emit_audio(AudioCommand::SetLoop(AudioCue::BgmBoss, true));
        world.emit_audio(AudioCommand::Play(AudioCue::BgmBoss));
    }
}

fn run_motions(world: &mut World, elapsed_ms: f32) {
    for cue in world.advance_motions(elapsed_ms) {
        match cue {
            Cue::FadedIn => {
                world.set_phase(Phase::Playing);
                world.emit_audio(AudioCommand::SetLoop(AudioCue::Bgm, true));
                world.emit_audio(AudioCommand::Play(AudioCue::Bgm));
            }
            Cue::FadedOut => {
                if world.phase == Phase::GameEnding {
                    world.overlay.alpha = 0.0;
                    world.set_phase(Phase::End);
                }
            }
            Cue::Dimmed => {
                let timing = &world.tuning.timing;
                world.final_message = Some(MessageBoard::new(
                    &world.tuning.messages.final_message,
                    timing.final_chars_per_sec,
                    TextStyle::Final,
                ));
            }
            Cue::BossRecovered => {
                if let Some(boss) = world.cast.boss.as_mut() {
                    boss.recovered(&mut world.rng, &world.tuning);
                }
            }
        }
    }
}

fn apply(world: &mut World, command: Command) {
    match command {
        Command::DamagePlayer(damage) => hurt_player(world, damage),
        Command::SpawnExplosion(center) => {
            let fps = world.tuning.hazards.explosion_fps;
            world.cast.effects.push(Explosion::new(center, fps));
            world.emit_audio(AudioCommand::Rewind(AudioCue::ExplosionSmall));
            world.emit_audio(AudioCommand::Play(AudioCue::ExplosionSmall));
        }
        Command::SpawnProjectile { pos, facing } => {
            let bolt = Projectile::new(pos, facing, &world.tuning.hazards);
            world.cast.hazards.push(Hazard::Bolt(bolt));
        }
        Command::SpawnFlames { pos, facing } => {
            let stream = FlameStream::new(pos, facing, &world.tuning.hazards);
            world.cast.hazards.push(Hazard::Flames(stream));
            let volume = world.tuning.hazards.flame_volume;
            world.emit_audio(AudioCommand::SetVolume(AudioCue::FireBurning, volume));
            world.emit_audio(AudioCommand::Play(AudioCue::FireBurning));
        }
        Command::ScrollStage => world.scroll_stage(),
        Command::BossArrived => world.show_boss_health(),
        Command::BossRecoil { to } => {
            let Some(from) = world.cast.boss.as_ref().map(|boss| boss.body.pos) else {
                return;
            };
            let tween = Tween::new(world.tuning.boss.recoil_ms)
                .field(Field::X, from.x, to.x)
                .field(Field::Y, from.y, to.y)
                .on_complete(Cue::BossRecovered);
            world.add_motion(Target::Boss, tween);
        }
        Command::StageCleared => {
            if world.phase == Phase::Playing {
                world.set_phase(Phase::GameEnding);
                let duration = world.tuning.timing.fade_out_ms;
                world.fade(0.0, 1.0, duration, Cue::FadedOut);
            }
        }
        Command::Audio(audio) => world.emit_audio(audio),
    }
}

fn draw_ending(world: &World, surface: &mut dyn Surface) {
    let screen = &world.tuning.screen;
    let full = Rect::new(0.0, 0.0, screen.width, screen.height);
    surface.blit(ImageId::Ending, full, full, 1.0);
}
