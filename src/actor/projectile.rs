//! Boss hazards
//!
//! Both live in one collection behind [`Hazard`]. The forward bolt flies
//! overhead and never collides; the fire stream grows one flame at a time
//! along the ground and each flame burns the player on contact.

use glam::Vec2;

use super::sprite::Facing;
use super::{Actor, ActorCtx, Sheets};
use crate::renderer::{ImageId, Rect, Surface};
use crate::tuning::HazardTuning;

const BOLT_SIZE: f32 = 32.0;

/// Forward projectile
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    pub facing: Facing,
    speed: f32,
    destroyed: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, facing: Facing, tuning: &HazardTuning) -> Self {
        Self {
            pos,
            facing,
            speed: tuning.projectile_speed,
            destroyed: false,
        }
    }

    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    /// Entirely outside `[0, width]`
    pub fn is_off_screen(&self, width: f32) -> bool {
        self.pos.x + BOLT_SIZE < 0.0 || self.pos.x > width
    }

    fn source(&self) -> Rect {
        let sx = match self.facing {
            Facing::Left => 8.0,
            Facing::Right => 40.0,
        };
        Rect::new(sx, 464.0, BOLT_SIZE, BOLT_SIZE)
    }
}

/// Height and sheet row of each flame level
const FLAME_LEVELS: [(f32, f32); 3] = [(16.0, 504.0), (24.0, 520.0), (32.0, 544.0)];
const FLAME_FRAMES: usize = 3;
const FLAME_SX: f32 = 160.0;

/// One flame of a fire stream
///
/// Cycles its three frames once at each of the three heights, then dies.
#[derive(Debug, Clone, PartialEq)]
pub struct Flame {
    pub pos: Vec2,
    pub width: f32,
    pub depth: f32,
    frame: usize,
    level: usize,
    ms_since_last_frame: f32,
    frame_ms: f32,
    dead: bool,
}

impl Flame {
    fn new(pos: Vec2, frame_ms: f32) -> Self {
        Self {
            pos,
            width: 16.0,
            depth: 10.0,
            frame: 0,
            level: 0,
            ms_since_last_frame: 0.0,
            frame_ms,
            dead: false,
        }
    }

    pub fn footprint(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.depth)
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    fn update(&mut self, elapsed_ms: f32) {
        self.ms_since_last_frame += elapsed_ms;
        if self.ms_since_last_frame <= self.frame_ms {
            return;
        }
        self.ms_since_last_frame = 0.0;

        if self.frame + 1 < FLAME_FRAMES {
            self.frame += 1;
        } else if self.level + 1 < FLAME_LEVELS.len() {
            self.frame = 0;
            self.level += 1;
        } else {
            self.dead = true;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let (height, sy) = FLAME_LEVELS[self.level];
        let src = Rect::new(FLAME_SX + self.frame as f32 * self.width, sy, self.width, height);
        let dst = Rect::new(self.pos.x, self.pos.y - height, self.width, height);
        surface.blit(ImageId::Boss, src, dst, 0.8);
    }
}

/// Ground fire: a row of flames laid out away from the boss
#[derive(Debug, Clone, PartialEq)]
pub struct FlameStream {
    pub origin: Vec2,
    pub facing: Facing,
    flames: Vec<Flame>,
    spawned: u32,
    max_flames: u32,
    spacing: f32,
    frame_ms: f32,
    ms_since_last_flame: f32,
    dead: bool,
}

impl FlameStream {
    pub fn new(origin: Vec2, facing: Facing, tuning: &HazardTuning) -> Self {
        let frame_ms = 1000.0 / tuning.flame_fps;
        let mut stream = Self {
            origin,
            facing,
            flames: Vec::with_capacity(tuning.max_flames as usize),
            spawned: 0,
            max_flames: tuning.max_flames.max(1),
            spacing: tuning.flame_spacing,
            frame_ms,
            ms_since_last_flame: 0.0,
            dead: false,
        };
        stream.ignite();
        stream
    }

    pub fn flames(&self) -> &[Flame] {
        &self.flames
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    fn ignite(&mut self) {
        let x = self.origin.x + self.facing.sign() * self.spawned as f32 * self.spacing;
        self.flames.push(Flame::new(Vec2::new(x, self.origin.y), self.frame_ms));
        self.spawned += 1;
    }
}

/// Anything the boss leaves on the field
#[derive(Debug, Clone, PartialEq)]
pub enum Hazard {
    Bolt(Projectile),
    Flames(FlameStream),
}

impl Hazard {
    /// Flame footprints that can burn the player
    pub fn burning(&self) -> impl Iterator<Item = Rect> + '_ {
        let flames: &[Flame] = match self {
            Hazard::Flames(stream) => &stream.flames,
            Hazard::Bolt(_) => &[],
        };
        flames.iter().map(Flame::footprint)
    }

    /// Mark bolts that left the screen; streams never leave
    pub fn cull(&mut self, screen_width: f32) {
        if let Hazard::Bolt(bolt) = self {
            if bolt.is_off_screen(screen_width) {
                bolt.destroy();
            }
        }
    }
}

impl Actor for Hazard {
    fn update(&mut self, elapsed_ms: f32, _ctx: &mut ActorCtx<'_>) {
        match self {
            Hazard::Bolt(bolt) => {
                bolt.pos.x += bolt.facing.sign() * bolt.speed;
            }
            Hazard::Flames(stream) => {
                stream.ms_since_last_flame += elapsed_ms;

                for flame in &mut stream.flames {
                    flame.update(elapsed_ms);
                }
                stream.flames.retain(|flame| !flame.is_dead());
                if stream.flames.is_empty() {
                    stream.dead = true;
                }

                if !stream.dead
                    && stream.ms_since_last_flame > stream.frame_ms
                    && stream.spawned < stream.max_flames
                {
                    stream.ignite();
                    stream.ms_since_last_flame = 0.0;
                }
            }
        }
    }

    fn draw(&self, surface: &mut dyn Surface, _sheets: &Sheets) {
        match self {
            Hazard::Bolt(bolt) => {
                let dst = Rect::new(bolt.pos.x, bolt.pos.y, BOLT_SIZE, BOLT_SIZE);
                surface.blit(ImageId::Boss, bolt.source(), dst, 1.0);
            }
            Hazard::Flames(stream) => {
                for flame in &stream.flames {
                    flame.draw(surface);
                }
            }
        }
    }

    fn footprint(&self) -> Rect {
        match self {
            Hazard::Bolt(bolt) => Rect::new(bolt.pos.x, bolt.pos.y, BOLT_SIZE, BOLT_SIZE),
            Hazard::Flames(stream) => stream
                .flames
                .iter()
                .map(Flame::footprint)
                .reduce(|a, b| {
                    let x = a.x.min(b.x);
                    let y = a.y.min(b.y);
                    Rect::new(x, y, a.right().max(b.right()) - x, a.bottom().max(b.bottom()) - y)
                })
                .unwrap_or(Rect::new(stream.origin.x, stream.origin.y, 0.0, 0.0)),
        }
    }

    fn depth_key(&self) -> f32 {
        match self {
            Hazard::Bolt(bolt) => bolt.pos.y,
            Hazard::Flames(stream) => stream.origin.y,
        }
    }

    fn is_terminal(&self) -> bool {
        match self {
            Hazard::Bolt(bolt) => bolt.destroyed,
            Hazard::Flames(stream) => stream.dead,
        }
    }

    fn scroll(&mut self, dx: f32) {
        match self {
            Hazard::Bolt(bolt) => bolt.pos.x += dx,
            Hazard::Flames(stream) => {
                stream.origin.x += dx;
                for flame in &mut stream.flames {
                    flame.pos.x += dx;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::tests::Harness;
    use crate::renderer::RecordingSurface;

    #[test]
    fn test_bolt_flies_and_leaves() {
        let mut h = Harness::new();
        let tuning = HazardTuning::default();
        let mut hazard = Hazard::Bolt(Projectile::new(Vec2::new(10.0, 100.0), Facing::Left, &tuning));

        hazard.update(16.0, &mut h.ctx());
        assert_eq!(hazard.footprint().x, 5.0);
        assert_eq!(hazard.burning().count(), 0);

        for _ in 0..8 {
            hazard.update(16.0, &mut h.ctx());
            hazard.cull(256.0);
        }
        assert!(hazard.is_terminal());
    }

    #[test]
    fn test_bolt_source_follows_facing() {
        let tuning = HazardTuning::default();
        let hazard = Hazard::Bolt(Projectile::new(Vec2::new(10.0, 100.0), Facing::Right, &tuning));
        let mut surface = RecordingSurface::new();
        hazard.draw(&mut surface, &Harness::new().sheets);
        assert_eq!(
            surface.blits_of(ImageId::Boss),
            vec![(Rect::new(40.0, 464.0, 32.0, 32.0), Rect::new(10.0, 100.0, 32.0, 32.0))]
        );
    }

    #[test]
    fn test_stream_grows_away_from_boss() {
        let mut h = Harness::new();
        let tuning = HazardTuning::default();
        let mut hazard = Hazard::Flames(FlameStream::new(Vec2::new(100.0, 190.0), Facing::Left, &tuning));

        for _ in 0..3 {
            hazard.update(90.0, &mut h.ctx());
        }
        let Hazard::Flames(stream) = &hazard else {
            unreachable!()
        };
        let xs: Vec<f32> = stream.flames().iter().map(|f| f.pos.x).collect();
        assert_eq!(xs, vec![100.0, 84.0, 68.0, 52.0]);
        assert_eq!(hazard.burning().count(), 4);
    }

    #[test]
    fn test_stream_caps_and_burns_out() {
        let mut h = Harness::new();
        let tuning = HazardTuning::default();
        let mut hazard = Hazard::Flames(FlameStream::new(Vec2::new(100.0, 190.0), Facing::Right, &tuning));

        let mut frames = 0;
        while !hazard.is_terminal() {
            hazard.update(90.0, &mut h.ctx());
            frames += 1;
            assert!(frames < 100, "stream never burned out");
        }
        let Hazard::Flames(stream) = &hazard else {
            unreachable!()
        };
        assert_eq!(stream.spawned(), 9);
        assert!(stream.flames().is_empty());
    }

    #[test]
    fn test_flame_grows_through_levels() {
        let mut flame = Flame::new(Vec2::new(0.0, 100.0), 50.0);
        for _ in 0..3 {
            flame.update(60.0);
        }
        assert_eq!((flame.level, flame.frame), (1, 0));

        let mut surface = RecordingSurface::new();
        flame.draw(&mut surface);
        assert_eq!(
            surface.blits_of(ImageId::Boss),
            vec![(Rect::new(160.0, 520.0, 16.0, 24.0), Rect::new(0.0, 76.0, 16.0, 24.0))]
        );

        for _ in 0..5 {
            flame.update(60.0);
        }
        assert!(!flame.is_dead());
        flame.update(60.0);
        assert!(flame.is_dead());
    }

    #[test]
    fn test_scroll_moves_every_flame() {
        let tuning = HazardTuning::default();
        let mut hazard = Hazard::Flames(FlameStream::new(Vec2::new(100.0, 190.0), Facing::Right, &tuning));
        hazard.scroll(-2.0);
        assert_eq!(hazard.burning().next().map(|r| r.x), Some(98.0));
    }
}
