//! One-shot visual effects

use glam::Vec2;

use super::{Actor, ActorCtx, Sheets};
use crate::renderer::{ImageId, Rect, Surface};

const EXPLOSION_SIZE: f32 = 48.0;
const EXPLOSION_ROW: f32 = 391.0;
const EXPLOSION_FRAMES: usize = 3;

/// Small explosion left behind by a finished-off minion
#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub pos: Vec2,
    frame: usize,
    ms_since_last_frame: f32,
    frame_ms: f32,
    finished: bool,
}

impl Explosion {
    /// Centred on `center`, snapped to whole pixels
    pub fn new(center: Vec2, fps: f32) -> Self {
        Self {
            pos: center.trunc(),
            frame: 0,
            ms_since_last_frame: 0.0,
            frame_ms: 1000.0 / fps,
            finished: false,
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }
}

impl Actor for Explosion {
    fn update(&mut self, elapsed_ms: f32, _ctx: &mut ActorCtx<'_>) {
        self.ms_since_last_frame += elapsed_ms;
        if self.ms_since_last_frame <= self.frame_ms {
            return;
        }
        self.ms_since_last_frame = 0.0;

        if self.frame + 1 < EXPLOSION_FRAMES {
            self.frame += 1;
        } else {
            self.finished = true;
        }
    }

    fn draw(&self, surface: &mut dyn Surface, _sheets: &Sheets) {
        let half = EXPLOSION_SIZE / 2.0;
        surface.blit(
            ImageId::Enemies,
            Rect::new(self.frame as f32 * EXPLOSION_SIZE, EXPLOSION_ROW, EXPLOSION_SIZE, EXPLOSION_SIZE),
            Rect::new(self.pos.x - half, self.pos.y - half, EXPLOSION_SIZE, EXPLOSION_SIZE),
            1.0,
        );
    }

    fn footprint(&self) -> Rect {
        let half = EXPLOSION_SIZE / 2.0;
        Rect::new(self.pos.x - half, self.pos.y - half, EXPLOSION_SIZE, EXPLOSION_SIZE)
    }

    fn depth_key(&self) -> f32 {
        self.pos.y
    }

    fn is_terminal(&self) -> bool {
        self.finished
    }

    fn scroll(&mut self, dx: f32) {
        self.pos.x += dx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::tests::Harness;
    use crate::renderer::RecordingSurface;

    #[test]
    fn test_explosion_plays_once() {
        let mut h = Harness::new();
        let mut boom = Explosion::new(Vec2::new(145.7, 200.2), 7.0);
        assert_eq!(boom.pos, Vec2::new(145.0, 200.0));

        let mut surface = RecordingSurface::new();
        for _ in 0..2 {
            boom.update(150.0, &mut h.ctx());
        }
        boom.draw(&mut surface, &h.sheets);
        assert_eq!(
            surface.blits_of(ImageId::Enemies),
            vec![(Rect::new(96.0, 391.0, 48.0, 48.0), Rect::new(121.0, 176.0, 48.0, 48.0))]
        );
        assert!(!boom.is_terminal());

        boom.update(150.0, &mut h.ctx());
        assert!(boom.is_terminal());
    }

    #[test]
    fn test_explosion_holds_between_frames() {
        let mut h = Harness::new();
        let mut boom = Explosion::new(Vec2::ZERO, 7.0);
        boom.update(100.0, &mut h.ctx());
        assert_eq!(boom.frame(), 0);
        boom.update(100.0, &mut h.ctx());
        assert_eq!(boom.frame(), 1);
    }
}
