//! Scrollable stage
//!
//! The foreground slides left under a horizontally fixed player until its
//! right edge meets the right edge of the screen.

use crate::renderer::{ImageId, Rect, SpriteAtlas, Surface};
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    /// Horizontal scroll position, 0 down to `-width`
    pub offset: f32,
    /// How far the foreground can scroll
    pub width: f32,
    pub speed: f32,
    screen_width: f32,
    screen_height: f32,
    can_scroll: bool,
    at_end: bool,
    distance: f32,
}

impl Level {
    pub fn new(tuning: &Tuning, atlas: &dyn SpriteAtlas) -> Self {
        let width = match atlas.dimensions(ImageId::Foreground) {
            Some((w, _)) => w as f32 - tuning.screen.width,
            None => {
                log::warn!(
                    "{} size unknown, using fallback width {}",
                    ImageId::Foreground.as_str(),
                    tuning.level.fallback_width
                );
                tuning.level.fallback_width
            }
        };

        Self {
            offset: 0.0,
            width: width.max(0.0),
            speed: tuning.level.scroll_speed,
            screen_width: tuning.screen.width,
            screen_height: tuning.screen.height,
            can_scroll: true,
            at_end: false,
            distance: 0.0,
        }
    }

    pub fn can_scroll(&self) -> bool {
        self.can_scroll
    }

    /// Scrolled all the way to the right-hand extreme
    pub fn at_end(&self) -> bool {
        self.at_end
    }

    /// Distance travelled so far; only grows while scrollable
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Advance one step; returns the shift every actor must take
    pub fn scroll(&mut self) -> Option<f32> {
        if !self.can_scroll {
            return None;
        }

        self.offset -= self.speed;
        self.distance += self.speed.abs();

        if self.offset <= -self.width {
            self.offset = -self.width;
            self.at_end = true;
            self.can_scroll = false;
            log::info!("stage end reached after {} px", self.distance);
        }
        Some(-self.speed)
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        let screen = Rect::new(0.0, 0.0, self.screen_width, self.screen_height);
        surface.blit(ImageId::Background, screen, screen, 1.0);
        surface.blit(
            ImageId::Foreground,
            Rect::new(-self.offset, 0.0, self.screen_width, self.screen_height),
            screen,
            1.0,
        );
    }
}
