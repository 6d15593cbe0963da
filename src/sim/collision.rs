//! Footprint rectangles and overlap tests
//!
//! Gameplay collision only ever compares axis-aligned floor footprints.
//! Sprite bounds are a drawing concern and never take part.

use serde::{Deserialize, Serialize};

use crate::actor::Facing;

/// Axis-aligned rectangle (x/y is the top-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Grow by `reach` on the facing side and by `slack` above and below
    pub fn reach(&self, facing: Facing, reach: f32, slack: f32) -> Rect {
        let x = match facing {
            Facing::Left => self.x - reach,
            Facing::Right => self.x,
        };
        Rect::new(x, self.y - slack, self.w + reach, self.h + slack * 2.0)
    }
}

/// Does an attacker's hit footprint cover the target's footprint?
pub fn in_range(hit: &Rect, target: &Rect) -> bool {
    hit.overlaps(target)
}
