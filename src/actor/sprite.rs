//! Sprite sheet tables
//!
//! Each role has a sheet mapping `<pose>-<facing>` to a clip: one sprite
//! rectangle size, the sheet position of frame 0, and the frame list the
//! sequence cycles through.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::renderer::{ImageId, Rect};

/// Which way an actor looks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Left,
    Right,
}

impl Facing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }

    /// -1 for left, +1 for right
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub const BOTH: [Facing; 2] = [Facing::Left, Facing::Right];
}

/// Animation key, displayed as `<pose>-<facing>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimKey {
    pub pose: &'static str,
    pub facing: Facing,
}

impl AnimKey {
    pub const fn new(pose: &'static str, facing: Facing) -> Self {
        Self { pose, facing }
    }
}

impl fmt::Display for AnimKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.pose, self.facing.as_str())
    }
}

/// One animation strip on a sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub width: f32,
    pub height: f32,
    pub sx: f32,
    pub sy: f32,
    pub frames: Vec<u32>,
}

impl Clip {
    pub fn new(width: f32, height: f32, sx: f32, sy: f32, frames: &[u32]) -> Self {
        Self {
            width,
            height,
            sx,
            sy,
            frames: frames.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Source rectangle of the sequence step at `cursor` (wraps)
    pub fn source(&self, cursor: usize) -> Rect {
        let frame = if self.frames.is_empty() {
            0
        } else {
            self.frames[cursor % self.frames.len()]
        };
        Rect::new(self.sx + frame as f32 * self.width, self.sy, self.width, self.height)
    }
}

/// All clips of one role
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pub name: &'static str,
    pub image: ImageId,
    clips: HashMap<AnimKey, Clip>,
}

impl SpriteSheet {
    pub fn new(name: &'static str, image: ImageId) -> Self {
        Self {
            name,
            image,
            clips: HashMap::new(),
        }
    }

    pub fn clip(mut self, pose: &'static str, facing: Facing, clip: Clip) -> Self {
        self.clips.insert(AnimKey::new(pose, facing), clip);
        self
    }

    pub fn get(&self, key: AnimKey) -> Option<&Clip> {
        self.clips.get(&key)
    }

    /// Every pose must exist for both facings with at least one frame
    pub fn require(&self, poses: &[&'static str]) -> Result<()> {
        for &pose in poses {
            for facing in Facing::BOTH {
                let key = AnimKey::new(pose, facing);
                match self.clips.get(&key) {
                    Some(clip) if !clip.is_empty() => {}
                    _ => {
                        return Err(Error::MissingClip {
                            sheet: self.name,
                            key: key.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        assert_eq!(AnimKey::new("walk", Facing::Left).to_string(), "walk-left");
        assert_eq!(AnimKey::new("attack-down", Facing::Right).to_string(), "attack-down-right");
    }

    #[test]
    fn test_source_rect_follows_frame_list() {
        let clip = Clip::new(40.0, 64.0, 40.0, 0.0, &[1, 1, 2, 2]);
        assert_eq!(clip.source(0), Rect::new(80.0, 0.0, 40.0, 64.0));
        assert_eq!(clip.source(2), Rect::new(120.0, 0.0, 40.0, 64.0));
        // Wraps past the end
        assert_eq!(clip.source(5), clip.source(1));
    }

    #[test]
    fn test_require_reports_missing_facing() {
        let sheet = SpriteSheet::new("test", ImageId::Enemies)
            .clip("stand", Facing::Left, Clip::new(1.0, 1.0, 0.0, 0.0, &[0]))
            .clip("stand", Facing::Right, Clip::new(1.0, 1.0, 0.0, 0.0, &[0]))
            .clip("walk", Facing::Left, Clip::new(1.0, 1.0, 0.0, 0.0, &[0]));

        sheet.require(&["stand"]).unwrap();
        match sheet.require(&["stand", "walk"]) {
            Err(Error::MissingClip { key, .. }) => assert_eq!(key, "walk-right"),
            other => panic!("expected MissingClip, got {other:?}"),
        }
    }
}
