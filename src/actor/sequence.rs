//! Sprite-sequence cursor
//!
//! Accumulates frame time and steps through the current clip at a fixed
//! rate. A one-shot play counts steps down and reports when it runs out so
//! the owner can drop the behaviour that started it.

use super::sprite::{AnimKey, Clip, SpriteSheet};
use crate::renderer::Rect;

/// What an advance did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStep {
    /// Not enough time for a step
    Held,
    /// Moved to the next frame
    Advanced,
    /// A one-shot play used its last step
    Finished,
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    key: AnimKey,
    cursor: usize,
    ms_since_last_frame: f32,
    frame_ms: f32,
    /// Steps left in a one-shot play
    remaining: Option<u32>,
}

impl Sequencer {
    pub fn new(key: AnimKey, fps: f32) -> Self {
        Self {
            key,
            cursor: 0,
            ms_since_last_frame: 0.0,
            frame_ms: 1000.0 / fps,
            remaining: None,
        }
    }

    pub fn key(&self) -> AnimKey {
        self.key
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn frame_ms(&self) -> f32 {
        self.frame_ms
    }

    pub fn is_one_shot(&self) -> bool {
        self.remaining.is_some()
    }

    /// Switch clips; the cursor restarts only when the key changes
    pub fn set_key(&mut self, key: AnimKey) {
        if key != self.key {
            self.key = key;
            self.cursor = 0;
        }
    }

    /// Play `key` from its first frame for `steps` steps, then report `Finished`
    pub fn play_once(&mut self, key: AnimKey, steps: u32) {
        self.key = key;
        self.cursor = 0;
        self.ms_since_last_frame = 0.0;
        self.remaining = Some(steps.max(1));
    }

    /// Abandon a one-shot play without reporting it
    pub fn cancel_one_shot(&mut self) {
        self.remaining = None;
    }

    pub fn advance(&mut self, elapsed_ms: f32, sheet: &SpriteSheet) -> SequenceStep {
        self.ms_since_last_frame += elapsed_ms.max(0.0);
        if self.ms_since_last_frame <= self.frame_ms {
            return SequenceStep::Held;
        }
        self.ms_since_last_frame = 0.0;

        let Some(clip) = sheet.get(self.key) else {
            log::warn!("{}: no clip for `{}`, holding frame", sheet.name, self.key);
            return SequenceStep::Held;
        };
        self.cursor = (self.cursor + 1) % clip.len().max(1);

        match self.remaining {
            Some(left) if left <= 1 => {
                self.remaining = None;
                SequenceStep::Finished
            }
            Some(left) => {
                self.remaining = Some(left - 1);
                SequenceStep::Advanced
            }
            None => SequenceStep::Advanced,
        }
    }

    /// Current clip and its source rectangle
    pub fn frame<'a>(&self, sheet: &'a SpriteSheet) -> Option<(&'a Clip, Rect)> {
        let clip = sheet.get(self.key)?;
        Some((clip, clip.source(self.cursor)))
    }
}
