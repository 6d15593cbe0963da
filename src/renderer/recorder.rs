//! A surface that records draw calls instead of drawing
//!
//! Used by the headless runner and by tests that check draw order.

use super::{ImageId, Rect, Rgba, Surface, TextStyle};

/// One recorded call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Blit {
        image: ImageId,
        src: Rect,
        dst: Rect,
        alpha: f32,
    },
    Fill {
        rect: Rect,
        color: Rgba,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
    },
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Blits of one image, in call order
    pub fn blits_of(&self, image: ImageId) -> Vec<(Rect, Rect)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Blit { image: i, src, dst, .. } if *i == image => Some((*src, *dst)),
                _ => None,
            })
            .collect()
    }

    pub fn fills(&self) -> Vec<(Rect, Rgba)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Fill { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn blit(&mut self, image: ImageId, src: Rect, dst: Rect, alpha: f32) {
        self.calls.push(DrawCall::Blit { image, src, dst, alpha });
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.calls.push(DrawCall::Fill { rect, color });
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
            style,
        });
    }
}
