//! Rendering collaborator interface
//!
//! The simulation never touches pixels. It emits blit and fill calls into a
//! host-provided [`Surface`] and asks a [`SpriteAtlas`] for image sizes.

pub mod recorder;

use serde::{Deserialize, Serialize};

pub use crate::sim::collision::Rect;
pub use recorder::{DrawCall, RecordingSurface};

/// Images the core refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageId {
    Player,
    Enemies,
    Boss,
    Background,
    Foreground,
    Ending,
    MessageBoard,
}

impl ImageId {
    /// Asset id used by the host's loader
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageId::Player => "turtles",
            ImageId::Enemies => "enemies",
            ImageId::Boss => "shredder",
            ImageId::Background => "background1",
            ImageId::Foreground => "foreground",
            ImageId::Ending => "ending",
            ImageId::MessageBoard => "message-bg",
        }
    }
}

/// RGB color with alpha in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black(a: f32) -> Self {
        Self::new(0, 0, 0, a)
    }
}

/// Debug overlay color for footprints
pub const FOOTPRINT_COLOR: Rgba = Rgba::new(128, 0, 0, 0.5);

/// Text styles used by the message board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextStyle {
    /// 12px italic, on the message board
    Board,
    /// 16px serif, full screen
    Final,
}

/// Drawing target supplied by the host
pub trait Surface {
    /// Copy `src` of `image` into `dst`
    fn blit(&mut self, image: ImageId, src: Rect, dst: Rect, alpha: f32);

    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// Text is optional; hosts without fonts may ignore it
    fn text(&mut self, _text: &str, _x: f32, _y: f32, _style: TextStyle) {}
}

/// Image size lookup supplied by the host
pub trait SpriteAtlas {
    /// `None` when the image is not loaded
    fn dimensions(&self, image: ImageId) -> Option<(u32, u32)>;
}
