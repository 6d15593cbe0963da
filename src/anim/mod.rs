//! Scripted motion
//!
//! Easing curves feed tweens, tweens compose into timelines. Completion is
//! reported as an event value returned from `advance`, never a callback.

pub mod easing;
pub mod timeline;
pub mod tween;

pub use easing::{Easing, lerp};
pub use timeline::{Advance, Timeline, TimelineState};
pub use tween::{Animatable, Field, Snapshot, Tween, TweenStep};
