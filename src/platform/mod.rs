//! Platform abstraction layer
//!
//! Handles the host-facing edges of the loop:
//! - Input snapshot for one frame
//! - Frame timing from a monotonic clock

use serde::{Deserialize, Serialize};

/// Pressed state of every action, sampled once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub attack: bool,
    pub jump: bool,
    /// Pause toggle (one-shot, the host clears it after a frame)
    pub pause: bool,
}

/// Turns monotonic timestamps into per-frame deltas
///
/// The host's frame callback supplies no delta of its own. The first frame
/// and any non-positive delta yield `None` so nothing advances on a bogus
/// time step; long stalls are capped.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_delta_ms: f32,
}

impl FrameClock {
    pub fn new(max_delta_ms: f32) -> Self {
        Self {
            last_ms: None,
            max_delta_ms,
        }
    }

    /// Record `now_ms` and return the elapsed time since the previous call
    pub fn delta(&mut self, now_ms: f64) -> Option<f32> {
        if !now_ms.is_finite() {
            return None;
        }
        let previous = self.last_ms.replace(now_ms)?;
        let delta = (now_ms - previous) as f32;
        if delta > 0.0 {
            Some(delta.min(self.max_delta_ms))
        } else {
            None
        }
    }

    /// Forget the last timestamp (after a pause of the host page, say)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_ignored() {
        let mut clock = FrameClock::new(250.0);
        assert_eq!(clock.delta(1000.0), None);
        assert_eq!(clock.delta(1016.0), Some(16.0));
    }

    #[test]
    fn test_non_positive_deltas_are_ignored() {
        let mut clock = FrameClock::new(250.0);
        clock.delta(1000.0);
        assert_eq!(clock.delta(1000.0), None);
        assert_eq!(clock.delta(990.0), None);
        assert_eq!(clock.delta(f64::NAN), None);
        assert_eq!(clock.delta(1000.0), Some(10.0));
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut clock = FrameClock::new(250.0);
        clock.delta(0.5);
        assert_eq!(clock.delta(10_000.0), Some(250.0));
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::new(250.0);
        clock.delta(0.0);
        clock.reset();
        assert_eq!(clock.delta(5000.0), None);
    }
}
