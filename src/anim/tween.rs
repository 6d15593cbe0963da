//! Field tweens
//!
//! A tween drives one or more numeric fields of a target from a start
//! snapshot to an end snapshot. It never owns the target: the owner passes
//! the target in on every advance, so dropping the target (or the tween) is
//! always safe.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::easing::{Easing, lerp};
use crate::error::{Error, Result};

/// Animatable numeric fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    /// Footprint x
    X,
    /// Footprint y
    Y,
    /// Sprite offset from the footprint anchor
    SpriteX,
    SpriteY,
    /// Overlay opacity
    Alpha,
}

/// Something a tween can write into
///
/// Targets ignore fields they do not carry.
pub trait Animatable {
    fn field(&self, field: Field) -> f32;
    fn set_field(&mut self, field: Field, value: f32);
}

/// Field values keyed by field
pub type Snapshot = BTreeMap<Field, f32>;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Channel {
    field: Field,
    start: f32,
    end: f32,
}

/// Result of advancing a tween
#[derive(Debug, Clone, PartialEq)]
pub enum TweenStep<E> {
    /// Still interpolating
    Running,
    /// Reached the end on this call; carries the completion event, if any
    Completed(Option<E>),
    /// Already complete, nothing was written
    Idle,
}

/// Time-bounded interpolation of target fields
#[derive(Debug, Clone)]
pub struct Tween<E> {
    channels: Vec<Channel>,
    duration_ms: f32,
    elapsed_ms: f32,
    easing: Easing,
    completed: bool,
    on_complete: Option<E>,
}

impl<E> Tween<E> {
    /// Start an empty tween; add fields with [`Tween::field`]
    pub fn new(duration_ms: f32) -> Self {
        Self {
            channels: Vec::new(),
            duration_ms: sanitize(duration_ms),
            elapsed_ms: 0.0,
            easing: Easing::Linear,
            completed: false,
            on_complete: None,
        }
    }

    /// Build from two snapshots, which must name the same fields
    pub fn from_snapshots(start: &Snapshot, end: &Snapshot, duration_ms: f32) -> Result<Self> {
        if !start.keys().eq(end.keys()) {
            return Err(Error::SnapshotMismatch {
                start: start.keys().copied().collect(),
                end: end.keys().copied().collect(),
            });
        }

        let mut tween = Self::new(duration_ms);
        for ((&field, &from), &to) in start.iter().zip(end.values()) {
            tween = tween.field(field, from, to);
        }
        Ok(tween)
    }

    /// A tween that holds `field` at `value`, used purely for sequencing
    pub fn hold(duration_ms: f32, field: Field, value: f32) -> Self {
        Self::new(duration_ms).field(field, value, value)
    }

    /// Animate `field` from `from` to `to` (replaces an earlier entry)
    pub fn field(mut self, field: Field, from: f32, to: f32) -> Self {
        let channel = Channel { field, start: from, end: to };
        match self.channels.iter_mut().find(|c| c.field == field) {
            Some(existing) => *existing = channel,
            None => self.channels.push(channel),
        }
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Event returned from the advance that completes this tween
    pub fn on_complete(mut self, event: E) -> Self {
        self.on_complete = Some(event);
        self
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    /// Raw time fraction in [0, 1], before easing
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return if self.completed { 1.0 } else { 0.0 };
        }
        (self.elapsed_ms / self.duration_ms).min(1.0)
    }

    /// True until the tween has written its end snapshot
    pub fn is_active(&self) -> bool {
        !self.completed
    }

    pub fn start_snapshot(&self) -> Snapshot {
        self.channels.iter().map(|c| (c.field, c.start)).collect()
    }

    pub fn end_snapshot(&self) -> Snapshot {
        self.channels.iter().map(|c| (c.field, c.end)).collect()
    }

    /// Advance by `delta_ms` and write the interpolated fields into `target`
    pub fn advance<T: Animatable + ?Sized>(&mut self, delta_ms: f32, target: &mut T) -> TweenStep<E> {
        if self.completed {
            return TweenStep::Idle;
        }

        self.elapsed_ms += sanitize(delta_ms);
        if self.elapsed_ms >= self.duration_ms {
            return TweenStep::Completed(self.complete(target));
        }

        let progress = self.easing.apply(self.elapsed_ms / self.duration_ms);
        for channel in &self.channels {
            target.set_field(channel.field, lerp(channel.start, channel.end, progress));
        }
        TweenStep::Running
    }

    /// Snap to the end snapshot and complete, returning the event if this call completed it
    pub fn finish<T: Animatable + ?Sized>(&mut self, target: &mut T) -> Option<E> {
        if self.completed {
            return None;
        }
        self.elapsed_ms = self.elapsed_ms.max(self.duration_ms);
        self.complete(target)
    }

    fn complete<T: Animatable + ?Sized>(&mut self, target: &mut T) -> Option<E> {
        for channel in &self.channels {
            target.set_field(channel.field, channel.end);
        }
        self.completed = true;
        self.on_complete.take()
    }
}

/// Negative and non-finite time counts as no time
#[inline]
pub(crate) fn sanitize(ms: f32) -> f32 {
    if ms.is_finite() { ms.max(0.0) } else { 0.0 }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Minimal target for anim tests
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Dummy {
        pub x: f32,
        pub y: f32,
        pub sprite_y: f32,
    }

    impl Animatable for Dummy {
        fn field(&self, field: Field) -> f32 {
            match field {
                Field::X => self.x,
                Field::Y => self.y,
                Field::SpriteY => self.sprite_y,
                _ => 0.0,
            }
        }

        fn set_field(&mut self, field: Field, value: f32) {
            match field {
                Field::X => self.x = value,
                Field::Y => self.y = value,
                Field::SpriteY => self.sprite_y = value,
                _ => {}
            }
        }
    }

    #[test]
    fn test_linear_midpoint() {
        let mut dummy = Dummy::default();
        let mut tween: Tween<()> = Tween::new(100.0).field(Field::X, 0.0, 50.0);

        assert_eq!(tween.advance(50.0, &mut dummy), TweenStep::Running);
        assert!((dummy.x - 25.0).abs() < 1e-4);
        assert!(tween.is_active());
    }

    #[test]
    fn test_completion_fires_once() {
        let mut dummy = Dummy::default();
        let mut tween = Tween::new(100.0)
            .field(Field::Y, 10.0, -40.0)
            .easing(Easing::EaseOutBounce)
            .on_complete("landed");

        assert_eq!(tween.advance(60.0, &mut dummy), TweenStep::Running);
        assert_eq!(tween.advance(60.0, &mut dummy), TweenStep::Completed(Some("landed")));
        assert_eq!(dummy.y, -40.0);
        assert_eq!(tween.advance(60.0, &mut dummy), TweenStep::Idle);
        assert!(!tween.is_active());
    }

    #[test]
    fn test_zero_duration_resolves_on_first_advance() {
        let mut dummy = Dummy::default();
        let mut tween = Tween::new(0.0).field(Field::X, 5.0, 9.0).on_complete(1u8);

        assert!(tween.is_active());
        assert_eq!(tween.advance(0.0, &mut dummy), TweenStep::Completed(Some(1)));
        assert_eq!(dummy.x, 9.0);
    }

    #[test]
    fn test_negative_delta_is_ignored() {
        let mut dummy = Dummy::default();
        let mut tween: Tween<()> = Tween::new(100.0).field(Field::X, 0.0, 100.0);

        tween.advance(-500.0, &mut dummy);
        tween.advance(f32::NAN, &mut dummy);
        assert_eq!(tween.elapsed_ms(), 0.0);
        assert_eq!(dummy.x, 0.0);
    }

    #[test]
    fn test_snapshot_mismatch_is_rejected() {
        let start = Snapshot::from([(Field::X, 0.0), (Field::Y, 0.0)]);
        let end = Snapshot::from([(Field::X, 10.0)]);

        let err = Tween::<()>::from_snapshots(&start, &end, 100.0).unwrap_err();
        assert!(matches!(err, Error::SnapshotMismatch { .. }));
    }

    #[test]
    fn test_snapshots_round_through_builder() {
        let start = Snapshot::from([(Field::X, 1.0), (Field::Y, 2.0)]);
        let end = Snapshot::from([(Field::X, 3.0), (Field::Y, 4.0)]);

        let tween = Tween::<()>::from_snapshots(&start, &end, 100.0).unwrap();
        assert_eq!(tween.start_snapshot(), start);
        assert_eq!(tween.end_snapshot(), end);
    }

    #[test]
    fn test_hold_keeps_value() {
        let mut dummy = Dummy { x: 3.0, ..Default::default() };
        let mut tween = Tween::hold(200.0, Field::X, 42.0).on_complete(());

        tween.advance(100.0, &mut dummy);
        assert_eq!(dummy.x, 42.0);
        assert_eq!(tween.advance(100.0, &mut dummy), TweenStep::Completed(Some(())));
    }

    #[test]
    fn test_finish_snaps_to_end() {
        let mut dummy = Dummy::default();
        let mut tween = Tween::new(1000.0).field(Field::SpriteY, -50.0, 0.0).on_complete(7);

        tween.advance(10.0, &mut dummy);
        assert_eq!(tween.finish(&mut dummy), Some(7));
        assert_eq!(dummy.sprite_y, 0.0);
        assert_eq!(tween.finish(&mut dummy), None);
    }

    proptest! {
        #[test]
        fn prop_end_value_is_exact(
            start in -1000.0f32..1000.0,
            end in -1000.0f32..1000.0,
            duration in 0.0f32..5000.0,
            steps in proptest::collection::vec(0.0f32..100.0, 1..60),
        ) {
            let mut dummy = Dummy::default();
            let mut tween = Tween::new(duration)
                .field(Field::X, start, end)
                .easing(Easing::EaseOutBounce)
                .on_complete(());

            let mut fired = 0;
            for step in steps {
                if let TweenStep::Completed(Some(())) = tween.advance(step, &mut dummy) {
                    fired += 1;
                }
            }
            // Push well past the end
            if let TweenStep::Completed(Some(())) = tween.advance(duration + 1.0, &mut dummy) {
                fired += 1;
            }
            tween.advance(10.0, &mut dummy);

            prop_assert_eq!(fired, 1);
            prop_assert_eq!(dummy.x, end);
        }
    }
}
