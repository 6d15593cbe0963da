//! Timelines: tweens scheduled at offsets and advanced as one unit
//!
//! Tweens appended without an offset chain one after another. Tweens given
//! an explicit offset may overlap earlier ones, which is how parallel
//! choreography (a move plus a bounce, say) is expressed.

use super::tween::{Animatable, Tween, TweenStep, sanitize};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineState {
    /// Not advanced yet
    Idle,
    Playing,
    /// Reached its total duration; further advances do nothing
    Finished,
}

/// Outcome of one advance
#[derive(Debug, Clone, PartialEq)]
pub struct Advance<E> {
    /// Completion events, in the order they happened
    pub events: Vec<E>,
    /// True only on the call that finished the timeline
    pub finished: bool,
}

impl<E> Advance<E> {
    fn idle() -> Self {
        Self {
            events: Vec::new(),
            finished: false,
        }
    }
}

/// An ordered, offset composition of tweens
#[derive(Debug, Clone)]
pub struct Timeline<E> {
    tweens: Vec<Tween<E>>,
    offsets: Vec<f32>,
    total_duration_ms: f32,
    elapsed_ms: f32,
    next_untriggered: usize,
    state: TimelineState,
    on_complete: Option<E>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Timeline<E> {
    pub fn new() -> Self {
        Self {
            tweens: Vec::new(),
            offsets: Vec::new(),
            total_duration_ms: 0.0,
            elapsed_ms: 0.0,
            next_untriggered: 0,
            state: TimelineState::Idle,
            on_complete: None,
        }
    }

    /// Schedule `tween` at `offset_ms`, or after everything so far when `None`
    pub fn add(&mut self, tween: Tween<E>, offset_ms: Option<f32>) -> &mut Self {
        let duration = tween.duration_ms();
        match offset_ms {
            None => {
                self.offsets.push(self.total_duration_ms);
                self.total_duration_ms += duration;
            }
            Some(offset) => {
                let offset = sanitize(offset);
                self.offsets.push(offset);
                self.total_duration_ms = self.total_duration_ms.max(offset + duration);
            }
        }
        self.tweens.push(tween);
        self
    }

    /// Builder form of a sequential `add`
    pub fn then(mut self, tween: Tween<E>) -> Self {
        self.add(tween, None);
        self
    }

    /// Builder form of an `add` at an absolute offset
    pub fn at(mut self, offset_ms: f32, tween: Tween<E>) -> Self {
        self.add(tween, Some(offset_ms));
        self
    }

    pub fn on_complete(mut self, event: E) -> Self {
        self.on_complete = Some(event);
        self
    }

    pub fn total_duration_ms(&self) -> f32 {
        self.total_duration_ms
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    pub fn state(&self) -> TimelineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == TimelineState::Finished
    }

    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    pub fn tween(&self, index: usize) -> Option<&Tween<E>> {
        self.tweens.get(index)
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Advance every triggered tween and report completions
    pub fn advance<T: Animatable + ?Sized>(&mut self, delta_ms: f32, target: &mut T) -> Advance<E> {
        if self.state == TimelineState::Finished {
            return Advance::idle();
        }
        self.state = TimelineState::Playing;

        let previous = self.elapsed_ms;
        self.elapsed_ms += sanitize(delta_ms);
        let finishing = self.elapsed_ms >= self.total_duration_ms;

        let mut events = Vec::new();
        for (tween, &offset) in self.tweens[self.next_untriggered..]
            .iter_mut()
            .zip(&self.offsets[self.next_untriggered..])
        {
            if self.elapsed_ms < offset || !tween.is_active() {
                continue;
            }
            // Only the slice of this frame after the trigger point counts
            let local = self.elapsed_ms - previous.max(offset);
            if let TweenStep::Completed(Some(event)) = tween.advance(local, target) {
                events.push(event);
            }
            if finishing {
                events.extend(tween.finish(target));
            }
        }

        while self
            .tweens
            .get(self.next_untriggered)
            .is_some_and(|t| !t.is_active())
        {
            self.next_untriggered += 1;
        }

        if !finishing {
            return Advance {
                events,
                finished: false,
            };
        }

        self.state = TimelineState::Finished;
        events.extend(self.on_complete.take());
        Advance {
            events,
            finished: true,
        }
    }
}
