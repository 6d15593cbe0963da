//! Spawn director
//!
//! Distance thresholds are consumed front to back, one per frame, and never
//! come back. The boss arrives once, when the stage stops scrolling.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;

use crate::tuning::Tuning;

/// What to spawn this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnPlan {
    /// Footprint positions of new minions
    pub minions: Vec<Vec2>,
    pub boss: bool,
}

impl SpawnPlan {
    pub fn is_empty(&self) -> bool {
        self.minions.is_empty() && !self.boss
    }
}

#[derive(Debug, Clone)]
pub struct Director {
    thresholds: VecDeque<f32>,
    boss_spawned: bool,
}

impl Director {
    pub fn new(thresholds: &[f32]) -> Self {
        Self {
            thresholds: thresholds.iter().copied().collect(),
            boss_spawned: false,
        }
    }

    /// Thresholds not yet crossed, nearest first
    pub fn remaining(&self) -> impl Iterator<Item = f32> + '_ {
        self.thresholds.iter().copied()
    }

    pub fn boss_spawned(&self) -> bool {
        self.boss_spawned
    }

    /// Decide this frame's spawns from the distance travelled
    pub fn plan(&mut self, distance: f32, at_end: bool, rng: &mut impl Rng, tuning: &Tuning) -> SpawnPlan {
        let mut plan = SpawnPlan::default();

        if let Some(&threshold) = self.thresholds.front() {
            if distance > threshold {
                self.thresholds.pop_front();
                plan.minions = wave(threshold, rng, tuning);
                log::info!(
                    "wave at {} px: {} minions ({} thresholds left)",
                    threshold,
                    plan.minions.len(),
                    self.thresholds.len()
                );
            }
        }

        if at_end && !self.boss_spawned {
            self.boss_spawned = true;
            plan.boss = true;
            log::info!("boss spawns after {} px", distance);
        }

        plan
    }
}

/// One minion ahead of the player, then a batch around the screen edges
fn wave(threshold: f32, rng: &mut impl Rng, tuning: &Tuning) -> Vec<Vec2> {
    let spawn = &tuning.spawn;
    let width = tuning.screen.width;
    let batch = (threshold / spawn.batch_divisor).ceil().max(0.0) as usize;

    let mut positions = Vec::with_capacity(batch + 1);
    positions.push(Vec2::new(
        width + spawn.ahead_offset,
        (spawn.ahead_y_min + rng.random::<f32>() * spawn.ahead_y_range).round(),
    ));

    for i in 0..batch {
        let variance = spawn.side_margin + rng.random::<f32>() * spawn.side_jitter;
        let x = if i % 2 == 0 { -variance } else { width + variance };
        let y = spawn.y_min + rng.random::<f32>() * spawn.y_range;
        positions.push(Vec2::new(x.round(), y.round()));
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_threshold_consumed_once() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut director = Director::new(&[100.0, 350.0]);

        assert!(director.plan(100.0, false, &mut rng, &tuning).is_empty());

        let plan = director.plan(102.0, false, &mut rng, &tuning);
        assert_eq!(plan.minions.len(), 2);
        assert!(!plan.boss);
        assert_eq!(director.remaining().collect::<Vec<_>>(), vec![350.0]);

        assert!(director.plan(104.0, false, &mut rng, &tuning).is_empty());
    }

    #[test]
    fn test_one_threshold_per_frame() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut director = Director::new(&[100.0, 350.0]);

        let plan = director.plan(1000.0, false, &mut rng, &tuning);
        assert_eq!(plan.minions.len(), 2);
        let plan = director.plan(1000.0, false, &mut rng, &tuning);
        assert_eq!(plan.minions.len(), 2);
        assert_eq!(director.remaining().count(), 0);
    }

    #[test]
    fn test_wave_placement() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let positions = wave(1200.0, &mut rng, &tuning);
        assert_eq!(positions.len(), 4);

        assert_eq!(positions[0].x, 298.0);
        assert!((125.0..=245.0).contains(&positions[0].y));

        for (i, pos) in positions[1..].iter().enumerate() {
            if i % 2 == 0 {
                assert!((-55.0..=-40.0).contains(&pos.x), "{pos}");
            } else {
                assert!((296.0..=311.0).contains(&pos.x), "{pos}");
            }
            assert!((112.0..=224.0).contains(&pos.y));
            assert_eq!(pos.y, pos.y.round());
        }
    }

    #[test]
    fn test_boss_spawns_once() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut director = Director::new(&[]);

        assert!(!director.plan(0.0, false, &mut rng, &tuning).boss);
        assert!(director.plan(0.0, true, &mut rng, &tuning).boss);
        assert!(director.boss_spawned());
        assert!(!director.plan(0.0, true, &mut rng, &tuning).boss);
    }
}
