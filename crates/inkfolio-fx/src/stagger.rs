//! Staggered entrance timing for lists of page sections.

use inkfolio_core::{AnimatedValue, AnimationSpec, Easing};
use web_time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stagger {
    pub delay_children: Duration,
    pub stagger: Duration,
    pub item: AnimationSpec,
}

impl Stagger {
    pub fn new(delay_children: Duration, stagger: Duration, item: AnimationSpec) -> Self {
        Self {
            delay_children,
            stagger,
            item,
        }
    }

    /// Landing hero: children start after 0.3s, 0.2s apart, 0.5s each.
    pub fn hero() -> Self {
        Self::new(
            Duration::from_millis(300),
            Duration::from_millis(200),
            AnimationSpec::tween(Duration::from_millis(500), Easing::EaseOut),
        )
    }

    /// About-page timeline entries.
    pub fn timeline() -> Self {
        Self::new(
            Duration::ZERO,
            Duration::from_millis(200),
            AnimationSpec::tween(Duration::from_millis(500), Easing::EaseOut),
        )
    }

    /// Skill bars filling to their level.
    pub fn skill_bars() -> Self {
        Self::new(
            Duration::ZERO,
            Duration::from_millis(100),
            AnimationSpec::tween(Duration::from_secs(1), Easing::EaseOut),
        )
    }

    pub fn delay_for(&self, index: usize) -> Duration {
        self.delay_children + self.stagger * index as u32
    }

    /// Entrance progress of item `index`, `elapsed` after the list mounted.
    pub fn progress(&self, index: usize, elapsed: Duration) -> f32 {
        self.item.delayed(self.delay_for(index)).progress(elapsed)
    }

    /// Total time until the last of `count` items has settled.
    pub fn total(&self, count: usize) -> Duration {
        match count {
            0 => Duration::ZERO,
            n => self.delay_for(n - 1) + self.item.delay + self.item.duration,
        }
    }

    /// One animated value per item, each already targeting `to`.
    pub fn animate(&self, from: f32, to: &[f32], now: Instant) -> Vec<AnimatedValue<f32>> {
        to.iter()
            .enumerate()
            .map(|(i, &target)| {
                let mut v = AnimatedValue::new(from, self.item.delayed(self.delay_for(i)));
                v.set_target(target, now);
                v
            })
            .collect()
    }
}
