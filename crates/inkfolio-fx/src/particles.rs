//! Particle pop used on project cards.
//!
//! Each particle owns its own delay and duration. The set is regenerated only
//! when the requested count changes; toggling active replays the same set.

use inkfolio_core::{Easing, Seeded, Transform, keyframes};
use web_time::{Duration, Instant};

pub const DEFAULT_PARTICLE_COUNT: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurstParticle {
    pub dx: f32,
    pub dy: f32,
    pub size_px: f32,
    pub duration: Duration,
    pub delay: Duration,
}

impl BurstParticle {
    pub fn generate(rng: &mut Seeded) -> Self {
        Self {
            dx: rng.range(-50.0, 50.0),
            dy: rng.range(-50.0, 50.0),
            size_px: rng.range(2.0, 6.0),
            duration: Duration::from_secs_f32(rng.range(0.6, 1.0)),
            delay: Duration::from_secs_f32(rng.range(0.0, 0.2)),
        }
    }

    /// `None` before the particle's delay and after it finishes.
    pub fn frame_at(&self, since: Duration) -> Option<(Transform, f32)> {
        let local = since.checked_sub(self.delay)?;
        if local > self.duration || self.duration.is_zero() {
            return None;
        }
        let raw = local.as_secs_f32() / self.duration.as_secs_f32();
        let t = Easing::EaseOut.interpolate(raw);
        let scale = keyframes(&[0.0, 1.5, 0.0], t);
        let transform = Transform::translate(self.dx * t, self.dy * t).scaled(scale);
        Some((transform, 1.0 - t))
    }
}

pub struct ParticleEffect {
    rng: Seeded,
    particles: Vec<BurstParticle>,
    active_since: Option<Instant>,
}

impl ParticleEffect {
    pub fn new(rng: Seeded, count: usize) -> Self {
        let mut fx = Self {
            rng,
            particles: Vec::new(),
            active_since: None,
        };
        fx.regenerate(count);
        fx
    }

    fn regenerate(&mut self, count: usize) {
        self.particles = (0..count)
            .map(|_| BurstParticle::generate(&mut self.rng))
            .collect();
    }

    pub fn count(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[BurstParticle] {
        &self.particles
    }

    /// Returns true if the set was regenerated.
    pub fn set_count(&mut self, count: usize) -> bool {
        if count == self.particles.len() {
            return false;
        }
        self.regenerate(count);
        true
    }

    pub fn is_active(&self) -> bool {
        self.active_since.is_some()
    }

    pub fn set_active(&mut self, active: bool, now: Instant) {
        match (active, self.active_since) {
            (true, None) => self.active_since = Some(now),
            (false, Some(_)) => self.active_since = None,
            _ => {}
        }
    }

    /// Live particles only; empty while inactive.
    pub fn frame(&self, now: Instant) -> Vec<(Transform, f32)> {
        let Some(start) = self.active_since else {
            return Vec::new();
        };
        let since = now.saturating_duration_since(start);
        self.particles
            .iter()
            .filter_map(|p| p.frame_at(since))
            .collect()
    }
}
