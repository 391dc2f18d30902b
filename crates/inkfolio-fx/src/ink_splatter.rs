//! Ink-splatter hover burst.
//!
//! Particle geometry is drawn once when the burst is created and replayed on
//! every hover, so the same button always splashes the same shape.

use inkfolio_core::{AnimatedValue, AnimationSpec, Easing, Seeded, Transform};
use smallvec::SmallVec;
use web_time::{Duration, Instant};

#[derive(Clone, Debug, PartialEq)]
pub struct BurstConfig {
    pub particle_count: usize,
    pub duration: Duration,
    /// Multiplies every particle's scale.
    pub scale: f32,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            particle_count: 3,
            duration: Duration::from_millis(300),
            scale: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSpec {
    pub scale: f32,
    pub rotation_deg: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub opacity: f32,
}

impl ParticleSpec {
    pub fn generate(rng: &mut Seeded) -> Self {
        Self {
            scale: rng.range(0.5, 1.0),
            rotation_deg: rng.range(0.0, 360.0),
            offset_x: rng.range(-50.0, 50.0),
            offset_y: rng.range(-50.0, 50.0),
            opacity: rng.range(0.5, 1.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleFrame {
    pub transform: Transform,
    pub opacity: f32,
}

pub struct HoverBurst {
    particles: SmallVec<[ParticleSpec; 4]>,
    scale: f32,
    active: bool,
    progress: AnimatedValue<f32>,
}

impl HoverBurst {
    pub fn new(rng: &mut Seeded, cfg: &BurstConfig) -> Self {
        let particles = (0..cfg.particle_count)
            .map(|_| ParticleSpec::generate(rng))
            .collect();
        let scale = if cfg.scale.is_finite() {
            cfg.scale.max(0.0)
        } else {
            1.0
        };
        Self {
            particles,
            scale,
            active: false,
            progress: AnimatedValue::new(
                0.0,
                AnimationSpec::tween(cfg.duration, Easing::EaseOut),
            ),
        }
    }

    pub fn particles(&self) -> &[ParticleSpec] {
        &self.particles
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Retargets toward the latest hover state from wherever the burst is.
    pub fn set_active(&mut self, active: bool, now: Instant) {
        if self.active == active {
            return;
        }
        self.active = active;
        self.progress
            .set_target(if active { 1.0 } else { 0.0 }, now);
    }

    /// Burst progress in `0..=1`.
    pub fn progress(&mut self, now: Instant) -> f32 {
        self.progress.update(now);
        *self.progress.get()
    }

    pub fn is_settled(&self) -> bool {
        !self.progress.is_animating()
    }

    pub fn frame(&mut self, now: Instant) -> SmallVec<[ParticleFrame; 4]> {
        let p = self.progress(now);
        self.particles
            .iter()
            .map(|s| ParticleFrame {
                transform: Transform::translate(s.offset_x * p, s.offset_y * p)
                    .scaled(s.scale * self.scale * p)
                    .rotated(s.rotation_deg),
                opacity: s.opacity * p,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_is_fixed_across_activations() {
        let mut rng = Seeded::new(11);
        let mut burst = HoverBurst::new(&mut rng, &BurstConfig::default());
        let t0 = Instant::now();
        let step = Duration::from_millis(400);

        burst.set_active(true, t0);
        let first = burst.frame(t0 + step);
        burst.set_active(false, t0 + step);
        burst.set_active(true, t0 + step * 2);
        let second = burst.frame(t0 + step * 3);

        assert_eq!(first, second);
        assert_eq!(burst.particles().len(), 3);
    }

    #[test]
    fn inactive_burst_is_invisible_and_centered() {
        let mut rng = Seeded::new(5);
        let mut burst = HoverBurst::new(&mut rng, &BurstConfig::default());
        for f in burst.frame(Instant::now()) {
            assert_eq!(f.opacity, 0.0);
            assert_eq!(f.transform.scale_x, 0.0);
            assert_eq!(f.transform.translate_x, 0.0);
            assert_eq!(f.transform.translate_y, 0.0);
        }
    }

    #[test]
    fn rapid_toggle_tracks_latest_state() {
        let mut rng = Seeded::new(9);
        let mut burst = HoverBurst::new(&mut rng, &BurstConfig::default());
        let t0 = Instant::now();

        burst.set_active(true, t0);
        burst.set_active(false, t0 + Duration::from_millis(100));
        burst.set_active(true, t0 + Duration::from_millis(150));
        burst.set_active(false, t0 + Duration::from_millis(160));

        let mid = burst.progress(t0 + Duration::from_millis(200));
        assert!((0.0..1.0).contains(&mid));
        assert_eq!(burst.progress(t0 + Duration::from_millis(500)), 0.0);
        assert!(burst.is_settled());
        assert!(!burst.is_active());
    }

    #[test]
    fn generated_particles_stay_in_range() {
        let mut rng = Seeded::new(1);
        for _ in 0..200 {
            let p = ParticleSpec::generate(&mut rng);
            assert!((0.5..1.0).contains(&p.scale));
            assert!((0.0..360.0).contains(&p.rotation_deg));
            assert!((-50.0..50.0).contains(&p.offset_x));
            assert!((0.5..1.0).contains(&p.opacity));
        }
    }

    #[test]
    fn negative_scale_factor_is_clamped() {
        let mut rng = Seeded::new(2);
        let cfg = BurstConfig {
            scale: -3.0,
            ..BurstConfig::default()
        };
        let mut burst = HoverBurst::new(&mut rng, &cfg);
        let t0 = Instant::now();
        burst.set_active(true, t0);
        for f in burst.frame(t0 + Duration::from_secs(1)) {
            assert!(f.transform.scale_x >= 0.0);
        }
    }
}
