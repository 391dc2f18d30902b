//! Slowly bobbing background shapes on the landing page.

use inkfolio_core::{Easing, Seeded, Transform, keyframes_with};
use web_time::Duration;

pub const SHAPE_COUNT: usize = 15;
pub const BOB_CYCLE: Duration = Duration::from_secs(5);
const BOB_Y: [f32; 3] = [-20.0, 20.0, -20.0];
const SWAY_DEG: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tint {
    Pink,
    Blue,
    Purple,
}

impl Tint {
    /// RGBA, all at 10% alpha.
    pub fn rgba(self) -> (u8, u8, u8, f32) {
        match self {
            Tint::Pink => (236, 72, 153, 0.1),
            Tint::Blue => (96, 165, 250, 0.1),
            Tint::Purple => (168, 85, 247, 0.1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeSpec {
    pub kind: ShapeKind,
    pub tint: Tint,
    pub size_px: f32,
    pub x_pct: f32,
    pub y_pct: f32,
    pub rotation_deg: f32,
    pub delay: Duration,
}

impl ShapeSpec {
    pub fn generate(rng: &mut Seeded) -> Self {
        const KINDS: [ShapeKind; 3] = [ShapeKind::Circle, ShapeKind::Square, ShapeKind::Triangle];
        const TINTS: [Tint; 3] = [Tint::Pink, Tint::Blue, Tint::Purple];
        Self {
            kind: rng.pick(&KINDS).copied().unwrap_or(ShapeKind::Circle),
            tint: rng.pick(&TINTS).copied().unwrap_or(Tint::Pink),
            size_px: rng.range(20.0, 60.0),
            x_pct: rng.range(0.0, 100.0),
            y_pct: rng.range(0.0, 100.0),
            rotation_deg: rng.range(0.0, 360.0),
            delay: Duration::from_secs_f32(rng.range(0.0, 5.0)),
        }
    }

    /// Bob offset and sway `elapsed` after mount. Before its delay a shape
    /// rests at its base rotation.
    pub fn transform_at(&self, elapsed: Duration) -> Transform {
        let Some(local) = elapsed.checked_sub(self.delay) else {
            return Transform::identity().rotated(self.rotation_deg);
        };
        let t = (local.as_secs_f32() % BOB_CYCLE.as_secs_f32()) / BOB_CYCLE.as_secs_f32();
        let r = self.rotation_deg;
        let y = keyframes_with(&BOB_Y, t, Easing::EaseInOut);
        let rot = keyframes_with(&[r - SWAY_DEG, r + SWAY_DEG, r - SWAY_DEG], t, Easing::EaseInOut);
        Transform::translate(0.0, y).rotated(rot)
    }
}

/// Fixed set of shapes generated once per instance.
pub struct FloatingShapes {
    shapes: Vec<ShapeSpec>,
}

impl FloatingShapes {
    pub fn new(rng: &mut Seeded) -> Self {
        Self::with_count(rng, SHAPE_COUNT)
    }

    pub fn with_count(rng: &mut Seeded, count: usize) -> Self {
        Self {
            shapes: (0..count).map(|_| ShapeSpec::generate(rng)).collect(),
        }
    }

    pub fn shapes(&self) -> &[ShapeSpec] {
        &self.shapes
    }

    pub fn frame(&self, elapsed: Duration) -> Vec<(ShapeSpec, Transform)> {
        self.shapes
            .iter()
            .map(|s| (*s, s.transform_at(elapsed)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(delay_ms: u64) -> ShapeSpec {
        ShapeSpec {
            kind: ShapeKind::Square,
            tint: Tint::Blue,
            size_px: 30.0,
            x_pct: 50.0,
            y_pct: 50.0,
            rotation_deg: 90.0,
            delay: Duration::from_millis(delay_ms),
        }
    }

    #[test]
    fn rests_until_delay_then_bobs() {
        let s = shape(1000);
        assert_eq!(s.transform_at(Duration::from_millis(500)).translate_y, 0.0);
        assert_eq!(s.transform_at(Duration::from_millis(500)).rotate_deg, 90.0);

        let start = s.transform_at(Duration::from_millis(1000));
        assert_eq!(start.translate_y, -20.0);
        assert_eq!(start.rotate_deg, 80.0);

        let peak = s.transform_at(Duration::from_millis(3500));
        assert!((peak.translate_y - 20.0).abs() < 1e-3);
        assert!((peak.rotate_deg - 100.0).abs() < 1e-3);
    }

    #[test]
    fn generated_shapes_are_stable_and_bounded() {
        let mut rng = Seeded::new(8);
        let shapes = FloatingShapes::new(&mut rng);
        assert_eq!(shapes.shapes().len(), SHAPE_COUNT);
        for s in shapes.shapes() {
            assert!((20.0..60.0).contains(&s.size_px));
            assert!(s.delay <= BOB_CYCLE);
        }
        let a = shapes.frame(Duration::from_millis(1234));
        let b = shapes.frame(Duration::from_millis(1234));
        assert_eq!(a, b);
    }
}
