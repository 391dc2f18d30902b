use fastrand::Rng;

/// Seeded generator for decorative geometry. Every draw is finite and inside
/// its requested range, whatever the caller passes.
#[derive(Debug)]
pub struct Seeded(Rng);

impl Seeded {
    pub fn new(seed: u64) -> Self {
        Self(Rng::with_seed(seed))
    }

    pub fn from_entropy() -> Self {
        Self(Rng::new())
    }

    /// Uniform in `[lo, hi)`. Reversed bounds are swapped; non-finite bounds
    /// collapse to zero.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        let lo = if lo.is_finite() { lo } else { 0.0 };
        let hi = if hi.is_finite() { hi } else { 0.0 };
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        lo + self.0.f32() * (hi - lo)
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.0.usize(0..items.len()))
    }

    /// Independent child generator; the parent advances by one draw.
    pub fn fork(&mut self) -> Seeded {
        Seeded(Rng::with_seed(self.0.u64(..)))
    }
}
