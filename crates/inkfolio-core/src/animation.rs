use std::sync::Arc;

use parking_lot::Mutex;
use web_time::{Duration, Instant};

use crate::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Spring { damping: f32, stiffness: f32 },
}

impl Easing {
    pub fn interpolate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::Spring { damping, stiffness } => spring_response(*damping, *stiffness, t),
        }
    }
}

/// Step response of a unit-mass spring released from rest. `t` is normalized
/// so that 1 is the settle time, where the envelope has decayed to e^-10.
fn spring_response(damping: f32, stiffness: f32, t: f32) -> f32 {
    if t >= 1.0 {
        return 1.0;
    }
    let omega = stiffness.max(f32::EPSILON).sqrt();
    let zeta = damping.max(0.0) / (2.0 * omega);
    if zeta < 1.0 {
        let tau = t * 10.0 / (zeta.max(0.05) * omega);
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let envelope = (-zeta * omega * tau).exp();
        1.0 - envelope
            * ((omega_d * tau).cos() + zeta * omega / omega_d * (omega_d * tau).sin())
    } else {
        // critically or over damped: the slow root dominates, no overshoot
        let rate = omega * (zeta - (zeta * zeta - 1.0).sqrt());
        let tau = t * 10.0 / rate;
        1.0 - (1.0 + rate * tau) * (-rate * tau).exp()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub easing: Easing,
    pub delay: Duration,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(300),
            easing: Easing::EaseInOut,
            delay: Duration::ZERO,
        }
    }
}

impl AnimationSpec {
    pub fn tween(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            delay: Duration::ZERO,
        }
    }

    /// Spring used for page content entering (stiffness 100, damping 20,
    /// unit mass). Critically damped, so it settles without overshoot; at
    /// these constants the settle time is one second.
    pub fn page_spring() -> Self {
        Self {
            duration: Duration::from_secs(1),
            easing: Easing::Spring {
                damping: 20.0,
                stiffness: 100.0,
            },
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Eased progress in `0..=1` for `elapsed` time since the animation started.
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if elapsed < self.delay {
            return 0.0;
        }
        let t = elapsed - self.delay;
        if self.duration.is_zero() || t >= self.duration {
            return 1.0;
        }
        self.easing
            .interpolate(t.as_secs_f32() / self.duration.as_secs_f32())
    }
}

pub trait Interpolate {
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Vec2 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Vec2 {
            x: self.x.interpolate(&other.x, t),
            y: self.y.interpolate(&other.y, t),
        }
    }
}

/// Piecewise-linear keyframes over normalized time, e.g. `[0, 1, 0]` for a
/// fade in and out across one cycle.
pub fn keyframes(values: &[f32], t: f32) -> f32 {
    keyframes_with(values, t, Easing::Linear)
}

/// Keyframes with `easing` applied inside each segment.
pub fn keyframes_with(values: &[f32], t: f32, easing: Easing) -> f32 {
    match values {
        [] => 0.0,
        [only] => *only,
        _ => {
            let t = t.clamp(0.0, 1.0);
            let segments = (values.len() - 1) as f32;
            let pos = t * segments;
            let idx = (pos.floor() as usize).min(values.len() - 2);
            let local = easing.interpolate(pos - idx as f32);
            values[idx].interpolate(&values[idx + 1], local)
        }
    }
}

// Animation clock
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

pub type SharedClock = Arc<dyn Clock>;

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl SystemClock {
    pub fn shared() -> SharedClock {
        Arc::new(SystemClock)
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Clone)]
pub struct ManualClock {
    t: Arc<Mutex<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(t: Instant) -> Self {
        Self {
            t: Arc::new(Mutex::new(t)),
        }
    }

    pub fn set(&self, t: Instant) {
        let mut cur = self.t.lock();
        if t > *cur {
            *cur = t;
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.t.lock() += by;
    }

    pub fn shared(&self) -> SharedClock {
        Arc::new(self.clone())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.t.lock()
    }
}

/// Value that moves toward a target along an `AnimationSpec`.
///
/// Retargeting mid-flight starts the new segment from the current
/// interpolated value, so rapid toggles never jump.
#[derive(Clone, Debug)]
pub struct AnimatedValue<T: Interpolate + Clone> {
    current: T,
    target: T,
    start: T,
    spec: AnimationSpec,
    start_time: Option<Instant>,
}

impl<T: Interpolate + Clone> AnimatedValue<T> {
    pub fn new(initial: T, spec: AnimationSpec) -> Self {
        Self {
            current: initial.clone(),
            target: initial.clone(),
            start: initial,
            spec,
            start_time: None,
        }
    }

    pub fn set_target(&mut self, target: T, now: Instant) {
        self.update(now);
        self.start = self.current.clone();
        self.target = target;
        self.start_time = Some(now);
    }

    pub fn update(&mut self, now: Instant) -> bool {
        let Some(start) = self.start_time else {
            return false;
        };
        let elapsed = now.saturating_duration_since(start);

        if elapsed < self.spec.delay {
            return true;
        }

        let animation_time = elapsed - self.spec.delay;
        if animation_time >= self.spec.duration {
            self.current = self.target.clone();
            self.start_time = None;
            return false;
        }

        let t = animation_time.as_secs_f32() / self.spec.duration.as_secs_f32();
        let eased_t = self.spec.easing.interpolate(t);
        self.current = self.start.interpolate(&self.target, eased_t);
        true
    }

    pub fn get(&self) -> &T {
        &self.current
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn is_animating(&self) -> bool {
        self.start_time.is_some()
    }
}

/// Critically damped follower (no overshoot). `smooth_time` is roughly the
/// time to close most of the gap; zero means "follow exactly".
#[derive(Clone, Copy, Debug)]
pub struct CriticalDamper {
    value: f32,
    velocity: f32,
    smooth_time: f32,
}

impl CriticalDamper {
    pub fn new(initial: f32, smooth_time: Duration) -> Self {
        Self {
            value: initial,
            velocity: 0.0,
            smooth_time: smooth_time.as_secs_f32(),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn step(&mut self, target: f32, dt: Duration) -> f32 {
        let dt = dt.as_secs_f32();
        if self.smooth_time <= f32::EPSILON || !target.is_finite() {
            self.value = if target.is_finite() { target } else { 0.0 };
            self.velocity = 0.0;
            return self.value;
        }
        if dt <= 0.0 {
            return self.value;
        }
        let omega = 2.0 / self.smooth_time;
        let x = omega * dt;
        let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
        let change = self.value - target;
        let temp = (self.velocity + omega * change) * dt;
        self.velocity = (self.velocity - omega * temp) * exp;
        self.value = target + (change + temp) * exp;
        self.value
    }
}

/// Mass-spring follower used for scroll smoothing (stiffness/damping in the
/// same units as the web animation libraries: unit mass, per-second).
#[derive(Clone, Copy, Debug)]
pub struct SpringFollower {
    value: f32,
    velocity: f32,
    stiffness: f32,
    damping: f32,
    rest_delta: f32,
}

impl SpringFollower {
    pub fn new(initial: f32, stiffness: f32, damping: f32, rest_delta: f32) -> Self {
        Self {
            value: initial,
            velocity: 0.0,
            stiffness,
            damping,
            rest_delta,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_resting(&self, target: f32) -> bool {
        (self.value - target).abs() <= self.rest_delta && self.velocity.abs() <= self.rest_delta
    }

    /// Semi-implicit Euler in sub-steps of at most 4ms.
    pub fn step(&mut self, target: f32, dt: Duration) -> f32 {
        let mut remaining = dt.as_secs_f32();
        const MAX_STEP: f32 = 0.004;
        while remaining > 0.0 {
            let h = remaining.min(MAX_STEP);
            let force = -self.stiffness * (self.value - target) - self.damping * self.velocity;
            self.velocity += force * h;
            self.value += self.velocity * h;
            remaining -= h;
        }
        if self.is_resting(target) {
            self.value = target;
            self.velocity = 0.0;
        }
        self.value
    }
}
