//! Pointer-driven parallax for the background decoration layer.
//!
//! Pointer offset from the viewport center maps linearly per axis from
//! `±domain` px to `±range` px, clamped at the domain edges. The pointer
//! listener lives exactly as long as the mounted background.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use inkfolio_core::{
    CriticalDamper, Dispose, Runtime, Transform, Vec2, effect, on_unmount,
};
use web_time::{Duration, Instant};

#[derive(Clone, Debug, PartialEq)]
pub struct ParallaxConfig {
    pub domain: f32,
    pub range: f32,
    /// Critically damped smoothing; zero follows the pointer exactly.
    pub smoothing: Duration,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            domain: 800.0,
            range: 30.0,
            smoothing: Duration::ZERO,
        }
    }
}

/// Linear map `[-domain, domain] -> [-range, range]`, clamped. Degenerate
/// input (non-finite delta, non-positive domain) maps to 0.
pub fn map_axis(delta: f32, domain: f32, range: f32) -> f32 {
    if !delta.is_finite() || !domain.is_finite() || domain <= 0.0 || !range.is_finite() {
        return 0.0;
    }
    delta.clamp(-domain, domain) / domain * range
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParallaxOffset {
    pub pointer_dx: f32,
    pub pointer_dy: f32,
    pub background_x: f32,
    pub background_y: f32,
}

impl ParallaxOffset {
    pub fn from_pointer(delta: Vec2, cfg: &ParallaxConfig) -> Self {
        Self {
            pointer_dx: delta.x,
            pointer_dy: delta.y,
            background_x: map_axis(delta.x, cfg.domain, cfg.range),
            background_y: map_axis(delta.y, cfg.domain, cfg.range),
        }
    }
}

struct ParallaxState {
    cfg: ParallaxConfig,
    target: ParallaxOffset,
    x: CriticalDamper,
    y: CriticalDamper,
    last_tick: Instant,
}

impl ParallaxState {
    fn retarget(&mut self, delta: Vec2) {
        self.target = ParallaxOffset::from_pointer(delta, &self.cfg);
        if self.cfg.smoothing.is_zero() {
            self.x.step(self.target.background_x, Duration::ZERO);
            self.y.step(self.target.background_y, Duration::ZERO);
        }
    }
}

pub struct ParallaxBackground {
    rt: Runtime,
    state: Rc<RefCell<ParallaxState>>,
    attached: Rc<Cell<bool>>,
    dispose: Dispose,
}

impl ParallaxBackground {
    pub fn mount(rt: &Runtime, cfg: ParallaxConfig) -> Self {
        let input = rt.input().clone();
        let smoothing = cfg.smoothing;
        let state = Rc::new(RefCell::new(ParallaxState {
            cfg,
            target: ParallaxOffset::default(),
            x: CriticalDamper::new(0.0, smoothing),
            y: CriticalDamper::new(0.0, smoothing),
            last_tick: rt.now(),
        }));
        {
            let mut st = state.borrow_mut();
            st.retarget(input.pointer_from_center());
            let (bx, by) = (st.target.background_x, st.target.background_y);
            st.x = CriticalDamper::new(bx, smoothing);
            st.y = CriticalDamper::new(by, smoothing);
        }

        let attached = Rc::new(Cell::new(true));
        let subscription = {
            let weak = Rc::downgrade(&state);
            let input2 = input.clone();
            input.watch_pointer(move |_| {
                if let Some(st) = weak.upgrade() {
                    st.borrow_mut().retarget(input2.pointer_from_center());
                }
            })
        };
        log::debug!("parallax: pointer listener attached");

        let dispose = {
            let attached = attached.clone();
            effect(move || {
                on_unmount(move || {
                    drop(subscription);
                    attached.set(false);
                    log::debug!("parallax: pointer listener detached");
                })
            })
        };

        Self {
            rt: rt.clone(),
            state,
            attached,
            dispose,
        }
    }

    /// Advances smoothing to the runtime's current time.
    pub fn tick(&self) {
        let now = self.rt.now();
        let mut st = self.state.borrow_mut();
        let dt = now.saturating_duration_since(st.last_tick);
        st.last_tick = now;
        let (tx, ty) = (st.target.background_x, st.target.background_y);
        st.x.step(tx, dt);
        st.y.step(ty, dt);
    }

    /// Where the pointer says the background should be.
    pub fn target(&self) -> ParallaxOffset {
        self.state.borrow().target
    }

    /// Where the background currently is (equal to `target` when unsmoothed).
    pub fn offset(&self) -> Vec2 {
        let st = self.state.borrow();
        Vec2::new(st.x.value(), st.y.value())
    }

    pub fn transform(&self) -> Transform {
        let o = self.offset();
        Transform::translate(o.x, o.y)
    }

    pub fn is_listening(&self) -> bool {
        self.attached.get()
    }

    pub fn teardown(&self) {
        self.dispose.run();
    }
}

impl Drop for ParallaxBackground {
    fn drop(&mut self) {
        self.dispose.run();
    }
}
