//! Diagonal speed lines that fade in as the page scrolls.
//!
//! Scroll position is smoothed with a spring and the layer updates on every
//! scroll event and tick, not just on first paint.

use std::cell::RefCell;
use std::rc::Rc;

use inkfolio_core::{Dispose, Runtime, Seeded, SpringFollower, Transform, effect, on_unmount};
use web_time::Instant;

pub const SCROLL_LINE_COUNT: usize = 50;
/// Smoothed scroll below which the layer stays hidden.
pub const SHOW_AFTER_PX: f32 = 100.0;
pub const MAX_OPACITY: f32 = 0.5;
pub const LINE_ANGLE_DEG: f32 = -45.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollLineSpec {
    pub x_pct: f32,
    pub width_px: f32,
    pub opacity: f32,
}

impl ScrollLineSpec {
    pub fn generate(rng: &mut Seeded) -> Self {
        Self {
            x_pct: rng.range(0.0, 100.0),
            width_px: rng.range(20.0, 120.0),
            opacity: rng.range(0.1, 0.3),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScrollLinesFrame {
    pub layer_opacity: f32,
    pub lines: Vec<(ScrollLineSpec, Transform)>,
}

/// Layer opacity from raw and smoothed scroll.
pub fn layer_opacity(raw: f32, smoothed: f32) -> f32 {
    if smoothed > SHOW_AFTER_PX {
        (raw / 1000.0).min(MAX_OPACITY)
    } else {
        0.0
    }
}

struct ScrollState {
    raw: f32,
    spring: SpringFollower,
    last_tick: Instant,
}

pub struct ScrollSpeedLines {
    rt: Runtime,
    lines: Vec<ScrollLineSpec>,
    state: Rc<RefCell<ScrollState>>,
    dispose: Dispose,
}

impl ScrollSpeedLines {
    pub fn mount(rt: &Runtime) -> Self {
        let mut rng = rt.rng();
        let lines = (0..SCROLL_LINE_COUNT)
            .map(|_| ScrollLineSpec::generate(&mut rng))
            .collect();
        let input = rt.input().clone();
        let raw = input.scroll_y();
        let state = Rc::new(RefCell::new(ScrollState {
            raw,
            spring: SpringFollower::new(raw, 100.0, 30.0, 0.001),
            last_tick: rt.now(),
        }));

        let subscription = {
            let weak = Rc::downgrade(&state);
            input.watch_scroll(move |y| {
                if let Some(st) = weak.upgrade() {
                    st.borrow_mut().raw = *y;
                }
            })
        };
        let dispose = effect(move || on_unmount(move || drop(subscription)));

        Self {
            rt: rt.clone(),
            lines,
            state,
            dispose,
        }
    }

    pub fn lines(&self) -> &[ScrollLineSpec] {
        &self.lines
    }

    pub fn tick(&self) {
        let now = self.rt.now();
        let mut st = self.state.borrow_mut();
        let dt = now.saturating_duration_since(st.last_tick);
        st.last_tick = now;
        let raw = st.raw;
        st.spring.step(raw, dt);
    }

    pub fn smoothed(&self) -> f32 {
        self.state.borrow().spring.value()
    }

    pub fn frame(&self) -> ScrollLinesFrame {
        let st = self.state.borrow();
        let smoothed = st.spring.value();
        let shift = smoothed * 0.5;
        ScrollLinesFrame {
            layer_opacity: layer_opacity(st.raw, smoothed),
            lines: self
                .lines
                .iter()
                .map(|l| (*l, Transform::translate(0.0, shift).rotated(LINE_ANGLE_DEG)))
                .collect(),
        }
    }

    pub fn teardown(&self) {
        self.dispose.run();
    }
}

impl Drop for ScrollSpeedLines {
    fn drop(&mut self) {
        self.dispose.run();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkfolio_core::{DEFAULT_VIEWPORT, ManualClock};
    use web_time::Duration;

    #[test]
    fn opacity_rules() {
        assert_eq!(layer_opacity(50.0, 50.0), 0.0);
        assert_eq!(layer_opacity(300.0, 150.0), 0.3);
        assert_eq!(layer_opacity(4000.0, 3000.0), MAX_OPACITY);
    }

    #[test]
    fn layer_follows_scroll_over_time() {
        let clock = ManualClock::new();
        let rt = Runtime::with_options(clock.shared(), DEFAULT_VIEWPORT, Some(6));
        let lines = ScrollSpeedLines::mount(&rt);
        assert_eq!(lines.lines().len(), SCROLL_LINE_COUNT);
        assert_eq!(lines.frame().layer_opacity, 0.0);

        rt.input().scrolled_to(400.0);
        for _ in 0..120 {
            clock.advance(Duration::from_millis(16));
            lines.tick();
        }
        let frame = lines.frame();
        assert!((lines.smoothed() - 400.0).abs() < 1.0);
        assert!((frame.layer_opacity - 0.4).abs() < 1e-6);
        let (_, t) = frame.lines[0];
        assert!((t.translate_y - lines.smoothed() * 0.5).abs() < 1e-4);
        assert_eq!(t.rotate_deg, LINE_ANGLE_DEG);
    }

    #[test]
    fn scroll_listener_detached_on_teardown() {
        let clock = ManualClock::new();
        let rt = Runtime::with_options(clock.shared(), DEFAULT_VIEWPORT, Some(6));
        let lines = ScrollSpeedLines::mount(&rt);
        assert_eq!(rt.input().scroll_listeners(), 1);
        lines.teardown();
        assert_eq!(rt.input().scroll_listeners(), 0);
    }
}
