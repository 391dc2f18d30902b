//! Full-screen speed-line overlay shown for a fixed window after every
//! navigation. Line geometry is drawn fresh on each activation and thrown
//! away on deactivation. The overlay never takes pointer events.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use inkfolio_core::{
    AnimatedValue, AnimationSpec, Dispose, Easing, Runtime, Seeded, TimerId, effect, keyframes,
    on_unmount,
};
use web_time::{Duration, Instant};

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayConfig {
    /// How long the window stays active.
    pub duration: Duration,
    /// Opacity fade of the overlay layer itself.
    pub fade: Duration,
    pub line_count: usize,
    pub length_px: (f32, f32),
    pub max_angle_deg: f32,
    pub max_start_offset: Duration,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(800),
            fade: Duration::from_millis(300),
            line_count: 20,
            length_px: (50.0, 150.0),
            max_angle_deg: 45.0,
            max_start_offset: Duration::from_millis(200),
        }
    }
}

/// One streak of the loop: 0.5s ease-out, then 0.1s rest.
pub const LINE_CYCLE: Duration = Duration::from_millis(500);
pub const LINE_REST: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSpec {
    /// Percent of viewport width.
    pub x_pct: f32,
    /// Percent of viewport height.
    pub y_pct: f32,
    pub angle_deg: f32,
    pub length_px: f32,
    pub start_offset: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineFrame {
    pub opacity: f32,
    pub translate_x: f32,
    pub scale_x: f32,
}

impl LineSpec {
    pub fn generate(rng: &mut Seeded, cfg: &OverlayConfig) -> Self {
        let max_offset = cfg.max_start_offset.as_secs_f32();
        Self {
            x_pct: rng.range(0.0, 100.0),
            y_pct: rng.range(0.0, 100.0),
            angle_deg: rng.range(0.0, cfg.max_angle_deg),
            length_px: rng.range(cfg.length_px.0, cfg.length_px.1).max(0.0),
            start_offset: Duration::from_secs_f32(rng.range(0.0, max_offset).max(0.0)),
        }
    }

    /// Streak state `since` the overlay activated.
    pub fn frame_at(&self, since: Duration) -> LineFrame {
        const RESTING: LineFrame = LineFrame {
            opacity: 0.0,
            translate_x: -100.0,
            scale_x: 0.0,
        };
        let Some(local) = since.checked_sub(self.start_offset) else {
            return RESTING;
        };
        let period = LINE_CYCLE + LINE_REST;
        let phase = local.as_secs_f32() % period.as_secs_f32();
        if phase > LINE_CYCLE.as_secs_f32() {
            return RESTING;
        }
        let t = Easing::EaseOut.interpolate(phase / LINE_CYCLE.as_secs_f32());
        LineFrame {
            opacity: keyframes(&[0.0, 1.0, 0.0], t),
            translate_x: 100.0 + 200.0 * t,
            scale_x: keyframes(&[1.0, 2.0, 0.0], t),
        }
    }
}

/// Active flag plus the batch of lines drawn for the current activation.
#[derive(Clone, Debug, Default)]
pub struct TransitionWindow {
    pub active: bool,
    pub until: Option<Instant>,
    pub lines: Vec<LineSpec>,
}

impl TransitionWindow {
    pub fn remaining(&self, now: Instant) -> Duration {
        match (self.active, self.until) {
            (true, Some(until)) => until.saturating_duration_since(now),
            _ => Duration::ZERO,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayFrame {
    pub active: bool,
    pub opacity: f32,
    pub intercepts_pointer: bool,
    pub lines: Vec<(LineSpec, LineFrame)>,
}

struct OverlayState {
    cfg: OverlayConfig,
    window: TransitionWindow,
    activated_at: Option<Instant>,
    pending: Option<TimerId>,
    layer_opacity: AnimatedValue<f32>,
    rng: Seeded,
    activations: u64,
    torn_down: bool,
}

pub struct TransitionOverlay {
    rt: Runtime,
    state: Rc<RefCell<OverlayState>>,
    dispose: Dispose,
}

impl TransitionOverlay {
    pub fn mount(rt: &Runtime, cfg: OverlayConfig) -> Self {
        let fade = AnimationSpec::tween(cfg.fade, Easing::EaseInOut);
        let state = Rc::new(RefCell::new(OverlayState {
            cfg,
            window: TransitionWindow::default(),
            activated_at: None,
            pending: None,
            layer_opacity: AnimatedValue::new(0.0, fade),
            rng: rt.rng(),
            activations: 0,
            torn_down: false,
        }));
        let dispose = {
            let rt = rt.clone();
            let weak = Rc::downgrade(&state);
            effect(move || {
                on_unmount(move || {
                    if let Some(st) = weak.upgrade() {
                        let mut st = st.borrow_mut();
                        if let Some(id) = st.pending.take() {
                            rt.cancel(id);
                        }
                        st.window = TransitionWindow::default();
                        st.torn_down = true;
                    }
                })
            })
        };
        Self {
            rt: rt.clone(),
            state,
            dispose,
        }
    }

    /// Opens a new window with a fresh batch of lines. Re-activating while
    /// active restarts the window. Does nothing once torn down.
    pub fn activate(&self) {
        let now = self.rt.now();
        let duration = {
            let mut st = self.state.borrow_mut();
            if st.torn_down {
                log::debug!("transition overlay: activate after teardown ignored");
                return;
            }
            if let Some(id) = st.pending.take() {
                self.rt.cancel(id);
            }
            let st = &mut *st;
            let lines = (0..st.cfg.line_count)
                .map(|_| LineSpec::generate(&mut st.rng, &st.cfg))
                .collect();
            st.window = TransitionWindow {
                active: true,
                until: Some(now + st.cfg.duration),
                lines,
            };
            st.activated_at = Some(now);
            st.layer_opacity.set_target(1.0, now);
            st.activations += 1;
            log::debug!("transition overlay: activation {}", st.activations);
            st.cfg.duration
        };

        let rt = self.rt.clone();
        let weak = Rc::downgrade(&self.state);
        let id = self
            .rt
            .set_timeout(duration, move || deactivate(&rt, &weak));
        self.state.borrow_mut().pending = Some(id);
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().window.active
    }

    pub fn lines(&self) -> Vec<LineSpec> {
        self.state.borrow().window.lines.clone()
    }

    pub fn remaining(&self) -> Duration {
        self.state.borrow().window.remaining(self.rt.now())
    }

    pub fn activations(&self) -> u64 {
        self.state.borrow().activations
    }

    /// Snapshot for drawing. No lines are returned while inactive.
    pub fn frame(&self) -> OverlayFrame {
        let now = self.rt.now();
        let mut st = self.state.borrow_mut();
        st.layer_opacity.update(now);
        let since = st
            .activated_at
            .map(|t| now.saturating_duration_since(t))
            .unwrap_or_default();
        let lines = if st.window.active {
            st.window
                .lines
                .iter()
                .map(|l| (*l, l.frame_at(since)))
                .collect()
        } else {
            Vec::new()
        };
        OverlayFrame {
            active: st.window.active,
            opacity: *st.layer_opacity.get(),
            intercepts_pointer: false,
            lines,
        }
    }

    pub fn teardown(&self) {
        self.dispose.run();
    }
}

impl Drop for TransitionOverlay {
    fn drop(&mut self) {
        self.dispose.run();
    }
}

fn deactivate(rt: &Runtime, weak: &Weak<RefCell<OverlayState>>) {
    let Some(st) = weak.upgrade() else {
        return;
    };
    let mut st = st.borrow_mut();
    st.pending = None;
    st.window = TransitionWindow::default();
    st.layer_opacity.set_target(0.0, rt.now());
    log::debug!("transition overlay: window closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkfolio_core::{DEFAULT_VIEWPORT, ManualClock};

    fn setup() -> (ManualClock, Runtime) {
        let clock = ManualClock::new();
        let rt = Runtime::with_options(clock.shared(), DEFAULT_VIEWPORT, Some(42));
        (clock, rt)
    }

    #[test]
    fn window_closes_after_duration() {
        let (clock, rt) = setup();
        let overlay = TransitionOverlay::mount(&rt, OverlayConfig::default());
        overlay.activate();
        assert!(overlay.is_active());
        assert_eq!(overlay.lines().len(), 20);
        assert_eq!(overlay.remaining(), Duration::from_millis(800));

        rt.advance(&clock, Duration::from_millis(799));
        assert!(overlay.is_active());

        rt.advance(&clock, Duration::from_millis(1));
        assert!(!overlay.is_active());
        assert!(overlay.lines().is_empty());
        assert!(overlay.frame().lines.is_empty());
    }

    #[test]
    fn each_activation_draws_a_fresh_batch() {
        let (clock, rt) = setup();
        let overlay = TransitionOverlay::mount(&rt, OverlayConfig::default());
        overlay.activate();
        let first = overlay.lines();

        rt.advance(&clock, Duration::from_millis(300));
        overlay.activate();
        let second = overlay.lines();
        assert_eq!(second.len(), 20);
        assert_ne!(first, second);

        // restarted window: still active 799ms after the second activation
        rt.advance(&clock, Duration::from_millis(799));
        assert!(overlay.is_active());
        rt.advance(&clock, Duration::from_millis(1));
        assert!(!overlay.is_active());
    }

    #[test]
    fn never_intercepts_pointer() {
        let (_clock, rt) = setup();
        let overlay = TransitionOverlay::mount(&rt, OverlayConfig::default());
        assert!(!overlay.frame().intercepts_pointer);
        overlay.activate();
        assert!(!overlay.frame().intercepts_pointer);
    }

    #[test]
    fn generated_lines_respect_ranges() {
        let mut rng = Seeded::new(3);
        let cfg = OverlayConfig::default();
        for _ in 0..200 {
            let l = LineSpec::generate(&mut rng, &cfg);
            assert!((0.0..100.0).contains(&l.x_pct));
            assert!((0.0..100.0).contains(&l.y_pct));
            assert!((0.0..45.0).contains(&l.angle_deg));
            assert!((50.0..150.0).contains(&l.length_px));
            assert!(l.start_offset <= Duration::from_millis(200));
        }
    }

    #[test]
    fn zero_length_lines_still_render() {
        let (_clock, rt) = setup();
        let cfg = OverlayConfig {
            length_px: (0.0, 0.0),
            ..OverlayConfig::default()
        };
        let overlay = TransitionOverlay::mount(&rt, cfg);
        overlay.activate();
        let frame = overlay.frame();
        assert_eq!(frame.lines.len(), 20);
        for (spec, f) in frame.lines {
            assert_eq!(spec.length_px, 0.0);
            assert!(f.opacity.is_finite() && f.scale_x.is_finite());
        }
    }

    #[test]
    fn streak_cycle_shape() {
        let line = LineSpec {
            x_pct: 10.0,
            y_pct: 10.0,
            angle_deg: 0.0,
            length_px: 80.0,
            start_offset: Duration::from_millis(100),
        };
        assert_eq!(line.frame_at(Duration::from_millis(50)).opacity, 0.0);
        let start = line.frame_at(Duration::from_millis(100));
        assert_eq!(start.translate_x, 100.0);
        assert_eq!(start.scale_x, 1.0);
        let end = line.frame_at(Duration::from_millis(600));
        assert!((end.translate_x - 300.0).abs() < 1e-3);
        assert_eq!(line.frame_at(Duration::from_millis(650)).translate_x, -100.0);
    }

    #[test]
    fn teardown_cancels_pending_close() {
        let (_clock, rt) = setup();
        let overlay = TransitionOverlay::mount(&rt, OverlayConfig::default());
        overlay.activate();
        assert_eq!(rt.pending_timers(), 1);
        overlay.teardown();
        assert_eq!(rt.pending_timers(), 0);
        assert!(!overlay.is_active());
    }

    #[test]
    fn activate_after_teardown_does_nothing() {
        let (_clock, rt) = setup();
        let overlay = TransitionOverlay::mount(&rt, OverlayConfig::default());
        overlay.teardown();
        overlay.activate();
        assert!(!overlay.is_active());
        assert!(overlay.lines().is_empty());
        assert_eq!(overlay.activations(), 0);
        assert_eq!(rt.pending_timers(), 0);
    }
}
