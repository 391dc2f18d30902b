//! Spinner and the mount-time gate that shows it.

use std::cell::Cell;
use std::rc::Rc;

use inkfolio_core::{Dispose, Runtime, TimerId, Transform, effect, on_unmount};
use web_time::{Duration, Instant};

pub const SPIN_PERIOD: Duration = Duration::from_millis(1500);
pub const DEFAULT_GATE: Duration = Duration::from_secs(2);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndicatorSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl IndicatorSize {
    pub fn px(self) -> f32 {
        match self {
            IndicatorSize::Small => 16.0,
            IndicatorSize::Medium => 32.0,
            IndicatorSize::Large => 48.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorFrame {
    pub size_px: f32,
    pub transform: Transform,
    /// Drawn fraction of the arc path.
    pub path_length: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct LoadingIndicator {
    size: IndicatorSize,
    started: Instant,
}

impl LoadingIndicator {
    pub fn new(size: IndicatorSize, started: Instant) -> Self {
        Self { size, started }
    }

    pub fn frame(&self, now: Instant) -> IndicatorFrame {
        let elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        let cycle = (elapsed % SPIN_PERIOD.as_secs_f32()) / SPIN_PERIOD.as_secs_f32();
        IndicatorFrame {
            size_px: self.size.px(),
            transform: Transform::identity().rotated(360.0 * cycle),
            path_length: cycle,
        }
    }
}

/// Shows the indicator for a fixed time after mount, then flips to content.
pub struct LoadingGate {
    indicator: LoadingIndicator,
    loading: Rc<Cell<bool>>,
    timer: TimerId,
    dispose: Dispose,
}

impl LoadingGate {
    pub fn mount(rt: &Runtime, duration: Duration, size: IndicatorSize) -> Self {
        Self::mount_then(rt, duration, size, || {})
    }

    /// Like `mount`, running `on_ready` when the gate opens.
    pub fn mount_then(
        rt: &Runtime,
        duration: Duration,
        size: IndicatorSize,
        on_ready: impl FnOnce() + 'static,
    ) -> Self {
        let loading = Rc::new(Cell::new(true));
        let timer = {
            let loading = Rc::downgrade(&loading);
            rt.set_timeout(duration, move || {
                if let Some(flag) = loading.upgrade() {
                    flag.set(false);
                    log::debug!("loading gate: content revealed");
                    on_ready();
                }
            })
        };
        let dispose = {
            let rt = rt.clone();
            effect(move || on_unmount(move || {
                rt.cancel(timer);
            }))
        };
        Self {
            indicator: LoadingIndicator::new(size, rt.now()),
            loading,
            timer,
            dispose,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn timer(&self) -> TimerId {
        self.timer
    }

    /// Indicator frame while loading, `None` once content is shown.
    pub fn frame(&self, now: Instant) -> Option<IndicatorFrame> {
        self.is_loading().then(|| self.indicator.frame(now))
    }

    pub fn teardown(&self) {
        self.dispose.run();
    }
}

impl Drop for LoadingGate {
    fn drop(&mut self) {
        self.dispose.run();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkfolio_core::{DEFAULT_VIEWPORT, ManualClock, Scope};

    #[test]
    fn indicator_loops_every_period() {
        let t0 = Instant::now();
        let ind = LoadingIndicator::new(IndicatorSize::Large, t0);
        let a = ind.frame(t0);
        assert_eq!(a.size_px, 48.0);
        assert_eq!(a.transform.rotate_deg, 0.0);
        assert_eq!(a.path_length, 0.0);

        let half = ind.frame(t0 + Duration::from_millis(750));
        assert!((half.transform.rotate_deg - 180.0).abs() < 1e-3);
        assert!((half.path_length - 0.5).abs() < 1e-4);

        let wrapped = ind.frame(t0 + Duration::from_millis(1500));
        assert!(wrapped.path_length < 1e-4);
    }

    #[test]
    fn gate_opens_after_duration() {
        let clock = ManualClock::new();
        let rt = Runtime::with_options(clock.shared(), DEFAULT_VIEWPORT, Some(0));
        let gate = LoadingGate::mount(&rt, DEFAULT_GATE, IndicatorSize::Medium);
        assert!(gate.is_loading());
        assert!(gate.frame(rt.now()).is_some());

        rt.advance(&clock, Duration::from_millis(1999));
        assert!(gate.is_loading());
        rt.advance(&clock, Duration::from_millis(1));
        assert!(!gate.is_loading());
        assert!(gate.frame(rt.now()).is_none());
    }

    #[test]
    fn ready_callback_runs_once_open() {
        let clock = ManualClock::new();
        let rt = Runtime::with_options(clock.shared(), DEFAULT_VIEWPORT, Some(0));
        let ready = Rc::new(Cell::new(0));
        let r = ready.clone();
        let _gate = LoadingGate::mount_then(&rt, Duration::from_millis(500), IndicatorSize::Small, move || {
            r.set(r.get() + 1)
        });
        rt.advance(&clock, Duration::from_secs(3));
        assert_eq!(ready.get(), 1);
    }

    #[test]
    fn disposed_gate_never_fires() {
        let clock = ManualClock::new();
        let rt = Runtime::with_options(clock.shared(), DEFAULT_VIEWPORT, Some(0));
        let scope = Scope::new();
        let gate = scope.run(|| LoadingGate::mount(&rt, DEFAULT_GATE, IndicatorSize::Small));
        scope.dispose();
        assert!(!rt.is_pending(gate.timer()));
        rt.advance(&clock, Duration::from_secs(5));
        assert!(gate.is_loading());
    }
}
