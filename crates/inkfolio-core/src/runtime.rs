use std::cell::RefCell;
use std::rc::Rc;

use web_time::{Duration, Instant};

use crate::animation::{ManualClock, SharedClock};
use crate::timer::{TimerQueue, pop_due};
use crate::{InputState, Seeded, Size, TimerId, effect, on_unmount};

/// Default viewport for headless runs.
pub const DEFAULT_VIEWPORT: Size = Size {
    width: 1280.0,
    height: 800.0,
};

/// Cloneable handle to the single-threaded event loop: clock, timers, input
/// and the root random generator. Clones share everything.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

struct RuntimeInner {
    clock: SharedClock,
    timers: Rc<RefCell<TimerQueue>>,
    input: InputState,
    rng: RefCell<Seeded>,
}

impl Runtime {
    pub fn new(clock: SharedClock) -> Self {
        Self::with_options(clock, DEFAULT_VIEWPORT, None)
    }

    /// `seed: None` seeds from entropy; tests pass a fixed seed.
    pub fn with_options(clock: SharedClock, viewport: Size, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => Seeded::new(s),
            None => Seeded::from_entropy(),
        };
        Self {
            inner: Rc::new(RuntimeInner {
                clock,
                timers: Rc::new(RefCell::new(TimerQueue::default())),
                input: InputState::new(viewport),
                rng: RefCell::new(rng),
            }),
        }
    }

    pub fn now(&self) -> Instant {
        self.inner.clock.now()
    }

    pub fn clock(&self) -> SharedClock {
        self.inner.clock.clone()
    }

    pub fn input(&self) -> &InputState {
        &self.inner.input
    }

    /// Forks a generator off the root one. Call it in the lifecycle hook the
    /// geometry belongs to (creation vs. activation).
    pub fn rng(&self) -> Seeded {
        self.inner.rng.borrow_mut().fork()
    }

    pub fn set_timeout(&self, delay: Duration, f: impl FnOnce() + 'static) -> TimerId {
        let due = self.now() + delay;
        self.inner
            .timers
            .borrow_mut()
            .schedule_once(due, Box::new(f))
    }

    /// Repeats every `period`, first firing one period from now.
    pub fn set_interval(&self, period: Duration, f: impl Fn() + 'static) -> TimerId {
        let due = self.now() + period;
        self.inner
            .timers
            .borrow_mut()
            .schedule_every(due, period, Rc::new(f))
    }

    /// `set_timeout` whose cancellation is registered with the current scope.
    pub fn scoped_timeout(&self, delay: Duration, f: impl FnOnce() + 'static) -> TimerId {
        let id = self.set_timeout(delay, f);
        let rt = self.clone();
        effect(move || on_unmount(move || {
            rt.cancel(id);
        }));
        id
    }

    pub fn cancel(&self, id: TimerId) -> bool {
        let removed = self.inner.timers.borrow_mut().cancel(id);
        if removed {
            log::trace!("timer {id:?} cancelled");
        }
        removed
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.inner.timers.borrow().is_pending(id)
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.timers.borrow().len()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.inner.timers.borrow().next_due()
    }

    /// Fires every timer due at the clock's current time, including ones
    /// scheduled by callbacks during this call. Returns how many fired.
    pub fn fire_due(&self) -> usize {
        let now = self.now();
        let mut fired = 0;
        while let Some((_, task)) = pop_due(&self.inner.timers, now) {
            task.call();
            fired += 1;
        }
        fired
    }

    /// Moves `clock` forward by `by`, stopping at each due instant so every
    /// callback observes its exact scheduled time.
    pub fn advance(&self, clock: &ManualClock, by: Duration) -> usize {
        let target = self.now() + by;
        let mut fired = 0;
        loop {
            match self.next_due() {
                Some(due) if due <= target => {
                    clock.set(due);
                    let n = self.fire_due();
                    if n == 0 {
                        log::warn!("advance: runtime is not driven by the given clock");
                        break;
                    }
                    fired += n;
                }
                _ => break,
            }
        }
        clock.set(target);
        fired
    }
}
