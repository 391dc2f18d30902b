//! Cooperative timer queue.
//!
//! Timers never run on their own: whoever owns the event loop calls
//! `fire_due(now)` (or `Runtime::advance` with a manual clock). Entries fire in
//! `(due, insertion order)`; callbacks may schedule or cancel timers while the
//! queue is draining.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use web_time::{Duration, Instant};

new_key_type! {
    pub struct TimerId;
}

/// Shortest allowed repeat period; a zero period would spin forever.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

enum Task {
    Once(Box<dyn FnOnce()>),
    Every { period: Duration, f: Rc<dyn Fn()> },
}

struct Entry {
    due: Instant,
    seq: u64,
    task: Task,
}

#[derive(Default)]
pub(crate) struct TimerQueue {
    entries: SlotMap<TimerId, Entry>,
    next_seq: u64,
}

impl TimerQueue {
    fn seq(&mut self) -> u64 {
        let s = self.next_seq;
        self.next_seq += 1;
        s
    }

    pub(crate) fn schedule_once(&mut self, due: Instant, f: Box<dyn FnOnce()>) -> TimerId {
        let seq = self.seq();
        self.entries.insert(Entry {
            due,
            seq,
            task: Task::Once(f),
        })
    }

    pub(crate) fn schedule_every(
        &mut self,
        first_due: Instant,
        period: Duration,
        f: Rc<dyn Fn()>,
    ) -> TimerId {
        let period = if period < MIN_PERIOD {
            log::warn!("interval period {period:?} below minimum; clamping to {MIN_PERIOD:?}");
            MIN_PERIOD
        } else {
            period
        };
        let seq = self.seq();
        self.entries.insert(Entry {
            due: first_due,
            seq,
            task: Task::Every { period, f },
        })
    }

    pub(crate) fn cancel(&mut self, id: TimerId) -> bool {
        self.entries.remove(id).is_some()
    }

    pub(crate) fn is_pending(&self, id: TimerId) -> bool {
        self.entries.contains_key(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn next_due(&self) -> Option<Instant> {
        self.entries.values().map(|e| e.due).min()
    }

    fn earliest_due_by(&self, now: Instant) -> Option<TimerId> {
        self.entries
            .iter()
            .filter(|(_, e)| e.due <= now)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(id, _)| id)
    }
}

pub(crate) enum Fired {
    Once(Box<dyn FnOnce()>),
    Every(Rc<dyn Fn()>),
}

impl Fired {
    pub(crate) fn call(self) {
        match self {
            Fired::Once(f) => f(),
            Fired::Every(f) => f(),
        }
    }
}

/// Pops the next entry due by `now`. Repeating entries are rescheduled one
/// period after their previous due time, keeping cadence under lag.
pub(crate) fn pop_due(queue: &Rc<RefCell<TimerQueue>>, now: Instant) -> Option<(Instant, Fired)> {
    let mut q = queue.borrow_mut();
    let id = q.earliest_due_by(now)?;
    let repeat = match &q.entries[id].task {
        Task::Once(_) => None,
        Task::Every { period, f } => Some((*period, f.clone())),
    };
    match repeat {
        Some((period, f)) => {
            let seq = q.seq();
            let entry = &mut q.entries[id];
            let due = entry.due;
            entry.due = due + period;
            entry.seq = seq;
            Some((due, Fired::Every(f)))
        }
        None => {
            let entry = q.entries.remove(id)?;
            match entry.task {
                Task::Once(f) => Some((entry.due, Fired::Once(f))),
                Task::Every { .. } => None,
            }
        }
    }
}
