//! Typing effect: reveals a string one grapheme at a time.
//!
//! After `start_delay` the engine emits every prefix from the empty string to
//! the full text, `per_char_delay` apart, with no wait after the last one.
//! Emissions go through a `Signal<String>`, so observers see each prefix in
//! strictly increasing length. The cursor blinks on its own 0.8s cycle.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use inkfolio_core::{Dispose, Runtime, Signal, Subscription, TimerId, effect, on_unmount, signal};
use unicode_segmentation::UnicodeSegmentation;
use web_time::Duration;

/// Full visible + hidden cursor cycle.
pub const CURSOR_PERIOD: Duration = Duration::from_millis(800);
pub const DEFAULT_PER_CHAR_DELAY: Duration = Duration::from_millis(50);

#[derive(Clone, Debug, PartialEq)]
pub struct TypewriterProps {
    pub text: String,
    pub start_delay: Duration,
    pub per_char_delay: Duration,
    pub cursor: bool,
}

impl TypewriterProps {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start_delay: Duration::ZERO,
            per_char_delay: DEFAULT_PER_CHAR_DELAY,
            cursor: true,
        }
    }

    pub fn delay(mut self, d: Duration) -> Self {
        self.start_delay = d;
        self
    }

    pub fn speed(mut self, per_char: Duration) -> Self {
        self.per_char_delay = per_char;
        self
    }

    pub fn cursor(mut self, on: bool) -> Self {
        self.cursor = on;
        self
    }

    fn same_session(&self, other: &TypewriterProps) -> bool {
        self.text == other.text
            && self.start_delay == other.start_delay
            && self.per_char_delay == other.per_char_delay
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypingPhase {
    /// Waiting out the start delay.
    Idle,
    Running,
    Complete,
}

/// One run over a text. `revealed` counts graphemes and never exceeds `len()`.
#[derive(Clone, Debug)]
pub struct TypingSession {
    source: String,
    /// Byte offset of every grapheme boundary, starting at 0.
    bounds: Vec<usize>,
    revealed: usize,
    phase: TypingPhase,
}

impl TypingSession {
    pub fn new(source: &str) -> Self {
        let mut bounds = Vec::with_capacity(source.len() + 1);
        bounds.push(0);
        bounds.extend(
            source
                .grapheme_indices(true)
                .map(|(i, g)| i + g.len()),
        );
        Self {
            source: source.to_string(),
            bounds,
            revealed: 0,
            phase: TypingPhase::Idle,
        }
    }

    pub fn len(&self) -> usize {
        self.bounds.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn phase(&self) -> TypingPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == TypingPhase::Complete
    }

    pub fn prefix(&self) -> &str {
        &self.source[..self.bounds[self.revealed]]
    }

    fn reveal(&mut self, n: usize) {
        self.revealed = n.min(self.len());
        self.phase = if self.revealed == self.len() {
            TypingPhase::Complete
        } else {
            TypingPhase::Running
        };
    }
}

struct TypingState {
    props: TypewriterProps,
    session: TypingSession,
    /// Bumped on every restart; stale callbacks compare and bail.
    generation: u64,
    pending: Option<TimerId>,
    blink: Option<TimerId>,
    cursor_visible: bool,
    torn_down: bool,
}

/// Mounted typing effect. Dropping the handle or disposing the scope it was
/// mounted in cancels every pending timer.
pub struct Typewriter {
    rt: Runtime,
    state: Rc<RefCell<TypingState>>,
    output: Signal<String>,
    dispose: Dispose,
}

impl Typewriter {
    pub fn mount(rt: &Runtime, props: TypewriterProps) -> Self {
        let state = Rc::new(RefCell::new(TypingState {
            session: TypingSession::new(&props.text),
            props,
            generation: 0,
            pending: None,
            blink: None,
            cursor_visible: true,
            torn_down: false,
        }));
        let output = signal(String::new());

        let dispose = {
            let rt = rt.clone();
            let weak = Rc::downgrade(&state);
            effect(move || on_unmount(move || teardown(&rt, &weak)))
        };

        let tw = Self {
            rt: rt.clone(),
            state,
            output,
            dispose,
        };
        tw.start_session();
        if tw.state.borrow().props.cursor {
            tw.start_blink();
        }
        tw
    }

    /// Applies new props. A change to text, delay or speed restarts from the
    /// empty prefix; toggling the cursor only starts/stops the blink.
    pub fn set_props(&self, props: TypewriterProps) {
        let (restart, cursor_changed) = {
            let st = self.state.borrow();
            if st.torn_down {
                return;
            }
            (
                !st.props.same_session(&props),
                st.props.cursor != props.cursor,
            )
        };
        self.state.borrow_mut().props = props;

        if restart {
            self.start_session();
        }
        if cursor_changed {
            if self.state.borrow().props.cursor {
                self.start_blink();
            } else {
                self.stop_blink();
            }
        }
    }

    pub fn props(&self) -> TypewriterProps {
        self.state.borrow().props.clone()
    }

    fn start_session(&self) {
        let (generation, delay) = {
            let mut st = self.state.borrow_mut();
            if let Some(id) = st.pending.take() {
                self.rt.cancel(id);
            }
            st.generation += 1;
            st.session = TypingSession::new(&st.props.text);
            log::debug!(
                "typewriter: session {} for {} graphemes",
                st.generation,
                st.session.len()
            );
            (st.generation, st.props.start_delay)
        };

        let rt = self.rt.clone();
        let weak = Rc::downgrade(&self.state);
        let out = self.output.clone();
        let id = self
            .rt
            .set_timeout(delay, move || emit(&rt, &weak, &out, generation, 0));
        self.state.borrow_mut().pending = Some(id);
    }

    fn start_blink(&self) {
        self.stop_blink();
        let half = CURSOR_PERIOD / 2;
        let weak = Rc::downgrade(&self.state);
        let id = self.rt.set_interval(half, move || {
            if let Some(st) = weak.upgrade() {
                let mut st = st.borrow_mut();
                if !st.torn_down {
                    st.cursor_visible = !st.cursor_visible;
                }
            }
        });
        let mut st = self.state.borrow_mut();
        st.cursor_visible = true;
        st.blink = Some(id);
    }

    fn stop_blink(&self) {
        let id = self.state.borrow_mut().blink.take();
        if let Some(id) = id {
            self.rt.cancel(id);
        }
    }

    /// Current prefix.
    pub fn text(&self) -> String {
        self.state.borrow().session.prefix().to_string()
    }

    pub fn revealed(&self) -> usize {
        self.state.borrow().session.revealed()
    }

    pub fn phase(&self) -> TypingPhase {
        self.state.borrow().session.phase()
    }

    pub fn is_complete(&self) -> bool {
        self.state.borrow().session.is_complete()
    }

    /// `None` when the cursor is disabled.
    pub fn cursor_visible(&self) -> Option<bool> {
        let st = self.state.borrow();
        st.props.cursor.then_some(st.cursor_visible && !st.torn_down)
    }

    /// Text as drawn: the prefix plus `|` while the cursor is showing.
    pub fn display(&self) -> String {
        let mut s = self.text();
        if self.cursor_visible() == Some(true) {
            s.push('|');
        }
        s
    }

    /// Observes every emitted prefix.
    pub fn on_emit(&self, f: impl Fn(&String) + 'static) -> Subscription {
        self.output.watch(f)
    }

    pub fn is_torn_down(&self) -> bool {
        self.state.borrow().torn_down
    }

    pub fn teardown(&self) {
        self.dispose.run();
    }
}

impl Drop for Typewriter {
    fn drop(&mut self) {
        self.dispose.run();
    }
}

fn emit(
    rt: &Runtime,
    weak: &Weak<RefCell<TypingState>>,
    out: &Signal<String>,
    generation: u64,
    n: usize,
) {
    let Some(state) = weak.upgrade() else {
        return;
    };
    let (prefix, next_delay) = {
        let mut st = state.borrow_mut();
        if st.torn_down || st.generation != generation {
            return;
        }
        st.pending = None;
        st.session.reveal(n);
        let next = (!st.session.is_complete()).then_some(st.props.per_char_delay);
        (st.session.prefix().to_string(), next)
    };

    out.set(prefix);

    if let Some(delay) = next_delay {
        let rt2 = rt.clone();
        let weak2 = weak.clone();
        let out2 = out.clone();
        let id = rt.set_timeout(delay, move || {
            emit(&rt2, &weak2, &out2, generation, n + 1)
        });
        let mut st = state.borrow_mut();
        if st.torn_down || st.generation != generation {
            rt.cancel(id);
        } else {
            st.pending = Some(id);
        }
    }
}

fn teardown(rt: &Runtime, weak: &Weak<RefCell<TypingState>>) {
    let Some(state) = weak.upgrade() else {
        return;
    };
    let mut st = state.borrow_mut();
    if st.torn_down {
        return;
    }
    st.torn_down = true;
    if let Some(id) = st.pending.take() {
        rt.cancel(id);
    }
    if let Some(id) = st.blink.take() {
        rt.cancel(id);
    }
    log::debug!(
        "typewriter: torn down at {}/{} graphemes",
        st.session.revealed(),
        st.session.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkfolio_core::{DEFAULT_VIEWPORT, ManualClock, Scope};
    use web_time::Instant;

    fn setup() -> (ManualClock, Runtime) {
        let clock = ManualClock::new();
        let rt = Runtime::with_options(clock.shared(), DEFAULT_VIEWPORT, Some(1));
        (clock, rt)
    }

    fn record(tw: &Typewriter, rt: &Runtime, t0: Instant) -> (Rc<RefCell<Vec<(String, Duration)>>>, Subscription) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        let rt = rt.clone();
        let sub = tw.on_emit(move |p| l.borrow_mut().push((p.clone(), rt.now() - t0)));
        (log, sub)
    }

    #[test]
    fn emits_every_prefix_in_order() {
        let (clock, rt) = setup();
        let t0 = rt.now();
        let tw = Typewriter::mount(&rt, TypewriterProps::new("Bienvenue").cursor(false));
        let (log, _sub) = record(&tw, &rt, t0);

        rt.advance(&clock, Duration::from_secs(2));

        let lens: Vec<usize> = log.borrow().iter().map(|(p, _)| p.chars().count()).collect();
        assert_eq!(lens, (0..=9).collect::<Vec<_>>());
        assert!(tw.is_complete());
        assert_eq!(rt.pending_timers(), 0);
    }

    #[test]
    fn emission_timestamps_follow_delays() {
        let (clock, rt) = setup();
        let t0 = rt.now();
        let tw = Typewriter::mount(
            &rt,
            TypewriterProps::new("hi")
                .delay(Duration::from_millis(500))
                .speed(Duration::from_millis(30))
                .cursor(false),
        );
        let (log, _sub) = record(&tw, &rt, t0);

        rt.advance(&clock, Duration::from_secs(1));

        let got: Vec<(String, u128)> = log
            .borrow()
            .iter()
            .map(|(p, t)| (p.clone(), t.as_millis()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("".to_string(), 500),
                ("h".to_string(), 530),
                ("hi".to_string(), 560)
            ]
        );
    }

    #[test]
    fn empty_text_emits_once() {
        let (clock, rt) = setup();
        let t0 = rt.now();
        let tw = Typewriter::mount(
            &rt,
            TypewriterProps::new("").delay(Duration::from_millis(200)).cursor(false),
        );
        let (log, _sub) = record(&tw, &rt, t0);

        rt.advance(&clock, Duration::from_secs(5));
        assert_eq!(*log.borrow(), vec![(String::new(), Duration::from_millis(200))]);
        assert!(tw.is_complete());
    }

    #[test]
    fn teardown_stops_all_emissions() {
        let (clock, rt) = setup();
        let t0 = rt.now();
        let tw = Typewriter::mount(&rt, TypewriterProps::new("portfolio"));
        let (log, _sub) = record(&tw, &rt, t0);

        rt.advance(&clock, Duration::from_millis(120));
        let before = log.borrow().len();
        let revealed = tw.revealed();

        tw.teardown();
        assert_eq!(rt.pending_timers(), 0);

        rt.advance(&clock, Duration::from_secs(3));
        assert_eq!(log.borrow().len(), before);
        assert_eq!(tw.revealed(), revealed);
        assert_eq!(tw.cursor_visible(), Some(false));
    }

    #[test]
    fn scope_dispose_tears_down() {
        let (clock, rt) = setup();
        let scope = Scope::new();
        let tw = scope.run(|| Typewriter::mount(&rt, TypewriterProps::new("abc")));
        scope.dispose();

        assert!(tw.is_torn_down());
        rt.advance(&clock, Duration::from_secs(1));
        assert_eq!(tw.revealed(), 0);
    }

    #[test]
    fn dropping_handle_cancels_timers() {
        let (_clock, rt) = setup();
        let tw = Typewriter::mount(&rt, TypewriterProps::new("abc"));
        assert_eq!(rt.pending_timers(), 2);
        drop(tw);
        assert_eq!(rt.pending_timers(), 0);
    }

    #[test]
    fn changing_text_restarts_from_empty() {
        let (clock, rt) = setup();
        let t0 = rt.now();
        let tw = Typewriter::mount(
            &rt,
            TypewriterProps::new("abcdef").speed(Duration::from_millis(10)).cursor(false),
        );
        rt.advance(&clock, Duration::from_millis(25));
        assert_eq!(tw.text(), "ab");

        let (log, _sub) = record(&tw, &rt, t0);
        tw.set_props(TypewriterProps::new("xy").speed(Duration::from_millis(10)).cursor(false));
        assert_eq!(tw.revealed(), 0);

        rt.advance(&clock, Duration::from_millis(100));
        let prefixes: Vec<String> = log.borrow().iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(prefixes, vec!["", "x", "xy"]);
    }

    #[test]
    fn cursor_blinks_on_a_fixed_cycle() {
        let (clock, rt) = setup();
        let tw = Typewriter::mount(&rt, TypewriterProps::new(""));
        assert_eq!(tw.cursor_visible(), Some(true));

        rt.advance(&clock, Duration::from_millis(400));
        assert_eq!(tw.cursor_visible(), Some(false));
        rt.advance(&clock, Duration::from_millis(400));
        assert_eq!(tw.cursor_visible(), Some(true));
        assert_eq!(tw.display(), "|");
    }

    #[test]
    fn graphemes_are_revealed_whole() {
        let (clock, rt) = setup();
        let tw = Typewriter::mount(
            &rt,
            TypewriterProps::new("Où\u{0301}").speed(Duration::from_millis(10)).cursor(false),
        );
        rt.advance(&clock, Duration::from_millis(10));
        assert_eq!(tw.text(), "O");
        rt.advance(&clock, Duration::from_millis(10));
        assert_eq!(tw.text(), "Où\u{0301}");
        assert!(tw.is_complete());
    }
}
