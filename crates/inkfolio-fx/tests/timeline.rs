use inkfolio_core::{DEFAULT_VIEWPORT, ManualClock, Runtime, Scope};
use inkfolio_fx::{OverlayConfig, TransitionOverlay, Typewriter, TypewriterProps};
use web_time::Duration;

fn runtime(seed: u64) -> (ManualClock, Runtime) {
    let clock = ManualClock::new();
    let rt = Runtime::with_options(clock.shared(), DEFAULT_VIEWPORT, Some(seed));
    (clock, rt)
}

#[test]
fn typed_text_with_cursor() {
    let (clock, rt) = runtime(1);
    let tw = Typewriter::mount(&rt, TypewriterProps::new("Hi!"));

    let mut frames = Vec::new();
    let mut at = 0;
    for ms in [0u64, 50, 100, 150, 400, 800] {
        rt.advance(&clock, Duration::from_millis(ms - at));
        at = ms;
        frames.push(format!("t={ms} {}", tw.display()));
    }

    insta::assert_snapshot!(frames.join("\n"), @r"
    t=0 |
    t=50 H|
    t=100 Hi|
    t=150 Hi!|
    t=400 Hi!
    t=800 Hi!|
    ");
}

#[test]
fn page_scope_owns_every_effect_timer() {
    let (clock, rt) = runtime(2);
    let page = Scope::new();
    let (tw, overlay) = page.run(|| {
        let tw = Typewriter::mount(&rt, TypewriterProps::new("Welcome").delay(Duration::from_millis(500)));
        let overlay = TransitionOverlay::mount(&rt, OverlayConfig::default());
        overlay.activate();
        (tw, overlay)
    });
    rt.advance(&clock, Duration::from_millis(100));
    assert_eq!(rt.pending_timers(), 3);

    page.dispose();
    assert_eq!(rt.pending_timers(), 0);
    rt.advance(&clock, Duration::from_secs(10));
    assert_eq!(tw.text(), "");
    assert!(!overlay.is_active());
}
