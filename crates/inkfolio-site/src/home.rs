//! Landing page.
//!
//! Shows a loading indicator first; the hero (typed title and tagline, three
//! call-to-action buttons with ink bursts, floating shapes) mounts when the
//! loading gate opens, inside the page's scope. The parallax background
//! listens from mount.

use std::cell::RefCell;
use std::rc::Rc;

use inkfolio_core::{Rect, Runtime, Size, Transform, current_scope};
use inkfolio_fx::{
    BurstConfig, FloatingShapes, HoverBurst, IndicatorFrame, IndicatorSize, LoadingGate,
    ParallaxBackground, ParallaxConfig, ParticleFrame, ShapeSpec, Stagger, Tint, Typewriter,
    TypewriterProps,
};
use inkfolio_navigation::Route;
use smallvec::SmallVec;
use web_time::{Duration, Instant};

pub const TITLE: &str = "Bienvenue sur Mon Canvas";
pub const TAGLINE: &str =
    "Où la tradition rencontre l'innovation à travers le prisme de l'esthétique anime";
pub const INTRO: &str = "Passionné(e) par l'art japonais et le développement web, je crée des expériences numériques uniques qui marient l'élégance traditionnelle à l'innovation moderne. Chaque projet est une nouvelle histoire à raconter, une nouvelle scène à animer.";

const BUTTON_SIZE: Size = Size {
    width: 180.0,
    height: 48.0,
};
const BUTTON_GAP: f32 = 24.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallToAction {
    pub label: &'static str,
    pub target: Route,
    pub tint: Tint,
}

pub const CALLS_TO_ACTION: [CallToAction; 3] = [
    CallToAction {
        label: "About Me",
        target: Route::About,
        tint: Tint::Pink,
    },
    CallToAction {
        label: "View Projects",
        target: Route::Projects,
        tint: Tint::Blue,
    },
    CallToAction {
        label: "Contact",
        target: Route::Contact,
        tint: Tint::Purple,
    },
];

/// Button row centered at three quarters of the viewport height.
pub fn button_rect(viewport: Size, index: usize) -> Rect {
    let n = CALLS_TO_ACTION.len() as f32;
    let row_w = n * BUTTON_SIZE.width + (n - 1.0) * BUTTON_GAP;
    let x0 = (viewport.width - row_w) / 2.0;
    Rect {
        x: x0 + index as f32 * (BUTTON_SIZE.width + BUTTON_GAP),
        y: viewport.height * 0.75,
        w: BUTTON_SIZE.width,
        h: BUTTON_SIZE.height,
    }
}

#[derive(Clone, Copy, Debug)]
pub struct HomeTiming {
    pub loading: Duration,
    pub per_char: Duration,
    pub cursor: bool,
}

impl Default for HomeTiming {
    fn default() -> Self {
        Self {
            loading: Duration::from_secs(2),
            per_char: Duration::from_millis(50),
            cursor: true,
        }
    }
}

struct Hero {
    shown_at: Instant,
    title: Typewriter,
    tagline: Typewriter,
    bursts: Vec<HoverBurst>,
    shapes: FloatingShapes,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeroFrame {
    pub title: String,
    pub tagline: String,
    /// Entrance progress of the title block, intro, and button row.
    pub items: [f32; 3],
    pub bursts: Vec<SmallVec<[ParticleFrame; 4]>>,
    pub shapes: Vec<(ShapeSpec, Transform)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HomeFrame {
    pub loading: Option<IndicatorFrame>,
    pub background: Transform,
    pub hero: Option<HeroFrame>,
}

pub struct HomePage {
    rt: Runtime,
    gate: LoadingGate,
    parallax: ParallaxBackground,
    hero: Rc<RefCell<Option<Hero>>>,
    hovered: RefCell<Option<Route>>,
}

impl HomePage {
    pub fn mount(rt: &Runtime, timing: HomeTiming, burst: BurstConfig, parallax: ParallaxConfig) -> Self {
        let hero = Rc::new(RefCell::new(None));
        let scope = current_scope();
        let gate = {
            let rt2 = rt.clone();
            let slot = Rc::downgrade(&hero);
            LoadingGate::mount_then(rt, timing.loading, IndicatorSize::Large, move || {
                let Some(slot) = slot.upgrade() else {
                    return;
                };
                let build = || mount_hero(&rt2, timing, &burst);
                let h = match &scope {
                    Some(s) => s.run(build),
                    None => build(),
                };
                *slot.borrow_mut() = Some(h);
            })
        };
        Self {
            rt: rt.clone(),
            gate,
            parallax: ParallaxBackground::mount(rt, parallax),
            hero,
            hovered: RefCell::new(None),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.gate.is_loading()
    }

    pub fn has_hero(&self) -> bool {
        self.hero.borrow().is_some()
    }

    pub fn title(&self) -> Option<String> {
        self.hero.borrow().as_ref().map(|h| h.title.text())
    }

    pub fn tagline(&self) -> Option<String> {
        self.hero.borrow().as_ref().map(|h| h.tagline.text())
    }

    pub fn parallax(&self) -> &ParallaxBackground {
        &self.parallax
    }

    /// Hover state of the call-to-action buttons; `None` leaves all of them.
    pub fn set_hover(&self, target: Option<Route>) {
        if *self.hovered.borrow() == target {
            return;
        }
        *self.hovered.borrow_mut() = target;
        let now = self.rt.now();
        if let Some(hero) = self.hero.borrow_mut().as_mut() {
            for (cta, burst) in CALLS_TO_ACTION.iter().zip(hero.bursts.iter_mut()) {
                burst.set_active(Some(cta.target) == target, now);
            }
        }
    }

    pub fn hovered(&self) -> Option<Route> {
        *self.hovered.borrow()
    }

    pub fn tick(&self) {
        self.parallax.tick();
    }

    pub fn frame(&self) -> HomeFrame {
        let now = self.rt.now();
        let hero = self.hero.borrow_mut().as_mut().map(|h| {
            let elapsed = now.saturating_duration_since(h.shown_at);
            let stagger = Stagger::hero();
            HeroFrame {
                title: h.title.display(),
                tagline: h.tagline.display(),
                items: [0, 1, 2].map(|i| stagger.progress(i, elapsed)),
                bursts: h.bursts.iter_mut().map(|b| b.frame(now)).collect(),
                shapes: h.shapes.frame(elapsed),
            }
        });
        HomeFrame {
            loading: self.gate.frame(now),
            background: self.parallax.transform(),
            hero,
        }
    }
}

fn mount_hero(rt: &Runtime, timing: HomeTiming, burst: &BurstConfig) -> Hero {
    log::debug!("home: hero mounted");
    let mut rng = rt.rng();
    Hero {
        shown_at: rt.now(),
        title: Typewriter::mount(
            rt,
            TypewriterProps::new(TITLE)
                .delay(Duration::from_millis(500))
                .speed(timing.per_char)
                .cursor(timing.cursor),
        ),
        tagline: Typewriter::mount(
            rt,
            TypewriterProps::new(TAGLINE)
                .delay(Duration::from_secs(2))
                .speed(Duration::from_millis(30))
                .cursor(timing.cursor),
        ),
        bursts: CALLS_TO_ACTION
            .iter()
            .map(|_| HoverBurst::new(&mut rng, burst))
            .collect(),
        shapes: FloatingShapes::new(&mut rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkfolio_core::{DEFAULT_VIEWPORT, ManualClock, Scope};

    fn setup() -> (ManualClock, Runtime) {
        let clock = ManualClock::new();
        let rt = Runtime::with_options(clock.shared(), DEFAULT_VIEWPORT, Some(12));
        (clock, rt)
    }

    fn mount(rt: &Runtime) -> HomePage {
        HomePage::mount(rt, HomeTiming::default(), BurstConfig::default(), ParallaxConfig::default())
    }

    #[test]
    fn hero_waits_for_loading_gate() {
        let (clock, rt) = setup();
        let page = mount(&rt);
        assert!(page.is_loading());
        assert!(!page.has_hero());
        assert!(page.frame().loading.is_some());

        rt.advance(&clock, Duration::from_secs(2));
        assert!(page.has_hero());
        assert!(page.frame().loading.is_none());

        // title starts 0.5s after the hero shows, one grapheme per 50ms
        rt.advance(&clock, Duration::from_millis(500 + 50 * 9));
        assert_eq!(page.title().as_deref(), Some("Bienvenue"));

        rt.advance(&clock, Duration::from_secs(10));
        assert_eq!(page.title().as_deref(), Some(TITLE));
        assert_eq!(page.tagline().as_deref(), Some(TAGLINE));
    }

    #[test]
    fn hover_drives_only_the_matching_burst() {
        let (clock, rt) = setup();
        let page = mount(&rt);
        rt.advance(&clock, Duration::from_secs(2));
        page.set_hover(Some(Route::Projects));
        rt.advance(&clock, Duration::from_millis(300));

        let hero = page.frame().hero.unwrap();
        assert!(hero.bursts[0].iter().all(|p| p.opacity == 0.0));
        assert!(hero.bursts[1].iter().any(|p| p.opacity > 0.0));
        assert_eq!(hero.bursts[1].len(), 3);
    }

    #[test]
    fn scope_dispose_stops_gate_and_parallax() {
        let (clock, rt) = setup();
        let scope = Scope::new();
        let page = scope.run(|| mount(&rt));
        scope.dispose();
        assert_eq!(rt.pending_timers(), 0);
        assert_eq!(rt.input().pointer_listeners(), 0);
        rt.advance(&clock, Duration::from_secs(5));
        assert!(!page.has_hero());
    }

    #[test]
    fn hero_timers_belong_to_the_page_scope() {
        let (clock, rt) = setup();
        let scope = Scope::new();
        let _page = scope.run(|| mount(&rt));
        rt.advance(&clock, Duration::from_millis(2100));
        assert!(rt.pending_timers() > 0);
        scope.dispose();
        assert_eq!(rt.pending_timers(), 0);
    }

    #[test]
    fn buttons_sit_side_by_side() {
        let a = button_rect(DEFAULT_VIEWPORT, 0);
        let b = button_rect(DEFAULT_VIEWPORT, 1);
        assert_eq!(b.x - a.x, BUTTON_SIZE.width + BUTTON_GAP);
        assert_eq!(a.y, 600.0);
    }
}
