//! The page shell: navigation bar, transition overlay and the mounted page.
//!
//! The overlay lives for the whole session in the shell's root scope. Pages
//! mount inside their back-stack entry's scope, so navigating away cancels
//! everything the old page started before the new one mounts.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt::Write as _;

use inkfolio_core::{AnimationSpec, Rect, Runtime, Scope, Size, Vec2};
use inkfolio_fx::{OverlayFrame, ScrollLinesFrame, TransitionOverlay};
use inkfolio_navigation::{NavItem, NavTransition, Navigator, Route, nav_items};
use web_time::Instant;

use crate::about::{AboutFrame, AboutPage, CV_PATH, cv_link_rect};
use crate::config::SiteConfig;
use crate::contact::{ContactPage, Field, FieldError, FormData, SubmitError, SubmitPhase};
use crate::home::{CALLS_TO_ACTION, HomeFrame, HomePage, HomeTiming, button_rect};
use crate::projects::{CardFrame, Category, ProjectsPage, card_rect, chip_rect};

const NAV_HEIGHT: f32 = 64.0;
const NAV_ITEM: Size = Size {
    width: 120.0,
    height: 40.0,
};
/// The bar slides down from this offset when the site first shows.
const NAV_ENTER_Y: f32 = -100.0;

pub fn nav_item_rect(viewport: Size, index: usize) -> Rect {
    let n = Route::ALL.len();
    let right = viewport.width - 24.0;
    let slot = NAV_ITEM.width + 8.0;
    Rect {
        x: right - (n - index) as f32 * slot,
        y: (NAV_HEIGHT - NAV_ITEM.height) / 2.0,
        w: NAV_ITEM.width,
        h: NAV_ITEM.height,
    }
}

pub enum Page {
    Home(HomePage),
    About(AboutPage),
    Projects(ProjectsPage),
    Contact(ContactPage),
}

impl Page {
    pub fn route(&self) -> Route {
        match self {
            Page::Home(_) => Route::Home,
            Page::About(_) => Route::About,
            Page::Projects(_) => Route::Projects,
            Page::Contact(_) => Route::Contact,
        }
    }

    fn tick(&self) {
        match self {
            Page::Home(p) => p.tick(),
            Page::About(p) => p.tick(),
            Page::Projects(p) => p.tick(),
            Page::Contact(p) => p.tick(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    NavItem(Route),
    HomeButton(Route),
    Category(Category),
    ProjectCard(&'static str),
    /// Everything behind an open project detail.
    Backdrop,
    CvLink,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRegion {
    pub rect: Rect,
    pub target: HitTarget,
}

/// Top-most region under `pos`; later regions are drawn above earlier ones.
pub fn top_hit(regions: &[HitRegion], pos: Vec2) -> Option<HitTarget> {
    regions
        .iter()
        .rev()
        .find(|h| h.rect.contains(pos))
        .map(|h| h.target)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickAction {
    Navigated(Route),
    Selected(&'static str),
    Deselected,
    CategoryChosen(Category),
    Download(&'static str),
    None,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContactFrame {
    pub values: FormData,
    pub errors: BTreeMap<Field, FieldError>,
    pub phase: SubmitPhase,
    pub lines: ScrollLinesFrame,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectsFrame {
    pub category: Category,
    pub cards: Vec<CardFrame>,
    pub selected: Option<&'static str>,
    pub lines: ScrollLinesFrame,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PageFrame {
    Home(HomeFrame),
    About(AboutFrame, ScrollLinesFrame),
    Projects(ProjectsFrame),
    Contact(ContactFrame),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShellFrame {
    pub route: Route,
    pub nav_y: f32,
    pub nav: Vec<NavItem>,
    /// `(translate_x, alpha)` of the page content.
    pub page_offset: (f32, f32),
    pub overlay: OverlayFrame,
    pub page: Option<PageFrame>,
}

pub struct PageShell {
    rt: Runtime,
    cfg: SiteConfig,
    nav: Navigator<Route>,
    root: Scope,
    overlay: TransitionOverlay,
    transition: NavTransition,
    page: RefCell<Option<Page>>,
    started_at: Instant,
    shown_at: Cell<Instant>,
    hover: Cell<Option<HitTarget>>,
}

impl PageShell {
    /// Mounts the shell showing `start`. The first page gets a transition
    /// window like any other.
    pub fn mount(rt: &Runtime, cfg: SiteConfig, start: Route) -> Self {
        let root = Scope::new();
        let overlay = root.run(|| TransitionOverlay::mount(rt, cfg.overlay()));
        let shell = Self {
            rt: rt.clone(),
            cfg,
            nav: Navigator::new(start),
            root,
            overlay,
            transition: NavTransition::default(),
            page: RefCell::new(None),
            started_at: rt.now(),
            shown_at: Cell::new(rt.now()),
            hover: Cell::new(None),
        };
        shell.show_top();
        shell
    }

    fn mount_page(&self, route: Route) -> Page {
        let rt = &self.rt;
        let cfg = &self.cfg;
        match route {
            Route::Home => {
                let timing = HomeTiming {
                    loading: cfg.loading(),
                    per_char: cfg.per_char_delay(),
                    cursor: cfg.typing.cursor,
                };
                Page::Home(HomePage::mount(rt, timing, cfg.burst(), cfg.parallax()))
            }
            Route::About => Page::About(AboutPage::mount(rt)),
            Route::Projects => Page::Projects(ProjectsPage::mount(rt)),
            Route::Contact => Page::Contact(ContactPage::mount(
                rt,
                cfg.submit_delay(),
                cfg.success_duration(),
            )),
        }
    }

    /// Mounts the top entry's page and opens a transition window.
    fn show_top(&self) {
        drop(self.page.borrow_mut().take());
        let page = self.nav.mount_top(|id, route| {
            log::debug!("shell: mounting {route} (entry {id})");
            self.mount_page(*route)
        });
        *self.page.borrow_mut() = page;
        self.shown_at.set(self.rt.now());
        self.hover.set(None);
        self.overlay.activate();
    }

    /// Follows a link. Returns `false` when `route` is already showing.
    pub fn navigate(&self, route: Route) -> bool {
        if !self.nav.navigate(route) {
            return false;
        }
        log::info!("navigated to {route}");
        self.show_top();
        true
    }

    pub fn navigate_path(&self, path: &str) -> bool {
        self.navigate(Route::from_path(path))
    }

    pub fn back(&self) -> bool {
        if !self.nav.back() {
            return false;
        }
        log::info!("back to {}", self.route());
        self.show_top();
        true
    }

    pub fn route(&self) -> Route {
        self.nav.current().unwrap_or(Route::Home)
    }

    pub fn navigator(&self) -> &Navigator<Route> {
        &self.nav
    }

    pub fn overlay(&self) -> &TransitionOverlay {
        &self.overlay
    }

    pub fn runtime(&self) -> &Runtime {
        &self.rt
    }

    pub fn with_page<R>(&self, f: impl FnOnce(&Page) -> R) -> Option<R> {
        self.page.borrow().as_ref().map(f)
    }

    /// Interactive regions of the current frame, bottom to top.
    pub fn hit_regions(&self) -> Vec<HitRegion> {
        let viewport = self.rt.input().viewport();
        let mut regions = Vec::new();
        let mut backdrop = false;
        if let Some(page) = self.page.borrow().as_ref() {
            match page {
                Page::Home(p) if p.has_hero() => {
                    for (i, cta) in CALLS_TO_ACTION.iter().enumerate() {
                        regions.push(HitRegion {
                            rect: button_rect(viewport, i),
                            target: HitTarget::HomeButton(cta.target),
                        });
                    }
                }
                Page::Home(_) => {}
                Page::About(_) => regions.push(HitRegion {
                    rect: cv_link_rect(viewport),
                    target: HitTarget::CvLink,
                }),
                Page::Projects(p) => {
                    for (i, c) in Category::ALL.into_iter().enumerate() {
                        regions.push(HitRegion {
                            rect: chip_rect(viewport, i),
                            target: HitTarget::Category(c),
                        });
                    }
                    for (i, project) in p.visible().into_iter().enumerate() {
                        regions.push(HitRegion {
                            rect: card_rect(viewport, i),
                            target: HitTarget::ProjectCard(project.id),
                        });
                    }
                    backdrop = p.selected().is_some();
                }
                Page::Contact(_) => {}
            }
        }
        for (i, route) in Route::ALL.into_iter().enumerate() {
            regions.push(HitRegion {
                rect: nav_item_rect(viewport, i),
                target: HitTarget::NavItem(route),
            });
        }
        if backdrop {
            regions.push(HitRegion {
                rect: Rect {
                    x: 0.0,
                    y: 0.0,
                    w: viewport.width,
                    h: viewport.height,
                },
                target: HitTarget::Backdrop,
            });
        }
        regions
    }

    /// Feeds the pointer to the runtime and updates hover state.
    pub fn pointer_moved(&self, pos: Vec2) {
        self.rt.input().pointer_moved(pos);
        let target = top_hit(&self.hit_regions(), pos);
        if self.hover.replace(target) == target {
            return;
        }
        if let Some(page) = self.page.borrow().as_ref() {
            match page {
                Page::Home(p) => p.set_hover(match target {
                    Some(HitTarget::HomeButton(r)) => Some(r),
                    _ => None,
                }),
                Page::Projects(p) => p.set_hover(match target {
                    Some(HitTarget::ProjectCard(id)) => Some(id),
                    _ => None,
                }),
                _ => {}
            }
        }
    }

    pub fn hovered(&self) -> Option<HitTarget> {
        self.hover.get()
    }

    pub fn click(&self, pos: Vec2) -> ClickAction {
        let Some(target) = top_hit(&self.hit_regions(), pos) else {
            return ClickAction::None;
        };
        log::debug!("shell: click on {target:?}");
        match target {
            HitTarget::NavItem(r) | HitTarget::HomeButton(r) => {
                if self.navigate(r) {
                    ClickAction::Navigated(r)
                } else {
                    ClickAction::None
                }
            }
            HitTarget::CvLink => ClickAction::Download(CV_PATH),
            HitTarget::Category(c) => self
                .with_projects(|p| {
                    p.select_category(c);
                    ClickAction::CategoryChosen(c)
                })
                .unwrap_or(ClickAction::None),
            HitTarget::ProjectCard(id) => self
                .with_projects(|p| p.select(id).map(|project| ClickAction::Selected(project.id)))
                .flatten()
                .unwrap_or(ClickAction::None),
            HitTarget::Backdrop => {
                if self.with_projects(|p| p.deselect()).unwrap_or(false) {
                    ClickAction::Deselected
                } else {
                    ClickAction::None
                }
            }
        }
    }

    fn with_projects<R>(&self, f: impl FnOnce(&ProjectsPage) -> R) -> Option<R> {
        match self.page.borrow().as_ref() {
            Some(Page::Projects(p)) => Some(f(p)),
            _ => None,
        }
    }

    fn with_contact<R>(&self, f: impl FnOnce(&ContactPage) -> R) -> Option<R> {
        match self.page.borrow().as_ref() {
            Some(Page::Contact(p)) => Some(f(p)),
            _ => None,
        }
    }

    pub fn scrolled_to(&self, y: f32) {
        self.rt.input().scrolled_to(y);
    }

    /// Edits a contact form field. Returns `false` off the contact page.
    pub fn type_into(&self, field: Field, value: &str) -> bool {
        self.with_contact(|p| p.form().set_field(field, value)).is_some()
    }

    /// Submits the contact form; `None` off the contact page.
    pub fn submit(&self) -> Option<Result<(), SubmitError>> {
        self.with_contact(|p| p.form().submit())
    }

    /// Steps the continuously smoothed values (parallax, scroll springs).
    pub fn tick(&self) {
        if let Some(page) = self.page.borrow().as_ref() {
            page.tick();
        }
    }

    pub fn frame(&self) -> ShellFrame {
        let now = self.rt.now();
        let route = self.route();
        let nav_t = AnimationSpec::page_spring().progress(now.saturating_duration_since(self.started_at));
        let page_offset = self.transition.frame(
            self.nav.stack.last_dir(),
            now.saturating_duration_since(self.shown_at.get()),
        );
        let page = self.page.borrow().as_ref().map(|page| match page {
            Page::Home(p) => PageFrame::Home(p.frame()),
            Page::About(p) => PageFrame::About(p.frame(), p.scroll_lines().frame()),
            Page::Projects(p) => PageFrame::Projects(ProjectsFrame {
                category: p.category(),
                cards: p.cards(),
                selected: p.selected().map(|s| s.id),
                lines: p.scroll_lines().frame(),
            }),
            Page::Contact(p) => PageFrame::Contact(ContactFrame {
                values: p.form().data(),
                errors: p.form().errors(),
                phase: p.form().phase(),
                lines: p.scroll_lines().frame(),
            }),
        });
        ShellFrame {
            route,
            nav_y: NAV_ENTER_Y * (1.0 - nav_t),
            nav: nav_items(route),
            page_offset,
            overlay: self.overlay.frame(),
            page,
        }
    }

    /// One-line-per-layer text summary of the current frame.
    pub fn describe(&self) -> String {
        let f = self.frame();
        let mut out = String::new();
        let _ = writeln!(out, "route {} ({})", f.route, f.route.label());
        let items: Vec<String> = f
            .nav
            .iter()
            .map(|i| {
                if i.active {
                    format!("[{}]", i.label)
                } else {
                    i.label.to_string()
                }
            })
            .collect();
        let _ = writeln!(out, "nav {}", items.join(" | "));
        if f.overlay.active {
            let _ = writeln!(out, "overlay active lines={}", f.overlay.lines.len());
        } else {
            let _ = writeln!(out, "overlay idle");
        }
        let _ = match &f.page {
            None => write!(out, "page -"),
            Some(PageFrame::Home(h)) => match &h.hero {
                None => write!(out, "page home loading"),
                Some(hero) => write!(
                    out,
                    "page home title={:?} tagline={:?}",
                    hero.title, hero.tagline
                ),
            },
            Some(PageFrame::About(a, _)) => {
                let fill: Vec<String> = a.skill_fill.iter().map(|w| format!("{w:.0}")).collect();
                write!(out, "page about skills={}", fill.join("/"))
            }
            Some(PageFrame::Projects(p)) => write!(
                out,
                "page projects filter={} cards={} selected={}",
                p.category.label(),
                p.cards.len(),
                p.selected.unwrap_or("-")
            ),
            Some(PageFrame::Contact(c)) => write!(
                out,
                "page contact phase={:?} errors={}",
                c.phase,
                c.errors.len()
            ),
        };
        out
    }

    /// Unmounts the page and the overlay.
    pub fn teardown(&self) {
        drop(self.page.borrow_mut().take());
        if let Some((_, _, scope)) = self.nav.stack.top() {
            scope.dispose();
        }
        self.root.dispose();
        log::debug!("shell: torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkfolio_core::{DEFAULT_VIEWPORT, ManualClock};

    #[test]
    fn later_regions_win() {
        let r = Rect {
            x: 0.0,
            y: 0.0,
            w: 10.0,
            h: 10.0,
        };
        let regions = [
            HitRegion {
                rect: r,
                target: HitTarget::CvLink,
            },
            HitRegion {
                rect: r,
                target: HitTarget::Backdrop,
            },
        ];
        assert_eq!(top_hit(&regions, Vec2::new(5.0, 5.0)), Some(HitTarget::Backdrop));
        assert_eq!(top_hit(&regions, Vec2::new(50.0, 5.0)), None);
    }

    #[test]
    fn nav_items_fit_in_the_bar() {
        let first = nav_item_rect(DEFAULT_VIEWPORT, 0);
        let last = nav_item_rect(DEFAULT_VIEWPORT, 3);
        assert!(first.x > 0.0);
        assert!(last.x + last.w <= DEFAULT_VIEWPORT.width);
        assert!(first.y + first.h <= NAV_HEIGHT);
    }

    #[test]
    fn nav_bar_slides_in() {
        let clock = ManualClock::new();
        let rt = Runtime::with_options(clock.shared(), DEFAULT_VIEWPORT, Some(5));
        let shell = PageShell::mount(&rt, SiteConfig::default(), Route::About);
        assert_eq!(shell.frame().nav_y, NAV_ENTER_Y);
        rt.advance(&clock, web_time::Duration::from_secs(3));
        assert_eq!(shell.frame().nav_y, 0.0);
    }
}
