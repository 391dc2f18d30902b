//! Client-side routing for Inkfolio.
//!
//! Only the top entry of the back stack is mounted. Every entry owns a
//! `Scope`; leaving an entry (navigating away or popping it) disposes that
//! scope, which cancels whatever the page started, and gives the entry a fresh
//! scope for when it is shown again.

pub mod route;

pub use route::*;

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use inkfolio_core::{AnimationSpec, Scope, Signal, Subscription, signal};
use serde::{Deserialize, Serialize};
use web_time::Duration;

pub trait NavKey:
    Clone + Debug + PartialEq + 'static + Serialize + for<'de> Deserialize<'de>
{
}
impl<T> NavKey for T where
    T: Clone + Debug + PartialEq + 'static + Serialize + for<'de> Deserialize<'de>
{
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransitionDir {
    /// Also the direction of the first entry, which enters like a pushed one.
    Push,
    Pop,
}

struct Entry<K: NavKey> {
    id: u64,
    key: K,
    scope: Scope,
}

struct BackState<K: NavKey> {
    entries: Vec<Entry<K>>,
    next_id: u64,
    last_dir: TransitionDir,
}

impl<K: NavKey> BackState<K> {
    fn entry(&mut self, key: K) -> Entry<K> {
        let id = self.next_id;
        self.next_id += 1;
        Entry {
            id,
            key,
            scope: Scope::new(),
        }
    }

    /// Swaps a fresh scope into the current top and returns the old one for
    /// the caller to dispose once the stack is no longer borrowed.
    fn detach_top(&mut self) -> Option<Scope> {
        let top = self.entries.last_mut()?;
        log::debug!("nav: unmounting entry {} ({:?})", top.id, top.key);
        Some(std::mem::replace(&mut top.scope, Scope::new()))
    }
}

#[derive(Clone)]
pub struct NavBackStack<K: NavKey> {
    inner: Rc<RefCell<BackState<K>>>,
    version: Signal<u64>,
}

impl<K: NavKey> NavBackStack<K> {
    pub fn new(start: K) -> Self {
        Self {
            inner: Rc::new(RefCell::new(BackState {
                entries: vec![Entry {
                    id: 1,
                    key: start,
                    scope: Scope::new(),
                }],
                next_id: 2,
                last_dir: TransitionDir::Push,
            })),
            version: signal(0),
        }
    }

    pub fn top(&self) -> Option<(u64, K, Scope)> {
        let s = self.inner.borrow();
        s.entries
            .last()
            .map(|e| (e.id, e.key.clone(), e.scope.clone()))
    }

    pub fn current(&self) -> Option<K> {
        self.inner.borrow().entries.last().map(|e| e.key.clone())
    }

    pub fn keys(&self) -> Vec<K> {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|e| e.key.clone())
            .collect()
    }

    pub fn size(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn last_dir(&self) -> TransitionDir {
        self.inner.borrow().last_dir
    }

    /// Bumped after every change to the stack.
    pub fn version(&self) -> u64 {
        self.version.get()
    }

    pub fn watch(&self, f: impl Fn(&u64) + 'static) -> Subscription {
        self.version.watch(f)
    }

    fn bump(&self) {
        self.version.update(|v| *v = v.wrapping_add(1));
    }

    fn push_inner(&self, key: K) {
        let old = {
            let mut s = self.inner.borrow_mut();
            let old = s.detach_top();
            let entry = s.entry(key);
            s.entries.push(entry);
            s.last_dir = TransitionDir::Push;
            old
        };
        if let Some(scope) = old {
            scope.dispose();
        }
    }

    /// Pop the top entry (if any) and dispose its scope.
    fn pop_inner(&self) -> bool {
        let entry = {
            let mut s = self.inner.borrow_mut();
            s.last_dir = TransitionDir::Pop;
            s.entries.pop()
        };

        if let Some(e) = entry {
            log::debug!("nav: popped entry {} ({:?})", e.id, e.key);
            e.scope.dispose();
            true
        } else {
            false
        }
    }
}

#[derive(Clone)]
pub struct Navigator<K: NavKey> {
    pub stack: NavBackStack<K>,
}

impl<K: NavKey> Navigator<K> {
    pub fn new(start: K) -> Self {
        Self {
            stack: NavBackStack::new(start),
        }
    }

    /// Link navigation. Going to the entry already shown does nothing and
    /// returns `false`.
    pub fn navigate(&self, k: K) -> bool {
        if self.stack.current().as_ref() == Some(&k) {
            log::debug!("nav: already at {k:?}");
            return false;
        }
        self.stack.push_inner(k);
        self.stack.bump();
        true
    }

    /// History back. The first entry is never popped.
    pub fn back(&self) -> bool {
        if self.stack.size() <= 1 {
            return false;
        }
        let ok = self.stack.pop_inner();
        if ok {
            self.stack.bump();
        }
        ok
    }

    pub fn current(&self) -> Option<K> {
        self.stack.current()
    }

    /// Runs `f` inside the top entry's scope so everything it mounts is torn
    /// down when the entry is left.
    pub fn mount_top<R>(&self, f: impl FnOnce(u64, &K) -> R) -> Option<R> {
        let (id, key, scope) = self.stack.top()?;
        Some(scope.run(|| f(id, &key)))
    }
}

/// Page entrance: content slides in `slide_px` on the x axis while fading in.
#[derive(Clone, Copy, Debug)]
pub struct NavTransition {
    pub slide_px: f32,
    pub fade: bool,
    pub spec: AnimationSpec,
}

impl Default for NavTransition {
    fn default() -> Self {
        Self {
            slide_px: 20.0,
            fade: true,
            spec: AnimationSpec::page_spring(),
        }
    }
}

impl NavTransition {
    /// `(translate_x, alpha)` for a page shown `elapsed` ago. Pushed pages
    /// come in from the right, popped ones from the left.
    pub fn frame(&self, dir: TransitionDir, elapsed: Duration) -> (f32, f32) {
        let t = self.spec.progress(elapsed);
        let side = if dir == TransitionDir::Push { 1.0 } else { -1.0 };
        let dx = (1.0 - t) * self.slide_px * side;
        let alpha = if self.fade { t.clamp(0.0, 1.0) } else { 1.0 };
        (dx, alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkfolio_core::{effect, on_unmount};
    use std::cell::Cell;

    fn mounted_flag(nav: &Navigator<Route>) -> Rc<Cell<bool>> {
        let alive = Rc::new(Cell::new(true));
        let a = alive.clone();
        nav.mount_top(move |_, _| {
            effect(move || on_unmount(move || a.set(false)));
        });
        alive
    }

    #[test]
    fn unknown_paths_fall_back_home() {
        assert_eq!(Route::from_path("/about"), Route::About);
        assert_eq!(Route::from_path("/projects/"), Route::Projects);
        assert_eq!(Route::from_path("/contact?ref=nav#form"), Route::Contact);
        assert_eq!(Route::from_path("/"), Route::Home);
        assert_eq!(Route::from_path(""), Route::Home);
        assert_eq!(Route::from_path("/blog"), Route::Home);
    }

    #[test]
    fn nav_items_mark_current() {
        let items = nav_items(Route::Projects);
        assert_eq!(items.len(), 4);
        let active: Vec<Route> = items.iter().filter(|i| i.active).map(|i| i.route).collect();
        assert_eq!(active, vec![Route::Projects]);
        assert_eq!(items[0].label, "Accueil");
    }

    #[test]
    fn navigating_disposes_previous_page() {
        let nav = Navigator::new(Route::Home);
        let home = mounted_flag(&nav);

        assert!(nav.navigate(Route::About));
        assert!(!home.get());
        assert_eq!(nav.current(), Some(Route::About));
        assert_eq!(nav.stack.last_dir(), TransitionDir::Push);

        let about = mounted_flag(&nav);
        assert!(nav.back());
        assert!(!about.get());
        assert_eq!(nav.current(), Some(Route::Home));
        assert_eq!(nav.stack.last_dir(), TransitionDir::Pop);

        let (_, _, scope) = nav.stack.top().unwrap();
        assert!(!scope.is_disposed());
    }

    #[test]
    fn same_route_is_a_no_op() {
        let nav = Navigator::new(Route::Contact);
        let page = mounted_flag(&nav);
        let v = nav.stack.version();
        assert!(!nav.navigate(Route::Contact));
        assert!(page.get());
        assert_eq!(nav.stack.version(), v);
        assert_eq!(nav.stack.size(), 1);
    }

    #[test]
    fn first_entry_is_never_popped() {
        let nav = Navigator::new(Route::Home);
        assert_eq!(nav.stack.last_dir(), TransitionDir::Push);
        assert!(!nav.back());
        assert_eq!(nav.stack.size(), 1);
    }

    #[test]
    fn version_watchers_see_each_change() {
        let nav = Navigator::new(Route::Home);
        let seen = Rc::new(Cell::new(0));
        let s = seen.clone();
        let _sub = nav.stack.watch(move |_| s.set(s.get() + 1));
        nav.navigate(Route::About);
        nav.navigate(Route::Projects);
        nav.back();
        nav.navigate(Route::Contact);
        assert_eq!(seen.get(), 4);
        assert_eq!(nav.stack.keys(), vec![Route::Home, Route::About, Route::Contact]);
    }

    #[test]
    fn entrance_settles_at_rest() {
        let t = NavTransition::default();
        let (dx, alpha) = t.frame(TransitionDir::Push, Duration::ZERO);
        assert_eq!((dx, alpha), (20.0, 0.0));
        let (dx, _) = t.frame(TransitionDir::Pop, Duration::ZERO);
        assert_eq!(dx, -20.0);
        assert_eq!(t.frame(TransitionDir::Push, Duration::from_secs(1)), (0.0, 1.0));
    }
}
