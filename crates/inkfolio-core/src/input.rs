//! Read-only input broadcast shared by every consumer (parallax, scroll lines).
//! The platform loop is the only writer.

use crate::{Signal, Size, Subscription, Vec2, signal};

#[derive(Clone)]
pub struct InputState {
    pointer: Signal<Vec2>,
    scroll_y: Signal<f32>,
    viewport: Signal<Size>,
}

impl InputState {
    pub fn new(viewport: Size) -> Self {
        Self {
            pointer: signal(viewport.center()),
            scroll_y: signal(0.0),
            viewport: signal(viewport),
        }
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer.get()
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y.get()
    }

    pub fn viewport(&self) -> Size {
        self.viewport.get()
    }

    /// Pointer position relative to the viewport center.
    pub fn pointer_from_center(&self) -> Vec2 {
        let p = self.pointer();
        let c = self.viewport().center();
        Vec2::new(p.x - c.x, p.y - c.y)
    }

    pub fn pointer_moved(&self, pos: Vec2) {
        if !pos.x.is_finite() || !pos.y.is_finite() {
            log::warn!("ignoring non-finite pointer position {pos:?}");
            return;
        }
        self.pointer.set(pos);
    }

    pub fn scrolled_to(&self, y: f32) {
        self.scroll_y.set(if y.is_finite() { y.max(0.0) } else { 0.0 });
    }

    pub fn resized(&self, size: Size) {
        self.viewport.set(size);
    }

    pub fn watch_pointer(&self, f: impl Fn(&Vec2) + 'static) -> Subscription {
        self.pointer.watch(f)
    }

    pub fn watch_scroll(&self, f: impl Fn(&f32) + 'static) -> Subscription {
        self.scroll_y.watch(f)
    }

    pub fn pointer_listeners(&self) -> usize {
        self.pointer.subscriber_count()
    }

    pub fn scroll_listeners(&self) -> usize {
        self.scroll_y.subscriber_count()
    }
}
