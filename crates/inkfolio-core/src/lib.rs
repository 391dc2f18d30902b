//! # Runtime, Timers, and Scopes
//!
//! `inkfolio-core` is the headless runtime every decorative effect runs on.
//! Nothing in it touches a real window; time and input are injected so a test
//! (or a server-side snapshot) can drive the site deterministically.
//!
//! - `Runtime`: a cloneable handle bundling the clock, the timer queue, the
//!   input broadcast and the root random generator.
//! - `Scope` / `Dispose`: ownership of everything a mounted element started.
//! - `Signal<T>`: observable value with unsubscribe-on-drop subscriptions.
//!
//! ## Timers
//!
//! ```rust
//! use inkfolio_core::*;
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use web_time::Duration;
//!
//! let clock = ManualClock::new();
//! let rt = Runtime::new(clock.shared());
//!
//! let fired = Rc::new(Cell::new(false));
//! let f = fired.clone();
//! rt.set_timeout(Duration::from_millis(300), move || f.set(true));
//!
//! rt.advance(&clock, Duration::from_millis(299));
//! assert!(!fired.get());
//! rt.advance(&clock, Duration::from_millis(1));
//! assert!(fired.get());
//! ```
//!
//! ## Scopes and cleanup
//!
//! Everything a page starts (typing timers, cursor blink, pointer listeners)
//! is registered with the scope that was current when it mounted. Disposing
//! the scope cancels all of it:
//!
//! ```rust
//! use inkfolio_core::*;
//! use web_time::Duration;
//!
//! let clock = ManualClock::new();
//! let rt = Runtime::new(clock.shared());
//! let scope = Scope::new();
//!
//! scope.run(|| {
//!     let id = rt.set_interval(Duration::from_millis(400), || {});
//!     let rt = rt.clone();
//!     effect(move || on_unmount(move || {
//!         rt.cancel(id);
//!     }));
//! });
//!
//! assert_eq!(rt.pending_timers(), 1);
//! scope.dispose();
//! assert_eq!(rt.pending_timers(), 0);
//! ```

pub mod animation;
pub mod effects;
pub mod geometry;
pub mod input;
pub mod random;
pub mod runtime;
pub mod scope;
pub mod signal;
pub mod timer;

pub use animation::*;
pub use effects::*;
pub use geometry::*;
pub use input::*;
pub use random::*;
pub use runtime::*;
pub use scope::*;
pub use signal::*;
pub use timer::*;
