//! Decorative effects, each an explicit state machine on an `inkfolio_core::Runtime`.
//!
//! | Effect | Lifetime of its random geometry | Timers |
//! |---|---|---|
//! | [`Typewriter`] | n/a | start delay, per-character, cursor blink |
//! | [`TransitionOverlay`] | per activation | deactivation |
//! | [`HoverBurst`] | per instance | none (sampled) |
//! | [`ParallaxBackground`] | n/a | none (pointer listener) |
//! | [`FloatingShapes`] | per instance | none (sampled) |
//! | [`ScrollSpeedLines`] | per instance | none (scroll listener) |
//! | [`ParticleEffect`] | per particle count | none (sampled) |
//! | [`LoadingGate`] | n/a | one timeout |
//! | [`Stagger`] | n/a | none (sampled) |
//!
//! Effects that own timers or listeners register their cleanup with the scope
//! current at mount time, and also clean up when their handle is dropped.

pub mod floating_shapes;
pub mod ink_splatter;
pub mod loading;
pub mod parallax;
pub mod particles;
pub mod scroll_lines;
pub mod speed_lines;
pub mod stagger;
pub mod typewriter;

pub use floating_shapes::*;
pub use ink_splatter::*;
pub use loading::*;
pub use parallax::*;
pub use particles::*;
pub use scroll_lines::*;
pub use speed_lines::*;
pub use stagger::*;
pub use typewriter::*;
