//! Inkfolio pages and the shell that routes between them.
//!
//! [`PageShell`] owns the navigation stack and the transition overlay; each
//! page type owns the effects it shows. Everything is driven by an
//! `inkfolio_core::Runtime`, so the whole site runs headless under a
//! `ManualClock`.

pub mod about;
pub mod config;
pub mod contact;
pub mod home;
pub mod projects;
pub mod shell;

pub use about::{AboutFrame, AboutPage, CV_PATH};
pub use config::{ConfigError, SiteConfig, load_config};
pub use contact::{ContactForm, ContactPage, Field, FieldError, FormData, SubmitError, SubmitPhase};
pub use home::{HomeFrame, HomePage, HomeTiming};
pub use projects::{Category, PROJECTS, Project, ProjectsPage};
pub use shell::*;
